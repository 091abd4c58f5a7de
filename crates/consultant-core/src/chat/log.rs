//! The ordered conversation log rendered by the view layer.
//!
//! The log is append-only. Only the last entry may be open
//! (`streaming = true`), and only its `content` and `streaming` fields are
//! ever mutated after insertion. Every method enforces that shape and
//! reports a [`LogError`] instead of breaking it.

use consultant_types::chat::ConversationMessage;
use consultant_types::error::LogError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    messages: Vec<ConversationMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    /// Index of the open message, if any. It is always the last entry.
    pub fn open_index(&self) -> Option<usize> {
        match self.messages.last() {
            Some(m) if m.streaming => Some(self.messages.len() - 1),
            _ => None,
        }
    }

    /// Append a complete message and return its index.
    pub fn append(&mut self, message: ConversationMessage) -> Result<usize, LogError> {
        if let Some(index) = self.open_index() {
            return Err(LogError::OpenMessagePending { index });
        }
        let mut message = message;
        message.streaming = false;
        self.messages.push(message);
        Ok(self.messages.len() - 1)
    }

    /// Append an open assistant message holding its first fragment.
    pub fn open(&mut self, fragment: &str) -> Result<usize, LogError> {
        if let Some(index) = self.open_index() {
            return Err(LogError::OpenMessagePending { index });
        }
        self.messages.push(ConversationMessage::assistant_streaming(fragment));
        Ok(self.messages.len() - 1)
    }

    /// Concatenate `fragment` onto the open message.
    pub fn extend_open(&mut self, fragment: &str) -> Result<usize, LogError> {
        let index = self.open_index().ok_or(LogError::NoOpenMessage)?;
        self.messages[index].content.push_str(fragment);
        Ok(index)
    }

    /// Freeze the open message. Returns its index.
    pub fn finalize_open(&mut self) -> Result<usize, LogError> {
        let index = self.open_index().ok_or(LogError::NoOpenMessage)?;
        self.messages[index].streaming = false;
        Ok(index)
    }

    /// Drop every entry (new conversation).
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
