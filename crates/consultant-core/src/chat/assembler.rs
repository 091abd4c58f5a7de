//! Folds a turn's text fragments into the conversation log.
//!
//! One assembler lives for exactly one turn. The first non-empty fragment
//! opens an assistant message; every later fragment is concatenated onto
//! it. At the end of the turn the open message is finalized, or, when no
//! fragment ever arrived, a fallback reply is appended instead. A failed
//! turn finalizes whatever was open and appends the error reply.

use consultant_types::chat::ConversationMessage;
use consultant_types::error::LogError;
use consultant_types::event::ConversationEvent;

use super::log::ConversationLog;

/// Appended when a turn completes without producing any text.
pub const FALLBACK_REPLY: &str = "Sorry, I could not process your request. Please try again.";

/// Appended when a turn fails.
pub const ERROR_REPLY: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssemblerState {
    Idle,
    Open { index: usize },
}

/// How a turn ended, from the log's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Assembled {
    /// The streamed message at `index` was finalized.
    Finalized { index: usize, fragments: usize },
    /// No fragment arrived; the fallback reply was appended at `index`.
    Fallback { index: usize },
}

#[derive(Debug)]
pub struct MessageAssembler {
    state: AssemblerState,
    fragments: usize,
}

impl Default for MessageAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageAssembler {
    pub fn new() -> Self {
        Self {
            state: AssemblerState::Idle,
            fragments: 0,
        }
    }

    /// Whether this turn has opened a message yet.
    pub fn is_open(&self) -> bool {
        matches!(self.state, AssemblerState::Open { .. })
    }

    /// Number of fragments applied so far.
    pub fn fragment_count(&self) -> usize {
        self.fragments
    }

    /// Apply one fragment. Empty fragments change nothing and yield `None`.
    pub fn apply(
        &mut self,
        log: &mut ConversationLog,
        fragment: &str,
    ) -> Result<Option<ConversationEvent>, LogError> {
        if fragment.is_empty() {
            return Ok(None);
        }

        let event = match self.state {
            AssemblerState::Idle => {
                let index = log.open(fragment)?;
                self.state = AssemblerState::Open { index };
                ConversationEvent::MessageAppended {
                    index,
                    message: log.messages()[index].clone(),
                }
            }
            AssemblerState::Open { index } => {
                let extended = log.extend_open(fragment)?;
                if extended != index {
                    return Err(LogError::NoOpenMessage);
                }
                ConversationEvent::MessageUpdated {
                    index,
                    fragment: fragment.to_string(),
                    message: log.messages()[index].clone(),
                }
            }
        };

        self.fragments += 1;
        Ok(Some(event))
    }

    /// Close the turn after the stream ended normally.
    ///
    /// Returns the event to publish along with the outcome.
    pub fn finish(
        self,
        log: &mut ConversationLog,
    ) -> Result<(Assembled, ConversationEvent), LogError> {
        match self.state {
            AssemblerState::Open { index } => {
                log.finalize_open()?;
                let event = ConversationEvent::MessageFinalized {
                    index,
                    message: log.messages()[index].clone(),
                };
                Ok((
                    Assembled::Finalized {
                        index,
                        fragments: self.fragments,
                    },
                    event,
                ))
            }
            AssemblerState::Idle => {
                let message = ConversationMessage::assistant_complete(FALLBACK_REPLY);
                let index = log.append(message.clone())?;
                Ok((
                    Assembled::Fallback { index },
                    ConversationEvent::MessageAppended { index, message },
                ))
            }
        }
    }

    /// Close the turn after a failure.
    ///
    /// A partially streamed message is kept and finalized, then the error
    /// reply is appended after it. Returns the events in the order they
    /// should be published.
    pub fn fail(self, log: &mut ConversationLog) -> Result<Vec<ConversationEvent>, LogError> {
        let mut events = Vec::with_capacity(2);

        if let AssemblerState::Open { index } = self.state {
            log.finalize_open()?;
            events.push(ConversationEvent::MessageFinalized {
                index,
                message: log.messages()[index].clone(),
            });
        }

        let message = ConversationMessage::assistant_complete(ERROR_REPLY);
        let index = log.append(message.clone())?;
        events.push(ConversationEvent::MessageAppended { index, message });

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use consultant_types::chat::MessageRole;

    fn log_with_user(text: &str) -> ConversationLog {
        let mut log = ConversationLog::new();
        log.append(ConversationMessage::user(text)).unwrap();
        log
    }

    #[test]
    fn test_fragments_fold_into_one_message() {
        let mut log = log_with_user("where?");
        let mut asm = MessageAssembler::new();

        let first = asm.apply(&mut log, "Har").unwrap().unwrap();
        assert!(matches!(first, ConversationEvent::MessageAppended { index: 1, .. }));

        for fragment in ["vard ", "is in Cambridge."] {
            let event = asm.apply(&mut log, fragment).unwrap().unwrap();
            assert!(matches!(event, ConversationEvent::MessageUpdated { index: 1, .. }));
        }

        // Intermediate state: open, partially filled.
        assert_eq!(log.len(), 2);
        assert!(log.messages()[1].streaming);

        let (outcome, event) = asm.finish(&mut log).unwrap();
        assert_eq!(
            outcome,
            Assembled::Finalized {
                index: 1,
                fragments: 3
            }
        );
        assert!(matches!(event, ConversationEvent::MessageFinalized { index: 1, .. }));

        let last = log.last().unwrap();
        assert_eq!(last.role, MessageRole::Assistant);
        assert_eq!(last.content, "Harvard is in Cambridge.");
        assert!(!last.streaming);
    }

    #[test]
    fn test_updated_event_carries_fragment_and_snapshot() {
        let mut log = ConversationLog::new();
        let mut asm = MessageAssembler::new();
        asm.apply(&mut log, "Hi").unwrap();

        let event = asm.apply(&mut log, " there").unwrap().unwrap();
        assert_eq!(
            event,
            ConversationEvent::MessageUpdated {
                index: 0,
                fragment: " there".to_string(),
                message: ConversationMessage::assistant_streaming("Hi there"),
            }
        );
    }

    #[test]
    fn test_empty_fragment_is_ignored() {
        let mut log = log_with_user("x");
        let mut asm = MessageAssembler::new();

        assert!(asm.apply(&mut log, "").unwrap().is_none());
        assert!(!asm.is_open());
        assert_eq!(log.len(), 1);
        assert_eq!(asm.fragment_count(), 0);
    }

    #[test]
    fn test_no_fragments_yields_fallback() {
        let mut log = log_with_user("x");
        let asm = MessageAssembler::new();

        let (outcome, event) = asm.finish(&mut log).unwrap();
        assert_eq!(outcome, Assembled::Fallback { index: 1 });
        assert_eq!(
            event,
            ConversationEvent::MessageAppended {
                index: 1,
                message: ConversationMessage::assistant_complete(FALLBACK_REPLY),
            }
        );
        assert_eq!(log.last().unwrap().content, FALLBACK_REPLY);
    }

    #[test]
    fn test_fail_before_any_fragment_appends_error() {
        let mut log = log_with_user("x");
        let asm = MessageAssembler::new();

        let events = asm.fail(&mut log).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.last().unwrap().content, ERROR_REPLY);
        assert!(!log.last().unwrap().streaming);
    }

    #[test]
    fn test_fail_mid_stream_keeps_partial_reply() {
        let mut log = log_with_user("x");
        let mut asm = MessageAssembler::new();
        asm.apply(&mut log, "Partial answ").unwrap();

        let events = asm.fail(&mut log).unwrap();
        assert!(matches!(events[0], ConversationEvent::MessageFinalized { index: 1, .. }));
        assert!(matches!(events[1], ConversationEvent::MessageAppended { index: 2, .. }));

        assert_eq!(log.len(), 3);
        assert_eq!(log.messages()[1].content, "Partial answ");
        assert!(!log.messages()[1].streaming);
        assert_eq!(log.messages()[2].content, ERROR_REPLY);
        assert!(log.open_index().is_none());
    }

    #[test]
    fn test_apply_after_external_finalize_errors() {
        let mut log = ConversationLog::new();
        let mut asm = MessageAssembler::new();
        asm.apply(&mut log, "a").unwrap();
        log.finalize_open().unwrap();

        assert_eq!(asm.apply(&mut log, "b"), Err(LogError::NoOpenMessage));
        assert_eq!(log.messages()[0].content, "a");
    }
}
