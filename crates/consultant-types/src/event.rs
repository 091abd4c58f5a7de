//! Conversation state change notifications.
//!
//! Every mutation of the conversation (a message appended, a fragment
//! applied, a message finalized, the busy flag toggled, the error banner
//! changed) is published as one [`ConversationEvent`] so renderers can
//! redraw incrementally and tests can assert intermediate states.

use serde::{Deserialize, Serialize};

use crate::chat::ConversationMessage;
use crate::session::SessionInfo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    /// A new entry was appended at `index`.
    MessageAppended {
        index: usize,
        message: ConversationMessage,
    },

    /// `fragment` was appended to the open message at `index`.
    MessageUpdated {
        index: usize,
        fragment: String,
        message: ConversationMessage,
    },

    /// The open message at `index` stopped streaming.
    MessageFinalized {
        index: usize,
        message: ConversationMessage,
    },

    /// A turn started (`true`) or ended (`false`).
    BusyChanged { busy: bool },

    /// The user-visible error banner was set or cleared.
    Banner { text: Option<String> },

    /// A new backend session replaced the previous one.
    SessionChanged { session: SessionInfo },

    /// The log was cleared for a new conversation.
    ConversationReset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ConversationEvent::MessageUpdated {
            index: 1,
            fragment: "vard ".to_string(),
            message: ConversationMessage::assistant_streaming("Harvard "),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "message_updated");
        assert_eq!(json["fragment"], "vard ");
        assert_eq!(json["message"]["streaming"], true);
    }

    #[test]
    fn test_unit_variant_roundtrip() {
        let json = serde_json::to_string(&ConversationEvent::ConversationReset).unwrap();
        assert_eq!(json, r#"{"type":"conversation_reset"}"#);
        let parsed: ConversationEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ConversationEvent::ConversationReset);
    }
}
