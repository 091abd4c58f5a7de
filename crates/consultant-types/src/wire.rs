//! Wire types exchanged with the agent backend's run endpoint.
//!
//! Outbound: [`RunRequest`] carries one user message addressed to a session.
//! Inbound: each `data: ` line of the response body holds an [`AgentEvent`]
//! whose `content.parts[].text` fields are the incremental reply fragments.

use serde::{Deserialize, Serialize};

use crate::session::SessionInfo;

/// Body of a run request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
    pub new_message: NewMessage,
}

impl RunRequest {
    /// Build the request that submits `text` to the given session.
    pub fn for_session(session: &SessionInfo, text: impl Into<String>) -> Self {
        Self {
            app_name: session.app_name.clone(),
            user_id: session.user_id.clone(),
            session_id: session.session_id.clone(),
            new_message: NewMessage {
                role: "user".to_string(),
                parts: vec![RequestPart { text: text.into() }],
            },
        }
    }
}

/// The user message embedded in a [`RunRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub role: String,
    pub parts: Vec<RequestPart>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPart {
    pub text: String,
}

/// One event decoded from a `data: ` line of the run stream.
///
/// Only `content` matters for assembly; `author` and `partial` are kept for
/// diagnostics. Every other field the backend sends is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgentEvent {
    #[serde(default)]
    pub content: Option<EventContent>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub partial: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventContent {
    #[serde(default)]
    pub parts: Option<Vec<EventPart>>,
}

/// A content part. Parts without text (function calls, inline data, ...)
/// deserialize with `text: None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPart {
    #[serde(default)]
    pub text: Option<String>,
}

impl AgentEvent {
    /// Non-empty text fragments of this event, in part order.
    pub fn text_fragments(&self) -> impl Iterator<Item = &str> {
        self.content
            .iter()
            .flat_map(|c| c.parts.iter().flatten())
            .filter_map(|p| p.text.as_deref())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_request_serializes_camel_case() {
        let session = SessionInfo::new("s1", "u1", "demo");
        let req = RunRequest::for_session(&session, "hello");
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "appName": "demo",
                "userId": "u1",
                "sessionId": "s1",
                "newMessage": {"role": "user", "parts": [{"text": "hello"}]}
            })
        );
    }

    #[test]
    fn test_agent_event_text_fragments_in_order() {
        let json = r#"{"content":{"parts":[{"text":"Har"},{"functionCall":{}},{"text":""},{"text":"vard"}]},"author":"college_agent"}"#;
        let event: AgentEvent = serde_json::from_str(json).unwrap();
        let fragments: Vec<&str> = event.text_fragments().collect();
        assert_eq!(fragments, vec!["Har", "vard"]);
        assert_eq!(event.author.as_deref(), Some("college_agent"));
    }

    #[test]
    fn test_agent_event_without_content_has_no_fragments() {
        let event: AgentEvent = serde_json::from_str(r#"{"id":"e1","actions":{}}"#).unwrap();
        assert_eq!(event.text_fragments().count(), 0);

        let event: AgentEvent = serde_json::from_str(r#"{"content":{"role":"model"}}"#).unwrap();
        assert_eq!(event.text_fragments().count(), 0);
    }

    #[test]
    fn test_agent_event_null_content() {
        let event: AgentEvent = serde_json::from_str(r#"{"content":null}"#).unwrap();
        assert_eq!(event.text_fragments().count(), 0);
    }
}
