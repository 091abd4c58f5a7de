//! Frame to fragment extraction.
//!
//! A frame carries an event only if it starts with the literal `data: `
//! marker. The remainder is parsed as an [`AgentEvent`]; anything that does
//! not parse is dropped without error, since truncated or foreign payloads
//! are expected on this channel.

use consultant_types::wire::AgentEvent;

/// Literal prefix that marks a frame as carrying event data.
pub const DATA_PREFIX: &str = "data: ";

/// What a single frame turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedFrame {
    /// The frame does not carry the data marker (comments, `event:` lines, blanks).
    Ignored,
    /// The payload after the marker was not a valid event.
    Malformed,
    /// A valid event; its text fragments in part order, possibly none.
    Event(Vec<String>),
}

impl ParsedFrame {
    /// Fragments carried by this frame. Empty for ignored or malformed frames.
    pub fn into_fragments(self) -> Vec<String> {
        match self {
            ParsedFrame::Event(fragments) => fragments,
            ParsedFrame::Ignored | ParsedFrame::Malformed => Vec::new(),
        }
    }
}

/// Stateless interpreter of decoded frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventParser;

impl EventParser {
    pub fn new() -> Self {
        Self
    }

    /// Classify one frame and extract its text fragments.
    pub fn parse(&self, frame: &str) -> ParsedFrame {
        let Some(payload) = frame.strip_prefix(DATA_PREFIX) else {
            return ParsedFrame::Ignored;
        };

        match serde_json::from_str::<AgentEvent>(payload) {
            Ok(event) => {
                if let Some(author) = event.author.as_deref() {
                    tracing::trace!(author, partial = ?event.partial, "event received");
                }
                ParsedFrame::Event(event.text_fragments().map(str::to_string).collect())
            }
            Err(e) => {
                tracing::trace!(error = %e, len = payload.len(), "discarding malformed event payload");
                ParsedFrame::Malformed
            }
        }
    }

    /// Shorthand for `parse(frame).into_fragments()`.
    pub fn fragments(&self, frame: &str) -> Vec<String> {
        self.parse(frame).into_fragments()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_event() {
        let parser = EventParser::new();
        let frame = r#"data: {"content":{"parts":[{"text":"Hi there"}]}}"#;
        assert_eq!(
            parser.parse(frame),
            ParsedFrame::Event(vec!["Hi there".to_string()])
        );
    }

    #[test]
    fn test_multiple_parts_keep_order_and_skip_textless() {
        let parser = EventParser::new();
        let frame = r#"data: {"content":{"parts":[{"text":"a"},{"functionCall":{"name":"query_pinecone"}},{"text":""},{"text":"b"}]}}"#;
        assert_eq!(parser.fragments(frame), vec!["a", "b"]);
    }

    #[test]
    fn test_frame_without_prefix_is_ignored() {
        let parser = EventParser::new();
        assert_eq!(parser.parse(""), ParsedFrame::Ignored);
        assert_eq!(parser.parse(": keepalive"), ParsedFrame::Ignored);
        assert_eq!(parser.parse("event: message"), ParsedFrame::Ignored);
        assert_eq!(
            parser.parse(r#"{"content":{"parts":[{"text":"x"}]}}"#),
            ParsedFrame::Ignored
        );
        // The marker requires the space.
        assert_eq!(
            parser.parse(r#"data:{"content":{"parts":[{"text":"x"}]}}"#),
            ParsedFrame::Ignored
        );
    }

    #[test]
    fn test_malformed_payload_is_discarded() {
        let parser = EventParser::new();
        assert_eq!(parser.parse(r#"data: {"content":{"parts":[{"te"#), ParsedFrame::Malformed);
        assert_eq!(parser.parse("data: [DONE]"), ParsedFrame::Malformed);
        assert_eq!(parser.parse("data: null"), ParsedFrame::Malformed);
        assert!(parser.fragments("data: {not json}").is_empty());
    }

    #[test]
    fn test_event_without_text_is_valid_and_empty() {
        let parser = EventParser::new();
        let frame = r#"data: {"author":"college_agent","actions":{"stateDelta":{}}}"#;
        assert_eq!(parser.parse(frame), ParsedFrame::Event(Vec::new()));
    }

    #[test]
    fn test_trailing_carriage_return_is_tolerated() {
        let parser = EventParser::new();
        let frame = "data: {\"content\":{\"parts\":[{\"text\":\"ok\"}]}}\r";
        assert_eq!(parser.fragments(frame), vec!["ok"]);
    }

    #[test]
    fn test_fragment_whitespace_is_preserved() {
        let parser = EventParser::new();
        let frame = r#"data: {"content":{"parts":[{"text":"vard "},{"text":"\n"}]}}"#;
        assert_eq!(parser.fragments(frame), vec!["vard ", "\n"]);
    }
}
