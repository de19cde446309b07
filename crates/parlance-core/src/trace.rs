//! Upstream trace model and reply extraction.
//!
//! The dialogue service answers every interaction with an ordered list of
//! traces, each tagged by `type` with its body under `payload`. Only `text`
//! and `end` traces matter to the relay; everything else is carried as
//! [`UpstreamTrace::Other`] so extraction can skip it explicitly.

use serde::Deserialize;
use serde_json::Value;

/// A single event emitted by the upstream dialogue engine.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "Value")]
pub enum UpstreamTrace {
    /// A spoken/text reply. A missing message deserializes as empty.
    Text { message: String },
    /// The upstream session is over. A missing reason deserializes as empty.
    End { reason: String },
    /// Any other element (speak, visual, choice, ...). Elements without a
    /// string `type` keep an empty kind.
    Other { kind: String },
}

impl UpstreamTrace {
    pub fn text(message: impl Into<String>) -> Self {
        UpstreamTrace::Text {
            message: message.into(),
        }
    }

    pub fn end(reason: impl Into<String>) -> Self {
        UpstreamTrace::End {
            reason: reason.into(),
        }
    }
}

fn payload_str(element: &Value, field: &str) -> String {
    element
        .get("payload")
        .and_then(|payload| payload.get(field))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

impl From<Value> for UpstreamTrace {
    fn from(element: Value) -> Self {
        let kind = element.get("type").and_then(Value::as_str).unwrap_or_default();
        match kind {
            "text" => UpstreamTrace::Text {
                message: payload_str(&element, "message"),
            },
            "end" => UpstreamTrace::End {
                reason: payload_str(&element, "reason"),
            },
            _ => UpstreamTrace::Other {
                kind: kind.to_string(),
            },
        }
    }
}

/// Ordered upstream reply. Producer order is significant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct UpstreamPayload {
    traces: Vec<UpstreamTrace>,
}

/// Outcome of interpreting an [`UpstreamPayload`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Extraction<'a> {
    /// Text to hand back to the widget.
    Message(&'a str),
    /// Conversation finished upstream.
    Ended { reason: &'a str },
    /// Neither a usable text trace nor an end trace was present.
    Unrecognized,
}

impl UpstreamPayload {
    pub fn new(traces: Vec<UpstreamTrace>) -> Self {
        Self { traces }
    }

    /// Parse a raw upstream response body.
    ///
    /// Only a body that is not a JSON array is an error. Array elements of
    /// any other shape parse as [`UpstreamTrace::Other`].
    pub fn from_slice(body: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(body)
    }

    pub fn traces(&self) -> &[UpstreamTrace] {
        &self.traces
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Message of the first `text` trace, if that message is non-empty.
    ///
    /// Only the first `text` trace is considered. An empty body on a 200
    /// means "conversation ended" to the widget, so an empty message must
    /// never be returned as a reply.
    pub fn first_message(&self) -> Option<&str> {
        self.traces
            .iter()
            .find_map(|trace| match trace {
                UpstreamTrace::Text { message } => Some(message.as_str()),
                _ => None,
            })
            .filter(|message| !message.is_empty())
    }

    /// Reason carried by the first `end` trace.
    pub fn end_reason(&self) -> Option<&str> {
        self.traces.iter().find_map(|trace| match trace {
            UpstreamTrace::End { reason } => Some(reason.as_str()),
            _ => None,
        })
    }

    /// Apply the relay extraction policy: text first, then end.
    pub fn extract(&self) -> Extraction<'_> {
        if let Some(message) = self.first_message() {
            return Extraction::Message(message);
        }
        match self.end_reason() {
            Some(reason) => Extraction::Ended { reason },
            None => Extraction::Unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> UpstreamPayload {
        UpstreamPayload::from_slice(json.as_bytes()).unwrap()
    }

    #[test]
    fn test_parse_known_and_unknown_traces() {
        let payload = parse(
            r#"[
                {"type": "speak", "payload": {"message": "ignored"}},
                {"type": "text", "payload": {"slate": {}, "message": "Hi there"}},
                {"type": "end"}
            ]"#,
        );
        assert_eq!(
            payload.traces(),
            &[
                UpstreamTrace::Other {
                    kind: "speak".to_string()
                },
                UpstreamTrace::text("Hi there"),
                UpstreamTrace::end(""),
            ]
        );
    }

    #[test]
    fn test_text_before_end_wins() {
        let payload = parse(
            r#"[
                {"type": "text", "payload": {"message": "first"}},
                {"type": "end", "payload": {"reason": "done"}},
                {"type": "text", "payload": {"message": "second"}}
            ]"#,
        );
        assert_eq!(payload.extract(), Extraction::Message("first"));
    }

    #[test]
    fn test_text_after_end_still_wins() {
        let payload = UpstreamPayload::new(vec![
            UpstreamTrace::end("bye"),
            UpstreamTrace::text("late text"),
        ]);
        assert_eq!(payload.extract(), Extraction::Message("late text"));
    }

    #[test]
    fn test_only_end_trace() {
        let payload = parse(r#"[{"type": "end", "payload": {"reason": "user left"}}]"#);
        assert_eq!(payload.first_message(), None);
        assert_eq!(
            payload.extract(),
            Extraction::Ended {
                reason: "user left"
            }
        );
    }

    #[test]
    fn test_neither_trace_is_unrecognized() {
        let payload = parse(r#"[{"type": "visual", "payload": {"image": "x.png"}}]"#);
        assert_eq!(payload.extract(), Extraction::Unrecognized);
        assert_eq!(UpstreamPayload::default().extract(), Extraction::Unrecognized);
    }

    #[test]
    fn test_empty_first_text_falls_through_to_end() {
        let payload = UpstreamPayload::new(vec![
            UpstreamTrace::text(""),
            UpstreamTrace::text("not considered"),
            UpstreamTrace::end("finished"),
        ]);
        assert_eq!(payload.first_message(), None);
        assert_eq!(
            payload.extract(),
            Extraction::Ended {
                reason: "finished"
            }
        );
    }

    #[test]
    fn test_text_without_message_field() {
        let payload = parse(r#"[{"type": "text", "payload": {}}]"#);
        assert_eq!(payload.traces(), &[UpstreamTrace::text("")]);
        assert_eq!(payload.extract(), Extraction::Unrecognized);
    }

    #[test]
    fn test_non_array_body_is_error() {
        assert!(UpstreamPayload::from_slice(br#"{"type": "text"}"#).is_err());
        assert!(UpstreamPayload::from_slice(b"<html>oops</html>").is_err());
    }

    #[test]
    fn test_untyped_elements_are_skipped() {
        let payload = parse(
            r#"[{"time": 123}, 7, {"type": "text", "payload": {"message": "Hi there"}}, {"type": 5}]"#,
        );
        assert_eq!(payload.traces().len(), 4);
        assert_eq!(payload.extract(), Extraction::Message("Hi there"));

        let payload = parse(r#"[{"payload": {}}]"#);
        assert_eq!(
            payload.traces(),
            &[UpstreamTrace::Other {
                kind: String::new()
            }]
        );
        assert_eq!(payload.extract(), Extraction::Unrecognized);
    }
}
