use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Enums
// =============================================================================

/// Kind of turn sent to the upstream dialogue service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestType {
    /// First message of a session.
    Launch,
    /// Every message after the first.
    Text,
}

impl RequestType {
    /// Wire name used both by `/api/prompt` and by the upstream service.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Launch => "launch",
            RequestType::Text => "text",
        }
    }

    /// Pick the request kind from the transcript as it was before the new
    /// user message was appended.
    pub fn for_transcript(transcript_was_empty: bool) -> Self {
        if transcript_was_empty {
            RequestType::Launch
        } else {
            RequestType::Text
        }
    }

    /// All accepted wire names, in schema order.
    pub const NAMES: [&'static str; 2] = ["launch", "text"];

    /// Parse a wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "launch" => Some(RequestType::Launch),
            "text" => Some(RequestType::Text),
            _ => None,
        }
    }
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who wrote a transcript entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Author {
    User,
    Agent,
}

// =============================================================================
// Structs
// =============================================================================

/// A single relay request as posted to `/api/prompt`.
///
/// `id` is the client-minted session token. It stays stable for the whole
/// conversation and is the only thing correlating turns at the upstream
/// service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PromptRequest {
    pub id: Uuid,
    pub prompt: String,
    pub request_type: RequestType,
}

impl PromptRequest {
    pub fn new(id: Uuid, prompt: impl Into<String>, request_type: RequestType) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            request_type,
        }
    }

    /// Body forwarded to the upstream interaction endpoint.
    pub fn upstream_body(&self) -> serde_json::Value {
        serde_json::json!({
            "request": {
                "payload": self.prompt,
                "type": self.request_type.as_str(),
            }
        })
    }
}

/// One entry of the widget transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: Author,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            content: content.into(),
        }
    }

    pub fn agent(content: impl Into<String>) -> Self {
        Self {
            author: Author::Agent,
            content: content.into(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&RequestType::Launch).unwrap(),
            "\"launch\""
        );
        assert_eq!(serde_json::to_string(&RequestType::Text).unwrap(), "\"text\"");
        assert_eq!(RequestType::from_name("launch"), Some(RequestType::Launch));
        assert_eq!(RequestType::from_name("text"), Some(RequestType::Text));
        assert_eq!(RequestType::from_name("TEXT"), None);
        assert_eq!(RequestType::Launch.to_string(), "launch");
    }

    #[test]
    fn test_request_type_for_transcript() {
        assert_eq!(RequestType::for_transcript(true), RequestType::Launch);
        assert_eq!(RequestType::for_transcript(false), RequestType::Text);
    }

    #[test]
    fn test_prompt_request_camel_case() {
        let id = Uuid::parse_str("11111111-1111-1111-1111-111111111111").unwrap();
        let req = PromptRequest::new(id, "Hello", RequestType::Launch);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["id"], "11111111-1111-1111-1111-111111111111");
        assert_eq!(json["prompt"], "Hello");
        assert_eq!(json["requestType"], "launch");
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_prompt_request_rejects_unknown_fields() {
        let raw = r#"{"id":"11111111-1111-1111-1111-111111111111","prompt":"hi","requestType":"text","extra":1}"#;
        assert!(serde_json::from_str::<PromptRequest>(raw).is_err());
    }

    #[test]
    fn test_upstream_body_shape() {
        let req = PromptRequest::new(Uuid::new_v4(), "What's up?", RequestType::Text);
        assert_eq!(
            req.upstream_body(),
            serde_json::json!({"request": {"payload": "What's up?", "type": "text"}})
        );
    }

    #[test]
    fn test_chat_message_constructors() {
        let user = ChatMessage::user("hi");
        assert_eq!(user.author, Author::User);
        assert_eq!(user.content, "hi");

        let agent = ChatMessage::agent("hello");
        assert_eq!(agent.author, Author::Agent);
        assert_eq!(
            serde_json::to_value(&agent).unwrap(),
            serde_json::json!({"author": "agent", "content": "hello"})
        );
    }
}
