use serde::{Deserialize, Serialize};

/// Speaker role in a chat-completion message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in a chat-completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for the external completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatPayload {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_value(ChatRole::System).unwrap(), "system");
        assert_eq!(serde_json::to_value(ChatRole::User).unwrap(), "user");
        assert_eq!(
            serde_json::to_value(ChatRole::Assistant).unwrap(),
            "assistant"
        );
    }

    #[test]
    fn payload_has_wire_shape() {
        let payload = ChatPayload {
            model: "gpt-3.5-turbo".into(),
            temperature: 1.0,
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("q")],
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["temperature"], 1.0);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "q");
    }
}
