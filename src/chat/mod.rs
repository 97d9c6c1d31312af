//! External chat-completion API: prompt assembly and the HTTP client.

pub mod client;
pub mod prompt;

pub use client::{ChatApi, ChatError, MockChatApi, OpenAiClient};
