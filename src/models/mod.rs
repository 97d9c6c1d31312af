//! Typed records shared by the store, the prompt builder, and the wire.

pub mod chat;
pub mod turn;

pub use chat::{ChatMessage, ChatPayload, ChatRole};
pub use turn::{ConversationTurn, TIMESTAMP_FORMAT};
