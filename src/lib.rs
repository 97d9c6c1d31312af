//! chatbridge — bridges a web chat client to a per-user conversation store
//! and an external chat-completion API.
//!
//! Each request is one linear pass: fetch credential → read history → build
//! prompt → call the completion API → persist the turn → re-read history →
//! respond. There is no caching, no retry, and no recovery; failures
//! propagate to the HTTP boundary.

pub mod api;
pub mod chat;
pub mod config;
pub mod db;
pub mod models;
pub mod secrets;
