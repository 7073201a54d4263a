//! Conversation state machine and streaming chat client for gpt-dir.
//!
//! This crate is free of terminal I/O: the [`StateMachine`] describes the
//! conversation loop as states, events, and actions, and the caller performs
//! every effect an action asks for. [`ChatClient`] issues the blocking
//! streaming request against an OpenAI-style chat-completions endpoint.

pub mod client;
pub mod machine;
pub mod state;
pub mod types;

pub use client::{ApiError, ChatClient, CompletionStream};
pub use machine::StateMachine;
pub use state::{ChatAction, ChatEvent, ChatState};
pub use types::{ChatChunk, ChatRequest, Message, Role};
