//! These models represent the objects passed around by the agent
//!
//! Two external formats overlap with them:
//! - openai chat-completions messages/tools, sent from the agent to the LLM
//! - the JSON bodies served by the HTTP API
//!
//! We always immediately convert those data models into the internal structs using
//! to/from helpers, so the internal models are not an exact match to either format.
pub mod content;
pub mod message;
pub mod role;
pub mod tool;
