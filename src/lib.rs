//! TaskDeck client — typed client for the TaskDeck task-management API.
//!
//! Every operation resolves to an [`error::ApiResult`] instead of
//! propagating transport or HTTP failures; a mock backend serves the whole
//! API surface from memory for development without a server.

pub mod backend;
pub mod chatbot;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod session;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use session::Session;
