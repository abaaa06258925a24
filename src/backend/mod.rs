//! Backend seam — one trait, two implementations.
//!
//! [`HttpBackend`] talks to the live REST API; [`MockBackend`] serves
//! everything from memory for development without a server. The choice is
//! made once at composition time by [`crate::client::ApiClient::new`]; no
//! operation branches on a mode flag per call.

pub mod http;
pub mod mock;

use async_trait::async_trait;

use crate::chatbot::ChatbotResponse;
use crate::error::ApiResult;
use crate::model::{
    AuthResponse, CreateTaskInput, LoginInput, SignupInput, Task, TaskQuery, UpdateTaskInput, User,
};

pub use http::HttpBackend;
pub use mock::MockBackend;

/// The full operation surface of the task API.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn login(&self, input: &LoginInput) -> ApiResult<AuthResponse>;
    async fn signup(&self, input: &SignupInput) -> ApiResult<AuthResponse>;
    async fn logout(&self) -> ApiResult<()>;
    async fn get_me(&self) -> ApiResult<User>;

    async fn get_tasks(&self, query: &TaskQuery) -> ApiResult<Vec<Task>>;
    async fn get_task(&self, id: &str) -> ApiResult<Task>;
    async fn create_task(&self, input: &CreateTaskInput) -> ApiResult<Task>;
    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> ApiResult<Task>;
    async fn delete_task(&self, id: &str) -> ApiResult<()>;
    async fn toggle_task(&self, id: &str) -> ApiResult<Task>;

    async fn send_chat_message(&self, message: &str) -> ApiResult<ChatbotResponse>;
}
