//! The public client facade.
//!
//! Picks a backend once at construction (mock or live, per configuration)
//! and applies the token side effects of the auth flow: successful
//! login/signup stores the bearer token, logout clears it. The 401 path
//! clears it inside the HTTP backend before the error surfaces.

use std::sync::Arc;

use tracing::info;

use crate::backend::{Backend, HttpBackend, MockBackend};
use crate::chatbot::ChatbotResponse;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::model::{
    AuthResponse, CreateTaskInput, LoginInput, SignupInput, Task, TaskQuery, UpdateTaskInput, User,
};
use crate::session::Session;

/// Task API client. Cheap to clone; clones share the session.
#[derive(Clone)]
pub struct ApiClient {
    backend: Arc<dyn Backend>,
    session: Session,
}

impl ApiClient {
    /// Build a client from configuration, selecting the backend once.
    pub fn new(config: ClientConfig) -> Self {
        let session = Session::new();
        let backend: Arc<dyn Backend> = if config.use_mock {
            info!("Using in-memory mock backend");
            Arc::new(MockBackend::new(session.clone()))
        } else {
            info!(base_url = %config.base_url, "Using live API backend");
            Arc::new(HttpBackend::new(config.base_url, session.clone()))
        };
        Self { backend, session }
    }

    /// Build a client around an explicit backend (test seam).
    pub fn with_backend(backend: Arc<dyn Backend>, session: Session) -> Self {
        Self { backend, session }
    }

    /// The session holding the bearer token.
    pub fn session(&self) -> &Session {
        &self.session
    }

    // ── Auth ────────────────────────────────────────────────────────

    pub async fn login(&self, input: &LoginInput) -> ApiResult<AuthResponse> {
        let result = self.backend.login(input).await;
        if let Some(auth) = result.as_data() {
            self.session.set_token(auth.token.clone());
        }
        result
    }

    pub async fn signup(&self, input: &SignupInput) -> ApiResult<AuthResponse> {
        let result = self.backend.signup(input).await;
        if let Some(auth) = result.as_data() {
            self.session.set_token(auth.token.clone());
        }
        result
    }

    /// Log out. The local token is dropped even if the server call fails.
    pub async fn logout(&self) -> ApiResult<()> {
        let result = self.backend.logout().await;
        self.session.clear();
        result
    }

    pub async fn get_me(&self) -> ApiResult<User> {
        self.backend.get_me().await
    }

    // ── Tasks ───────────────────────────────────────────────────────

    pub async fn get_tasks(&self, query: &TaskQuery) -> ApiResult<Vec<Task>> {
        self.backend.get_tasks(query).await
    }

    pub async fn get_task(&self, id: &str) -> ApiResult<Task> {
        self.backend.get_task(id).await
    }

    pub async fn create_task(&self, input: &CreateTaskInput) -> ApiResult<Task> {
        self.backend.create_task(input).await
    }

    pub async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> ApiResult<Task> {
        self.backend.update_task(id, input).await
    }

    pub async fn delete_task(&self, id: &str) -> ApiResult<()> {
        self.backend.delete_task(id).await
    }

    pub async fn toggle_task(&self, id: &str) -> ApiResult<Task> {
        self.backend.toggle_task(id).await
    }

    // ── Chat ────────────────────────────────────────────────────────

    pub async fn send_chat_message(&self, message: &str) -> ApiResult<ChatbotResponse> {
        self.backend.send_chat_message(message).await
    }
}
