//! Live HTTP backend — reqwest calls normalized into the result protocol.
//!
//! Every request carries `Content-Type: application/json` and, when a token
//! is held, `Authorization: Bearer <token>`. Every response runs through
//! [`normalize_response`]; no reqwest error ever escapes to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, StatusCode, header};
use serde_json::Value;
use tracing::{debug, warn};

use crate::backend::Backend;
use crate::chatbot::ChatbotResponse;
use crate::error::{ApiError, ApiResult};
use crate::model::{
    AuthResponse, CreateTaskInput, LoginInput, SignupInput, Task, TaskQuery, UpdateTaskInput, User,
};
use crate::session::Session;

mod endpoints {
    pub const LOGIN: &str = "/auth/login";
    pub const SIGNUP: &str = "/auth/signup";
    pub const LOGOUT: &str = "/auth/logout";
    pub const ME: &str = "/auth/me";
    pub const TASKS: &str = "/tasks";
    pub const CHATBOT: &str = "/chatbot";

    pub fn task(id: &str) -> String {
        format!("{TASKS}/{id}")
    }

    pub fn task_toggle(id: &str) -> String {
        format!("{TASKS}/{id}/toggle")
    }
}

/// Backend talking to the live REST API.
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, session: Session) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(concat!("taskdeck-client/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: base_url.into(),
            session,
        }
    }

    /// Perform one request and normalize the response. Transport failures
    /// (unreachable host, DNS, timeout) become `NETWORK_ERROR`.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<Value>,
    ) -> ApiResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .http
            .request(method.clone(), &url)
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(token) = self.session.token() {
            req = req.bearer_auth(token);
        }
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(%method, %url, error = %err, "Request failed at transport level");
                return ApiResult::Error(ApiError::network());
            }
        };

        let status = response.status();
        let body_text = match response.text().await {
            Ok(text) => text,
            Err(err) => {
                warn!(%method, %url, error = %err, "Failed to read response body");
                return ApiResult::Error(ApiError::network());
            }
        };

        normalize_response(status, &body_text, &self.session)
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Value> {
        self.request(Method::GET, path, query, None).await
    }

    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> ApiResult<Value> {
        self.request(method, path, &[], body).await
    }
}

/// Map a raw HTTP response onto the result protocol.
///
/// - 401 clears the session token before the error is surfaced
/// - 204 yields `Data(null)` and never touches the body
/// - other non-2xx pull `message`/`detail`/`code` from the body
/// - unparseable bodies fold into `NETWORK_ERROR` (the catch-all)
pub(crate) fn normalize_response(
    status: StatusCode,
    body: &str,
    session: &Session,
) -> ApiResult<Value> {
    if status == StatusCode::UNAUTHORIZED {
        debug!("Received 401, clearing session token");
        session.clear();
        return ApiResult::Error(ApiError::unauthorized());
    }

    if status == StatusCode::NO_CONTENT {
        return ApiResult::Data(Value::Null);
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => {
            warn!(%status, error = %err, "Response body was not valid JSON");
            return ApiResult::Error(ApiError::network());
        }
    };

    if !status.is_success() {
        return ApiResult::Error(ApiError::from_status(status.as_u16(), &parsed));
    }

    ApiResult::Data(parsed)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn login(&self, input: &LoginInput) -> ApiResult<AuthResponse> {
        let body = serde_json::to_value(input).ok();
        self.send(Method::POST, endpoints::LOGIN, body).await.decode()
    }

    async fn signup(&self, input: &SignupInput) -> ApiResult<AuthResponse> {
        let body = serde_json::to_value(input).ok();
        self.send(Method::POST, endpoints::SIGNUP, body).await.decode()
    }

    async fn logout(&self) -> ApiResult<()> {
        self.send(Method::POST, endpoints::LOGOUT, None).await.decode()
    }

    async fn get_me(&self) -> ApiResult<User> {
        self.get(endpoints::ME, &[]).await.decode()
    }

    async fn get_tasks(&self, query: &TaskQuery) -> ApiResult<Vec<Task>> {
        self.get(endpoints::TASKS, &query.to_pairs()).await.decode()
    }

    async fn get_task(&self, id: &str) -> ApiResult<Task> {
        self.get(&endpoints::task(id), &[]).await.decode()
    }

    async fn create_task(&self, input: &CreateTaskInput) -> ApiResult<Task> {
        let body = serde_json::to_value(input).ok();
        self.send(Method::POST, endpoints::TASKS, body).await.decode()
    }

    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> ApiResult<Task> {
        let body = serde_json::to_value(input).ok();
        self.send(Method::PATCH, &endpoints::task(id), body)
            .await
            .decode()
    }

    async fn delete_task(&self, id: &str) -> ApiResult<()> {
        self.send(Method::DELETE, &endpoints::task(id), None)
            .await
            .decode()
    }

    async fn toggle_task(&self, id: &str) -> ApiResult<Task> {
        self.send(Method::PATCH, &endpoints::task_toggle(id), None)
            .await
            .decode()
    }

    async fn send_chat_message(&self, message: &str) -> ApiResult<ChatbotResponse> {
        let body = serde_json::json!({ "message": message });
        self.send(Method::POST, endpoints::CHATBOT, Some(body))
            .await
            .decode()
    }
}
