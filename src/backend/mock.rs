//! In-memory mock backend for development without a server.
//!
//! Serves the same operation surface as [`HttpBackend`] from local state:
//! a throwaway user table, a seeded task list, and the keyword intent
//! classifier for chat. Task operations without a logged-in user behave
//! like a 401 from the live API: the session token is cleared and an
//! `UNAUTHORIZED` error is returned.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::backend::Backend;
use crate::chatbot::{ChatbotResponse, IntentRules};
use crate::error::{ApiError, ApiResult};
use crate::model::{
    AuthResponse, CreateTaskInput, LoginInput, Priority, SignupInput, SortBy, SortOrder,
    StatusFilter, Task, TaskQuery, UpdateTaskInput, User,
};
use crate::session::Session;

const CODE_VALIDATION: &str = "VALIDATION_ERROR";
const CODE_NOT_FOUND: &str = "NOT_FOUND";

#[derive(Debug, Default)]
struct MockState {
    users: Vec<User>,
    current_user: Option<User>,
    tasks: Vec<Task>,
}

/// Backend serving everything from memory.
pub struct MockBackend {
    session: Session,
    rules: IntentRules,
    state: RwLock<MockState>,
}

impl MockBackend {
    pub fn new(session: Session) -> Self {
        let state = MockState {
            users: Vec::new(),
            current_user: None,
            tasks: seed_tasks(),
        };
        Self {
            session,
            rules: IntentRules::new(),
            state: RwLock::new(state),
        }
    }

    /// Start with an empty task list (for tests).
    pub fn empty(session: Session) -> Self {
        Self {
            session,
            rules: IntentRules::new(),
            state: RwLock::new(MockState::default()),
        }
    }

    fn mint_token() -> String {
        format!("mock-token-{}", Utc::now().timestamp_millis())
    }

    /// Fail like the live API's 401 path when nobody is logged in.
    async fn require_user<T>(&self) -> Result<User, ApiResult<T>> {
        let state = self.state.read().await;
        match state.current_user.clone() {
            Some(user) => Ok(user),
            None => {
                self.session.clear();
                Err(ApiResult::Error(ApiError::unauthorized()))
            }
        }
    }
}

fn new_task(input: &CreateTaskInput) -> Task {
    let now = Utc::now();
    Task {
        id: Uuid::new_v4().to_string(),
        title: input.title.clone(),
        description: input.description.clone(),
        completed: false,
        priority: input.priority,
        tags: input.tags.clone(),
        due_date: input.due_date,
        created_at: now,
        updated_at: now,
    }
}

fn seed_tasks() -> Vec<Task> {
    let seeds = [
        ("Buy groceries", Some(Priority::Medium)),
        ("Review pull requests", Some(Priority::High)),
        ("Water the plants", None),
    ];
    seeds
        .iter()
        .map(|(title, priority)| {
            new_task(&CreateTaskInput {
                title: (*title).to_string(),
                priority: *priority,
                ..CreateTaskInput::default()
            })
        })
        .collect()
}

/// Apply the listing query the way the live API would: search and status
/// filters, sort (created_at descending by default), then pagination.
fn apply_query(mut tasks: Vec<Task>, query: &TaskQuery) -> Vec<Task> {
    if let Some(ref search) = query.search {
        let needle = search.to_lowercase();
        tasks.retain(|t| t.title.to_lowercase().contains(&needle));
    }
    match query.status {
        Some(StatusFilter::Pending) => tasks.retain(|t| !t.completed),
        Some(StatusFilter::Completed) => tasks.retain(|t| t.completed),
        Some(StatusFilter::All) | None => {}
    }
    if let Some(priority) = query.priority {
        tasks.retain(|t| t.priority == Some(priority));
    }

    let sort_by = query.sort_by.unwrap_or(SortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(match sort_by {
        SortBy::CreatedAt => SortOrder::Desc,
        _ => SortOrder::Asc,
    });
    tasks.sort_by(|a, b| {
        let ordering = match sort_by {
            SortBy::CreatedAt => a.created_at.cmp(&b.created_at),
            SortBy::DueDate => a.due_date.cmp(&b.due_date),
            SortBy::Priority => a.priority.map(|p| p as u8).cmp(&b.priority.map(|p| p as u8)),
            SortBy::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match sort_order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });

    if let Some(page_size) = query.page_size {
        let page = query.page.unwrap_or(1).max(1) as usize;
        let size = page_size as usize;
        tasks = tasks
            .into_iter()
            .skip((page - 1) * size)
            .take(size)
            .collect();
    }

    tasks
}

#[async_trait]
impl Backend for MockBackend {
    async fn login(&self, input: &LoginInput) -> ApiResult<AuthResponse> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return ApiError::new("Email and password are required", CODE_VALIDATION).into();
        }

        let mut state = self.state.write().await;
        let user = match state.users.iter().find(|u| u.email == input.email) {
            Some(user) => user.clone(),
            None => {
                // Mock mode accepts any credentials; unknown emails get a
                // throwaway account.
                let name = input
                    .email
                    .split('@')
                    .next()
                    .unwrap_or("user")
                    .to_string();
                let user = User {
                    id: Uuid::new_v4().to_string(),
                    email: input.email.clone(),
                    name,
                };
                state.users.push(user.clone());
                user
            }
        };
        state.current_user = Some(user.clone());
        debug!(email = %user.email, "Mock login");

        ApiResult::Data(AuthResponse {
            token: Self::mint_token(),
            user,
        })
    }

    async fn signup(&self, input: &SignupInput) -> ApiResult<AuthResponse> {
        if input.name.trim().is_empty()
            || input.email.trim().is_empty()
            || input.password.is_empty()
        {
            return ApiError::new("Name, email and password are required", CODE_VALIDATION).into();
        }

        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.email == input.email) {
            return ApiError::new("An account with this email already exists", CODE_VALIDATION)
                .into();
        }

        let user = User {
            id: Uuid::new_v4().to_string(),
            email: input.email.clone(),
            name: input.name.clone(),
        };
        state.users.push(user.clone());
        state.current_user = Some(user.clone());
        debug!(email = %user.email, "Mock signup");

        ApiResult::Data(AuthResponse {
            token: Self::mint_token(),
            user,
        })
    }

    async fn logout(&self) -> ApiResult<()> {
        self.state.write().await.current_user = None;
        ApiResult::Data(())
    }

    async fn get_me(&self) -> ApiResult<User> {
        match self.require_user().await {
            Ok(user) => ApiResult::Data(user),
            Err(err) => err,
        }
    }

    async fn get_tasks(&self, query: &TaskQuery) -> ApiResult<Vec<Task>> {
        if let Err(err) = self.require_user().await {
            return err;
        }
        let tasks = self.state.read().await.tasks.clone();
        ApiResult::Data(apply_query(tasks, query))
    }

    async fn get_task(&self, id: &str) -> ApiResult<Task> {
        if let Err(err) = self.require_user().await {
            return err;
        }
        let state = self.state.read().await;
        match state.tasks.iter().find(|t| t.id == id) {
            Some(task) => ApiResult::Data(task.clone()),
            None => ApiError::new("Task not found", CODE_NOT_FOUND).into(),
        }
    }

    async fn create_task(&self, input: &CreateTaskInput) -> ApiResult<Task> {
        if let Err(err) = self.require_user().await {
            return err;
        }
        if input.title.trim().is_empty() {
            return ApiError::new("Title is required", CODE_VALIDATION).into();
        }
        let task = new_task(input);
        self.state.write().await.tasks.push(task.clone());
        ApiResult::Data(task)
    }

    async fn update_task(&self, id: &str, input: &UpdateTaskInput) -> ApiResult<Task> {
        if let Err(err) = self.require_user().await {
            return err;
        }
        let mut state = self.state.write().await;
        let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
            return ApiError::new("Task not found", CODE_NOT_FOUND).into();
        };
        if let Some(ref title) = input.title {
            task.title = title.clone();
        }
        if let Some(ref description) = input.description {
            task.description = Some(description.clone());
        }
        if let Some(completed) = input.completed {
            task.completed = completed;
        }
        if let Some(priority) = input.priority {
            task.priority = Some(priority);
        }
        if let Some(ref tags) = input.tags {
            task.tags = tags.clone();
        }
        if let Some(due_date) = input.due_date {
            task.due_date = Some(due_date);
        }
        task.updated_at = Utc::now();
        ApiResult::Data(task.clone())
    }

    async fn delete_task(&self, id: &str) -> ApiResult<()> {
        if let Err(err) = self.require_user().await {
            return err;
        }
        let mut state = self.state.write().await;
        let before = state.tasks.len();
        state.tasks.retain(|t| t.id != id);
        if state.tasks.len() == before {
            return ApiError::new("Task not found", CODE_NOT_FOUND).into();
        }
        ApiResult::Data(())
    }

    async fn toggle_task(&self, id: &str) -> ApiResult<Task> {
        if let Err(err) = self.require_user().await {
            return err;
        }
        let mut state = self.state.write().await;
        let Some(task) = state.tasks.iter_mut().find(|t| t.id == id) else {
            return ApiError::new("Task not found", CODE_NOT_FOUND).into();
        };
        task.completed = !task.completed;
        task.updated_at = Utc::now();
        ApiResult::Data(task.clone())
    }

    /// The classifier is synchronous; this wrapper gives it the same async
    /// signature as the live chatbot call so callers cannot tell the modes
    /// apart.
    async fn send_chat_message(&self, message: &str) -> ApiResult<ChatbotResponse> {
        ApiResult::Data(self.rules.classify(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chatbot::Intent;
    use crate::error::CODE_UNAUTHORIZED;

    async fn logged_in_backend() -> MockBackend {
        let backend = MockBackend::empty(Session::new());
        let result = backend
            .login(&LoginInput {
                email: "alice@example.com".into(),
                password: "pw".into(),
            })
            .await;
        assert!(result.is_success());
        backend
    }

    #[tokio::test]
    async fn task_ops_without_login_are_unauthorized() {
        let session = Session::new();
        session.set_token("stale");
        let backend = MockBackend::new(session.clone());

        let result = backend.get_tasks(&TaskQuery::new()).await;
        assert_eq!(result.as_error().unwrap().code, CODE_UNAUTHORIZED);
        // Behaves like a live 401: the stale token is gone.
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn login_rejects_empty_credentials() {
        let backend = MockBackend::empty(Session::new());
        let result = backend
            .login(&LoginInput {
                email: "".into(),
                password: "pw".into(),
            })
            .await;
        assert_eq!(result.as_error().unwrap().code, CODE_VALIDATION);
    }

    #[tokio::test]
    async fn signup_then_duplicate_email_fails() {
        let backend = MockBackend::empty(Session::new());
        let input = SignupInput {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password: "pw".into(),
        };
        assert!(backend.signup(&input).await.is_success());
        let again = backend.signup(&input).await;
        assert_eq!(again.as_error().unwrap().code, CODE_VALIDATION);
    }

    #[tokio::test]
    async fn get_me_reflects_login_state() {
        let backend = logged_in_backend().await;
        let me = backend.get_me().await.data().unwrap();
        assert_eq!(me.email, "alice@example.com");
        assert_eq!(me.name, "alice");

        backend.logout().await.data().unwrap();
        assert!(backend.get_me().await.is_error());
    }

    #[tokio::test]
    async fn crud_lifecycle() {
        let backend = logged_in_backend().await;

        let task = backend
            .create_task(&CreateTaskInput::new("Buy milk"))
            .await
            .data()
            .unwrap();
        assert!(!task.completed);

        let toggled = backend.toggle_task(&task.id).await.data().unwrap();
        assert!(toggled.completed);

        let updated = backend
            .update_task(
                &task.id,
                &UpdateTaskInput {
                    title: Some("Buy oat milk".into()),
                    ..UpdateTaskInput::default()
                },
            )
            .await
            .data()
            .unwrap();
        assert_eq!(updated.title, "Buy oat milk");
        assert!(updated.completed, "update must not reset completion");

        backend.delete_task(&task.id).await.data().unwrap();
        let missing = backend.get_task(&task.id).await;
        assert_eq!(missing.as_error().unwrap().code, CODE_NOT_FOUND);
    }

    #[tokio::test]
    async fn create_requires_title() {
        let backend = logged_in_backend().await;
        let result = backend.create_task(&CreateTaskInput::new("  ")).await;
        assert_eq!(result.as_error().unwrap().code, CODE_VALIDATION);
    }

    #[tokio::test]
    async fn listing_applies_search_and_status() {
        let backend = logged_in_backend().await;
        let milk = backend
            .create_task(&CreateTaskInput::new("Buy milk"))
            .await
            .data()
            .unwrap();
        backend
            .create_task(&CreateTaskInput::new("Walk the dog"))
            .await
            .data()
            .unwrap();
        backend.toggle_task(&milk.id).await.data().unwrap();

        let found = backend
            .get_tasks(&TaskQuery::new().search("milk"))
            .await
            .data()
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Buy milk");

        let pending = backend
            .get_tasks(&TaskQuery::new().status(StatusFilter::Pending))
            .await
            .data()
            .unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "Walk the dog");
    }

    #[tokio::test]
    async fn listing_sorts_newest_first_by_default() {
        let backend = logged_in_backend().await;
        backend
            .create_task(&CreateTaskInput::new("first"))
            .await
            .data()
            .unwrap();
        backend
            .create_task(&CreateTaskInput::new("second"))
            .await
            .data()
            .unwrap();

        let tasks = backend
            .get_tasks(&TaskQuery::new())
            .await
            .data()
            .unwrap();
        assert_eq!(tasks[0].title, "second");
        assert_eq!(tasks[1].title, "first");
    }

    #[tokio::test]
    async fn listing_paginates() {
        let backend = logged_in_backend().await;
        for i in 0..5 {
            backend
                .create_task(&CreateTaskInput::new(format!("task {i}")))
                .await
                .data()
                .unwrap();
        }
        let page = backend
            .get_tasks(&TaskQuery::new().page(2).page_size(2))
            .await
            .data()
            .unwrap();
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn chat_routes_through_classifier() {
        let backend = logged_in_backend().await;
        let response = backend
            .send_chat_message("Add task: Buy milk")
            .await
            .data()
            .unwrap();
        assert_eq!(response.intent, Intent::Add);
        assert!(response.success);
    }

    #[tokio::test]
    async fn seeded_backend_has_tasks() {
        let backend = MockBackend::new(Session::new());
        backend
            .login(&LoginInput {
                email: "a@b.c".into(),
                password: "pw".into(),
            })
            .await
            .data()
            .unwrap();
        let tasks = backend
            .get_tasks(&TaskQuery::new())
            .await
            .data()
            .unwrap();
        assert!(!tasks.is_empty());
    }
}
