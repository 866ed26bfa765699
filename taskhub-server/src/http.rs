//! HTTP surface: router, handlers, and protocol error mapping.
//!
//! Each route maps 1:1 to a service method; handlers do no
//! authorization of their own beyond resolving the [`AuthUser`]
//! principal and passing it down. Responses use a uniform envelope
//! (`status`/`message`/`data`) and the error taxonomy maps onto HTTP
//! statuses: `NotFound` 404, `Forbidden` 403, `InvalidInput` 400,
//! `Conflict` 409, unauthenticated 401.

use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde::{Deserialize, Serialize};
use taskhub_core::error::OpsError;
use taskhub_core::task::{Task, TaskFields, TaskId};
use taskhub_core::user::UserId;
use uuid::Uuid;

use crate::accounts::{Accounts, UserProfile};
use crate::auth::AuthUser;
use crate::ops::{ShareBatchOutcome, ShareTarget, TaskDetail, TaskOps};

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Task operations service.
    pub ops: TaskOps,
    /// User account service.
    pub accounts: Accounts,
}

/// Uniform response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP status code, repeated in the body.
    pub status: u16,
    /// Human-readable outcome description.
    pub message: String,
    /// Payload, absent on errors and message-only successes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn new(status: StatusCode, message: &str, data: Option<T>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.to_string(),
            data,
        }
    }
}

/// Errors surfaced at the HTTP boundary.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A typed operation failure from a service.
    #[error(transparent)]
    Ops(#[from] OpsError),
    /// No valid credential was presented.
    #[error("authentication required")]
    Unauthenticated,
}

impl ApiError {
    /// The HTTP status this error maps to.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Ops(OpsError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Ops(OpsError::Forbidden(_)) => StatusCode::FORBIDDEN,
            Self::Ops(OpsError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Ops(OpsError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ApiResponse::<()>::new(status, &self.to_string(), None);
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), ApiError>;

fn reply<T>(status: StatusCode, message: &str, data: T) -> ApiResult<T> {
    Ok((status, Json(ApiResponse::new(status, message, Some(data)))))
}

fn reply_empty(status: StatusCode, message: &str) -> ApiResult<()> {
    Ok((status, Json(ApiResponse::new(status, message, None))))
}

/// Builds the application router over the given state.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{task_id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/{task_id}/share", post(share_task))
        .route("/tasks/{task_id}/share/batch", post(share_task_batch))
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users", get(list_users))
        .route("/users/{user_id}", get(get_user).delete(delete_user))
        .with_state(state)
}

/// Starts the server on the given address.
///
/// Returns the bound address and a join handle; binding to port 0
/// picks an OS-assigned port (used by tests).
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the address.
pub async fn start_server(
    addr: &str,
    state: AppState,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "server error");
        }
    });

    Ok((bound_addr, handle))
}

// ---------------------------------------------------------------------------
// Handlers: health
// ---------------------------------------------------------------------------

async fn health() -> ApiResult<()> {
    reply_empty(StatusCode::OK, "ok")
}

// ---------------------------------------------------------------------------
// Handlers: tasks
// ---------------------------------------------------------------------------

async fn get_task(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<TaskDetail> {
    let detail = state
        .ops
        .get_task(&principal, TaskId::from_uuid(task_id))
        .await?;
    reply(StatusCode::OK, "task retrieved successfully", detail)
}

async fn list_tasks(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Vec<TaskDetail>> {
    let tasks = state.ops.list_owned(&principal).await;
    reply(StatusCode::OK, "tasks retrieved successfully", tasks)
}

async fn create_task(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Json(fields): Json<TaskFields>,
) -> ApiResult<Task> {
    let task = state.ops.create_task(&principal, fields).await?;
    reply(StatusCode::CREATED, "task created successfully", task)
}

async fn update_task(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(fields): Json<TaskFields>,
) -> ApiResult<Task> {
    let task = state
        .ops
        .update_task(&principal, TaskId::from_uuid(task_id), fields)
        .await?;
    reply(StatusCode::OK, "task updated successfully", task)
}

async fn delete_task(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(task_id): Path<Uuid>,
) -> ApiResult<()> {
    state
        .ops
        .delete_task(&principal, TaskId::from_uuid(task_id))
        .await?;
    reply_empty(StatusCode::OK, "task was deleted successfully")
}

async fn share_task(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(target): Json<ShareTarget>,
) -> ApiResult<()> {
    state
        .ops
        .share_task(&principal, TaskId::from_uuid(task_id), target)
        .await?;
    reply_empty(StatusCode::OK, "task was shared successfully")
}

async fn share_task_batch(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(task_id): Path<Uuid>,
    Json(targets): Json<Vec<ShareTarget>>,
) -> ApiResult<ShareBatchOutcome> {
    let outcome = state
        .ops
        .share_task_batch(&principal, TaskId::from_uuid(task_id), targets)
        .await?;
    reply(
        StatusCode::OK,
        "task was shared with selected users",
        outcome,
    )
}

// ---------------------------------------------------------------------------
// Handlers: users
// ---------------------------------------------------------------------------

/// Registration/login request body.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    /// Login name.
    pub username: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
}

async fn register(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<UserProfile> {
    let profile = state
        .accounts
        .register(&request.username, &request.password)
        .await?;
    reply(
        StatusCode::CREATED,
        "user registered successfully",
        profile,
    )
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<UserProfile> {
    let user = state
        .accounts
        .verify_credentials(&request.username, &request.password)
        .await
        .ok_or(ApiError::Unauthenticated)?;
    reply(
        StatusCode::OK,
        "login successful",
        UserProfile::from(user),
    )
}

async fn list_users(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
) -> ApiResult<Vec<UserProfile>> {
    let users = state.accounts.list_users(&principal).await?;
    reply(StatusCode::OK, "users retrieved successfully", users)
}

async fn get_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<UserProfile> {
    let profile = state
        .accounts
        .get_user(&principal, UserId::from_uuid(user_id))
        .await?;
    reply(StatusCode::OK, "user retrieved successfully", profile)
}

async fn delete_user(
    State(state): State<AppState>,
    AuthUser(principal): AuthUser,
    Path(user_id): Path<Uuid>,
) -> ApiResult<()> {
    state
        .accounts
        .delete_user(&principal, UserId::from_uuid(user_id))
        .await?;
    reply_empty(StatusCode::OK, "user deleted successfully")
}
