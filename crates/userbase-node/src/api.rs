//! HTTP API for the Userbase node.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Liveness text |
//! | GET | `/health` | Status and version |
//! | POST | `/api/register` | Register a user |
//! | GET | `/api/users` | List users |
//! | GET | `/api/users/{id}` | Get a user |
//! | PUT | `/api/users/{id}` | Update a user |
//! | DELETE | `/api/users/{id}` | Delete a user |
//! | POST | `/api/login` | Exchange email + password for a bearer token |

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, State},
    http::StatusCode,
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use userbase_auth::UserService;
use userbase_types::{NewUser, UserChanges, UserProfile, ValidationError};

use crate::error::ApiError;
use crate::observability::request_id_layer;

/// Maximum accepted request body size in bytes.
pub const MAX_BODY_SIZE: usize = 65_536;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Account operations over the configured store.
    pub users: Arc<UserService>,
}

/// Login request body.
#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField { field: "email" });
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingField { field: "password" });
        }
        Ok(())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegisterResponse {
    message: &'static str,
    new_user: UserProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateResponse {
    message: &'static str,
    updated_user: UserProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteResponse {
    message: &'static str,
    deleted_user: UserProfile,
}

#[derive(Serialize)]
struct LoginResponse {
    message: &'static str,
    token: String,
}

/// Creates the API router.
///
/// Oversized bodies surface as JSON extraction failures and are answered
/// like any other bad payload.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/api/register", post(register))
        .route("/api/users", get(list_users))
        .route(
            "/api/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/login", post(login))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(map_response(timeout_body))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}

/// Gives the bare 408 produced by the timeout layer an error body.
async fn timeout_body(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        tracing::warn!("Request timed out");
        return ApiError::Timeout.into_response();
    }
    response
}

async fn root() -> &'static str {
    "Server is running successfully!"
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Registers a new user.
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;

    let user = state
        .users
        .register(req)
        .await
        .map_err(|e| ApiError::from_auth(e, "Failed to register user"))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully!",
            new_user: user.to_profile(),
        }),
    ))
}

/// Lists all users.
async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state
        .users
        .list()
        .await
        .map_err(|e| ApiError::from_auth(e, "Failed to fetch users"))?;

    let profiles: Vec<UserProfile> = users.iter().map(|u| u.to_profile()).collect();
    Ok(Json(profiles))
}

/// Gets a single user.
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .get(&id)
        .await
        .map_err(|e| ApiError::from_auth(e, "Failed to fetch user"))?;

    Ok(Json(user.to_profile()))
}

/// Applies a partial update to a user.
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UserChanges>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(changes) = payload?;

    let user = state
        .users
        .update(&id, changes)
        .await
        .map_err(|e| ApiError::from_auth(e, "Failed to update user"))?;

    Ok(Json(UpdateResponse {
        message: "User updated successfully!",
        updated_user: user.to_profile(),
    }))
}

/// Deletes a user.
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .delete(&id)
        .await
        .map_err(|e| ApiError::from_auth(e, "Failed to delete user"))?;

    Ok(Json(DeleteResponse {
        message: "User deleted successfully!",
        deleted_user: user.to_profile(),
    }))
}

/// Exchanges credentials for a bearer token.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    req.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let token = state
        .users
        .login(&req.email, &req.password)
        .await
        .map_err(|e| ApiError::from_auth(e, "Failed to log in"))?;

    Ok(Json(LoginResponse {
        message: "Login successful!",
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_requires_fields() {
        let req = LoginRequest {
            email: " ".to_string(),
            password: "secret123".to_string(),
        };
        assert_eq!(
            req.validate(),
            Err(ValidationError::MissingField { field: "email" })
        );

        let req = LoginRequest {
            email: "a@x.com".to_string(),
            password: String::new(),
        };
        assert_eq!(
            req.validate(),
            Err(ValidationError::MissingField { field: "password" })
        );
    }

    #[test]
    fn test_response_field_names() {
        let profile = userbase_types::User::new(None, "a@x.com".into(), "hash".into()).to_profile();
        let body = serde_json::to_value(RegisterResponse {
            message: "User registered successfully!",
            new_user: profile,
        })
        .unwrap();

        assert!(body.get("newUser").is_some());
        assert!(body["newUser"].get("password").is_none());
    }
}
