//! User endpoints
//!
//! Registration is public. Every other route sits behind the access
//! policy and additionally takes `CurrentUser`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::middleware::CurrentUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::infrastructure::user::Registration;

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(register_user))
        .route("/me", get(current_user))
        .route("/user/{email}", get(get_user_by_email))
        .route("/{id}", get(get_user).delete(delete_user))
}

/// Registration request
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            surname: user.surname().to_string(),
            email: user.email().to_string(),
            created_at: user.created_at(),
        }
    }
}

/// List users response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

/// POST /api/v1/users
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(email = %request.email, "Registering user");

    let user = state
        .user_service
        .register(Registration {
            name: request.name,
            surname: request.surname,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let users: Vec<UserResponse> = state
        .user_service
        .list()
        .await?
        .iter()
        .map(UserResponse::from)
        .collect();
    let total = users.len();

    Ok(Json(ListUsersResponse { users, total }))
}

/// GET /api/v1/users/me
pub async fn current_user(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", id)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// GET /api/v1/users/user/{email}
pub async fn get_user_by_email(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(email): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User '{}' not found", email)))?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/v1/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(principal): CurrentUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!(id = %id, by = %principal.email(), "Deleting user");

    if state.user_service.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("User '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "$argon2id$secret");
        let json = serde_json::to_value(UserResponse::from(&user)).unwrap();

        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["surname"], "Lovelace");
        assert!(json.get("createdAt").is_some());
        assert!(!json.to_string().contains("argon2"));
    }
}
