use axum::{
    Extension, Json,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::validate_registration;
use super::{ApiError, AppState, MessageResponse, TokenResponse};
use crate::domain::UserId;
use crate::models::user::User;
use crate::services::{AuthError, AuthSession};

const SESSION_USER_KEY: &str = "user_id";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// The authenticated caller, inserted into request extensions by
/// [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::unauthorized("Invalid credentials"),
            AuthError::UserNotFound => Self::unauthorized("User not found"),
            AuthError::EmailTaken => Self::Conflict("User already exists".to_string()),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Authentication middleware that checks:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <token>` header
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = match session_user(&state, &session).await {
        Some(user) => Some(user),
        None => match extract_api_key(&headers) {
            Some(key) => state.auth_service().verify_api_key(&key).await?,
            None => None,
        },
    };

    let Some(user) = user else {
        return Err(ApiError::unauthorized("Authentication required"));
    };

    tracing::Span::current().record("user_id", user.id.value());
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

/// Rejects non-admin callers. Must run after [`auth_middleware`].
pub async fn require_admin(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !user.role.is_admin() {
        return Err(ApiError::forbidden("Admin access required"));
    }

    Ok(next.run(request).await)
}

async fn session_user(state: &AppState, session: &Session) -> Option<User> {
    let user_id = session.get::<i32>(SESSION_USER_KEY).await.ok().flatten()?;
    state
        .auth_service()
        .get_user(UserId::new(user_id))
        .await
        .ok()
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.trim().to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthSession>), ApiError> {
    let Json(payload) = payload?;

    let min_password_length = state.config().read().await.security.min_password_length;
    validate_registration(
        &payload.name,
        &payload.email,
        &payload.password,
        min_password_length,
    )?;

    let auth = state
        .auth_service()
        .register(&payload.name, &payload.email, &payload.password)
        .await?;

    start_session(&session, auth.user.id).await?;

    Ok((StatusCode::CREATED, Json(auth)))
}

/// POST /auth/login
/// Authenticate with email and password, returns the API token on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthSession>, ApiError> {
    let Json(payload) = payload?;

    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let auth = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    start_session(&session, auth.user.id).await?;

    Ok(Json(auth))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> Json<MessageResponse> {
    let _ = session.flush().await;
    Json(MessageResponse::new("Logged out"))
}

/// GET /auth/me
pub async fn get_current_user(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<User> {
    Json(user)
}

/// POST /auth/token/regenerate
/// Replaces the caller's API token; the old one stops working immediately
pub async fn regenerate_token(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.auth_service().regenerate_api_key(user.id).await?;
    Ok(Json(TokenResponse { token }))
}

async fn start_session(session: &Session, user_id: UserId) -> Result<(), ApiError> {
    session
        .insert(SESSION_USER_KEY, user_id.value())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_api_key_header() {
        let mut headers = HeaderMap::new();
        headers.insert("X-Api-Key", "abc".parse().unwrap());
        assert_eq!(extract_api_key(&headers).as_deref(), Some("abc"));
    }

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Bearer  xyz ".parse().unwrap());
        assert_eq!(extract_api_key(&headers).as_deref(), Some("xyz"));

        let mut headers = HeaderMap::new();
        headers.insert("Authorization", "Basic xyz".parse().unwrap());
        assert_eq!(extract_api_key(&headers), None);
    }
}
