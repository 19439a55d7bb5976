//! Authentication
//!
//! Signup/login create users with Argon2id password hashes; a login
//! hands back an opaque bearer token whose session lives in
//! [`AppState`](crate::state::AppState) until sign-out. The middleware
//! guards the protected area: requests without a valid token get a 401
//! carrying the login path, never a partial response.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use sf_core::forms::FieldError;
use sf_db::entities::new_user;

use crate::dto::{AuthResponse, LoginRequest, SignupRequest, UserDto};
use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, AuthSession};

/// Hash a password using Argon2id, producing a PHC string
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored PHC hash
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

fn validate_credentials(email: &str, password: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if email.trim().is_empty() || !email.contains('@') {
        errors.push(FieldError::new("email", "A valid email address is required"));
    }
    if password.chars().count() < 8 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `POST /signup` - register and sign in
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> ApiResult<Json<AuthResponse>> {
    validate_credentials(&request.email, &request.password).map_err(ApiError::validation)?;

    let email = request.email.trim().to_lowercase();
    let record = new_user(
        email,
        hash_password(&request.password)?,
        request.display_name.filter(|name| !name.trim().is_empty()),
    );
    // A taken email surfaces as the same distinguishable conflict a
    // duplicate solution name does.
    state.db.users.insert(&record).await?;
    tracing::info!(user_id = %record.id, "user signed up");

    let session = state.create_auth_session(&record).await;
    Ok(Json(AuthResponse {
        token: session.token,
        user: UserDto::from(record),
    }))
}

/// `POST /login` - exchange credentials for a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let email = request.email.trim().to_lowercase();
    let record = state.db.users.find_by_email(&email).await?;

    // One failure path for bad email and bad password
    let Some(record) = record else {
        return Err(ApiError::unauthorized("Invalid email or password"));
    };
    if !verify_password(&request.password, &record.password_hash) {
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let session = state.create_auth_session(&record).await;
    tracing::info!(user_id = %record.id, "user logged in");
    Ok(Json(AuthResponse {
        token: session.token,
        user: UserDto::from(record),
    }))
}

/// `POST /logout` - tear the session down
pub async fn logout(
    State(state): State<Arc<AppState>>,
    axum::Extension(session): axum::Extension<AuthSession>,
) -> ApiResult<Json<serde_json::Value>> {
    state.revoke_auth_session(&session.token).await;
    Ok(Json(serde_json::json!({ "status": "signed_out" })))
}

/// `GET /api/v1/me` - the signed-in user
pub async fn me(
    State(state): State<Arc<AppState>>,
    axum::Extension(session): axum::Extension<AuthSession>,
) -> ApiResult<Json<UserDto>> {
    let record = state
        .db
        .users
        .get(&session.user_id)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Session user no longer exists"))?;
    Ok(Json(UserDto::from(record)))
}

/// Bearer-token middleware for the protected area.
///
/// A valid session is attached to the request for handlers; anything
/// else is rejected with the login redirect.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    let Some(token) = token else {
        return ApiError::unauthorized("Authentication required").into_response();
    };

    match state.auth_session(token).await {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => ApiError::unauthorized("Invalid or expired session").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong password", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }

    #[test]
    fn test_credential_validation() {
        assert!(validate_credentials("pat@example.com", "longenough").is_ok());

        let errors = validate_credentials("not-an-email", "short").unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
