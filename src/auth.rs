//! Login, tokens, and the request guard for /api/tasks.
//!
//! Passwords are argon2 hashes at rest. A successful login returns a signed
//! JWT; every task route verifies it and loads the user into a request
//! extension. Logout is stateless; the client just drops its token.

use crate::db::Db;
use crate::models::{LoginRequest, LoginResponse, UserResponse};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
};
use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const JWT_EXPIRY_HOURS: i64 = 24;

// ── Shared state ───────────────────────────────────────────────

pub struct AppState {
    pub db: Db,
    pub jwt_secret: String,
}

pub type SharedState = Arc<AppState>;

// ── JWT ────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,        // user id
    pub username: String,
    pub exp: usize,       // expiry timestamp
    pub iat: usize,       // issued at
}

pub fn create_token(
    user_id: Uuid,
    username: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expiry = now + Duration::hours(JWT_EXPIRY_HOURS);

    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: expiry.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

// ── Passwords ──────────────────────────────────────────────────

pub fn hash_password(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .expect("argon2 hashing cannot fail with default params")
        .to_string()
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

// ── Handlers ───────────────────────────────────────────────────

pub async fn login(
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let user = state
        .db
        .get_user_by_username(&payload.username)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()))?;

    if !verify_password(&payload.password, &user.password_hash) {
        return Err((StatusCode::UNAUTHORIZED, "Invalid credentials".to_string()));
    }

    let token = create_token(user.id, &user.username, &state.jwt_secret)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    tracing::info!(username = %user.username, "logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(user),
    }))
}

pub async fn logout() -> impl IntoResponse {
    StatusCode::OK
}

// ── Middleware ─────────────────────────────────────────────────

/// Verify the Authorization header, load the user, stash it as an extension.
/// Accepts a bare token or a "Bearer "-prefixed one.
pub async fn auth_middleware(
    State(state): State<SharedState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(h) if !h.is_empty() => h.strip_prefix("Bearer ").unwrap_or(h),
        _ => return Err((StatusCode::UNAUTHORIZED, "Missing token".to_string())),
    };

    let claims = verify_token(token, &state.jwt_secret)
        .map_err(|_| (StatusCode::UNAUTHORIZED, "Invalid token".to_string()))?;

    let user = state
        .db
        .get_user(claims.sub)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::UNAUTHORIZED, "User not found".to_string()))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let id = Uuid::new_v4();
        let token = create_token(id, "frida", "test-secret").unwrap();

        let claims = verify_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.username, "frida");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_rejected_with_wrong_secret() {
        let token = create_token(Uuid::new_v4(), "frida", "test-secret").unwrap();
        assert!(verify_token(&token, "other-secret").is_err());
        assert!(verify_token("not-even-a-jwt", "test-secret").is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("hunter2");
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
        assert!(!verify_password("hunter2", "garbage-hash"));
    }
}
