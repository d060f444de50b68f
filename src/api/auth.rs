//! JWT session auth.
//!
//! - Clients register or log in with username + password
//! - Server returns a JWT valid for `JWT_TTL_DAYS` (~30 days)
//! - All other endpoints require `Authorization: Bearer <jwt>`
//!
//! Password hashes use the format `pbkdf2:iterations:hex_salt:hex_hash`.
//! The staff flag travels inside the token; adjudication handlers check it
//! per request.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use sha2::Sha256;
use std::sync::Arc;

use super::routes::AppState;
use super::types::{LoginRequest, LoginResponse, RegisterRequest};
use crate::config::Config;
use crate::store::{NewUser, StoreError, User};

const PBKDF2_ITERATIONS: u32 = 100_000;

/// Signing secret used when `DEV_MODE=true` and no `JWT_SECRET` is set.
const DEV_SECRET: &str = "stegoboard-dev-secret";

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Claims {
    /// Subject: the user id
    sub: i64,
    /// Staff (moderation) privilege
    staff: bool,
    /// Issued-at unix seconds
    iat: i64,
    /// Expiration unix seconds
    exp: i64,
}

/// The authenticated caller, inserted as a request extension by
/// [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: i64,
    pub is_staff: bool,
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();
    if a_bytes.len() != b_bytes.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for i in 0..a_bytes.len() {
        diff |= a_bytes[i] ^ b_bytes[i];
    }
    diff == 0
}

/// Hash a password as `pbkdf2:iterations:hex_salt:hex_hash`.
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let mut hash = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, PBKDF2_ITERATIONS, &mut hash);
    format!(
        "pbkdf2:{}:{}:{}",
        PBKDF2_ITERATIONS,
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// Verify a password against a stored `pbkdf2:...` hash.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let parts: Vec<&str> = stored.split(':').collect();
    if parts.len() != 4 || parts[0] != "pbkdf2" {
        return false;
    }
    let iterations: u32 = match parts[1].parse() {
        Ok(n) => n,
        Err(_) => return false,
    };
    let salt = match hex::decode(parts[2]) {
        Ok(s) => s,
        Err(_) => return false,
    };
    let mut hash = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut hash);
    constant_time_eq(&hex::encode(hash), parts[3])
}

fn effective_secret(config: &Config) -> Option<&str> {
    match config.jwt_secret.as_deref() {
        Some(s) => Some(s),
        None if config.dev_mode => Some(DEV_SECRET),
        None => None,
    }
}

fn issue_jwt(secret: &str, user: &User, ttl_days: i64) -> anyhow::Result<(String, i64)> {
    let now = Utc::now();
    let exp = now + Duration::days(ttl_days.max(1));
    let claims = Claims {
        sub: user.id,
        staff: user.is_staff,
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };
    let token = jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok((token, claims.exp))
}

fn verify_jwt(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let validation = Validation::default();
    let token_data = jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    let record = state
        .store
        .find_user_by_username(&req.username)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let record = match record {
        Some(r) if verify_password(&req.password, &r.password_hash) => r,
        // Same response for unknown user and bad password.
        _ => {
            return Err((
                StatusCode::UNAUTHORIZED,
                "Invalid username or password".to_string(),
            ))
        }
    };

    let secret = effective_secret(&state.config).ok_or_else(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "JWT_SECRET not configured".to_string(),
        )
    })?;

    let (token, exp) = issue_jwt(secret, &record.user, state.config.jwt_ttl_days)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(LoginResponse { token, exp }))
}

/// One-step registration: create the user (settings row included) and hand
/// back a session token right away.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, (StatusCode, String)> {
    if req.username.trim().is_empty() || req.password.is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "username and password must not be empty".to_string(),
        ));
    }

    let display_name = if req.display_name.trim().is_empty() {
        req.username.clone()
    } else {
        req.display_name
    };

    let user = state
        .store
        .create_user(NewUser {
            username: req.username,
            display_name,
            password_hash: hash_password(&req.password),
            is_staff: false,
        })
        .await
        .map_err(|e| match e {
            StoreError::DuplicateUsername(_) => (StatusCode::CONFLICT, e.to_string()),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        })?;

    tracing::info!(user_id = user.id, "user registered");

    let secret = effective_secret(&state.config).ok_or_else(|| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "JWT_SECRET not configured".to_string(),
        )
    })?;
    let (token, exp) = issue_jwt(secret, &user, state.config.jwt_ttl_days)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(LoginResponse { token, exp }))
}

pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let secret = match effective_secret(&state.config) {
        Some(s) => s,
        None => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "JWT_SECRET not configured",
            )
                .into_response();
        }
    };

    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");

    let token = auth_header
        .strip_prefix("Bearer ")
        .or_else(|| auth_header.strip_prefix("bearer "))
        .unwrap_or("");

    if token.is_empty() {
        return (StatusCode::UNAUTHORIZED, "Missing Authorization header").into_response();
    }

    match verify_jwt(token, secret) {
        Ok(claims) => {
            req.extensions_mut().insert(AuthUser {
                id: claims.sub,
                is_staff: claims.staff,
            });
            next.run(req).await
        }
        Err(_) => (StatusCode::UNAUTHORIZED, "Invalid or expired token").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let stored = hash_password("hunter2");
        assert!(stored.starts_with("pbkdf2:100000:"));
        assert!(verify_password("hunter2", &stored));
        assert!(!verify_password("hunter3", &stored));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("x", ""));
        assert!(!verify_password("x", "pbkdf2:abc:00:00"));
        assert!(!verify_password("x", "plain:100000:00:00"));
    }

    #[test]
    fn jwt_roundtrip_carries_staff_flag() {
        let user = User {
            id: 42,
            username: "mod".to_string(),
            display_name: "Mod".to_string(),
            is_staff: true,
        };
        let (token, _exp) = issue_jwt("secret", &user, 1).unwrap();
        let claims = verify_jwt(&token, "secret").unwrap();
        assert_eq!(claims.sub, 42);
        assert!(claims.staff);
        assert!(verify_jwt(&token, "other-secret").is_err());
    }
}
