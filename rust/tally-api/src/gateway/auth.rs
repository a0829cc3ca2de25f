//! Authentication middleware and JWT issuance.
//!
//! Tokens are signed with a configurable secret and carry the user id as
//! the subject claim. Everything except the health and auth endpoints
//! requires a valid bearer token.

use axum::{
    Json,
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// Authentication error response.
#[derive(Debug, Serialize)]
pub struct AuthError {
    pub error: String,
    pub message: String,
}

impl AuthError {
    fn new(error: &str, message: impl Into<String>) -> Self {
        Self {
            error: error.to_string(),
            message: message.into(),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, Json(self)).into_response()
    }
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Username.
    pub username: String,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// Create new claims for a user.
    #[must_use]
    pub fn new(user_id: &str, username: &str, expiry_days: i64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::days(expiry_days);

        Self {
            sub: user_id.to_string(),
            username: username.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }
}

/// Authenticated user information extracted from the request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// User ID (from the JWT subject).
    pub user_id: String,
    /// Username.
    pub username: String,
}

/// Generate a JWT token for a user.
pub fn generate_jwt(
    user_id: &str,
    username: &str,
    secret: &str,
    expiry_days: i64,
) -> anyhow::Result<String> {
    let claims = Claims::new(user_id, username, expiry_days);

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a JWT token and extract its claims.
pub fn validate_jwt(token: &str, secret: &str) -> anyhow::Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Paths reachable without a token.
fn is_public(path: &str) -> bool {
    matches!(
        path,
        "/health" | "/ready" | "/api/v1/auth/register" | "/api/v1/auth/login"
    )
}

/// Authentication middleware that validates the bearer token.
pub async fn auth_middleware(
    State(state): State<crate::AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AuthError> {
    if is_public(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(|h| h.strip_prefix("Bearer ")) else {
        return Err(AuthError::new(
            "missing_auth",
            "Authorization header is required",
        ));
    };

    let secret = state.config.auth.jwt_secret.as_ref().ok_or_else(|| {
        AuthError::new("configuration_error", "JWT secret not configured")
    })?;

    let claims = validate_jwt(token, secret).map_err(|e| {
        AuthError::new("invalid_token", format!("JWT validation failed: {e}"))
    })?;

    req.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(req).await)
}
