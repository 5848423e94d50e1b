//! Shopper authentication
//!
//! Identity is issued by an external provider that shares `JWT_SECRET` with
//! this service; we only verify bearer tokens and extract the caller's
//! identity. Any failure yields a uniform 401 with no detail.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

/// JWT claims as minted by the identity provider
#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    /// User ID (UUID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated shopper identity extracted from the bearer token
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct UserIdentity {
    pub user_id: Uuid,
    pub email: String,
}

const TOKEN_EXPIRY_HOURS: i64 = 24;

/// Mint a token the way the identity provider does. Used by tests and local
/// development tooling; the service itself never issues credentials.
#[allow(dead_code)]
pub fn create_token(
    user_id: Uuid,
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = UserClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + chrono::Duration::hours(TOKEN_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that verifies the bearer token and inserts a [`UserIdentity`]
/// request extension for downstream handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(unauthorized)?;

    let token_data = jsonwebtoken::decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        unauthorized()
    })?;

    let user_id = Uuid::parse_str(&token_data.claims.sub).map_err(|_| unauthorized())?;

    request.extensions_mut().insert(UserIdentity {
        user_id,
        email: token_data.claims.email,
    });

    Ok(next.run(request).await)
}

fn unauthorized() -> Response {
    AppError::Unauthorized.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip() {
        let user_id = Uuid::new_v4();
        let token = create_token(user_id, "shopper@example.com", "test-secret").unwrap();

        let decoded = jsonwebtoken::decode::<UserClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, user_id.to_string());
        assert_eq!(decoded.claims.email, "shopper@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = create_token(Uuid::new_v4(), "shopper@example.com", "secret-a").unwrap();
        let result = jsonwebtoken::decode::<UserClaims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }
}
