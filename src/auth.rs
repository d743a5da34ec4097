// ============================================================================
// AUTH - HS256 Bearer Tokens
// ============================================================================
//
// Identity is issued elsewhere. Every game route only needs the user id,
// which arrives as the `sub` claim of an HS256 JWT in the Authorization
// header.
//
// ============================================================================

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    Json,
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::game::{GameError, GameResult};
use crate::routes::{reject, AppState};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Sign a token for `user_id` valid for `ttl_secs`
pub fn issue_token(secret: &str, user_id: &str, ttl_secs: i64) -> GameResult<String> {
    let exp = (chrono::Utc::now().timestamp() + ttl_secs).max(0) as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| GameError::Unauthorized(format!("token signing failed: {}", e)))
}

/// Verify signature and expiry, return the claims
pub fn verify_token(secret: &str, token: &str) -> GameResult<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| GameError::Unauthorized(format!("JWT verification failed: {}", e)))?;

    if data.claims.sub.is_empty() {
        return Err(GameError::Unauthorized("token has empty subject".to_string()));
    }
    Ok(data.claims)
}

/// Pull the token out of an `Authorization: Bearer …` header value
pub fn bearer_token(header: &str) -> GameResult<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| GameError::Unauthorized("invalid Bearer token format".to_string()))
}

// ============================================================================
// EXTRACTOR
// ============================================================================

/// Authenticated user id, extracted from the bearer token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser(pub String);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| reject(GameError::Unauthorized("missing Authorization header".to_string())))?
            .to_str()
            .map_err(|_| reject(GameError::Unauthorized("invalid Authorization header".to_string())))?;

        let token = bearer_token(header).map_err(reject)?;
        let claims = verify_token(&state.jwt_secret, token).map_err(reject)?;

        debug!(user = %claims.sub, "Authenticated request");
        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-with-at-least-32-bytes-long";

    #[test]
    fn test_issue_and_verify() {
        let token = issue_token(SECRET, "alice", 3_600).unwrap();
        let claims = verify_token(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(SECRET, "alice", 3_600).unwrap();
        assert!(matches!(
            verify_token("another-secret-entirely-32-bytes!!", &token),
            Err(GameError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(SECRET, "alice", -3_600).unwrap();
        assert!(verify_token(SECRET, &token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(verify_token(SECRET, "invalid.token.here").is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc").unwrap(), "abc");
        assert!(bearer_token("Basic abc").is_err());
        assert!(bearer_token("Bearer ").is_err());
    }
}
