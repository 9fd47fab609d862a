//! User JWT authentication extractor.
//!
//! Validates the Bearer access token issued by the auth service and exposes
//! the caller's user id to handlers.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::jwt::{extract_user_id, JwtConfig, JwtError};
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use crate::error::ApiError;

/// Authenticated user information from JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// JWT ID (jti) for log correlation.
    pub jti: String,
}

impl UserAuth {
    /// Validates an access token and returns the caller.
    pub fn validate(jwt_config: &JwtConfig, token: &str) -> Result<Self, JwtError> {
        let claims = jwt_config.validate_access_token(token)?;
        let user_id = extract_user_id(&claims)?;

        Ok(UserAuth {
            user_id,
            jti: claims.jti,
        })
    }

    /// Creates a verifier from the configured public key.
    pub fn create_jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, JwtError> {
        JwtConfig::from_rsa_public_key(&config.public_key, config.leeway_secs)
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth_header = parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header format".to_string()))
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(auth) = parts.extensions.get::<UserAuth>() {
            return Ok(auth.clone());
        }

        let token = bearer_token(parts)?;

        let jwt_config = UserAuth::create_jwt_config(&state.config.jwt)
            .map_err(|e| ApiError::Internal(format!("Failed to initialize JWT config: {}", e)))?;

        let auth = UserAuth::validate(&jwt_config, token).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

        parts.extensions.insert(auth.clone());
        Ok(auth)
    }
}
