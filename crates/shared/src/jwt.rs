//! JWT access-token verification.
//!
//! Tokens are issued by the hosted auth service and signed with RS256. The
//! backend only needs the public key to verify them; a signing key can be
//! attached for local tooling and integration tests that need to mint tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("No signing key configured")]
    MissingSigningKey,
}

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    /// Token type (access or refresh)
    pub token_type: TokenType,
}

/// Type of JWT token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

/// Verification (and optionally signing) configuration.
#[derive(Clone)]
pub struct JwtConfig {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    encoding_key: Option<EncodingKey>,
    /// Leeway in seconds for clock skew tolerance
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("leeway_secs", &self.leeway_secs)
            .field("can_sign", &self.encoding_key.is_some())
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

impl JwtConfig {
    /// Creates a verifier from an RSA public key in PEM format.
    pub fn from_rsa_public_key(public_key_pem: &str, leeway_secs: u64) -> Result<Self, JwtError> {
        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            algorithm: Algorithm::RS256,
            decoding_key,
            encoding_key: None,
            leeway_secs,
        })
    }

    /// Attaches an RSA private key so this config can also mint tokens.
    pub fn with_rsa_signing_key(mut self, private_key_pem: &str) -> Result<Self, JwtError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;
        self.encoding_key = Some(encoding_key);
        Ok(self)
    }

    /// HS256 config for unit tests. DO NOT use in production.
    #[cfg(test)]
    pub fn new_for_testing(secret: &str) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: Some(EncodingKey::from_secret(secret.as_bytes())),
            leeway_secs: 0,
        }
    }

    /// Mints an access token for the given user. Returns `(token, jti)`.
    pub fn generate_access_token(
        &self,
        user_id: Uuid,
        expiry_secs: i64,
    ) -> Result<(String, String), JwtError> {
        self.generate_token(user_id, TokenType::Access, expiry_secs)
    }

    fn generate_token(
        &self,
        user_id: Uuid,
        token_type: TokenType,
        expiry_secs: i64,
    ) -> Result<(String, String), JwtError> {
        let encoding_key = self
            .encoding_key
            .as_ref()
            .ok_or(JwtError::MissingSigningKey)?;

        let now = Utc::now();
        let jti = Uuid::new_v4().to_string();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: jti.clone(),
            token_type,
        };

        let token = encode(&Header::new(self.algorithm), &claims, encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))?;

        Ok((token, jti))
    }

    /// Validates a token and returns its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validates an access token specifically; refresh tokens are rejected.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != TokenType::Access {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }
}

/// Extracts user ID from validated claims.
pub fn extract_user_id(claims: &Claims) -> Result<Uuid, JwtError> {
    Uuid::parse_str(&claims.sub).map_err(|_| JwtError::InvalidToken)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> JwtConfig {
        JwtConfig::new_for_testing("test_secret_key_for_jwt_testing_12345")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let config = create_test_config();
        let user_id = Uuid::new_v4();

        let (token, jti) = config.generate_access_token(user_id, 900).unwrap();
        let claims = config.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(extract_user_id(&claims).unwrap(), user_id);
    }

    #[test]
    fn test_refresh_token_rejected_as_access() {
        let config = create_test_config();
        let (token, _) = config
            .generate_token(Uuid::new_v4(), TokenType::Refresh, 900)
            .unwrap();

        let result = config.validate_access_token(&token);
        assert!(matches!(result, Err(JwtError::InvalidToken)));
    }

    #[test]
    fn test_expired_token() {
        let config = create_test_config();
        let (token, _) = config.generate_access_token(Uuid::new_v4(), -60).unwrap();

        let result = config.validate_access_token(&token);
        assert!(
            matches!(result, Err(JwtError::TokenExpired)),
            "Expected TokenExpired, got: {:?}",
            result
        );
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let config = create_test_config();
        let other = JwtConfig::new_for_testing("a_completely_different_secret_value");
        let (token, _) = other.generate_access_token(Uuid::new_v4(), 900).unwrap();

        assert!(matches!(
            config.validate_access_token(&token),
            Err(JwtError::InvalidToken)
        ));
    }

    #[test]
    fn test_malformed_token() {
        let config = create_test_config();
        assert!(config.validate_token("not_a_jwt").is_err());
    }

    #[test]
    fn test_verifier_without_signing_key_cannot_mint() {
        let mut config = create_test_config();
        config.encoding_key = None;

        let result = config.generate_access_token(Uuid::new_v4(), 900);
        assert!(matches!(result, Err(JwtError::MissingSigningKey)));
    }

    #[test]
    fn test_invalid_public_key() {
        let result = JwtConfig::from_rsa_public_key("not a pem", DEFAULT_LEEWAY_SECS);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug_str = format!("{:?}", create_test_config());
        assert!(debug_str.contains("[REDACTED]"));
        assert!(debug_str.contains("can_sign: true"));
    }

    #[test]
    fn test_token_type_serialization() {
        assert_eq!(serde_json::to_string(&TokenType::Access).unwrap(), "\"access\"");
        assert_eq!(serde_json::to_string(&TokenType::Refresh).unwrap(), "\"refresh\"");
    }
}
