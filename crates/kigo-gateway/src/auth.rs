//! Handshake authentication
//!
//! The verifier runs against the upgrade request's `Authorization` header
//! before the connection is admitted; a failure refuses the upgrade with
//! 401 and no connection object is ever created. Verification is
//! side-effect-free and safe to run concurrently across connection attempts.

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use kigo_core::{GatewayError, Role, SessionMetadata};

/// Claims carried by the handshake credential.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject the token was issued to
    pub sub: String,
    /// Privilege level
    pub role: Role,
    /// Expiry, seconds since the epoch
    pub exp: u64,
}

/// Validates a bearer credential and produces the connection's identity.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify the credential taken from the `Authorization` header.
    ///
    /// `bearer` is the token with the `Bearer ` prefix already stripped, or
    /// `None` when the header was missing or not bearer-shaped.
    async fn verify(&self, bearer: Option<&str>) -> Result<SessionMetadata, GatewayError>;
}

/// HS256 JWT verifier.
pub struct JwtVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl_secs: u64,
}

impl JwtVerifier {
    pub fn new(secret: &str, token_ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            token_ttl_secs,
        }
    }

    /// Mint a token for a subject.
    pub fn mint(&self, subject: &str, role: Role) -> Result<String, GatewayError> {
        let exp = chrono::Utc::now().timestamp() as u64 + self.token_ttl_secs;
        let claims = Claims {
            sub: subject.to_string(),
            role,
            exp,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| GatewayError::Internal(format!("failed to mint token: {e}")))
    }

    /// Mint an already-expired token. Test-only helper.
    #[doc(hidden)]
    pub fn mint_expired(&self, subject: &str, role: Role) -> Result<String, GatewayError> {
        let claims = Claims {
            sub: subject.to_string(),
            role,
            exp: 1,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| GatewayError::Internal(format!("failed to mint token: {e}")))
    }
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, bearer: Option<&str>) -> Result<SessionMetadata, GatewayError> {
        let token = bearer.ok_or_else(|| GatewayError::Unauthenticated("no token provided".into()))?;

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| GatewayError::Unauthenticated("invalid token".into()))?;

        Ok(SessionMetadata::new(data.claims.sub, data.claims.role))
    }
}

/// Strip the `Bearer ` scheme from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    header.and_then(|value| value.strip_prefix("Bearer "))
}
