use axum::http::{header, HeaderMap};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifetime of a session credential, in seconds
pub const SESSION_TTL_SECS: i64 = 1800;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Caller's user id
    pub sub: String,
    /// Expiry, Unix seconds
    pub exp: i64,
}

/// A freshly issued session credential
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Why a presented credential was rejected. Callers only ever see a
/// generic 401; the variant is for the log.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingHeader,
    #[error("malformed session credential: {0}")]
    Malformed(String),
    #[error("session credential signature mismatch")]
    InvalidSignature,
    #[error("session credential expired")]
    Expired,
}

/// Issues and verifies HS256 session credentials with a server-held secret
pub struct CredentialVerifier {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl CredentialVerifier {
    pub fn new(secret: &str) -> Result<Self, JwtError> {
        if secret.is_empty() {
            return Err(JwtError::InvalidSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // An expired credential is rejected the second it expires
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Issue a credential for `subject` valid for `SESSION_TTL_SECS` from now
    pub fn issue(&self, subject: &str) -> Result<Session, JwtError> {
        self.issue_at(subject, Utc::now().timestamp())
    }

    /// Issue a credential as if the current time were `issued_at`
    pub fn issue_at(&self, subject: &str, issued_at: i64) -> Result<Session, JwtError> {
        let claims = Claims {
            sub: subject.to_string(),
            exp: issued_at + SESSION_TTL_SECS,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))?;
        Ok(Session {
            token,
            expires_at: claims.exp,
        })
    }

    /// Check signature and expiry of a raw token
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::Malformed(e.to_string()),
            })
    }

    /// Verify the credential carried in the `Authorization` header.
    /// Both `Bearer <token>` and a bare token are accepted.
    pub fn verify_headers(&self, headers: &HeaderMap) -> Result<Claims, AuthError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AuthError::Malformed("non-ASCII Authorization header".to_string()))?
            .trim();

        let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
        if token.is_empty() {
            return Err(AuthError::Malformed("empty token".to_string()));
        }
        self.verify(token)
    }
}
