use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;

/// JWT claims: subject is the user id, validity is issued-at plus the
/// configured TTL (30 days by default).
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    iat: i64,
    exp: i64,
}

/// Signs and verifies HS256 bearer tokens.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
    ttl: Duration,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>, ttl_days: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::days(ttl_days),
        }
    }

    pub fn issue(&self, user_id: Uuid) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| DomainError::database(format!("token signing failed: {e}")))
    }

    /// Returns the subject id of a valid, unexpired token.
    pub fn verify(&self, token: &str) -> Result<Uuid, DomainError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| DomainError::Unauthenticated)?;
        Ok(data.claims.sub)
    }
}

pub fn hash_password(password: &str) -> Result<String, DomainError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|e| DomainError::database(format!("password hashing failed: {e}")))
}

/// One-way comparison; a malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
