use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors::AppError, SESSION_TTL_DAYS};

#[derive(Debug, Deserialize, Serialize)]
pub struct Claims {
    pub id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(id: Uuid, email: &str, issued_at: DateTime<Utc>) -> Self {
        Self {
            id,
            email: email.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::days(SESSION_TTL_DAYS)).timestamp(),
        }
    }
}

/// Verified session payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

/// Issues and verifies stateless, HMAC-signed session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, id: Uuid, email: &str) -> Result<String, AppError> {
        self.issue_at(id, email, Utc::now())
    }

    /// Token as if issued at `issued_at`; expires `SESSION_TTL_DAYS` later.
    pub fn issue_at(&self, id: Uuid, email: &str, issued_at: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims::new(id, email, issued_at);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|err| {
            error!("failed to sign session token: {}", err);
            AppError::Internal
        })
    }

    /// `None` for malformed, expired or tampered tokens.
    pub fn verify(&self, token: &str) -> Option<Identity> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Some(Identity {
                id: data.claims.id,
                email: data.claims.email,
            }),
            Err(err) => {
                debug!("session token rejected: {}", err);
                None
            }
        }
    }
}
