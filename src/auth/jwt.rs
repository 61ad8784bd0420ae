use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::config::JwtConfig;

/// Claims carried inside an identity token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject email
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub jti: Uuid,   // random per token, so two same-second issues never collide
}

/// Why a token failed validation. Protected routes collapse all of these
/// into one outward rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    SignatureInvalid,
    #[error("token expired")]
    Expired,
}

/// HS256 signing and verification keys plus the token lifetime.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl JwtKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(cfg: &JwtConfig) -> Self {
        Self::new(&cfg.secret, Duration::hours(cfg.ttl_hours))
    }

    /// Signs a token for the given subject, expiring one TTL from now.
    /// The token value itself is never logged.
    pub fn issue(&self, subject_email: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            sub: subject_email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: (now + self.ttl).unix_timestamp() as usize,
            jti: Uuid::new_v4(),
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(subject = %subject_email, "token issued");
        Ok(token)
    }

    /// Verifies signature and expiry, returning the subject email.
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let data =
            decode::<Claims>(token, &self.decoding, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            })?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::new("test-secret", Duration::hours(24))
    }

    #[test]
    fn issue_and_validate_roundtrip() {
        let keys = make_keys();
        let token = keys.issue("a@x.com").expect("issue");
        let subject = keys.validate(&token).expect("validate");
        assert_eq!(subject, "a@x.com");
    }

    #[test]
    fn tokens_for_same_subject_differ() {
        let keys = make_keys();
        let t1 = keys.issue("a@x.com").expect("issue");
        let t2 = keys.issue("a@x.com").expect("issue");
        assert_ne!(t1, t2);
        assert_eq!(keys.validate(&t1).unwrap(), "a@x.com");
        assert_eq!(keys.validate(&t2).unwrap(), "a@x.com");
    }

    #[test]
    fn expired_token_is_rejected_as_expired() {
        let keys = JwtKeys::new("test-secret", Duration::hours(-1));
        let token = keys.issue("a@x.com").expect("issue");
        assert_eq!(keys.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_payload_is_rejected_as_invalid_signature() {
        let keys = make_keys();
        let token = keys.issue("a@x.com").expect("issue");
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        // Swap one base64url character of the payload; the signature no
        // longer matches the message.
        let mut payload: Vec<u8> = parts[1].bytes().collect();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        let tampered = format!(
            "{}.{}.{}",
            parts[0],
            String::from_utf8(payload).unwrap(),
            parts[2]
        );
        assert_eq!(keys.validate(&tampered), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn wrong_key_is_rejected_as_invalid_signature() {
        let keys = make_keys();
        let other = JwtKeys::new("another-secret", Duration::hours(24));
        let token = keys.issue("a@x.com").expect("issue");
        assert_eq!(other.validate(&token), Err(TokenError::SignatureInvalid));
    }

    #[test]
    fn garbage_is_rejected_as_malformed() {
        let keys = make_keys();
        assert_eq!(keys.validate("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(keys.validate("not.a.token"), Err(TokenError::Malformed));
        assert_eq!(keys.validate(""), Err(TokenError::Malformed));
    }
}
