use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

/// Token claims: user id, email as subject, expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub uid: Uuid,
    pub sub: String,
    pub exp: usize,
}

/// Stateless HS256 token codec over a process-wide secret. The secret is
/// injected at startup and read-only afterwards.
#[derive(Clone)]
pub struct TokenService {
    secret: String,
}

impl TokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    /// Sign a token for `user_id`/`email` that expires after `ttl`.
    pub fn issue(&self, user_id: Uuid, email: &str, ttl: Duration) -> Result<String, AuthError> {
        let exp = (Utc::now() + ttl).timestamp().max(0) as usize;
        let claims = Claims { uid: user_id, sub: email.to_string(), exp };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Decode and verify signature plus expiry. Malformed, tampered and
    /// expired tokens all collapse into `TokenError`.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| AuthError::TokenError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_verify_round_trip() {
        let svc = TokenService::new("test-secret");
        let uid = Uuid::new_v4();
        let token = svc.issue(uid, "ann@x.com", Duration::hours(1)).unwrap();
        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.uid, uid);
        assert_eq!(claims.sub, "ann@x.com");
    }

    #[test]
    fn expired_token_rejected() {
        let svc = TokenService::new("test-secret");
        // Well past the default leeway
        let token = svc.issue(Uuid::new_v4(), "ann@x.com", Duration::hours(-2)).unwrap();
        assert!(svc.verify(&token).is_err());
    }

    #[test]
    fn wrong_secret_rejected() {
        let issuer = TokenService::new("secret-a");
        let verifier = TokenService::new("secret-b");
        let token = issuer.issue(Uuid::new_v4(), "ann@x.com", Duration::hours(1)).unwrap();
        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        let svc = TokenService::new("test-secret");
        assert!(svc.verify("not.a.token").is_err());
        assert!(svc.verify("").is_err());
    }
}
