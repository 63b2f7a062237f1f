//! HS256 JSON Web Tokens implementing the `TokenService` port.
//!
//! Expiry is checked against the injected clock rather than the system time
//! inside `jsonwebtoken`, with no leeway.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::ports::{TokenError, TokenService};
use crate::domain::{AccessToken, UserId};

/// Lifetime of an issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies session tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Create a token service signing with `secret`.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user: &UserId) -> Result<AccessToken, TokenError> {
        let issued_at = self.clock.utc();
        let claims = Claims {
            sub: user.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + TimeDelta::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenError::issue(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            debug!(error = %err, "token rejected");
            TokenError::invalid()
        })?;
        if self.clock.utc().timestamp() >= data.claims.exp {
            debug!("token expired");
            return Err(TokenError::invalid());
        }
        UserId::new(&data.claims.sub).map_err(|_| TokenError::invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{FixtureClock, fixed_now};
    use rstest::rstest;

    const SECRET: &[u8] = b"test-secret";

    fn service_at(now: chrono::DateTime<chrono::Utc>) -> JwtTokenService {
        JwtTokenService::new(SECRET, Arc::new(FixtureClock(now)))
    }

    #[rstest]
    fn issued_tokens_verify_to_their_subject() {
        let service = service_at(fixed_now());
        let user = UserId::random();
        let token = service.issue(&user).expect("issue");
        assert_eq!(service.verify(token.as_str()).expect("verify"), user);
    }

    #[rstest]
    #[case(TimeDelta::hours(23), true)]
    #[case(TimeDelta::hours(24), false)]
    #[case(TimeDelta::hours(25), false)]
    fn tokens_expire_after_a_day(#[case] elapsed: TimeDelta, #[case] valid: bool) {
        let user = UserId::random();
        let token = service_at(fixed_now()).issue(&user).expect("issue");
        let later = service_at(fixed_now() + elapsed);
        assert_eq!(later.verify(token.as_str()).is_ok(), valid);
    }

    #[rstest]
    fn foreign_signature_is_invalid() {
        let user = UserId::random();
        let token = JwtTokenService::new(b"other-secret", Arc::new(FixtureClock(fixed_now())))
            .issue(&user)
            .expect("issue");
        let error = service_at(fixed_now())
            .verify(token.as_str())
            .expect_err("wrong key");
        assert_eq!(error, TokenError::Invalid);
    }

    #[rstest]
    #[case("")]
    #[case("not.a.jwt")]
    #[case("header.payload")]
    fn malformed_tokens_are_invalid(#[case] raw: &str) {
        assert_eq!(
            service_at(fixed_now()).verify(raw).expect_err("malformed"),
            TokenError::Invalid
        );
    }

    #[rstest]
    fn non_uuid_subject_is_invalid() {
        let now = fixed_now();
        let claims = Claims {
            sub: "admin".to_owned(),
            iat: now.timestamp(),
            exp: (now + TimeDelta::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encode");
        assert_eq!(
            service_at(now).verify(&token).expect_err("subject"),
            TokenError::Invalid
        );
    }

    #[rstest]
    fn other_algorithms_are_rejected() {
        let now = fixed_now();
        let claims = Claims {
            sub: UserId::random().to_string(),
            iat: now.timestamp(),
            exp: (now + TimeDelta::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encode");
        assert!(service_at(now).verify(&token).is_err());
    }
}
