use anyhow::anyhow;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::error::AppError;
use crate::models::user::{User, UserChanges};
use crate::state::AppState;

pub const TOKEN_TTL_HOURS: i64 = 72;

/// What a signed token says about its holder. Tokens are self-contained:
/// handlers trust these fields without a database lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub name: String,
    pub admin: bool,
    pub owner: bool,
    pub exp: i64,
}

impl Claims {
    pub fn issue(user: &User) -> Claims {
        Claims {
            email: user.email.clone(),
            name: user.name.clone(),
            admin: user.admin,
            owner: user.owner,
            exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        }
    }

    /// A replacement token after a profile update. Only fields that were
    /// actually changed move; everything else, including the expiry, is
    /// carried over from the presented token.
    pub fn refreshed(&self, changes: &UserChanges) -> Claims {
        Claims {
            email: changes.email.clone().unwrap_or_else(|| self.email.clone()),
            name: changes.name.clone().unwrap_or_else(|| self.name.clone()),
            admin: self.admin,
            owner: self.owner,
            exp: self.exp,
        }
    }
}

/// HMAC keys for signing and checking tokens, both derived from the one
/// configured secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtKeys {
    pub fn new(secret: &str) -> JwtKeys {
        let digest = Sha512::digest(secret.as_bytes());
        JwtKeys {
            encoding: EncodingKey::from_secret(&digest[..]),
            decoding: DecodingKey::from_secret(&digest[..]),
        }
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        Ok(encode(&Header::default(), claims, &self.encoding)?)
    }

    /// Every way a token can be bad, expiry included, reads the same from
    /// the outside: the caller is not authorized.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AppError::Other(anyhow!("password hashing failed: {err}")))?;
    Ok(hash.to_string())
}

/// A stored hash that does not parse is corrupt data, not a wrong password,
/// so it surfaces as an internal error rather than a quiet mismatch.
pub fn verify_password(password: &str, stored: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|err| AppError::Other(anyhow!("stored password hash is invalid: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Extractor for handlers that require a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized)?;
        let claims = state.jwt.verify(bearer.token())?;
        Ok(AuthUser(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            email: "ada@example.com".into(),
            name: "Ada".into(),
            password_hash: String::new(),
            admin: true,
            owner: false,
        }
    }

    #[test]
    fn sign_then_verify_round_trips() {
        let keys = JwtKeys::new("secret");
        let claims = Claims::issue(&sample_user());
        let token = keys.sign(&claims).unwrap();
        assert_eq!(keys.verify(&token).unwrap(), claims);
    }

    #[test]
    fn wrong_key_is_unauthorized() {
        let keys = JwtKeys::new("secret");
        let other = JwtKeys::new("different");
        let token = keys.sign(&Claims::issue(&sample_user())).unwrap();
        assert!(matches!(other.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn garbage_token_is_unauthorized() {
        let keys = JwtKeys::new("secret");
        assert!(matches!(
            keys.verify("not.a.token"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let keys = JwtKeys::new("secret");
        let mut claims = Claims::issue(&sample_user());
        claims.exp = (Utc::now() - Duration::hours(2)).timestamp();
        let token = keys.sign(&claims).unwrap();
        assert!(matches!(keys.verify(&token), Err(AppError::Unauthorized)));
    }

    #[test]
    fn refresh_moves_only_changed_fields() {
        let claims = Claims::issue(&sample_user());
        let changes = UserChanges {
            email: Some("ada@new.example".into()),
            name: None,
        };
        let next = claims.refreshed(&changes);
        assert_eq!(next.email, "ada@new.example");
        assert_eq!(next.name, claims.name);
        assert!(next.admin);
        assert!(!next.owner);
        assert_eq!(next.exp, claims.exp);
    }

    #[test]
    fn refresh_with_no_changes_is_identity() {
        let claims = Claims::issue(&sample_user());
        assert_eq!(claims.refreshed(&UserChanges::default()), claims);
    }

    #[test]
    fn password_verifies_against_own_hash() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn corrupt_stored_hash_is_an_error() {
        assert!(verify_password("hunter2", "not-a-phc-string").is_err());
    }
}
