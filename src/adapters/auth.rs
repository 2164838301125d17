//! Bearer-token authentication.
//!
//! Users log in with a username and password checked against Argon2id hashes
//! and receive an HS256 JWT. [`Authenticator::authenticate`] turns that token
//! back into the username. No roles exist; the identity is only reported.

use std::collections::HashMap;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adapters::password::verify_password;
use crate::config::AuthConfig;
use crate::domain::ports::Authenticator;
use crate::utils::error::{ReservationError, Result};

pub const DEFAULT_TOKEN_EXPIRY_MINUTES: i64 = 30;

const BAD_CREDENTIALS: &str = "Incorrect username or password";
const BAD_TOKEN: &str = "Could not validate credentials";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: &'static str,
    /// Seconds until expiry.
    pub expires_in: i64,
}

pub struct JwtAuthenticator {
    secret: String,
    token_expiry_minutes: i64,
    users: HashMap<String, String>,
}

impl JwtAuthenticator {
    pub fn new(secret: impl Into<String>, token_expiry_minutes: i64) -> Self {
        Self {
            secret: secret.into(),
            token_expiry_minutes,
            users: HashMap::new(),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        config.users.iter().fold(
            Self::new(config.secret.clone(), config.token_expiry_minutes),
            |auth, user| auth.with_user(&user.username, &user.password_hash),
        )
    }

    pub fn with_user(mut self, username: &str, password_hash: &str) -> Self {
        self.users
            .insert(username.to_string(), password_hash.to_string());
        self
    }

    pub fn login(&self, username: &str, password: &str) -> Result<AccessToken> {
        let Some(hash) = self.users.get(username) else {
            tracing::warn!(username, "Login rejected: unknown user");
            return Err(ReservationError::unauthenticated(BAD_CREDENTIALS));
        };

        if !verify_password(password, hash)? {
            tracing::warn!(username, "Login rejected: wrong password");
            return Err(ReservationError::unauthenticated(BAD_CREDENTIALS));
        }

        tracing::info!(username, "Login succeeded");
        self.issue_token(username)
    }

    pub fn issue_token(&self, subject: &str) -> Result<AccessToken> {
        let now = Utc::now().timestamp();
        let expires_in = self.token_expiry_minutes * 60;
        let claims = Claims {
            sub: subject.to_string(),
            exp: now + expires_in,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        };

        let access_token = encode(
            &Header::default(), // HS256
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| ReservationError::ConfigError {
            message: format!("cannot sign access token: {}", e),
        })?;

        Ok(AccessToken {
            access_token,
            token_type: "bearer",
            expires_in,
        })
    }
}

impl Authenticator for JwtAuthenticator {
    fn authenticate(&self, token: &str) -> Result<String> {
        let token = token.trim();
        let token = token.strip_prefix("Bearer ").unwrap_or(token);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            ReservationError::unauthenticated(BAD_TOKEN)
        })?;

        if data.claims.sub.is_empty() {
            return Err(ReservationError::unauthenticated(BAD_TOKEN));
        }
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::password::hash_password;
    use assert_matches::assert_matches;

    const SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

    fn authenticator() -> JwtAuthenticator {
        let hash = hash_password("password123").unwrap();
        JwtAuthenticator::new(SECRET, 30).with_user("admin", &hash)
    }

    #[test]
    fn test_login_and_authenticate() {
        let auth = authenticator();
        let token = auth.login("admin", "password123").unwrap();
        assert_eq!(token.token_type, "bearer");
        assert_eq!(token.expires_in, 1800);

        assert_eq!(auth.authenticate(&token.access_token).unwrap(), "admin");
        let header = format!("Bearer {}", token.access_token);
        assert_eq!(auth.authenticate(&header).unwrap(), "admin");
    }

    #[test]
    fn test_login_wrong_password() {
        let auth = authenticator();
        assert_matches!(
            auth.login("admin", "wrongpassword"),
            Err(ReservationError::Unauthenticated { reason }) if reason == BAD_CREDENTIALS
        );
        assert_matches!(
            auth.login("ghost", "password123"),
            Err(ReservationError::Unauthenticated { .. })
        );
    }

    #[test]
    fn test_invalid_token() {
        let auth = authenticator();
        let err = auth.authenticate("invalid.token.here").unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = JwtAuthenticator::new("a-completely-different-secret", 30);
        let token = other.issue_token("admin").unwrap();
        assert!(authenticator().authenticate(&token.access_token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "admin".to_string(),
            exp: now - 300, // past the default leeway
            iat: now - 600,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert_matches!(
            authenticator().authenticate(&token),
            Err(ReservationError::Unauthenticated { .. })
        );
    }
}
