//! JWT token service
//!
//! HS256 token generation and validation. The signing secret comes from the
//! `JWT_SECRET` environment variable (minimum 32 bytes); development builds
//! fall back to a random per-process secret so unset environments still run,
//! at the cost of tokens not surviving a restart.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::Role;
use thiserror::Error;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Token encoding failed: {0}")]
    Encoding(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,
}

/// JWT configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Vec<u8>,
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
}

impl JwtConfig {
    /// Load from environment, falling back to development defaults.
    pub fn from_env() -> Result<Self, JwtError> {
        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) => {
                if s.len() < MIN_SECRET_LEN {
                    return Err(JwtError::WeakSecret);
                }
                s.into_bytes()
            }
            Err(_) => Self::random_secret(),
        };
        let expiration_minutes = std::env::var("JWT_EXPIRATION_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8 * 60);
        Ok(Self {
            secret,
            expiration_minutes,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "ops-server".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "ops-client".into()),
        })
    }

    /// Per-process random secret for environments without JWT_SECRET.
    fn random_secret() -> Vec<u8> {
        use ring::rand::{SecureRandom, SystemRandom};
        let mut buf = vec![0u8; MIN_SECRET_LEN];
        // SystemRandom::fill only fails if the OS RNG is unavailable
        if SystemRandom::new().fill(&mut buf).is_err() {
            tracing::warn!("System RNG unavailable, falling back to thread RNG");
            use rand::RngCore;
            rand::thread_rng().fill_bytes(&mut buf);
        }
        tracing::warn!("JWT_SECRET not set, using a random secret (tokens reset on restart)");
        buf
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: Self::random_secret(),
            expiration_minutes: 8 * 60,
            issuer: "ops-server".into(),
            audience: "ops-client".into(),
        }
    }
}

/// Token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub token_type: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

/// Authenticated caller, injected into request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub role: Role,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// JWT service - issues and validates access tokens
#[derive(Debug, Clone)]
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// Generate an access token for a user.
    pub fn generate_token(
        &self,
        user_id: i64,
        username: &str,
        role: Role,
    ) -> Result<String, JwtError> {
        let now = chrono::Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            role,
            token_type: "access".into(),
            exp: (now + chrono::Duration::minutes(self.config.expiration_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(&self.config.secret),
        )
        .map_err(|e| JwtError::Encoding(e.to_string()))
    }

    /// Validate a token and return its claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.config.secret),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })
    }

    /// Extract the bearer token from an Authorization header value.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }

    /// Build the authenticated caller context from validated claims.
    pub fn current_user(claims: &Claims) -> Result<CurrentUser, JwtError> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::Invalid(format!("Bad subject claim: {}", claims.sub)))?;
        Ok(CurrentUser {
            id,
            username: claims.username.clone(),
            role: claims.role,
        })
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new(JwtConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: b"0123456789abcdef0123456789abcdef".to_vec(),
            expiration_minutes: 60,
            issuer: "ops-server".into(),
            audience: "ops-client".into(),
        })
    }

    #[test]
    fn round_trip() {
        let svc = service();
        let token = svc.generate_token(42, "alice", Role::Manager).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Manager);

        let user = JwtService::current_user(&claims).unwrap();
        assert_eq!(user.id, 42);
        assert!(!user.is_admin());
    }

    #[test]
    fn rejects_token_from_other_secret() {
        let svc = service();
        let other = JwtService::new(JwtConfig {
            secret: b"another-secret-another-secret-xx".to_vec(),
            ..svc.config.clone()
        });
        let token = other.generate_token(1, "bob", Role::Staff).unwrap();
        assert!(matches!(svc.validate_token(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn rejects_expired_token() {
        let svc = JwtService::new(JwtConfig {
            secret: b"0123456789abcdef0123456789abcdef".to_vec(),
            expiration_minutes: -5,
            issuer: "ops-server".into(),
            audience: "ops-client".into(),
        });
        let token = svc.generate_token(1, "bob", Role::Staff).unwrap();
        assert!(matches!(svc.validate_token(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn extracts_bearer_token() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
