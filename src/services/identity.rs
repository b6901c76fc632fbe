use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from session token checks
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid session token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Admin role required")]
    Forbidden,

    #[error("Token signing secret is not configured")]
    MissingSecret,
}

/// Claims carried by identity provider session tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
    #[serde(default)]
    pub role: Option<String>,
}

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl Identity {
    /// Whether the caller may act on the given user's data
    pub fn can_act_for(&self, user_id: &str) -> bool {
        self.is_admin || self.user_id == user_id
    }

    pub fn require_admin(&self) -> Result<(), AuthError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AuthError::Forbidden)
        }
    }
}

/// Verifies HS256 session tokens issued by the identity provider
pub struct IdentityVerifier {
    key: DecodingKey,
    validation: Validation,
    admin_emails: Vec<String>,
}

impl IdentityVerifier {
    /// Build a verifier. A blank secret is refused.
    pub fn new(secret: &str, admin_emails: Vec<String>) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::MissingSecret);
        }

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            admin_emails: admin_emails.into_iter().map(|e| e.to_lowercase()).collect(),
        })
    }

    /// Verify an `Authorization` header value
    pub fn authenticate(&self, header: Option<&str>) -> Result<Identity, AuthError> {
        let token = header
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = decode::<Claims>(token, &self.key, &self.validation)?.claims;

        let listed_admin = claims
            .email
            .as_deref()
            .map(|e| self.admin_emails.contains(&e.to_lowercase()))
            .unwrap_or(false);
        let is_admin = listed_admin || claims.role.as_deref() == Some("admin");

        tracing::trace!("Authenticated user {} (admin: {})", claims.sub, is_admin);

        Ok(Identity {
            user_id: claims.sub,
            email: claims.email,
            is_admin,
        })
    }
}
