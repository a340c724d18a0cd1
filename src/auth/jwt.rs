//! JWT Token Handler
//! Mission: Issue and validate signed identity assertions

use crate::auth::models::Claims;
use anyhow::{bail, Context, Result};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// JWT handler for token operations.
///
/// Tokens carry only a subject and an issued-at timestamp — there is no
/// expiry claim, so a token stays valid until the signing secret rotates.
/// Known hardening gap, kept for compatibility with existing clients.
pub struct JwtHandler {
    secret: String,
}

impl JwtHandler {
    pub fn new(secret: String) -> Self {
        Self { secret }
    }

    /// Issue a token asserting `username` as of now.
    pub fn issue(&self, username: &str) -> Result<String> {
        let claims = Claims {
            sub: username.to_string(),
            iat: Utc::now().timestamp(),
        };

        debug!("Issuing token for {}", username);

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .context("Failed to sign token")
    }

    /// Validate a token and extract its claims.
    ///
    /// Fails on a bad signature, a malformed payload, or an empty subject.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        // No expiry claim is issued, so expiry validation must be off and
        // `exp` must not be a required claim.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .context("Invalid token")?;

        if decoded.claims.sub.is_empty() {
            bail!("Token has no subject");
        }

        debug!("Validated token for {}", decoded.claims.sub);

        Ok(decoded.claims)
    }
}
