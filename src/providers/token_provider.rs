use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::config::SecretManager;
use crate::errors::internal::CredentialError;
use crate::errors::InternalError;
use crate::types::internal::auth::{Claims, User};

/// Issues and verifies HS256 bearer tokens
pub struct TokenProvider {
    secret_manager: Arc<SecretManager>,
    ttl: Duration,
}

impl TokenProvider {
    /// Create a new TokenProvider
    ///
    /// # Arguments
    /// * `secret_manager` - Source of the signing secret
    /// * `ttl` - Token lifetime (`JWT_EXPIRES_IN`)
    pub fn new(secret_manager: Arc<SecretManager>, ttl: Duration) -> Self {
        Self { secret_manager, ttl }
    }

    /// Generate a JWT for the given user
    ///
    /// # Returns
    /// * `Result<(String, String), InternalError>` - Tuple of (encoded JWT, JWT ID) or an error
    pub fn generate_jwt(&self, user: &User) -> Result<(String, String), InternalError> {
        let now = Utc::now().timestamp();
        let ttl_secs = i64::try_from(self.ttl.as_secs())
            .map_err(|_| InternalError::parse("duration", "token lifetime out of range"))?;
        let jti = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            iat: now,
            exp: now.saturating_add(ttl_secs),
            jti: jti.clone(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
        )
        .map_err(|e| InternalError::crypto("jwt_generation", format!("Failed to generate JWT: {}", e)))?;

        Ok((token, jti))
    }

    /// Validate a JWT and return the claims
    ///
    /// Signature and expiry only; the subject is checked against storage by the caller.
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret_manager.jwt_secret().as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| {
            let err = match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::ExpiredToken,
                ErrorKind::InvalidSignature => CredentialError::invalid_token("invalid signature"),
                _ => CredentialError::invalid_token("malformed"),
            };
            tracing::debug!(error = %e, "Rejected bearer token");
            err.into()
        })
    }
}

impl fmt::Debug for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenProvider")
            .field("secret_manager", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::internal::auth::Role;

    const SECRET: &str = "test-secret-key-minimum-32-characters-long";

    fn provider(ttl: Duration) -> TokenProvider {
        let secrets = Arc::new(SecretManager::from_parts(SECRET, "test-pepper-16chars"));
        TokenProvider::new(secrets, ttl)
    }

    fn user() -> User {
        User {
            id: "user-1".to_string(),
            name: "Ani".to_string(),
            email: "ani@pn.go.id".to_string(),
            password_hash: String::new(),
            created_at: String::new(),
            role: Role::Admin,
        }
    }

    #[test]
    fn test_generate_and_validate() {
        let provider = provider(Duration::from_secs(3600));

        let (token, jti) = provider.generate_jwt(&user()).unwrap();
        let claims = provider.validate_jwt(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ani@pn.go.id");
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.jti, jti);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token() {
        let provider = provider(Duration::from_secs(3600));
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".to_string(),
            email: "ani@pn.go.id".to_string(),
            role: Role::Petugas,
            iat: now - 7200,
            exp: now - 3600,
            jti: "old".to_string(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let result = provider.validate_jwt(&token);

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::ExpiredToken))
        ));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let issuer = TokenProvider::new(
            Arc::new(SecretManager::from_parts(
                "another-secret-key-also-32-characters-long",
                "test-pepper-16chars",
            )),
            Duration::from_secs(3600),
        );
        let (token, _) = issuer.generate_jwt(&user()).unwrap();

        let result = provider(Duration::from_secs(3600)).validate_jwt(&token);

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let result = provider(Duration::from_secs(60)).validate_jwt("not-a-jwt");

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidToken { .. }))
        ));
    }
}
