use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Token issuer and verifier.
///
/// Holds the injected signing secret and the fixed token lifetime. Tokens
/// are stateless bearer capabilities: once issued they stay valid until
/// natural expiry, and the only claim embedded is the subject.
pub struct Authenticator {
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing, from configuration
    /// * `token_ttl` - Validity window applied to every issued token
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl,
        }
    }

    /// Issue a signed token for an authenticated subject.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token generation failed
    pub fn issue(&self, subject: &str) -> Result<String, JwtError> {
        let claims = Claims::for_subject(subject, self.token_ttl);
        self.jwt_handler.encode(&claims)
    }

    /// Verify an inbound bearer token and return its claims.
    ///
    /// Signature and expiry are checked here; resolving the subject back
    /// to a live user record is the caller's responsibility.
    ///
    /// # Errors
    /// * `TokenExpired` - Validity window has passed
    /// * `InvalidSignature` - Signed with a different secret
    /// * `Malformed` - Not a parseable token
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
