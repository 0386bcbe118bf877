use thiserror::Error;

/// Error type for JWT operations.
///
/// Callers are expected to collapse all verification variants into one
/// generic response; the distinction exists for server-side logging only.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token signature does not verify")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
