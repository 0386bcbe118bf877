//! Authentication infrastructure library
//!
//! Provides the building blocks the catalog service authenticates with:
//! - Password hashing (Argon2id)
//! - JWT bearer token issuance and verification (HS256)
//!
//! The signing secret and token lifetime are injected at construction;
//! nothing in this crate holds process-wide state.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Bearer Tokens
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::days(7));
//! let token = auth.issue("alice01").unwrap();
//! let claims = auth.verify(&token).unwrap();
//! assert_eq!(claims.sub, "alice01");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
