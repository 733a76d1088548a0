//! OIDC test harness: a throwaway issuer that mints RS256-signed tokens for
//! integration tests of the authentication boundary.
//!
//! Nothing in this crate is suitable for production use; the signing keys
//! are static, published test material.

pub mod keys;
pub mod oidc;

pub use oidc::{TestAuthError, TestOidcServer};
