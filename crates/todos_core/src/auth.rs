//! Password verification seam.
//!
//! # Invariants
//! - Verification never returns an error to callers; a malformed stored hash
//!   is a failed verification.
//! - Plaintext passwords and stored hashes are never logged.

use log::warn;

/// One-way comparison of a plaintext password against a stored hash.
pub trait PasswordVerifier {
    fn verify(&self, plaintext: &str, stored_hash: &str) -> bool;
}

/// bcrypt-backed verifier used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptVerifier;

impl PasswordVerifier for BcryptVerifier {
    fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        match bcrypt::verify(plaintext, stored_hash) {
            Ok(matches) => matches,
            Err(err) => {
                warn!(
                    "event=password_verify module=auth status=error error_code=malformed_hash error={}",
                    err
                );
                false
            }
        }
    }
}

impl<V: PasswordVerifier + ?Sized> PasswordVerifier for &V {
    fn verify(&self, plaintext: &str, stored_hash: &str) -> bool {
        (**self).verify(plaintext, stored_hash)
    }
}
