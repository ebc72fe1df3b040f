//! Session token generation, format checks and hashing.

use std::fmt::{self, Write as _};

use rand::{RngCore, rngs::OsRng};
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

/// Session token prefix.
pub const SESSION_TOKEN_PREFIX: &str = "mk_";

/// Number of random bytes encoded in a token.
pub const SESSION_TOKEN_SECRET_BYTES: usize = 32;

const SESSION_TOKEN_SECRET_HEX_CHARS: usize = SESSION_TOKEN_SECRET_BYTES * 2;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionTokenError {
    #[error("session token prefix is missing")]
    MissingPrefix,

    #[error("session token secret is not {SESSION_TOKEN_SECRET_HEX_CHARS} hex characters")]
    InvalidSecret,
}

/// A raw session token. Wiped from memory on drop.
pub struct SessionToken(String);

impl SessionToken {
    /// The raw token, for handing to the user once.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Hash stored in the `sessions` table.
    #[must_use]
    pub fn hash(&self) -> String {
        hash_session_token(&self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(**redacted**)")
    }
}

impl Drop for SessionToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[must_use]
pub fn generate_session_token() -> SessionToken {
    let mut secret = [0_u8; SESSION_TOKEN_SECRET_BYTES];

    OsRng.fill_bytes(&mut secret);

    let mut token =
        String::with_capacity(SESSION_TOKEN_PREFIX.len() + SESSION_TOKEN_SECRET_HEX_CHARS);
    token.push_str(SESSION_TOKEN_PREFIX);

    for byte in &secret {
        // Writing to a String cannot fail.
        let _written = write!(token, "{byte:02x}");
    }

    secret.zeroize();

    SessionToken(token)
}

/// Reject tokens that could never have been issued, before touching storage.
///
/// # Errors
///
/// Returns a [`SessionTokenError`] describing what is wrong with the format.
pub fn check_session_token(token: &str) -> Result<(), SessionTokenError> {
    let secret = token
        .strip_prefix(SESSION_TOKEN_PREFIX)
        .ok_or(SessionTokenError::MissingPrefix)?;

    if secret.len() != SESSION_TOKEN_SECRET_HEX_CHARS
        || !secret.bytes().all(|byte| matches!(byte, b'0'..=b'9' | b'a'..=b'f'))
    {
        return Err(SessionTokenError::InvalidSecret);
    }

    Ok(())
}

#[must_use]
pub fn hash_session_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}
