//! CSRF edit tokens.
//!
//! A token is the hex SHA-256 of the server secret and the actor key,
//! followed by the `+\` suffix. Anonymous actors all share the bare suffix.

use sha2::{Digest, Sha256};
use wsslots_types::ActorId;

/// Suffix every edit token carries.
pub const TOKEN_SUFFIX: &str = "+\\";

/// Issues and checks per-actor edit tokens.
#[derive(Clone)]
pub struct CsrfTokens {
    secret: String,
}

impl CsrfTokens {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// The edit token for `actor`.
    pub fn token_for(&self, actor: &ActorId) -> String {
        if actor.is_anonymous() {
            return TOKEN_SUFFIX.to_string();
        }
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(actor.key().as_bytes());
        format!("{}{}", hex::encode(hasher.finalize()), TOKEN_SUFFIX)
    }

    /// Checks a submitted token without short-circuiting on the first
    /// differing byte.
    pub fn validate(&self, actor: &ActorId, token: &str) -> bool {
        let expected = self.token_for(actor);
        if expected.len() != token.len() {
            return false;
        }
        expected
            .bytes()
            .zip(token.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl std::fmt::Debug for CsrfTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CsrfTokens").finish_non_exhaustive()
    }
}
