//! Invitation token material.
//!
//! A respondent holds a high-entropy plaintext secret; durable storage only
//! ever sees its SHA-256 digest. Both sides of the pair are lowercase hex.
//! Hashing is deterministic and one-way; token generation is the engine's
//! only source of randomness.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Number of CSPRNG bytes backing a token secret.
const SECRET_BYTES: usize = 32;

/// Number of bytes in the stored digest.
const DIGEST_BYTES: usize = 32;

/// Plaintext invitation secret handed to a respondent inside a response link.
///
/// ## Invariants
/// - Always 64 lowercase hex characters (32 bytes of OS CSPRNG output).
/// - Never persisted; the backing string is zeroized on drop.
pub struct InvitationToken {
    plaintext: Zeroizing<String>,
}

impl InvitationToken {
    /// Mint a fresh secret from the operating system CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self {
            plaintext: Zeroizing::new(hex::encode(bytes)),
        }
    }

    /// Borrow the plaintext for embedding in a response link or email.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.plaintext
    }

    /// Derive the storable digest of this token.
    #[must_use]
    pub fn hash(&self) -> TokenHash {
        TokenHash::derive(self.expose())
    }
}

impl fmt::Debug for InvitationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never echo the secret through Debug formatting or logs.
        f.write_str("InvitationToken(..)")
    }
}

/// Validation error for stored token hashes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenHashParseError {
    /// The value is not 64 lowercase hex characters.
    #[error("token hash must be {} lowercase hex characters", DIGEST_BYTES * 2)]
    Malformed,
}

/// SHA-256 digest of a token secret, as stored in the invitation ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenHash(String);

impl TokenHash {
    /// Hash a presented plaintext secret.
    ///
    /// Pure and deterministic: the same input always yields the same digest.
    /// Arbitrary presented strings are hashed as-is so that lookups for
    /// malformed tokens simply miss the ledger.
    #[must_use]
    pub fn derive(plaintext: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(plaintext.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Reconstruct a hash previously read back from storage.
    pub fn parse(value: impl Into<String>) -> Result<Self, TokenHashParseError> {
        let value = value.into();
        let well_formed = value.len() == DIGEST_BYTES * 2
            && value
                .chars()
                .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase());
        if !well_formed {
            return Err(TokenHashParseError::Malformed);
        }
        Ok(Self(value))
    }

    /// Hex form as stored in the `token_hash` column.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generated_secret_is_64_lowercase_hex_chars() {
        let token = InvitationToken::generate();

        assert_eq!(token.expose().len(), 64);
        assert!(token
            .expose()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[rstest]
    fn distinct_secrets_yield_distinct_hashes() {
        let first = InvitationToken::generate();
        let second = InvitationToken::generate();

        assert_ne!(first.expose(), second.expose());
        assert_ne!(first.hash(), second.hash());
    }

    #[rstest]
    fn hashing_is_deterministic() {
        let token = InvitationToken::generate();

        assert_eq!(token.hash(), TokenHash::derive(token.expose()));
        assert_eq!(TokenHash::derive("abc"), TokenHash::derive("abc"));
    }

    #[rstest]
    fn hash_is_64_lowercase_hex_chars() {
        let digest = TokenHash::derive("anything");

        assert_eq!(digest.as_str().len(), 64);
        assert!(digest
            .as_str()
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[rstest]
    fn parse_round_trips_a_stored_digest() {
        let digest = TokenHash::derive("abc");
        let parsed = TokenHash::parse(digest.as_str().to_owned()).expect("stored digest parses");

        assert_eq!(parsed, digest);
    }

    #[rstest]
    #[case::empty("")]
    #[case::short("abc123")]
    #[case::uppercase("ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789")]
    #[case::non_hex("zzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzzz")]
    fn parse_rejects_malformed_values(#[case] value: &str) {
        assert_eq!(
            TokenHash::parse(value),
            Err(TokenHashParseError::Malformed)
        );
    }

    #[rstest]
    fn debug_never_exposes_the_secret() {
        let token = InvitationToken::generate();
        let rendered = format!("{token:?}");

        assert!(!rendered.contains(token.expose()));
    }
}
