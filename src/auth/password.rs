//! Credential Verifier
//! Mission: Validate plaintext passwords against hashes of mixed provenance

use sha2::{Digest, Sha256};

/// Shape of a stored password hash, decided by a prefix/length sniff.
///
/// The store can hold hashes from different seeding strategies: bcrypt for
/// anything the init binary wrote, bare SHA-256 hex digests from older
/// seeds, and raw plaintext in development databases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoredHashKind {
    /// Salted adaptive hash (bcrypt family: `$2a$`, `$2b$`, `$2y$`).
    Adaptive,
    /// Legacy 64-char lowercase/uppercase hex SHA-256 digest.
    HexDigest,
    /// Anything else: compared as plaintext. Development fallback only.
    Plain,
}

fn classify(stored: &str) -> StoredHashKind {
    if stored.starts_with("$2a$") || stored.starts_with("$2b$") || stored.starts_with("$2y$") {
        return StoredHashKind::Adaptive;
    }
    if stored.len() == 64 && stored.bytes().all(|b| b.is_ascii_hexdigit()) {
        return StoredHashKind::HexDigest;
    }
    StoredHashKind::Plain
}

/// Verify a plaintext password against a stored hash of unknown format.
///
/// Never fails: any internal error counts as "does not match". A malformed
/// adaptive hash falls through to the remaining rules instead of
/// propagating, matching how seeded databases have historically behaved.
pub fn verify_password(plain: &str, stored: Option<&str>) -> bool {
    let Some(stored) = stored else {
        return false;
    };

    match classify(stored) {
        StoredHashKind::Adaptive => match bcrypt::verify(plain, stored) {
            Ok(matches) => matches,
            // Unparseable bcrypt string: remaining rule is raw equality.
            Err(_) => plain == stored,
        },
        StoredHashKind::HexDigest => {
            let digest = hex::encode(Sha256::digest(plain.as_bytes()));
            digest.eq_ignore_ascii_case(stored)
        }
        // INSECURE: plaintext comparison, kept for development seed data.
        StoredHashKind::Plain => plain == stored,
    }
}
