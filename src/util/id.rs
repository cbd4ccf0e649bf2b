//! ID generation and lookup for bug records.
//!
//! IDs have the form `bug-<hash>` where hash is base36 lowercase (0-9, a-z)
//! taken from a SHA256 digest of the record's identifying fields.

use crate::error::{BugError, Result};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// Prefix for every store-assigned ID.
pub const ID_PREFIX: &str = "bug";

/// Hash length used for new IDs.
pub const HASH_LENGTH: usize = 8;

/// Attempts before ID generation gives up.
pub const MAX_ID_ATTEMPTS: u32 = 100;

/// Generate an ID, checking for collisions with the provided checker.
///
/// The checker returns `Ok(true)` if the ID already exists.
///
/// # Errors
///
/// Propagates checker errors, and returns `StoreUnavailable` when every
/// candidate is taken.
pub fn generate_id<F>(
    title: &str,
    created_by: &str,
    created_at: DateTime<Utc>,
    mut exists: F,
) -> Result<String>
where
    F: FnMut(&str) -> Result<bool>,
{
    for nonce in 0..MAX_ID_ATTEMPTS {
        let seed = generate_id_seed(title, created_by, created_at, nonce);
        let length = if nonce < 10 { HASH_LENGTH } else { 12 };
        let id = format!("{ID_PREFIX}-{}", compute_id_hash(&seed, length));
        if !exists(&id)? {
            return Ok(id);
        }
    }

    Err(BugError::StoreUnavailable {
        reason: format!("no free id after {MAX_ID_ATTEMPTS} attempts"),
    })
}

/// Seed string: `title | created_by | created_at (ns) | nonce`.
#[must_use]
pub fn generate_id_seed(
    title: &str,
    created_by: &str,
    created_at: DateTime<Utc>,
    nonce: u32,
) -> String {
    format!(
        "{}|{}|{}|{}",
        title,
        created_by,
        created_at.timestamp_nanos_opt().unwrap_or(0),
        nonce
    )
}

/// Compute a base36 hash of the input string with a specific length.
#[must_use]
pub fn compute_id_hash(input: &str, length: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();

    // First 8 bytes as a u64
    let mut num = 0u64;
    for &byte in result.iter().take(8) {
        num = (num << 8) | u64::from(byte);
    }

    let encoded = base36_encode(num);
    let padded = if encoded.len() < length {
        format!("{encoded:0>length$}")
    } else {
        encoded
    };
    padded.chars().take(length).collect()
}

fn base36_encode(mut num: u64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if num == 0 {
        return "0".to_string();
    }
    let mut chars = Vec::new();
    while num > 0 {
        #[allow(clippy::cast_possible_truncation)]
        chars.push(ALPHABET[(num % 36) as usize] as char);
        num /= 36;
    }
    chars.into_iter().rev().collect()
}

/// Resolve user input to a known ID.
///
/// Accepts the full ID, the ID without its `bug-` prefix, or any unique
/// prefix of the hash.
///
/// # Errors
///
/// Returns `BugNotFound` if nothing matches, or a validation error listing
/// the candidates when the prefix is ambiguous.
pub fn resolve_id<'a, I>(input: &str, known: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let input = input.trim();
    let hash_part = input
        .strip_prefix(ID_PREFIX)
        .and_then(|rest| rest.strip_prefix('-'))
        .unwrap_or(input)
        .to_lowercase();

    let mut matches = Vec::new();
    for id in known {
        if id == input {
            return Ok(id.to_string());
        }
        let hash = id
            .strip_prefix(ID_PREFIX)
            .and_then(|rest| rest.strip_prefix('-'))
            .unwrap_or(id);
        if !hash_part.is_empty() && hash.starts_with(&hash_part) {
            matches.push(id.to_string());
        }
    }

    match matches.len() {
        0 => Err(BugError::BugNotFound {
            id: input.to_string(),
        }),
        1 => Ok(matches.remove(0)),
        _ => {
            matches.sort();
            Err(BugError::validation(
                "id",
                format!("'{input}' is ambiguous: {}", matches.join(", ")),
            ))
        }
    }
}
