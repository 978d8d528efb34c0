//! Identifier generation.
//!
//! Identifiers follow `{prefix}_{unixMillis}_{random}` where the random tail
//! is nine lowercase base-36 characters.

use rand::Rng;

/// Length of the random base-36 suffix.
const RANDOM_SUFFIX_LEN: usize = 9;

const BASE36_ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Current wall-clock time in milliseconds since the Unix epoch.
fn unix_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Returns `len` random lowercase base-36 characters.
pub(crate) fn random_base36(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| BASE36_ALPHABET[rng.random_range(0..BASE36_ALPHABET.len())] as char)
        .collect()
}

/// Generates a new identifier with the given prefix.
pub fn generate_id(prefix: &str) -> String {
    format!(
        "{}_{}_{}",
        prefix,
        unix_millis(),
        random_base36(RANDOM_SUFFIX_LEN)
    )
}
