//! Hash helpers for byte-identical output checks.

use std::io;
use std::path::Path;

/// Compute the BLAKE3 hash of data as a hex string.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Hash a file's contents.
pub fn hash_file(path: &Path) -> io::Result<String> {
    Ok(compute_hash(&std::fs::read(path)?))
}

/// True when every hash in the slice is the same (vacuously true for
/// fewer than two hashes).
pub fn verify_hash_determinism(hashes: &[String]) -> bool {
    hashes.windows(2).all(|pair| pair[0] == pair[1])
}
