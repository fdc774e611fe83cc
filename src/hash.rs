//! BLAKE3 checksum utilities for installed-file integrity
//!
//! Checksums recorded in the lockfiles are compared against on-disk state to
//! detect files that were modified or removed behind the registry's back.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use blake3::Hasher;

use crate::error::{PromptRegError, Result};

/// Hash prefix for BLAKE3 checksums
pub const CHECKSUM_PREFIX: &str = "blake3:";

fn read_failed(path: &Path, err: &std::io::Error) -> PromptRegError {
    PromptRegError::FileReadFailed {
        path: path.display().to_string(),
        reason: err.to_string(),
    }
}

/// Calculate the BLAKE3 checksum of a file's contents
pub fn checksum_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| read_failed(path, &e))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| read_failed(path, &e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{}{}", CHECKSUM_PREFIX, hasher.finalize().to_hex()))
}

/// Calculate the BLAKE3 checksum of an in-memory buffer
pub fn checksum_bytes(bytes: &[u8]) -> String {
    format!("{}{}", CHECKSUM_PREFIX, blake3::hash(bytes).to_hex())
}

/// Verify a checksum matches the expected value
///
/// Tolerates a missing `blake3:` prefix on either side.
pub fn verify_checksum(expected: &str, actual: &str) -> bool {
    let normalize = |h: &str| h.strip_prefix(CHECKSUM_PREFIX).unwrap_or(h).to_string();
    normalize(expected) == normalize(actual)
}
