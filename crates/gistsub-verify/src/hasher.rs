use sha2::{Digest, Sha256};

/// Lower-case hex SHA-256 of `data`, the form recorded in the status document.
pub fn sha256_hex(data: &[u8]) -> String { hex::encode(Sha256::digest(data)) }
