//! Hash helpers: SHA-256 en hex minúsculas (64 caracteres).

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Hashea el contenido de un fichero en streaming.
pub fn file_hash(path: &Path) -> io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// Hashea un buffer en memoria.
pub fn bytes_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn file_and_bytes_hash_agree() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(b"some content").unwrap();
        let h = file_hash(f.path()).unwrap();
        assert_eq!(h, bytes_hash(b"some content"));
        assert_eq!(h.len(), 64);
    }

    #[test]
    fn empty_input_has_known_digest() {
        assert_eq!(bytes_hash(b""), "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855");
    }
}
