//! Hash de contenido de ficheros.

pub mod hash;

pub use hash::{bytes_hash, file_hash};
