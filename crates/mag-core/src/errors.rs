//! Errores del almacén de salida.
//!
//! Taxonomía:
//! - Entrada: fichero fuente ilegible o descriptor mal formado.
//! - Integridad: destino ausente o con hash distinto tras copiar.
//! - Catálogo: cualquier fallo del backend (el lote completo se revierte).
//! - IO: creación de directorios o copia fallida.
//!
//! Los conflictos de colocación (destino con contenido distinto) no son
//! errores: se resuelven incrementando la versión.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum DescriptorError {
    #[error("missing required descriptor field '{0}'")] MissingField(&'static str),
    #[error("descriptor field '{0}' must not be empty")] Empty(&'static str),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid descriptor: {0}")]
    Descriptor(#[from] DescriptorError),
    #[error("source file {path} is missing or unreadable: {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("destination {0} differs from source and its descriptor cannot be versioned")]
    Unversionable(PathBuf),
    #[error("integrity violation at {path}: {reason}")]
    Integrity { path: PathBuf, reason: String },
    #[error("catalog error: {0}")]
    Catalog(String),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Envuelve un error de un backend de catálogo externo.
    pub fn catalog(err: impl std::fmt::Display) -> Self {
        Self::Catalog(err.to_string())
    }

    /// `true` para errores de integridad (el artefacto fue eliminado).
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity { .. })
    }
}
