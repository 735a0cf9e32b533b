//! Almacén de salida: colocación, deduplicación por hash y versionado.

mod fs;

pub use fs::FsOutputStore;

use std::path::{Path, PathBuf};

use crate::descriptor::{DefaultDescriptor, MetadataDescriptor};
use crate::errors::StoreError;

/// Qué hizo la colocación con el filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// Se escribió un fichero nuevo en `path`.
    Copied,
    /// `path` ya contenía exactamente los mismos bytes; no se tocó nada.
    AlreadyPresent,
}

/// Resultado de `OutputStore::place`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub path: PathBuf,
    pub outcome: PlacementOutcome,
}

impl Placement {
    pub fn copied(path: PathBuf) -> Self {
        Self { path, outcome: PlacementOutcome::Copied }
    }

    pub fn already_present(path: PathBuf) -> Self {
        Self { path, outcome: PlacementOutcome::AlreadyPresent }
    }

    pub fn was_copied(&self) -> bool {
        self.outcome == PlacementOutcome::Copied
    }
}

/// Coloca ficheros fuente según un descriptor.
///
/// Contrato:
/// - El descriptor se muta in situ si hace falta subir la versión; tras
///   devolver `Ok`, `descriptor.file_name()` coincide con el fichero escrito.
/// - Idempotente para contenido idéntico y monótono para contenido distinto.
pub trait OutputStore {
    fn place(&mut self, source: &Path, descriptor: &mut dyn MetadataDescriptor) -> Result<Placement, StoreError>;

    /// Atajo para el descriptor por defecto: devuelve ruta y descriptor resuelto.
    fn add_default_file(&mut self,
                        source: &Path,
                        mut descriptor: DefaultDescriptor)
                        -> Result<(PathBuf, DefaultDescriptor), StoreError> {
        let placement = self.place(source, &mut descriptor)?;
        Ok((placement.path, descriptor))
    }
}

impl<S: OutputStore + ?Sized> OutputStore for Box<S> {
    fn place(&mut self, source: &Path, descriptor: &mut dyn MetadataDescriptor) -> Result<Placement, StoreError> {
        (**self).place(source, descriptor)
    }
}
