//! Decorador que indexa en el catálogo cada fichero colocado.
//!
//! `IndexRecorder` envuelve un `OutputStore` y un `Catalog`:
//! 1. Delega la colocación en el store interno.
//! 2. Recalcula el hash de fuente y destino de forma independiente; si la
//!    fuente ya no se puede leer o el destino falta o difiere, borra el
//!    destino y devuelve `Integrity`.
//! 3. Construye el `NewFile` (ruta y nombre deben ser UTF-8) y lo inserta.
//! 4. Si el registro no se puede construir o la inserción falla, borra el
//!    fichero copiado en esta llamada.
//!
//! Filesystem y catálogo nunca divergen: o ambos reflejan el artefacto o
//! ninguno.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, error, info, warn};

use crate::catalog::{Catalog, NewFile};
use crate::constants::SOFTWARE_VERSION;
use crate::descriptor::MetadataDescriptor;
use crate::errors::StoreError;
use crate::hashing::file_hash;
use crate::store::{OutputStore, Placement};

pub struct IndexRecorder<S: OutputStore, C: Catalog> {
    inner: S,
    catalog: C,
}

impl<S: OutputStore, C: Catalog> IndexRecorder<S, C> {
    pub fn new(inner: S, catalog: C) -> Self {
        Self { inner, catalog }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    pub fn into_parts(self) -> (S, C) {
        (self.inner, self.catalog)
    }

    /// Coloca `source` y registra el resultado en el catálogo.
    pub fn record_and_place(&mut self,
                            source: &Path,
                            descriptor: &mut dyn MetadataDescriptor)
                            -> Result<Placement, StoreError> {
        let placement = self.inner.place(source, descriptor)?;
        let hash = verify_placement(source, &placement.path)?;

        let record = match new_file_for(&placement.path, descriptor, hash) {
            Ok(record) => record,
            Err(e) => {
                error!("record:unindexable path={} err={e}", placement.path.display());
                discard(&placement);
                return Err(e);
            }
        };

        info!("Inserting {} into database.", placement.path.display());
        if let Err(e) = self.catalog.insert_file(&record) {
            error!("Error inserting {} into database: {e}", placement.path.display());
            discard(&placement);
            return Err(e);
        }
        debug!("record:done path={} version={}", record.path, record.version);
        Ok(placement)
    }
}

impl<S: OutputStore, C: Catalog> OutputStore for IndexRecorder<S, C> {
    fn place(&mut self, source: &Path, descriptor: &mut dyn MetadataDescriptor) -> Result<Placement, StoreError> {
        self.record_and_place(source, descriptor)
    }
}

fn new_file_for(path: &Path, descriptor: &dyn MetadataDescriptor, hash: String) -> Result<NewFile, StoreError> {
    Ok(NewFile { name: file_name_of(path)?,
                 path: absolute_posix(path)?,
                 version: descriptor.version(),
                 hash,
                 date: descriptor.date().unwrap_or_else(|| Utc::now().naive_utc()),
                 software_version: SOFTWARE_VERSION.to_string() })
}

/// Borra el artefacto sólo si lo copió esta llamada.
fn discard(placement: &Placement) {
    if placement.was_copied() {
        remove_artifact(&placement.path);
    } else {
        warn!("record:keep pre-existing artifact path={}", placement.path.display());
    }
}

/// Comprueba que `source` sigue legible, que `destination` existe y que ambos
/// hashes coinciden. Devuelve el hash verificado; ante cualquier fallo borra
/// el destino.
fn verify_placement(source: &Path, destination: &Path) -> Result<String, StoreError> {
    let checked = file_hash(source).map_err(|e| format!("source unreadable after placement: {e}"))
                                   .and_then(|source_hash| {
                                       if !destination.exists() {
                                           return Err("destination does not exist".to_string());
                                       }
                                       match file_hash(destination) {
                                           Ok(h) if h == source_hash => Ok(source_hash),
                                           Ok(h) => Err(format!("hash mismatch (source {source_hash}, destination {h})")),
                                           Err(e) => Err(format!("destination unreadable: {e}")),
                                       }
                                   });
    checked.map_err(|reason| {
               error!("File {} does not exist or is not the same as source {}.",
                      destination.display(),
                      source.display());
               remove_artifact(destination);
               StoreError::Integrity { path: destination.to_path_buf(),
                                       reason }
           })
}

fn remove_artifact(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("record:removed artifact path={}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("record:remove failed path={} err={e}", path.display()),
    }
}

fn file_name_of(path: &Path) -> Result<String, StoreError> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| StoreError::Integrity { path: path.to_path_buf(),
                                               reason: "file name is not valid UTF-8".into() })
}

fn absolute_posix(path: &Path) -> Result<String, StoreError> {
    let absolute: PathBuf = std::path::absolute(path).map_err(|e| StoreError::io(path, e))?;
    absolute.to_str()
            .map(|p| p.replace('\\', "/"))
            .ok_or_else(|| StoreError::Integrity { path: path.to_path_buf(),
                                                   reason: "path is not valid UTF-8".into() })
}
