//! `OutputStore` sobre el filesystem local.
//!
//! Flujo de `place`:
//! 1. Validar que la fuente existe y es un fichero regular.
//! 2. Crear la raíz y la carpeta padre del destino si no existen.
//! 3. Destino libre: copiar preservando tiempos de acceso/modificación.
//! 4. Destino ocupado con el mismo hash: no-op (`AlreadyPresent`).
//! 5. Destino ocupado con otro hash: subir versión hasta encontrar un hueco
//!    libre o una versión previa con el mismo contenido. Si falla, el
//!    descriptor recupera la versión con la que llegó.
//!
//! No hay locking: dos procesos escribiendo en la misma raíz pueden calcular
//! la misma "siguiente versión libre".

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;
use log::{debug, info};

use super::{OutputStore, Placement};
use crate::descriptor::MetadataDescriptor;
use crate::errors::StoreError;
use crate::hashing::file_hash;
use crate::paths::assemble;

#[derive(Debug, Clone)]
pub struct FsOutputStore {
    root: PathBuf,
}

impl FsOutputStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
        if !dir.exists() {
            debug!("ensure_dir:create dir={}", dir.display());
            fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;
        }
        Ok(())
    }

    fn ensure_parent(destination: &Path) -> Result<(), StoreError> {
        match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Self::ensure_dir(parent),
            _ => Ok(()),
        }
    }

    fn copy_into(source: &Path, source_meta: &Metadata, destination: &Path) -> Result<(), StoreError> {
        info!("place:copy source={} destination={}", source.display(), destination.display());
        fs::copy(source, destination).map_err(|e| StoreError::io(destination, e))?;
        let atime = FileTime::from_last_access_time(source_meta);
        let mtime = FileTime::from_last_modification_time(source_meta);
        filetime::set_file_times(destination, atime, mtime).map_err(|e| StoreError::io(destination, e))?;
        Ok(())
    }

    /// Sube la versión del descriptor hasta dar con una ruta libre o con una
    /// versión existente idéntica a la fuente (`Some(placement)` en ese caso).
    fn resolve_version(&self,
                       descriptor: &mut dyn MetadataDescriptor,
                       mut destination: PathBuf,
                       source_hash: &str)
                       -> Result<(PathBuf, Option<Placement>), StoreError> {
        loop {
            let next = descriptor.version()
                                 .checked_add(1)
                                 .ok_or_else(|| StoreError::Unversionable(destination.clone()))?;
            descriptor.set_version(next);
            let candidate = assemble(&self.root, descriptor);
            if descriptor.version() != next || candidate == destination {
                return Err(StoreError::Unversionable(destination));
            }
            if !candidate.exists() {
                debug!("resolve_version:free version={next} destination={}", candidate.display());
                return Ok((candidate, None));
            }
            let candidate_hash = file_hash(&candidate).map_err(|e| StoreError::io(&candidate, e))?;
            if candidate_hash == source_hash {
                info!("File {} already exists and is the same.", candidate.display());
                return Ok((candidate.clone(), Some(Placement::already_present(candidate))));
            }
            info!("File {} already exists and is different. Increasing version.",
                  candidate.display());
            destination = candidate;
        }
    }

    fn place_versioned(&self,
                       source: &Path,
                       source_meta: &Metadata,
                       descriptor: &mut dyn MetadataDescriptor,
                       destination: PathBuf,
                       source_hash: &str)
                       -> Result<Placement, StoreError> {
        let (destination, existing) = self.resolve_version(descriptor, destination, source_hash)?;
        if let Some(placement) = existing {
            return Ok(placement);
        }
        Self::ensure_parent(&destination)?;
        Self::copy_into(source, source_meta, &destination)?;
        debug!("place:done destination={} version={}", destination.display(), descriptor.version());
        Ok(Placement::copied(destination))
    }
}

impl OutputStore for FsOutputStore {
    fn place(&mut self, source: &Path, descriptor: &mut dyn MetadataDescriptor) -> Result<Placement, StoreError> {
        debug!("place:start source={} root={}", source.display(), self.root.display());
        let source_meta = fs::metadata(source).map_err(|e| StoreError::SourceUnreadable { path: source.to_path_buf(),
                                                                                           source: e })?;
        if !source_meta.is_file() {
            return Err(StoreError::SourceUnreadable { path: source.to_path_buf(),
                                                      source: io::Error::new(io::ErrorKind::InvalidInput,
                                                                             "not a regular file") });
        }

        Self::ensure_dir(&self.root)?;
        let destination = assemble(&self.root, descriptor);
        Self::ensure_parent(&destination)?;

        if !destination.exists() {
            Self::copy_into(source, &source_meta, &destination)?;
            debug!("place:done destination={} version={}", destination.display(), descriptor.version());
            return Ok(Placement::copied(destination));
        }

        let source_hash = file_hash(source).map_err(|e| StoreError::SourceUnreadable { path: source.to_path_buf(),
                                                                                        source: e })?;
        let existing_hash = file_hash(&destination).map_err(|e| StoreError::io(&destination, e))?;
        if existing_hash == source_hash {
            info!("File {} already exists and is the same.", destination.display());
            return Ok(Placement::already_present(destination));
        }

        let start_version = descriptor.version();
        self.place_versioned(source, &source_meta, descriptor, destination, &source_hash)
            .inspect_err(|_| descriptor.set_version(start_version))
    }
}
