//! Composición del almacén de salida para los comandos de la aplicación.
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use log::{debug, info};
use mag_core::{FixedDescriptor, FsOutputStore, IndexRecorder, OutputStore};
use mag_persistence::PgCatalog;
use serde::Serialize;

use crate::config::Destination;
use crate::errors::AppError;

/// Resumen imprimible de una colocación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementReport {
    pub path: PathBuf,
    pub version: u32,
}

/// Store para un destino: filesystem plano o decorado con el catálogo
/// Postgres cuando `export_to_database` está activo.
pub fn output_store_for(destination: &Destination) -> Result<Box<dyn OutputStore>, AppError> {
    let store = FsOutputStore::new(&destination.folder);
    if destination.export_to_database {
        debug!("pipeline:store with catalog root={}", destination.folder.display());
        let catalog = PgCatalog::from_env()?;
        return Ok(Box::new(IndexRecorder::new(store, catalog)));
    }
    debug!("pipeline:store root={}", destination.folder.display());
    Ok(Box::new(store))
}

/// Copia `file` a `destination.folder/destination.filename`.
///
/// Sin `store` se usa un `FsOutputStore` sobre la carpeta destino.
pub fn copy_file_to_destination(file: &Path,
                                destination: &Destination,
                                store: Option<&mut dyn OutputStore>)
                                -> Result<PathBuf, AppError> {
    if destination.filename.is_empty() {
        return Err(AppError::Config("destination.filename no definido".into()));
    }
    let mut fallback;
    let store: &mut dyn OutputStore = match store {
        Some(s) => s,
        None => {
            fallback = FsOutputStore::new(&destination.folder);
            &mut fallback
        }
    };
    let mut descriptor = FixedDescriptor::at_root(destination.filename.clone());
    let placement = store.place(file, &mut descriptor)?;
    info!("Copied {} to {}.", file.display(), placement.path.display());
    Ok(placement.path)
}

/// Acepta `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` y `YYYY-MM-DD HH:MM:SS`.
pub fn parse_date(raw: &str) -> Result<NaiveDateTime, AppError> {
    let raw = raw.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(NaiveTime::MIN))
                                              .map_err(|e| AppError::InvalidDate(format!("{raw}: {e}")))
}
