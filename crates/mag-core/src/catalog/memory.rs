use log::debug;

use super::{Catalog, FileRecord, NewFile};
use crate::errors::StoreError;

/// Catálogo en memoria con la misma semántica que el backend Postgres:
/// dedup por `(name, path)`, unicidad de `path` y lotes todo-o-nada.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    rows: Vec<FileRecord>,
    next_id: i64,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.rows
    }
}

impl Catalog for InMemoryCatalog {
    fn insert_files(&mut self, files: &[NewFile]) -> Result<usize, StoreError> {
        // Se trabaja sobre una copia; sólo se publica si todo el lote es válido.
        let mut staged = self.rows.clone();
        let mut next_id = self.next_id;
        let mut inserted = 0;
        for file in files {
            if staged.iter().any(|r| r.same_identity(file)) {
                debug!("insert_files:skip duplicate name={} path={}", file.name, file.path);
                continue;
            }
            if staged.iter().any(|r| r.path == file.path) {
                return Err(StoreError::Catalog(format!("unique violation: path {} already recorded", file.path)));
            }
            next_id += 1;
            staged.push(FileRecord { id: next_id,
                                     name: file.name.clone(),
                                     path: file.path.clone(),
                                     version: file.version,
                                     hash: file.hash.clone(),
                                     date: file.date,
                                     software_version: file.software_version.clone() });
            inserted += 1;
        }
        self.rows = staged;
        self.next_id = next_id;
        Ok(inserted)
    }

    fn list_files(&self) -> Result<Vec<FileRecord>, StoreError> {
        Ok(self.rows.clone())
    }
}
