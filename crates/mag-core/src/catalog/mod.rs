//! Catálogo persistido de ficheros colocados.
//!
//! Invariantes:
//! - `path` es único entre todos los registros.
//! - Nunca hay dos registros con el mismo par `(name, path)`; reinsertar un
//!   par existente se ignora en silencio.
//! - Cada `insert_files` es atómico: o entra el lote completo (menos los
//!   duplicados) o no entra nada.

mod memory;

pub use memory::InMemoryCatalog;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Fila a insertar (la identidad la asigna el catálogo).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFile {
    pub name: String,
    pub path: String,
    pub version: u32,
    pub hash: String,
    pub date: NaiveDateTime,
    pub software_version: String,
}

/// Registro almacenado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub name: String,
    pub path: String,
    pub version: u32,
    pub hash: String,
    pub date: NaiveDateTime,
    pub software_version: String,
}

impl FileRecord {
    pub fn same_identity(&self, file: &NewFile) -> bool {
        self.name == file.name && self.path == file.path
    }
}

pub trait Catalog {
    /// Inserta un lote en una única transacción. Devuelve cuántas filas
    /// nuevas entraron (los duplicados por `(name, path)` no cuentan).
    fn insert_files(&mut self, files: &[NewFile]) -> Result<usize, StoreError>;

    fn insert_file(&mut self, file: &NewFile) -> Result<usize, StoreError> {
        self.insert_files(std::slice::from_ref(file))
    }

    /// Todos los registros, en orden ascendente de id.
    fn list_files(&self) -> Result<Vec<FileRecord>, StoreError>;

    fn find_by_path(&self, path: &str) -> Result<Option<FileRecord>, StoreError> {
        Ok(self.list_files()?.into_iter().find(|r| r.path == path))
    }
}

impl<C: Catalog + ?Sized> Catalog for Box<C> {
    fn insert_files(&mut self, files: &[NewFile]) -> Result<usize, StoreError> {
        (**self).insert_files(files)
    }

    fn list_files(&self) -> Result<Vec<FileRecord>, StoreError> {
        (**self).list_files()
    }

    fn find_by_path(&self, path: &str) -> Result<Option<FileRecord>, StoreError> {
        (**self).find_by_path(path)
    }
}
