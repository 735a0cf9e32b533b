//! Constantes compartidas por el almacén.

/// Versión del software que produce los registros del catálogo. Se persiste
/// en la columna `software_version` (máximo 16 caracteres en el esquema).
pub const SOFTWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subcarpeta por fecha usada por `DefaultDescriptor` (`YYYY/MM/DD`).
pub const FOLDER_DATE_FORMAT: &str = "%Y/%m/%d";

/// Fecha compacta embebida en el nombre de fichero (`YYYYMMDD`).
pub const FILE_DATE_FORMAT: &str = "%Y%m%d";
