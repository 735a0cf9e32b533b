//! Descriptores de metadatos: cómo nombrar y ubicar un artefacto (sin IO).
//!
//! El contrato mínimo son dos métodos (`folder_structure`, `file_name`). La
//! versión y la fecha tienen implementaciones por defecto para que
//! descriptores con nombre fijo no tengan que modelarlas.

mod default;
mod fixed;

pub use default::{DefaultDescriptor, DefaultDescriptorBuilder};
pub use fixed::FixedDescriptor;

use chrono::NaiveDateTime;

/// Política de nombre y ubicación de un artefacto.
///
/// `file_name` debe ser función pura de los campos actuales: el store muta la
/// versión y vuelve a renderizar el nombre en cada intento.
pub trait MetadataDescriptor {
    /// Subcarpeta relativa a la raíz del store (puede ser vacía).
    fn folder_structure(&self) -> String;
    /// Nombre final del fichero.
    fn file_name(&self) -> String;

    fn version(&self) -> u32 {
        0
    }
    /// No-op por defecto: el descriptor no admite versionado.
    fn set_version(&mut self, _version: u32) {}
    /// Fecha asociada al artefacto, si el descriptor la conoce.
    fn date(&self) -> Option<NaiveDateTime> {
        None
    }
}
