use super::MetadataDescriptor;

/// Descriptor con carpeta y nombre fijos (sin versionado ni fecha).
///
/// Se usa para copiar un resultado al nombre configurado en destino.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDescriptor {
    pub folder: String,
    pub file_name: String,
}

impl FixedDescriptor {
    pub fn new(folder: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self { folder: folder.into(),
               file_name: file_name.into() }
    }

    /// Fichero directamente bajo la raíz del store.
    pub fn at_root(file_name: impl Into<String>) -> Self {
        Self::new("", file_name)
    }
}

impl MetadataDescriptor for FixedDescriptor {
    fn folder_structure(&self) -> String {
        self.folder.clone()
    }

    fn file_name(&self) -> String {
        self.file_name.clone()
    }
}
