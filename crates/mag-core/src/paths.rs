//! Ensamblado de rutas destino: `root / folder_structure / file_name`.

use std::path::{Path, PathBuf};

use crate::descriptor::MetadataDescriptor;

/// Ruta destino de un descriptor bajo `root`. Función pura, sin IO.
///
/// Una `folder_structure` vacía coloca el artefacto directamente bajo `root`.
pub fn assemble(root: &Path, descriptor: &dyn MetadataDescriptor) -> PathBuf {
    let folder = descriptor.folder_structure();
    let mut path = root.to_path_buf();
    if !folder.is_empty() {
        path.push(folder);
    }
    path.push(descriptor.file_name());
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DefaultDescriptor, FixedDescriptor};
    use chrono::NaiveDate;

    #[test]
    fn default_descriptor_lands_under_date_folders() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let d = DefaultDescriptor::builder().descriptor("pwr").date(date).extension("txt").build().unwrap();
        assert_eq!(assemble(Path::new("output"), &d),
                   PathBuf::from("output/2025/05/02/pwr_20250502_v000.txt"));
    }

    #[test]
    fn empty_folder_structure_stays_at_root() {
        let d = FixedDescriptor::at_root("result.cdf");
        assert_eq!(assemble(Path::new("out"), &d), PathBuf::from("out/result.cdf"));
    }
}
