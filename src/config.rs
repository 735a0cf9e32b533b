//! Configuración de la aplicación.
//!
//! Se carga desde un YAML con claves en kebab-case:
//!
//! ```yaml
//! work-folder: .work
//! destination:
//!   folder: output
//!   filename: result.cdf
//!   export-to-database: false
//! ```
//!
//! La conexión a base de datos no vive aquí: la resuelve
//! `mag_persistence::DbConfig` desde el entorno.
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::errors::AppError;

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AppConfig {
    /// Carpeta de trabajo para ficheros intermedios.
    #[serde(default = "default_work_folder")]
    pub work_folder: PathBuf,
    pub destination: Destination,
}

/// Dónde y cómo se publican los resultados.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Destination {
    /// Raíz del almacén de salida.
    #[serde(default = "default_folder")]
    pub folder: PathBuf,
    /// Nombre fijo usado por `copy`.
    #[serde(default)]
    pub filename: String,
    /// Si es `true`, cada fichero colocado se indexa en el catálogo.
    #[serde(default)]
    pub export_to_database: bool,
}

fn default_work_folder() -> PathBuf {
    PathBuf::from(".work")
}

fn default_folder() -> PathBuf {
    PathBuf::from(".")
}

impl AppConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self, AppError> {
        serde_yaml::from_str(raw).map_err(|e| AppError::Config(format!("YAML inválido: {e}")))
    }

    /// Lee y valida el fichero de configuración y crea la carpeta de trabajo
    /// si no existe.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        if path.is_dir() {
            return Err(AppError::Config(format!("{} es un directorio, se necesita un fichero yml", path.display())));
        }
        if !path.exists() {
            return Err(AppError::Config(format!("la configuración {} no existe", path.display())));
        }
        let raw = fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&raw)?;
        debug!("config:loaded path={} config={:?}", path.display(), config);
        if !config.work_folder.exists() {
            debug!("config:create work_folder={}", config.work_folder.display());
            fs::create_dir_all(&config.work_folder)?;
        }
        Ok(config)
    }
}
