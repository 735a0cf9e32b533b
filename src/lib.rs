//! imap-mag
//!
//! Capa de aplicación sobre `mag-core` y `mag-persistence`:
//! - `config`: configuración YAML (carpeta de trabajo y destino).
//! - `logging`: inicialización del logger con verbosidad explícita.
//! - `pipeline`: construcción del store (con o sin catálogo) y utilidades de
//!   copia a destino.
//! - `errors`: `AppError`.

pub mod config;
pub mod errors;
pub mod logging;
pub mod pipeline;

pub use config::{AppConfig, Destination};
pub use errors::AppError;
pub use logging::LogConfig;
pub use pipeline::{copy_file_to_destination, output_store_for, parse_date, PlacementReport};
