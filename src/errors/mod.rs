//! Errores de la aplicación (configuración, IO y capas inferiores).

pub mod app_error;

pub use app_error::AppError;
