//! Inicialización del logger (`env_logger` sobre la fachada `log`).
//!
//! La verbosidad llega como valor explícito (`LogConfig`); `RUST_LOG`, si está
//! definido, tiene prioridad sobre el nivel por defecto.
use log::LevelFilter;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogConfig {
    pub verbose: bool,
}

impl LogConfig {
    pub fn level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

pub fn init(config: &LogConfig) -> Result<(), AppError> {
    env_logger::Builder::new().filter_level(config.level())
                              .parse_default_env()
                              .format_timestamp_secs()
                              .try_init()
                              .map_err(|e| AppError::Config(format!("logger ya inicializado: {e}")))
}
