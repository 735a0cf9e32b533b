//! Carga de configuración de conexión desde variables de entorno.
//! Usa `DATABASE_URL` (o `SQLALCHEMY_URL` por compatibilidad) y parámetros
//! opcionales de pool.

use std::env;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

use crate::error::PersistenceError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

pub const URL_VARS: [&str; 2] = ["DATABASE_URL", "SQLALCHEMY_URL"];

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub url: String,
    pub min_connections: u32,
    pub max_connections: u32,
}

impl DbConfig {
    pub fn from_env() -> Result<Self, PersistenceError> {
        Lazy::force(&DOTENV_LOADED);
        let url = URL_VARS.iter()
                          .find_map(|k| env::var(k).ok().filter(|v| !v.is_empty()))
                          .ok_or_else(|| PersistenceError::Config("DATABASE_URL no definido".into()))?;
        let min_connections = env::var("DATABASE_MIN_CONNECTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(1);
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS").ok().and_then(|v| v.parse().ok()).unwrap_or(4);
        Ok(Self { url, min_connections, max_connections })
    }

    /// `true` si hay alguna URL de base de datos en el entorno.
    pub fn is_configured() -> bool {
        Lazy::force(&DOTENV_LOADED);
        URL_VARS.iter().any(|k| env::var(k).map(|v| !v.is_empty()).unwrap_or(false))
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
