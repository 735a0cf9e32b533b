//! mag-persistence
//!
//! Catálogo de ficheros sobre Postgres (Diesel + r2d2) con la misma semántica
//! que `mag_core::InMemoryCatalog`.
//!
//! Módulos:
//! - `pg`: `PgCatalog`, pool y proveedor de conexiones.
//! - `migrations`: runner embebido de migraciones Diesel.
//! - `config`: carga de configuración desde .env / entorno.
//! - `schema`: tabla `files` declarada para compilar queries.

pub mod config;
pub mod error;
pub mod migrations;
pub mod pg;
pub mod schema;

pub use config::{init_dotenv, DbConfig};
pub use error::PersistenceError;
pub use pg::{build_pool, build_pool_from_env, ConnectionProvider, PgCatalog, PgPool, PoolProvider};
