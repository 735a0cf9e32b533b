//! Implementación Postgres (Diesel) del `Catalog` de mag-core.
//!
//! - `insert_files`: una transacción read-write por lote; cada fila se
//!   comprueba por `(name, path)` antes de insertarse y los duplicados se
//!   omiten. Cualquier error revierte el lote completo.
//! - Errores transitorios (conflicto de serialización, pool) reintentan la
//!   transacción entera; cada intento es todo-o-nada.
//! - Lecturas ordenadas por `id` ascendente.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use log::{debug, error, warn};

use mag_core::{Catalog, FileRecord, NewFile, StoreError};

use crate::error::PersistenceError;
use crate::migrations::run_pending_migrations;
use crate::schema::files;

/// Alias de tipo para el pool r2d2 de conexiones Postgres.
pub type PgPool = r2d2::Pool<ConnectionManager<PgConnection>>;

pub type PgPooledConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

/// Proveedor abstracto de conexiones.
///
/// Permite inyectar un pool real o simular fallos de conexión en tests sin
/// acoplar a r2d2. Debe devolver una conexión válida o
/// `PersistenceError::TransientIo`.
pub trait ConnectionProvider: Send + Sync + 'static {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError>;
}

/// `ConnectionProvider` respaldado por un `PgPool`.
pub struct PoolProvider {
    pub pool: PgPool,
}

impl ConnectionProvider for PoolProvider {
    fn connection(&self) -> Result<PgPooledConnection, PersistenceError> {
        self.pool
            .get()
            .map_err(|e| PersistenceError::TransientIo(format!("pool error: {e}")))
    }
}

/// Fila de lectura de `files`.
#[derive(Queryable, Debug)]
pub struct FileRow {
    pub id: i32,
    pub name: String,
    pub path: String,
    pub version: i32,
    pub hash: String,
    pub date: NaiveDateTime,
    pub software_version: String,
}

impl TryFrom<FileRow> for FileRecord {
    type Error = PersistenceError;

    fn try_from(row: FileRow) -> Result<Self, Self::Error> {
        let version = u32::try_from(row.version).map_err(|_| {
                          PersistenceError::InvalidRecord(format!("negative version {} for id {}", row.version, row.id))
                      })?;
        Ok(FileRecord { id: i64::from(row.id),
                        name: row.name,
                        path: row.path,
                        version,
                        hash: row.hash,
                        date: row.date,
                        software_version: row.software_version })
    }
}

/// Fila para insertar en `files`.
#[derive(Insertable, Debug)]
#[diesel(table_name = files)]
pub struct NewFileRow<'a> {
    pub name: &'a str,
    pub path: &'a str,
    pub version: i32,
    pub hash: &'a str,
    pub date: NaiveDateTime,
    pub software_version: &'a str,
}

impl<'a> TryFrom<&'a NewFile> for NewFileRow<'a> {
    type Error = PersistenceError;

    fn try_from(file: &'a NewFile) -> Result<Self, Self::Error> {
        let version = i32::try_from(file.version).map_err(|_| {
                          PersistenceError::InvalidRecord(format!("version {} out of range", file.version))
                      })?;
        Ok(NewFileRow { name: &file.name,
                        path: &file.path,
                        version,
                        hash: &file.hash,
                        date: file.date,
                        software_version: &file.software_version })
    }
}

fn is_retryable(e: &PersistenceError) -> bool {
    match e {
        PersistenceError::SerializationConflict => true,
        PersistenceError::TransientIo(_) => true,
        PersistenceError::Unknown(msg) => {
            let m = msg.to_lowercase();
            m.contains("deadlock detected")
            || m.contains("could not serialize access due to concurrent update")
            || m.contains("connection closed")
            || m.contains("connection refused")
        }
        _ => false,
    }
}

/// Retry simple con backoff lineal pequeño (hasta 3 reintentos: 15ms, 30ms,
/// 45ms). Sólo repite la unidad de trabajo provista por `f`.
fn with_retry<F, T>(mut f: F) -> Result<T, PersistenceError>
    where F: FnMut() -> Result<T, PersistenceError>
{
    let mut attempts = 0;
    loop {
        match f() {
            Err(e) if is_retryable(&e) && attempts < 3 => {
                let delay_ms = 15 * ((attempts + 1) as u64);
                warn!("retryable error (attempt {}): {:?} -> sleeping {}ms", attempts + 1, e, delay_ms);
                std::thread::sleep(std::time::Duration::from_millis(delay_ms));
                attempts += 1;
            }
            r => return r,
        }
    }
}

/// Catálogo Postgres.
pub struct PgCatalog<P: ConnectionProvider> {
    pub provider: P,
}

impl<P: ConnectionProvider> PgCatalog<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn insert_batch(&self, rows: &[NewFileRow<'_>]) -> Result<usize, PersistenceError> {
        with_retry(|| {
            let mut conn = self.provider.connection()?;
            conn.build_transaction()
                .read_write()
                .run(|tx_conn| {
                    let mut inserted = 0;
                    for row in rows {
                        let existing: Option<i32> = files::table.filter(files::name.eq(row.name))
                                                                .filter(files::path.eq(row.path))
                                                                .select(files::id)
                                                                .first(tx_conn)
                                                                .optional()?;
                        if existing.is_some() {
                            debug!("insert_files:skip duplicate name={} path={}", row.name, row.path);
                            continue;
                        }
                        diesel::insert_into(files::table).values(row).execute(tx_conn)?;
                        inserted += 1;
                    }
                    Ok::<usize, PersistenceError>(inserted)
                })
        })
    }

    fn load_rows(&self, path: Option<&str>) -> Result<Vec<FileRecord>, PersistenceError> {
        let rows: Vec<FileRow> = with_retry(|| {
            let mut conn = self.provider.connection()?;
            let loaded = match path {
                Some(p) => files::table.filter(files::path.eq(p))
                                       .order(files::id.asc())
                                       .load(&mut conn),
                None => files::table.order(files::id.asc()).load(&mut conn),
            };
            loaded.map_err(PersistenceError::from)
        })?;
        rows.into_iter().map(FileRecord::try_from).collect()
    }
}

impl<P: ConnectionProvider> Catalog for PgCatalog<P> {
    fn insert_files(&mut self, files: &[NewFile]) -> Result<usize, StoreError> {
        debug!("insert_files:start count={}", files.len());
        let rows = files.iter().map(NewFileRow::try_from).collect::<Result<Vec<_>, _>>()?;
        let inserted = self.insert_batch(&rows).map_err(|e| {
                                                    error!("insert_files:rollback count={} err={e}", rows.len());
                                                    e
                                                })?;
        debug!("insert_files:done inserted={inserted} skipped={}", rows.len() - inserted);
        Ok(inserted)
    }

    fn list_files(&self) -> Result<Vec<FileRecord>, StoreError> {
        Ok(self.load_rows(None)?)
    }

    fn find_by_path(&self, path: &str) -> Result<Option<FileRecord>, StoreError> {
        Ok(self.load_rows(Some(path))?.into_iter().next())
    }
}

impl PgCatalog<PoolProvider> {
    /// Catálogo sobre un pool construido desde el entorno (ver `DbConfig`).
    pub fn from_env() -> Result<Self, PersistenceError> {
        Ok(Self::new(PoolProvider { pool: build_pool_from_env()? }))
    }
}

/// Construye un pool Postgres r2d2 a partir de URL y ejecuta las migraciones
/// pendientes con la primera conexión.
///
/// Si `min_size > max_size` se usa `min_size = max_size`; tamaños 0 se
/// elevan a 1.
pub fn build_pool(database_url: &str, min_size: u32, max_size: u32) -> Result<PgPool, PersistenceError> {
    let validated_min = min_size.max(1);
    let validated_max = max_size.max(1);
    if validated_min > validated_max {
        warn!("min_size > max_size ({validated_min} > {validated_max}), ajustando min=max");
    }
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder().min_idle(Some(validated_min.min(validated_max)))
                                    .max_size(validated_max)
                                    .build(manager)
                                    .map_err(|e| PersistenceError::TransientIo(format!("pool build: {e}")))?;
    {
        let mut conn = pool.get()
                           .map_err(|e| PersistenceError::TransientIo(format!("pool get for migrations: {e}")))?;
        run_pending_migrations(&mut conn)?;
    }
    Ok(pool)
}

/// Carga `.env`, lee `DbConfig` y construye un pool ya migrado.
pub fn build_pool_from_env() -> Result<PgPool, PersistenceError> {
    let cfg = crate::config::DbConfig::from_env()?;
    build_pool(&cfg.url, cfg.min_connections, cfg.max_connections)
}
