//! Repository Implementation

use crate::{DatabaseConfig, MeasurementRecord, StorageError};
use chrono::{Local, SubsecRound};
use sensors::MeasurementTuple;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info};

const INSERT_MEASUREMENT: &str = r#"
    INSERT INTO mediciones (pm25_ugm3, ozono_ppb, intensidad_uv, temperatura, humedad_relativa)
    VALUES ($1, $2, $3, $4, $5)
"#;

const SELECT_MEASUREMENTS: &str = r#"
    SELECT id, fecha_hora, pm25_ugm3, ozono_ppb, intensidad_uv, temperatura, humedad_relativa
    FROM mediciones
    ORDER BY id
"#;

/// In-memory table
#[derive(Default)]
struct MemoryStore {
    records: Mutex<Vec<MeasurementRecord>>,
    offline: AtomicBool,
}

#[derive(Clone)]
enum Backend {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

/// Gateway to the `mediciones` table.
///
/// Cheap to clone; clones share the same pool or in-memory table.
#[derive(Clone)]
pub struct Repository {
    backend: Backend,
}

impl Repository {
    /// Create a PostgreSQL-backed repository.
    ///
    /// The pool connects lazily, so an unreachable database surfaces as a
    /// failure of the first call rather than here.
    pub fn connect(config: &DatabaseConfig) -> Result<Self, StorageError> {
        if config.in_memory {
            return Ok(Self::in_memory());
        }

        let options = config.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout())
            .connect_lazy_with(options);

        info!(
            "Created PostgreSQL repository (max {} connections)",
            config.max_connections
        );
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            backend: Backend::Postgres(pool),
        }
    }

    /// Create a new in-memory repository
    pub fn in_memory() -> Self {
        info!("Creating in-memory repository");
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::default())),
        }
    }

    /// Insert one measurement, reporting success as a boolean.
    ///
    /// Failures are logged here and never propagate to the caller.
    pub async fn insert(&self, measurement: &MeasurementTuple) -> bool {
        match self.insert_measurement(measurement).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to insert measurement {:?}: {}", measurement, e);
                false
            }
        }
    }

    /// Insert one measurement.
    ///
    /// Values are bound positionally in the tuple's persistence order.
    pub async fn insert_measurement(
        &self,
        measurement: &MeasurementTuple,
    ) -> Result<(), StorageError> {
        let values = measurement.as_array().map(|v| v as f32);

        match &self.backend {
            Backend::Postgres(pool) => {
                let mut tx = pool.begin().await?;

                let mut query = sqlx::query(INSERT_MEASUREMENT);
                for value in values {
                    query = query.bind(value);
                }
                query.execute(&mut *tx).await?;

                tx.commit().await?;
            }
            Backend::Memory(store) => {
                store.check_online()?;
                let mut records = store.lock()?;
                let id = records.len() as i32 + 1;
                records.push(MeasurementRecord {
                    id,
                    captured_at: Some(Local::now().naive_local().trunc_subsecs(6)),
                    pm25: Some(values[0]),
                    ozone: Some(values[1]),
                    uv_intensity: Some(values[2]),
                    temperature: Some(values[3]),
                    humidity: Some(values[4]),
                });
            }
        }

        debug!("Inserted measurement {:?}", values);
        Ok(())
    }

    /// Fetch every stored measurement, ordered by id
    pub async fn fetch_all(&self) -> Result<Vec<MeasurementRecord>, StorageError> {
        let records = match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query_as::<_, MeasurementRecord>(SELECT_MEASUREMENTS)
                    .fetch_all(pool)
                    .await?
            }
            Backend::Memory(store) => {
                store.check_online()?;
                store.lock()?.clone()
            }
        };

        debug!("Fetched {} measurements", records.len());
        Ok(records)
    }

    /// Number of stored measurements
    pub async fn record_count(&self) -> Result<i64, StorageError> {
        match &self.backend {
            Backend::Postgres(pool) => {
                let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM mediciones")
                    .fetch_one(pool)
                    .await?;
                Ok(count)
            }
            Backend::Memory(store) => {
                store.check_online()?;
                Ok(store.lock()?.len() as i64)
            }
        }
    }

    /// Check that the store is reachable
    pub async fn ping(&self) -> Result<(), StorageError> {
        match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            Backend::Memory(store) => store.check_online(),
        }
    }

    /// Make the in-memory store reject every call (for testing).
    ///
    /// Has no effect on a PostgreSQL repository.
    pub fn set_offline(&self, offline: bool) {
        if let Backend::Memory(store) = &self.backend {
            store.offline.store(offline, Ordering::SeqCst);
        }
    }

    /// Release pooled connections
    pub async fn close(&self) {
        if let Backend::Postgres(pool) = &self.backend {
            info!("Closing database pool");
            pool.close().await;
        }
    }
}

impl MemoryStore {
    fn check_online(&self) -> Result<(), StorageError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable);
        }
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<MeasurementRecord>>, StorageError> {
        self.records
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }
}
