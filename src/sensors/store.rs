use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use thiserror::Error;

use crate::db::models::{NewReading, SensorReading};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Window over the chronologically ordered readings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    /// `None` returns every row after `offset`.
    pub limit: Option<u32>,
    pub offset: u32,
}

impl Page {
    pub fn all() -> Self {
        Self::default()
    }
}

/// Persistence seam used by the HTTP handlers.
///
/// Each call is a single atomic statement; implementations never retry.
#[async_trait]
pub trait ReadingStore: Send + Sync + 'static {
    /// Append one reading stamped with `created_at` and return the stored row.
    async fn insert(
        &self,
        reading: NewReading,
        created_at: DateTime<Utc>,
    ) -> Result<SensorReading, StoreError>;

    /// Readings ordered by `created_at` ascending; equal timestamps come back
    /// in insertion order.
    async fn list(&self, page: Page) -> Result<Vec<SensorReading>, StoreError>;
}

pub type SharedStore = Arc<dyn ReadingStore>;

// ---------------------------------------------------------------------------
// Postgres
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct PgReadingStore {
    pool: PgPool,
}

impl PgReadingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    async fn insert(
        &self,
        reading: NewReading,
        created_at: DateTime<Utc>,
    ) -> Result<SensorReading, StoreError> {
        let row = sqlx::query_as::<_, SensorReading>(
            r#"
            INSERT INTO sensors
                (temperature, humidity, water_sensor, sensor_pir, sensor_api, servo, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, temperature, humidity, water_sensor,
                      sensor_pir, sensor_api, servo, created_at
            "#,
        )
        .bind(reading.temperature)
        .bind(reading.humidity)
        .bind(reading.water_sensor)
        .bind(reading.sensor_pir)
        .bind(reading.sensor_api)
        .bind(reading.servo)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list(&self, page: Page) -> Result<Vec<SensorReading>, StoreError> {
        let rows = sqlx::query_as::<_, SensorReading>(
            r#"
            SELECT id, temperature, humidity, water_sensor,
                   sensor_pir, sensor_api, servo, created_at
            FROM sensors
            ORDER BY created_at ASC, seq ASC
            LIMIT $1
            OFFSET $2
            "#,
        )
        .bind(page.limit.map(i64::from))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Tests (sqlx::test provisions a database from DATABASE_URL)
// ---------------------------------------------------------------------------
