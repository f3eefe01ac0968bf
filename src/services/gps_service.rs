//! GPS trace service: bulk sample insertion and ordered retrieval.

use crate::{
    db::DbPool,
    error::AppError,
    models::gps::{GpsData, GpsElement},
};
use serde_json::Value;

/// Insert a batch of GPS samples for one record, all-or-nothing.
///
/// Runs inside one database transaction: any rejected sample (including
/// an FK failure because the record was deleted or replaced mid-flight)
/// rolls back the whole batch and surfaces as 406. Repeated batches for
/// the same record append; traces are temporally meaningful, so insertion
/// order is preserved by the serial primary key.
pub async fn insert_batch(
    pool: &DbPool,
    record_id: i32,
    elements: &[GpsElement],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    for element in elements {
        sqlx::query(
            r#"
            INSERT INTO gps_data (record_id, latitude, longitude, altitude, speed, timestamp, extra)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record_id)
        .bind(element.latitude)
        .bind(element.longitude)
        .bind(element.altitude)
        .bind(element.speed)
        .bind(&element.timestamp)
        .bind(Value::Object(element.extra.clone()))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    Ok(())
}

/// The full trace for one record, in insertion order.
pub async fn find_by_record_id(pool: &DbPool, record_id: i32) -> Result<Vec<GpsData>, AppError> {
    let samples = sqlx::query_as::<_, GpsData>(
        "SELECT * FROM gps_data WHERE record_id = $1 ORDER BY id ASC",
    )
    .bind(record_id)
    .fetch_all(pool)
    .await?;

    Ok(samples)
}
