//! Cycling record service: lookups, the replace-then-insert upload flow,
//! and deletion.
//!
//! # Idempotent upload
//!
//! A client whose previous upload was interrupted resends the same
//! session. `upload` therefore deletes any record matching the natural
//! key (user_id, device_id, date_time) before inserting, all inside one
//! database transaction. The UNIQUE constraint on the natural key turns
//! a race between two identical uploads into an insert failure (406)
//! instead of a duplicate row.

use crate::{
    db::DbPool,
    error::AppError,
    models::record::{CyclingRecord, UploadRecordRequest},
    services::key_service,
};

/// Look up one record by its surrogate id.
///
/// Handlers use this for the ownership check: a missing record and a
/// foreign record both answer 403.
pub async fn find_one(pool: &DbPool, record_id: i32) -> Result<Option<CyclingRecord>, AppError> {
    let record = sqlx::query_as::<_, CyclingRecord>(
        "SELECT * FROM cycling_record WHERE record_id = $1",
    )
    .bind(record_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// All records owned by a user, ascending record id.
pub async fn find_by_user_id(pool: &DbPool, user_id: &str) -> Result<Vec<CyclingRecord>, AppError> {
    let records = sqlx::query_as::<_, CyclingRecord>(
        "SELECT * FROM cycling_record WHERE user_id = $1 ORDER BY record_id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Store one cycling record, replacing any previous upload of the same
/// session, and register its capability key.
///
/// # Process
///
/// 1. Start database transaction
/// 2. Delete any record with the same natural key (its GPS rows fall via
///    cascade; the old capability key is left dangling)
/// 3. Insert the new record
/// 4. Derive the capability key and register it in `key_to_record`
/// 5. Commit (or roll everything back on error)
///
/// # Returns
///
/// The registered capability key for the gps/upload follow-up.
pub async fn upload(pool: &DbPool, request: &UploadRecordRequest) -> Result<String, AppError> {
    let mut tx = pool.begin().await?;

    // Replace: a prior interrupted upload may have left the same session
    sqlx::query(
        "DELETE FROM cycling_record WHERE user_id = $1 AND device_id = $2 AND date_time = $3",
    )
    .bind(&request.user_id)
    .bind(&request.device_id)
    .bind(&request.date_time)
    .execute(&mut *tx)
    .await?;

    let record = sqlx::query_as::<_, CyclingRecord>(
        r#"
        INSERT INTO cycling_record (
            user_id, device_id, date_time, date, start_time, end_time,
            total_time, distance, ave_speed, max_speed
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(&request.user_id)
    .bind(&request.device_id)
    .bind(&request.date_time)
    .bind(&request.date)
    .bind(&request.start_time)
    .bind(&request.end_time)
    .bind(request.total_time)
    .bind(request.distance)
    .bind(request.ave_speed)
    .bind(request.max_speed)
    .fetch_one(&mut *tx)
    .await?;

    // The key only becomes a capability once this row exists
    let key = key_service::derive_key(&record.user_id, record.record_id);
    sqlx::query("INSERT INTO key_to_record (key, record_id, user_id) VALUES ($1, $2, $3)")
        .bind(&key)
        .bind(record.record_id)
        .bind(&record.user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(key)
}

/// Delete one record. Its GPS rows fall via ON DELETE CASCADE.
pub async fn delete(pool: &DbPool, record_id: i32) -> Result<(), AppError> {
    sqlx::query("DELETE FROM cycling_record WHERE record_id = $1")
        .bind(record_id)
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gps::GpsElement;
    use crate::services::{gps_service, user_service};

    fn upload_request(user_id: &str, device_id: &str, date_time: &str) -> UploadRecordRequest {
        UploadRecordRequest {
            user_id: user_id.into(),
            password: "p".into(),
            device_id: device_id.into(),
            date_time: date_time.into(),
            date: "2024-01-01".into(),
            start_time: "00:00".into(),
            end_time: "01:00".into(),
            total_time: 3600,
            distance: 10.0,
            ave_speed: 10.0,
            max_speed: 20.0,
        }
    }

    fn sample() -> GpsElement {
        serde_json::from_str(
            r#"{"latitude":35.0,"longitude":139.0,"altitude":0.0,"speed":0.0,"timestamp":"2024-01-01T00:00:01"}"#,
        )
        .unwrap()
    }

    #[sqlx::test]
    async fn upload_registers_the_derived_key(pool: sqlx::PgPool) {
        user_service::create(&pool, "alice", "p").await.unwrap();

        let key = upload(&pool, &upload_request("alice", "d1", "2024-01-01T00:00:00"))
            .await
            .unwrap();

        let records = find_by_user_id(&pool, "alice").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(key, key_service::derive_key("alice", records[0].record_id));

        let entry = key_service::find(&pool, &key).await.unwrap().unwrap();
        assert_eq!(entry.record_id, records[0].record_id);
        assert_eq!(entry.user_id, "alice");
    }

    #[sqlx::test]
    async fn reupload_replaces_the_record_and_drops_its_trace(pool: sqlx::PgPool) {
        user_service::create(&pool, "alice", "p").await.unwrap();
        let request = upload_request("alice", "d1", "2024-01-01T00:00:00");

        let first_key = upload(&pool, &request).await.unwrap();
        let old_id = key_service::find(&pool, &first_key)
            .await
            .unwrap()
            .unwrap()
            .record_id;
        gps_service::insert_batch(&pool, old_id, &[sample(), sample()])
            .await
            .unwrap();

        // Same natural key again, as after an interrupted upload
        let second_key = upload(&pool, &request).await.unwrap();
        assert_ne!(second_key, first_key);

        let records = find_by_user_id(&pool, "alice").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_ne!(records[0].record_id, old_id);
        assert_eq!(records[0].date_time, "2024-01-01T00:00:00");

        // The old trace is gone with the old record
        let gps_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gps_data")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(gps_rows, 0);

        // The new key is registered and bound to the surviving record
        let entry = key_service::find(&pool, &second_key).await.unwrap().unwrap();
        assert_eq!(entry.record_id, records[0].record_id);

        // The first key dangles: it still resolves, but inserting against
        // its dead record fails on the foreign key
        let stale = key_service::find(&pool, &first_key).await.unwrap().unwrap();
        let result = gps_service::insert_batch(&pool, stale.record_id, &[sample()]).await;
        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[sqlx::test]
    async fn different_sessions_coexist(pool: sqlx::PgPool) {
        user_service::create(&pool, "alice", "p").await.unwrap();

        upload(&pool, &upload_request("alice", "d1", "2024-01-01T00:00:00"))
            .await
            .unwrap();
        upload(&pool, &upload_request("alice", "d1", "2024-01-02T00:00:00"))
            .await
            .unwrap();
        upload(&pool, &upload_request("alice", "d2", "2024-01-01T00:00:00"))
            .await
            .unwrap();

        // Ascending record id
        let records = find_by_user_id(&pool, "alice").await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.windows(2).all(|w| w[0].record_id < w[1].record_id));
    }

    #[sqlx::test]
    async fn delete_cascades_to_gps_rows(pool: sqlx::PgPool) {
        user_service::create(&pool, "alice", "p").await.unwrap();
        let key = upload(&pool, &upload_request("alice", "d1", "2024-01-01T00:00:00"))
            .await
            .unwrap();
        let record_id = key_service::find(&pool, &key).await.unwrap().unwrap().record_id;
        gps_service::insert_batch(&pool, record_id, &[sample()])
            .await
            .unwrap();

        delete(&pool, record_id).await.unwrap();

        assert!(find_one(&pool, record_id).await.unwrap().is_none());
        assert!(
            gps_service::find_by_record_id(&pool, record_id)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
