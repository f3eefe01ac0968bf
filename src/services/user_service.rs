//! User account service: existence checks, creation, authentication, and
//! full account deletion.
//!
//! Passwords travel in request bodies as plaintext (that is the wire
//! contract) but are stored salted and hashed. The stored form is
//! `hex(salt)$hex(sha256(salt ∥ password))` with a random 16-byte salt,
//! so equal passwords do not produce equal rows.

use crate::{db::DbPool, error::AppError, models::user::User};
use sha2::{Digest, Sha256};

/// Hash a password with a fresh random salt into the stored form.
fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    format!("{}${}", hex::encode(salt), hex::encode(hasher.finalize()))
}

/// Verify a plaintext password against the stored `salt$digest` form.
fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, digest_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };

    let mut hasher = Sha256::new();
    hasher.update(&salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize()) == digest_hex
}

/// True if an account with this user id already exists.
pub async fn is_existing(pool: &DbPool, user_id: &str) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE user_id = $1)")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok(exists)
}

/// Create an account, hashing the password at rest.
///
/// The caller checks for existence first; a race on the primary key
/// surfaces as a database error (406) rather than a second 409.
pub async fn create(pool: &DbPool, user_id: &str, password: &str) -> Result<(), AppError> {
    sqlx::query("INSERT INTO users (user_id, password) VALUES ($1, $2)")
        .bind(user_id)
        .bind(hash_password(password))
        .execute(pool)
        .await?;

    Ok(())
}

/// Check credentials: true iff the user exists and the password matches.
///
/// This is the gatekeeper for every endpoint except account/create and
/// gps/upload (which authenticates by capability key instead).
pub async fn authenticate(pool: &DbPool, user_id: &str, password: &str) -> Result<bool, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT user_id, password FROM users WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(match user {
        Some(user) => verify_password(password, &user.password),
        None => false,
    })
}

/// Delete an account and everything it owns.
///
/// Runs as one database transaction: the user's cycling records go first
/// (their GPS rows fall via ON DELETE CASCADE), then the user row. Either
/// the whole cascade lands or none of it does.
pub async fn delete_account(pool: &DbPool, user_id: &str) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM cycling_record WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("DELETE FROM users WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let stored = hash_password("p");
        assert!(verify_password("p", &stored));
        assert!(!verify_password("wrong", &stored));
    }

    #[test]
    fn stored_form_is_not_the_plaintext() {
        let stored = hash_password("hunter2");
        assert!(!stored.contains("hunter2"));
        // salt (32 hex) + '$' + digest (64 hex)
        assert_eq!(stored.len(), 32 + 1 + 64);
    }

    #[test]
    fn equal_passwords_get_distinct_salts() {
        assert_ne!(hash_password("p"), hash_password("p"));
    }

    #[test]
    fn malformed_stored_value_never_verifies() {
        assert!(!verify_password("p", "plaintext-without-separator"));
        assert!(!verify_password("p", "nothex$ffff"));
    }

    #[sqlx::test]
    async fn create_then_authenticate(pool: sqlx::PgPool) {
        create(&pool, "alice", "p").await.unwrap();

        assert!(is_existing(&pool, "alice").await.unwrap());
        assert!(authenticate(&pool, "alice", "p").await.unwrap());
        assert!(!authenticate(&pool, "alice", "wrong").await.unwrap());
        assert!(!authenticate(&pool, "nobody", "p").await.unwrap());
    }

    #[sqlx::test]
    async fn duplicate_create_loses_with_unique_violation(pool: sqlx::PgPool) {
        // A create that slips past the existence check (two requests racing)
        // must land on the primary key; the account handler turns exactly
        // this error into a 409.
        create(&pool, "alice", "p").await.unwrap();

        let err = create(&pool, "alice", "p").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Database(sqlx::Error::Database(ref db)) if db.is_unique_violation()
        ));
    }

    #[sqlx::test]
    async fn delete_account_removes_records_and_traces(pool: sqlx::PgPool) {
        use crate::services::{gps_service, key_service, record_service};

        create(&pool, "alice", "p").await.unwrap();

        let request: crate::models::record::UploadRecordRequest = serde_json::from_str(
            r#"{
                "userId": "alice", "password": "p",
                "deviceId": "d1", "dateTime": "2024-01-01T00:00:00",
                "date": "2024-01-01", "startTime": "00:00", "endTime": "01:00",
                "totalTime": 3600, "distance": 10.0, "aveSpeed": 10.0, "maxSpeed": 20.0
            }"#,
        )
        .unwrap();
        let key = record_service::upload(&pool, &request).await.unwrap();
        let entry = key_service::find(&pool, &key).await.unwrap().unwrap();

        let sample: crate::models::gps::GpsElement = serde_json::from_str(
            r#"{"latitude":35.0,"longitude":139.0,"altitude":0.0,"speed":0.0,"timestamp":"2024-01-01T00:00:01"}"#,
        )
        .unwrap();
        gps_service::insert_batch(&pool, entry.record_id, &[sample])
            .await
            .unwrap();

        delete_account(&pool, "alice").await.unwrap();

        assert!(!is_existing(&pool, "alice").await.unwrap());
        assert!(
            record_service::find_by_user_id(&pool, "alice")
                .await
                .unwrap()
                .is_empty()
        );
        let gps_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gps_data")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(gps_rows, 0);
    }
}
