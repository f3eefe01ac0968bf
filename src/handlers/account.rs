//! Account management HTTP handlers.
//!
//! - POST /account/create - create a user account
//! - POST /account/delete - delete an account and everything it owns

use crate::{
    db::DbPool,
    error::AppError,
    models::user::{AccountRequest, AccountResponse},
    services::user_service,
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Create a new account.
///
/// # Request Body
///
/// ```json
/// { "userId": "alice", "password": "p" }
/// ```
///
/// # Response
///
/// - **201 Created**: account stored, submitted user echoed back
/// - **409 Conflict**: the user id is taken, submitted user echoed back
///
/// The create itself is unauthenticated; the password in the body becomes
/// the account's credential (hashed at rest).
pub async fn create_account(
    State(pool): State<DbPool>,
    Json(request): Json<AccountRequest>,
) -> Result<Response, AppError> {
    if user_service::is_existing(&pool, &request.user_id).await? {
        let echo = AccountResponse::from(request);
        return Ok((StatusCode::CONFLICT, Json(echo)).into_response());
    }

    match user_service::create(&pool, &request.user_id, &request.password).await {
        Ok(()) => {
            tracing::info!(user_id = %request.user_id, "account created");
            let echo = AccountResponse::from(request);
            Ok((StatusCode::CREATED, Json(echo)).into_response())
        }
        // Two creates racing past the existence check: the loser hits the
        // primary key, and that is still a conflict, not an insert failure.
        Err(AppError::Database(sqlx::Error::Database(db))) if db.is_unique_violation() => {
            let echo = AccountResponse::from(request);
            Ok((StatusCode::CONFLICT, Json(echo)).into_response())
        }
        Err(err) => Err(err),
    }
}

/// Delete an account.
///
/// # Response
///
/// - **204 No Content**: account, its records and their GPS traces removed
/// - **401 Unauthorized**: credentials did not match
///
/// The cascade runs in one database transaction, so no records or samples
/// survive a successful delete (and none disappear on a failed one).
pub async fn delete_account(
    State(pool): State<DbPool>,
    Json(request): Json<AccountRequest>,
) -> Result<StatusCode, AppError> {
    if !user_service::authenticate(&pool, &request.user_id, &request.password).await? {
        return Err(AppError::AuthFailed);
    }

    user_service::delete_account(&pool, &request.user_id).await?;
    tracing::info!(user_id = %request.user_id, "account deleted");

    Ok(StatusCode::NO_CONTENT)
}
