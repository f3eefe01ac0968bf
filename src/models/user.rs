//! User account model and account request/response types.

use serde::{Deserialize, Serialize};

/// Represents a user row from the database.
///
/// # Database Table
///
/// Maps to the `users` table. The `password` column does not hold the
/// plaintext password: it holds the salted digest in `salt$digest` hex
/// form (see `services::user_service`).
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Client-chosen account identifier, primary key
    pub user_id: String,

    /// Salted SHA-256 digest of the password, `salt$digest` hex
    pub password: String,
}

/// Credentials carried by account/create, account/delete and
/// record/download requests.
///
/// ```json
/// { "userId": "alice", "password": "p" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRequest {
    pub user_id: String,
    pub password: String,
}

/// Body echoed by account/create on both 201 and 409.
///
/// The echo reflects the user as submitted; the stored digest never
/// leaves the server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub user_id: String,
    pub password: String,
}

impl From<AccountRequest> for AccountResponse {
    fn from(request: AccountRequest) -> Self {
        Self {
            user_id: request.user_id,
            password: request.password,
        }
    }
}
