//! HTTP request handlers (route handlers).
//!
//! Each handler is a sequential pipeline: deserialize the JSON body,
//! authenticate (credentials or capability key, both arrive in the body),
//! call the services, answer with a status code and, where the contract
//! says so, a JSON body. Error paths answer with a bare status.

/// Account endpoints (/account/*)
pub mod account;
/// GPS trace endpoints (/gps/*)
pub mod gps;
/// Liveness probe
pub mod health;
/// Cycling record endpoints (/record/*)
pub mod record;
