//! Business logic services.
//!
//! Services contain the core logic separated from HTTP handlers: database
//! transactions, credential verification, and the capability-key life cycle.

pub mod gps_service;
pub mod key_service;
pub mod record_service;
pub mod user_service;
