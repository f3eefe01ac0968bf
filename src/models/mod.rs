//! Data models representing database entities and wire DTOs.
//!
//! Each module pairs a table-backed entity with the request/response
//! shapes of the endpoints that touch it. Wire JSON is camelCase.

/// User account entity and account DTOs
pub mod user;
/// Cycling session record entity and record DTOs
pub mod record;
/// GPS sample entity, wire element, and gps DTOs
pub mod gps;
/// Capability-key mapping entity
pub mod key_to_record;
