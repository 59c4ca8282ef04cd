//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where the
//!   entity is mutable

pub mod booking;
pub mod dashboard;
pub mod investment;
pub mod notification;
pub mod project;
pub mod transaction;
pub mod user;
