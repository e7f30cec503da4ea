//! Internal domain models.
//!
//! These mirror the DTOs in the `shared` crate but use real enum and date
//! types; the REST mappers translate between the two worlds.

pub mod account;
pub mod budget;
pub mod goal;
pub mod recurring;
pub mod transaction;
