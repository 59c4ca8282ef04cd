//! Centace domain core.
//!
//! Pure domain rules shared by the database and API crates: pricing,
//! project vocabularies, wallet/ledger rules, booking validation, and
//! the watchlist. Nothing in this crate performs I/O.

pub mod booking;
pub mod error;
pub mod funding;
pub mod ledger;
pub mod notification;
pub mod pricing;
pub mod project;
pub mod roles;
pub mod types;
pub mod watchlist;
