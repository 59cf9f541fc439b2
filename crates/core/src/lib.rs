//! Domain types and rules for the warehouse location tracker.
//!
//! Nothing in this crate performs I/O. Storage lives in `huecos-db`, HTTP in
//! `huecos-api`.

pub mod error;
pub mod location;
pub mod movement;
pub mod roles;
pub mod types;
