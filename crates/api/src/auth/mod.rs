//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- signed, expiring access tokens.
//! - [`gate`] -- the login check, including the offline admin escape hatch.

pub mod gate;
pub mod jwt;
pub mod password;
