//! Authentication primitives.
//!
//! - [`password`] -- password rules plus Argon2id hashing and verification.
//! - [`jwt`] -- JWT access-token generation and validation.

pub mod jwt;
pub mod password;
