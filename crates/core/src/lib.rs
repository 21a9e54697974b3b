//! Domain types and the request-scoped core components of Reelview.
//!
//! - [`rating`] -- per-movie rating aggregation.
//! - [`ranking`] -- related-by-tag and top-rated movie lists.
//! - [`token`] -- one-time code lifecycle for email verification and
//!   password reset.
//!
//! Nothing in this crate performs I/O directly; persistence is reached
//! through the store traits that `reelview-db` implements.

pub mod actor;
pub mod error;
pub mod hashing;
pub mod movie;
pub mod ranking;
pub mod rating;
pub mod review;
pub mod roles;
pub mod token;
pub mod types;
