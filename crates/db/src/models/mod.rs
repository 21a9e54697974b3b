//! Row models and input DTOs.

pub mod actor;
pub mod movie;
pub mod review;
pub mod stats;
pub mod token;
pub mod user;
