//! Actor constants and validation.
//!
//! One actor entity serves as cast member, director, or writer; the role
//! lives on the movie relationship, not here.

use crate::error::CoreError;
use crate::movie::validate_required;

/// Number of actors in the "latest uploads" admin strip.
pub const LATEST_ACTORS_LIMIT: i64 = 12;

/// Default admin listing page size.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Validate the required actor profile fields.
pub fn validate_profile(name: &str, about: &str, gender: &str) -> Result<(), CoreError> {
    validate_required(name, "Actor name is missing!")?;
    validate_required(about, "About is missing!")?;
    validate_required(gender, "Gender is a required field!")?;
    Ok(())
}
