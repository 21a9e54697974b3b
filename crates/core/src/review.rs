//! Review rating bounds.

use crate::error::CoreError;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 10.0;

/// Ratings are inclusive `0..=10`; fractional values are allowed.
pub fn validate_rating(rating: f64) -> Result<(), CoreError> {
    if rating.is_finite() && (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Rating must be a number between 0 and 10.".into(),
        ))
    }
}
