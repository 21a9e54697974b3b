//! Movie constants and validation functions.
//!
//! Status and content-type values are stored as plain text; the helpers
//! here are the single place that decides what the DB and API layers
//! accept.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Visible to every visitor.
pub const STATUS_PUBLIC: &str = "public";

/// Visible to admins only.
pub const STATUS_PRIVATE: &str = "private";

/// All valid movie status values.
pub const VALID_STATUSES: &[&str] = &[STATUS_PUBLIC, STATUS_PRIVATE];

/// Content type assumed by the top-rated listing when none is requested.
pub const DEFAULT_CONTENT_TYPE: &str = "Film";

/// Hard cap on related and top-rated result lists.
pub const MOVIE_LIST_LIMIT: i64 = 5;

/// Default size of the public "latest uploads" strip.
pub const DEFAULT_LATEST_LIMIT: i64 = 5;

/// Default admin listing page size.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page any listing endpoint will return.
pub const MAX_PAGE_SIZE: i64 = 100;

/// The fixed genre vocabulary.
pub const GENRES: &[&str] = &[
    "Action",
    "Adventure",
    "Animation",
    "Biography",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Family",
    "Fantasy",
    "Film-Noir",
    "Game-Show",
    "History",
    "Horror",
    "Music",
    "Musical",
    "Mystery",
    "News",
    "Reality-TV",
    "Romance",
    "Sci-Fi",
    "Sport",
    "Talk-Show",
    "Thriller",
    "War",
    "Western",
];

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Reject an empty or whitespace-only required text field.
pub fn validate_required(value: &str, message: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(message.to_string()));
    }
    Ok(())
}

/// Validate that `status` is `"public"` or `"private"`.
pub fn validate_status(status: &str) -> Result<(), CoreError> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Movie status must be public or private!".into(),
        ))
    }
}

/// Every genre must come from [`GENRES`].
pub fn validate_genres(genres: &[String]) -> Result<(), CoreError> {
    match genres.iter().find(|g| !GENRES.contains(&g.as_str())) {
        Some(bad) => Err(CoreError::Validation(format!("Invalid genre '{bad}'"))),
        None => Ok(()),
    }
}

/// Tags must be a non-empty list of non-blank strings.
pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.is_empty() || tags.iter().any(|t| t.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Tags must be an array of strings!".into(),
        ));
    }
    Ok(())
}

/// A cast entry needs the character name the actor plays.
pub fn validate_cast_role(role_as: &str) -> Result<(), CoreError> {
    validate_required(role_as, "Role as is missing inside cast!")
}

/// Check that a trailer reference is an http(s) URL whose final path
/// segment (without extension) equals `public_id`.
///
/// The media host names uploaded assets after their public id, e.g.
/// `https://host/video/upload/v1/abc123.mp4` has public id `abc123`.
pub fn validate_trailer(url: &str, public_id: &str) -> Result<(), CoreError> {
    let invalid_url = || CoreError::Validation("Trailer url is not valid!".into());

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .ok_or_else(invalid_url)?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(invalid_url());
    }

    let last = rest.rsplit('/').next().unwrap_or_default();
    let stem = last.split('.').next().unwrap_or_default();
    if stem.is_empty() || stem != public_id {
        return Err(CoreError::Validation(
            "Trailer public_id is not valid!".into(),
        ));
    }
    Ok(())
}

/// Convert `?pageNo=&limit=` into a clamped `(limit, offset)` pair.
pub fn page_window(page_no: Option<i64>, limit: Option<i64>, default_limit: i64) -> (i64, i64) {
    let limit = limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE);
    let page_no = page_no.unwrap_or(0).max(0);
    (limit, page_no.saturating_mul(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn status_accepts_known_values() {
        assert!(validate_status("public").is_ok());
        assert!(validate_status("private").is_ok());
        assert_matches!(validate_status("draft"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn genres_must_come_from_vocabulary() {
        assert!(validate_genres(&strings(&["Drama", "Sci-Fi"])).is_ok());
        assert!(validate_genres(&[]).is_ok());
        let err = validate_genres(&strings(&["Drama", "Telenovela"])).unwrap_err();
        assert!(err.to_string().contains("Telenovela"));
    }

    #[test]
    fn tags_must_be_non_empty() {
        assert!(validate_tags(&strings(&["space"])).is_ok());
        assert!(validate_tags(&[]).is_err());
        assert!(validate_tags(&strings(&["space", "  "])).is_err());
    }

    #[test]
    fn trailer_public_id_must_match_url() {
        let url = "https://res.example.com/demo/video/upload/v1679478955/saqmcstzx7qarghjafjy.mp4";
        assert!(validate_trailer(url, "saqmcstzx7qarghjafjy").is_ok());
        assert!(validate_trailer(url, "other").is_err());
    }

    #[test]
    fn trailer_url_must_be_http() {
        assert!(validate_trailer("ftp://host/abc.mp4", "abc").is_err());
        assert!(validate_trailer("https://", "").is_err());
        assert!(validate_trailer("not a url", "abc").is_err());
    }

    #[test]
    fn page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None, 10), (10, 0));
        assert_eq!(page_window(Some(2), Some(20), 10), (20, 40));
        assert_eq!(page_window(Some(-3), Some(0), 10), (1, 0));
        assert_eq!(page_window(Some(1), Some(5_000), 10), (MAX_PAGE_SIZE, MAX_PAGE_SIZE));
    }

    #[test]
    fn page_window_saturates_huge_page_numbers() {
        assert_eq!(page_window(Some(i64::MAX), Some(10), 10), (10, i64::MAX));
        assert_eq!(page_window(Some(i64::MAX), None, 20), (20, i64::MAX));
    }
}
