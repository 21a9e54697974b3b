//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// Page parameters (`?pageNo=&limit=`), turned into a window by
/// [`reelview_core::movie::page_window`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    pub page_no: Option<i64>,
    pub limit: Option<i64>,
}

/// `?name=` for actor search.
#[derive(Debug, Deserialize)]
pub struct NameSearchParams {
    #[serde(default)]
    pub name: String,
}

/// `?title=` for movie search.
#[derive(Debug, Deserialize)]
pub struct TitleSearchParams {
    #[serde(default)]
    pub title: String,
}

/// `?limit=` for the latest-uploads strip.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// `?type=` for top-rated lists.
#[derive(Debug, Deserialize)]
pub struct ContentTypeParams {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}
