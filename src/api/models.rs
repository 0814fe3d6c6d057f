use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub price: Option<String>,
    pub location: Option<String>,
    pub sort: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RelatedParams {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse<T> {
    pub items: Vec<T>,
    /// Page shown in the page control, never below 1.
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Serialize)]
pub struct DetailResponse<T> {
    pub item: T,
    pub related: Vec<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub id: String,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub farms: usize,
    pub posts: usize,
    pub faqs: usize,
}
