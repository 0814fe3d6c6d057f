use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::data_models::ContentItem;
use crate::error::QueryError;

/// Half-open price range: `min` inclusive, `max` exclusive. A missing bound is
/// unbounded on that side.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceBucket {
    pub id: String,
    pub label: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl PriceBucket {
    pub fn new(id: &str, label: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            min,
            max,
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.min.is_none_or(|min| price >= min) && self.max.is_none_or(|max| price < max)
    }
}

/// The bucket boundaries a listing view offers.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PriceBuckets {
    buckets: Vec<PriceBucket>,
}

impl PriceBuckets {
    pub fn new(buckets: Vec<PriceBucket>) -> Self {
        Self { buckets }
    }

    pub fn get(&self, id: &str) -> Option<&PriceBucket> {
        self.buckets.iter().find(|b| b.id.eq_ignore_ascii_case(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PriceBucket> {
        self.buckets.iter()
    }
}

impl Default for PriceBuckets {
    /// Plot price ranges shown on the farms page, in rupees.
    fn default() -> Self {
        Self::new(vec![
            PriceBucket::new("under-25l", "Under ₹25 Lakh", None, Some(2_500_000.0)),
            PriceBucket::new(
                "25l-50l",
                "₹25 Lakh - ₹50 Lakh",
                Some(2_500_000.0),
                Some(5_000_000.0),
            ),
            PriceBucket::new(
                "50l-1cr",
                "₹50 Lakh - ₹1 Crore",
                Some(5_000_000.0),
                Some(10_000_000.0),
            ),
            PriceBucket::new("above-1cr", "Above ₹1 Crore", Some(10_000_000.0), None),
        ])
    }
}

/// Facet values arriving from a listing view. `"all"` and blank mean no
/// constraint.
pub struct Facet;

impl Facet {
    pub fn parse(raw: Option<&str>) -> Option<String> {
        let value = raw?.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            None
        } else {
            Some(value.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    pub search: String,
    pub category: Option<String>,
    pub status: Option<String>,
    pub price: Option<PriceBucket>,
    pub location: Option<String>,
    /// 1-based. Zero and negative pages are representable and yield nothing.
    pub page: i64,
    pub page_size: usize,
}

impl QueryState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            category: None,
            status: None,
            price: None,
            location: None,
            page: 1,
            page_size,
        }
    }

    pub fn with_search(mut self, search: &str) -> Self {
        self.search = search.to_string();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Facet::parse(Some(category));
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.status = Facet::parse(Some(status));
        self
    }

    pub fn with_price(mut self, bucket: PriceBucket) -> Self {
        self.price = Some(bucket);
        self
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = Facet::parse(Some(location));
        self
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = page;
        self
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    TitleAsc,
    Newest,
    Oldest,
}

impl SortKey {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "price-asc" => Some(Self::PriceAsc),
            "price-desc" => Some(Self::PriceDesc),
            "title-asc" | "name" => Some(Self::TitleAsc),
            "newest" => Some(Self::Newest),
            "oldest" => Some(Self::Oldest),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ListingPage<'a, T> {
    pub items: Vec<&'a T>,
    pub page: i64,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> ListingPage<'_, T> {
    /// True when nothing matched at all; the view shows an empty state instead
    /// of a page control.
    pub fn is_empty(&self) -> bool {
        self.total_pages == 0
    }
}

pub fn matches_search<T: ContentItem>(item: &T, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.searchable_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

pub fn matches_facets<T: ContentItem>(item: &T, state: &QueryState) -> bool {
    if let Some(category) = &state.category {
        if !item.category().eq_ignore_ascii_case(category) {
            return false;
        }
    }

    if let Some(status) = &state.status {
        match item.status() {
            Some(s) if s.eq_ignore_ascii_case(status) => {}
            _ => return false,
        }
    }

    if let Some(bucket) = &state.price {
        match item.price() {
            Some(p) if bucket.contains(p) => {}
            _ => return false,
        }
    }

    if let Some(location) = &state.location {
        let needle = location.to_lowercase();
        match item.location() {
            Some(l) if l.to_lowercase().contains(&needle) => {}
            _ => return false,
        }
    }

    true
}

/// Keeps the items matching `state`, in their original order.
pub fn filter<'a, T: ContentItem>(items: &'a [T], state: &QueryState) -> Vec<&'a T> {
    let refs: Vec<&'a T> = items.iter().collect();
    filter_refs(&refs, state)
}

/// [`filter`] over a slice of references, e.g. one already sorted.
pub fn filter_refs<'a, T: ContentItem>(items: &[&'a T], state: &QueryState) -> Vec<&'a T> {
    items
        .iter()
        .copied()
        .filter(|item| matches_search(*item, &state.search) && matches_facets(*item, state))
        .collect()
}

pub fn total_pages(len: usize, page_size: usize) -> Result<usize, QueryError> {
    if page_size == 0 {
        return Err(QueryError::InvalidPageSize(page_size));
    }
    Ok(len.div_ceil(page_size))
}

/// Page number to show in the page control.
pub fn display_page(page: i64) -> usize {
    if page < 1 { 1 } else { page as usize }
}

pub fn paginate<'a, T>(
    items: &[&'a T],
    page: i64,
    page_size: usize,
) -> Result<Vec<&'a T>, QueryError> {
    let pages = total_pages(items.len(), page_size)?;
    if page < 1 || page as u64 > pages as u64 {
        return Ok(Vec::new());
    }
    let start = (page as usize - 1) * page_size;
    let end = (start + page_size).min(items.len());
    Ok(items[start..end].to_vec())
}

/// Stable sort. Items without the sort field go last.
pub fn sort_items<T: ContentItem>(items: &mut [&T], key: SortKey) {
    match key {
        SortKey::PriceAsc => items.sort_by(|a, b| cmp_missing_last(a.price(), b.price(), false)),
        SortKey::PriceDesc => items.sort_by(|a, b| cmp_missing_last(a.price(), b.price(), true)),
        SortKey::TitleAsc => items.sort_by_key(|a| a.title().to_lowercase()),
        SortKey::Newest => items.sort_by(|a, b| cmp_missing_last(a.date(), b.date(), true)),
        SortKey::Oldest => items.sort_by(|a, b| cmp_missing_last(a.date(), b.date(), false)),
    }
}

fn cmp_missing_last<K: PartialOrd>(a: Option<K>, b: Option<K>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending { ord.reverse() } else { ord }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filters then paginates `items`. Pass an already sorted slice to list in a
/// different order.
pub fn run_listing<'a, T: ContentItem>(
    items: &[&'a T],
    state: &QueryState,
) -> Result<ListingPage<'a, T>, QueryError> {
    let matched = filter_refs(items, state);
    let total_pages = total_pages(matched.len(), state.page_size)?;
    let page_items = paginate(&matched, state.page, state.page_size)?;

    Ok(ListingPage {
        items: page_items,
        page: state.page,
        page_size: state.page_size,
        total_items: matched.len(),
        total_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(6, 4), Ok(2));
        assert_eq!(total_pages(8, 4), Ok(2));
        assert_eq!(total_pages(0, 4), Ok(0));
        assert_eq!(total_pages(1, 10), Ok(1));
        assert_eq!(total_pages(3, 0), Err(QueryError::InvalidPageSize(0)));
    }

    #[test]
    fn test_paginate_slices() {
        let data = vec![0, 1, 2, 3, 4, 5];
        let refs: Vec<&i32> = data.iter().collect();

        assert_eq!(paginate(&refs, 1, 4).unwrap(), vec![&0, &1, &2, &3]);
        assert_eq!(paginate(&refs, 2, 4).unwrap(), vec![&4, &5]);
        assert!(paginate(&refs, 3, 4).unwrap().is_empty());
        assert!(paginate(&refs, 0, 4).unwrap().is_empty());
        assert!(paginate(&refs, -2, 4).unwrap().is_empty());
        assert!(paginate(&refs, 1, 0).is_err());
    }

    #[test]
    fn test_display_page_clamps() {
        assert_eq!(display_page(-3), 1);
        assert_eq!(display_page(0), 1);
        assert_eq!(display_page(4), 4);
    }

    #[test]
    fn test_price_bucket_half_open() {
        let bucket = PriceBucket::new("mid", "mid", Some(100.0), Some(200.0));
        assert!(bucket.contains(100.0));
        assert!(bucket.contains(199.99));
        assert!(!bucket.contains(200.0));
        assert!(!bucket.contains(99.0));

        let under = PriceBucket::new("under", "under", None, Some(100.0));
        assert!(under.contains(0.0));
        assert!(!under.contains(100.0));

        let above = PriceBucket::new("above", "above", Some(100.0), None);
        assert!(above.contains(100.0));
        assert!(above.contains(1e12));
    }

    #[test]
    fn test_facet_parse() {
        assert_eq!(Facet::parse(None), None);
        assert_eq!(Facet::parse(Some("all")), None);
        assert_eq!(Facet::parse(Some("ALL")), None);
        assert_eq!(Facet::parse(Some("  ")), None);
        assert_eq!(Facet::parse(Some(" ongoing ")), Some("ongoing".to_string()));
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("price-asc"), Some(SortKey::PriceAsc));
        assert_eq!(SortKey::parse("Newest"), Some(SortKey::Newest));
        assert_eq!(SortKey::parse("random"), None);
    }
}
