use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use crate::data_models::{BlogPost, ContentItem, Faq, Farm};
use crate::leads::ContactSubmission;
use crate::query_engine::{
    Facet, PriceBucket, QueryState, SortKey, display_page, run_listing, sort_items,
};
use crate::related::rank_related;

use super::AppState;
use super::models::{
    ContactResponse, DetailResponse, HealthResponse, ListingParams, ListingResponse, RelatedParams,
};

type ApiError = (StatusCode, String);

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        farms: state.content.farms().count(),
        posts: state.content.blog().count(),
        faqs: state.content.faqs().count(),
    })
}

pub async fn farms_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse<Farm>>, ApiError> {
    let query = query_state(&state, &params, state.settings.farms_page_size)?;
    let sort = sort_key(&params)?;
    list(state.content.farms().find_all(), &query, sort).map(Json)
}

pub async fn blog_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse<BlogPost>>, ApiError> {
    let query = query_state(&state, &params, state.settings.blog_page_size)?;
    let sort = sort_key(&params)?;
    list(state.content.blog().find_all(), &query, sort).map(Json)
}

pub async fn faqs_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListingParams>,
) -> Result<Json<ListingResponse<Faq>>, ApiError> {
    let query = query_state(&state, &params, state.settings.faqs_page_size)?;
    list(state.content.faqs().find_all(), &query, None).map(Json)
}

pub async fn farm_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<DetailResponse<Farm>>, ApiError> {
    let limit = params.limit.unwrap_or(state.settings.related_limit);
    detail(state.content.farms().find_all(), &id, limit).map(Json)
}

pub async fn post_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<RelatedParams>,
) -> Result<Json<DetailResponse<BlogPost>>, ApiError> {
    let limit = params.limit.unwrap_or(state.settings.related_limit);
    detail(state.content.blog().find_all(), &id, limit).map(Json)
}

pub async fn price_buckets_handler(State(state): State<Arc<AppState>>) -> Json<Vec<PriceBucket>> {
    Json(state.price_buckets.iter().cloned().collect())
}

pub async fn contact_handler(
    State(state): State<Arc<AppState>>,
    Json(submission): Json<ContactSubmission>,
) -> Result<(StatusCode, Json<ContactResponse>), ApiError> {
    let lead = state
        .leads
        .submit(submission, state.content.farms())
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            id: lead.id,
            received_at: lead.received_at,
        }),
    ))
}

fn query_state(
    state: &AppState,
    params: &ListingParams,
    page_size: usize,
) -> Result<QueryState, ApiError> {
    let price = match Facet::parse(params.price.as_deref()) {
        Some(id) => Some(state.price_buckets.get(&id).cloned().ok_or_else(|| {
            (StatusCode::BAD_REQUEST, format!("Unknown price range: {id}"))
        })?),
        None => None,
    };

    Ok(QueryState {
        search: params.search.clone().unwrap_or_default(),
        category: Facet::parse(params.category.as_deref()),
        status: Facet::parse(params.status.as_deref()),
        price,
        location: Facet::parse(params.location.as_deref()),
        page: params.page.unwrap_or(1),
        page_size,
    })
}

fn sort_key(params: &ListingParams) -> Result<Option<SortKey>, ApiError> {
    match params.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => SortKey::parse(raw)
            .map(Some)
            .ok_or_else(|| (StatusCode::BAD_REQUEST, format!("Unknown sort order: {raw}"))),
        None => Ok(None),
    }
}

fn list<T: ContentItem + Clone>(
    all: &[T],
    query: &QueryState,
    sort: Option<SortKey>,
) -> Result<ListingResponse<T>, ApiError> {
    let mut items: Vec<&T> = all.iter().collect();
    if let Some(key) = sort {
        sort_items(&mut items, key);
    }

    let listing = run_listing(&items, query).map_err(|e| {
        log::error!("Listing misconfigured: {e}");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(ListingResponse {
        items: listing.items.into_iter().cloned().collect(),
        page: display_page(listing.page),
        page_size: listing.page_size,
        total_items: listing.total_items,
        total_pages: listing.total_pages,
    })
}

fn detail<T: ContentItem + Clone>(
    all: &[T],
    id: &str,
    limit: usize,
) -> Result<DetailResponse<T>, ApiError> {
    let item = all
        .iter()
        .find(|item| item.id() == id)
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("No content with id {id}")))?;

    Ok(DetailResponse {
        item: item.clone(),
        related: rank_related(item, all, limit).into_iter().cloned().collect(),
    })
}
