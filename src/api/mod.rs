use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

use crate::config::ListingSettings;
use crate::content::ContentStore;
use crate::leads::LeadInbox;
use crate::query_engine::PriceBuckets;

pub mod handlers;
pub mod models;

/// Shared by every handler.
pub struct AppState {
    pub content: ContentStore,
    pub leads: LeadInbox,
    pub settings: ListingSettings,
    pub price_buckets: PriceBuckets,
}

impl AppState {
    pub fn new(content: ContentStore, settings: ListingSettings) -> Self {
        Self {
            content,
            leads: LeadInbox::new(),
            settings,
            price_buckets: PriceBuckets::default(),
        }
    }

    pub fn with_lead_capacity(mut self, capacity: usize) -> Self {
        self.leads = LeadInbox::with_capacity(capacity);
        self
    }
}

pub fn create_router(state: Arc<AppState>, static_dir: &str) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // API routes
        .route("/api/health", get(handlers::health_handler))
        .route("/api/farms", get(handlers::farms_handler))
        .route("/api/farms/:id", get(handlers::farm_detail_handler))
        .route("/api/blog", get(handlers::blog_handler))
        .route("/api/blog/:id", get(handlers::post_detail_handler))
        .route("/api/faqs", get(handlers::faqs_handler))
        .route("/api/price-buckets", get(handlers::price_buckets_handler))
        .route("/api/contact", post(handlers::contact_handler))
        .with_state(state)
        // Static file serving for the site
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
}
