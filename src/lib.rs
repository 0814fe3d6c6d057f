pub mod analyzer;
pub mod api;
pub mod cms;
pub mod config;
pub mod content;
pub mod data_models;
pub mod error;
pub mod leads;
pub mod query_engine;
pub mod related;
