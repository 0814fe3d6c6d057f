use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::str::FromStr;

use crate::leads::DEFAULT_LEADS_CAPACITY;

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        server_addr: get_env_or_default("SERVER_ADDR", "127.0.0.1:3000"),
        content_dir: get_env_or_default("CONTENT_DIR", "content"),
        admin_dir: get_env_or_default("ADMIN_DIR", "public/admin"),
        static_dir: get_env_or_default("STATIC_DIR", "static"),
        listing: ListingSettings {
            farms_page_size: get_env_page_size("FARMS_PAGE_SIZE", 6),
            blog_page_size: get_env_page_size("BLOG_PAGE_SIZE", 6),
            faqs_page_size: get_env_page_size("FAQS_PAGE_SIZE", 20),
            related_limit: get_env_parsed_or_default("RELATED_LIMIT", 3),
        },
        leads_capacity: get_env_parsed_or_default("LEADS_CAPACITY", DEFAULT_LEADS_CAPACITY),
    }
});

pub struct Config {
    pub server_addr: String,
    pub content_dir: String,
    pub admin_dir: String,
    pub static_dir: String,
    pub listing: ListingSettings,
    /// Most recent contact-form leads kept in memory.
    pub leads_capacity: usize,
}

/// Page sizes and result counts for the listing views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingSettings {
    pub farms_page_size: usize,
    pub blog_page_size: usize,
    pub faqs_page_size: usize,
    pub related_limit: usize,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            farms_page_size: 6,
            blog_page_size: 6,
            faqs_page_size: 20,
            related_limit: 3,
        }
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_env_parsed_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("Invalid value for environment variable {key}: {raw:?}")),
        Err(_) => default,
    }
}

fn get_env_page_size(key: &str, default: usize) -> usize {
    nonzero_page_size(key, get_env_parsed_or_default(key, default))
}

fn nonzero_page_size(key: &str, size: usize) -> usize {
    if size == 0 {
        panic!("Invalid value for environment variable {key}: page size must be at least 1");
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nonzero_page_size_passes_through() {
        assert_eq!(nonzero_page_size("FARMS_PAGE_SIZE", 6), 6);
        assert_eq!(nonzero_page_size("FARMS_PAGE_SIZE", 1), 1);
    }

    #[test]
    #[should_panic(expected = "BLOG_PAGE_SIZE")]
    fn test_zero_page_size_rejected() {
        nonzero_page_size("BLOG_PAGE_SIZE", 0);
    }

    #[test]
    fn test_default_listing_settings_are_pageable() {
        let settings = ListingSettings::default();
        for size in [
            settings.farms_page_size,
            settings.blog_page_size,
            settings.faqs_page_size,
        ] {
            assert!(size > 0);
        }
    }
}
