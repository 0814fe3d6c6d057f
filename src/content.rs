use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::path::Path;

use crate::analyzer::TextAnalyzer;
use crate::config::CONFIG;
use crate::data_models::{BlogPost, ContentItem, Faq, Farm};

/// Content file names, relative to the content directory.
pub mod collections {
    pub const FARMS: &str = "farms.json";
    pub const BLOG: &str = "blog.json";
    pub const FAQS: &str = "faqs.json";

    pub const ALL: [&str; 3] = [FARMS, BLOG, FAQS];
}

pub const EXCERPT_CHARS: usize = 160;

/// Read-only collection of one content type, kept in source order.
#[derive(Debug, Clone)]
pub struct Repository<T> {
    items: Vec<T>,
}

impl<T: ContentItem> Repository<T> {
    /// Fails on duplicate ids.
    pub fn new(items: Vec<T>) -> Result<Self> {
        let mut seen = HashSet::new();
        for item in items.iter() {
            if !seen.insert(item.id().to_string()) {
                bail!("duplicate id {:?}", item.id());
            }
        }
        Ok(Self { items })
    }

    pub fn find_all(&self) -> &[T] {
        &self.items
    }

    pub fn find_by_id(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn find<F>(&self, predicate: F) -> Vec<&T>
    where
        F: Fn(&T) -> bool,
    {
        self.items.iter().filter(|item| predicate(item)).collect()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn exists(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }
}

/// All static site content, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct ContentStore {
    farms: Repository<Farm>,
    blog: Repository<BlogPost>,
    faqs: Repository<Faq>,
}

impl ContentStore {
    pub fn new(farms: Vec<Farm>, posts: Vec<BlogPost>, faqs: Vec<Faq>) -> Result<Self> {
        let analyzer = TextAnalyzer::default();
        let posts: Vec<BlogPost> = posts
            .into_iter()
            .map(|post| enrich_post(&analyzer, post))
            .collect();

        Ok(Self {
            farms: Repository::new(farms).context("Invalid farms collection")?,
            blog: Repository::new(posts).context("Invalid blog collection")?,
            faqs: Repository::new(faqs).context("Invalid faqs collection")?,
        })
    }

    /// Load every collection from `dir`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let farms: Vec<Farm> = read_collection(&dir.join(collections::FARMS))?;
        let posts: Vec<BlogPost> = read_collection(&dir.join(collections::BLOG))?;
        let faqs: Vec<Faq> = read_collection(&dir.join(collections::FAQS))?;

        let store = Self::new(farms, posts, faqs)?;
        log::info!(
            "Loaded content from {}: {} farms, {} posts, {} faqs",
            dir.display(),
            store.farms.count(),
            store.blog.count(),
            store.faqs.count()
        );
        Ok(store)
    }

    /// Load using the configured content directory
    pub fn from_config() -> Result<Self> {
        Self::load(&CONFIG.content_dir)
    }

    pub fn farms(&self) -> &Repository<Farm> {
        &self.farms
    }

    pub fn blog(&self) -> &Repository<BlogPost> {
        &self.blog
    }

    pub fn faqs(&self) -> &Repository<Faq> {
        &self.faqs
    }
}

fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn enrich_post(analyzer: &TextAnalyzer, mut post: BlogPost) -> BlogPost {
    if post.excerpt.trim().is_empty() {
        post.excerpt = analyzer.excerpt(&post.content, EXCERPT_CHARS);
    }
    if post.read_time_minutes == 0 {
        post.read_time_minutes = analyzer.reading_time_minutes(&post.content);
    }
    post
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_models::Faq;

    fn faq(id: &str) -> Faq {
        Faq {
            id: id.to_string(),
            question: "q".to_string(),
            answer: "a".to_string(),
            category: "general".to_string(),
        }
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        assert!(Repository::new(vec![faq("1"), faq("1")]).is_err());
        assert!(Repository::new(vec![faq("1"), faq("2")]).is_ok());
    }

    #[test]
    fn test_find_by_id() {
        let repo = Repository::new(vec![faq("1"), faq("2")]).unwrap();
        assert_eq!(repo.find_by_id("2").map(|f| f.id.as_str()), Some("2"));
        assert!(repo.find_by_id("3").is_none());
        assert!(repo.exists("1"));
        assert_eq!(repo.count(), 2);
    }
}
