use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A static record that can be listed, filtered and ranked.
///
/// Facet accessors default to `None`; an item without a field never matches
/// an active facet on that field.
pub trait ContentItem {
    fn id(&self) -> &str;

    fn category(&self) -> &str;

    fn tags(&self) -> &[String];

    /// Fields the free-text search looks at.
    fn searchable_fields(&self) -> Vec<&str>;

    fn title(&self) -> &str;

    fn status(&self) -> Option<&str> {
        None
    }

    fn price(&self) -> Option<f64> {
        None
    }

    fn location(&self) -> Option<&str> {
        None
    }

    fn date(&self) -> Option<NaiveDate> {
        None
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FarmStatus {
    Available,
    Ongoing,
    Upcoming,
    SoldOut,
}

impl FarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FarmStatus::Available => "available",
            FarmStatus::Ongoing => "ongoing",
            FarmStatus::Upcoming => "upcoming",
            FarmStatus::SoldOut => "sold-out",
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub id: String,
    pub name: String,
    pub location: String,
    /// Price of one plot, in rupees.
    pub price: f64,
    pub size_acres: f64,
    pub status: FarmStatus,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub expected_returns: Option<String>,
}

impl ContentItem for Farm {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.location.as_str()]
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }

    fn price(&self) -> Option<f64> {
        Some(self.price)
    }

    fn location(&self) -> Option<&str> {
        Some(&self.location)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub title: String,
    /// Filled from `content` at load time when the source omits it.
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub content: String,
    pub author: String,
    pub date: NaiveDate,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub read_time_minutes: usize,
}

impl ContentItem for BlogPost {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.excerpt.as_str(), self.author.as_str()]
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn date(&self) -> Option<NaiveDate> {
        Some(self.date)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Faq {
    pub id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
}

impl ContentItem for Faq {
    fn id(&self) -> &str {
        &self.id
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn tags(&self) -> &[String] {
        &[]
    }

    fn searchable_fields(&self) -> Vec<&str> {
        vec![self.question.as_str(), self.answer.as_str()]
    }

    fn title(&self) -> &str {
        &self.question
    }
}
