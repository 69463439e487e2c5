//! Shared types used across the pipeline.
//!
//! These are the records that cross module boundaries: topic descriptors from
//! the catalog, article records written by the generator and read back by the
//! site builder, and the used-topic history. Article records are the on-disk
//! JSON schema, so field names here are the file format.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Category used when a stored record has none.
pub const DEFAULT_CATEGORY: &str = "Allgemein";

/// What kind of article a topic asks for. Selects the type-specific
/// instruction block in the body prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Article,
    Guide,
    Review,
    Listicle,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Guide => "guide",
            ContentType::Review => "review",
            ContentType::Listicle => "listicle",
        }
    }

    /// Parse a type name. Unknown names map to [`ContentType::Article`].
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "guide" => ContentType::Guide,
            "review" => ContentType::Review,
            "listicle" => ContentType::Listicle,
            _ => ContentType::Article,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Lenient on purpose: hand-edited article files may carry types we never emit.
impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ContentType::parse(&raw))
    }
}

/// A catalog entry: what an article should cover and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicDescriptor {
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    #[serde(rename = "type", default)]
    pub content_type: ContentType,
}

/// One consumed topic in the persisted history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsedTopicRecord {
    pub title: String,
    /// Local ISO-8601 timestamp (`YYYY-MM-DDTHH:MM:SS`).
    pub date: String,
}

/// SEO metadata generated alongside an article.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaBlock {
    #[serde(deserialize_with = "lenient_text")]
    pub meta_description: String,
    #[serde(deserialize_with = "lenient_text")]
    pub teaser: String,
    /// URL-safe identifier used for file names and page links.
    #[serde(deserialize_with = "lenient_text")]
    pub slug: String,
    /// Comma-separated focus keywords. A JSON list is joined with `", "`.
    #[serde(deserialize_with = "lenient_text")]
    pub keywords: String,
    #[serde(deserialize_with = "lenient_text")]
    pub og_description: String,
}

/// Reads a metadata field as text: lists are joined with `", "`, `null`
/// becomes empty, numbers and booleans keep their JSON spelling.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => items
            .iter()
            .map(value_text)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => value_text(&other),
    })
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.trim().to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// A generated article as persisted in `articles/{date}_{slug}.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub title: String,
    /// HTML fragment without outer document tags.
    pub html_content: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "type", default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub meta: MetaBlock,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// German long form, e.g. `5. März 2025`.
    #[serde(default)]
    pub date_display: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl ArticleRecord {
    /// The slug, or `None` when the record has none and cannot be linked.
    pub fn slug(&self) -> Option<&str> {
        let slug = self.meta.slug.trim();
        (!slug.is_empty()).then_some(slug)
    }

    /// Teaser text for cards: the teaser, else the meta description.
    pub fn teaser(&self) -> &str {
        if self.meta.teaser.is_empty() {
            &self.meta.meta_description
        } else {
            &self.meta.teaser
        }
    }
}
