//! Shared test utilities.
//!
//! Builders for topics and article records, a scripted [`ChatClient`] that
//! replays canned completions and records every request, and a
//! [`Sleeper`] that records delays instead of waiting.
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let client = ScriptedClient::new(vec![Ok("<h2>Islay</h2>".into()), Ok(META_JSON.into())]);
//! let sleeper = RecordingSleeper::default();
//! // ... run the generator ...
//! assert_eq!(client.requests().len(), 2);
//! assert!(sleeper.delays().is_empty());
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::config::{Config, WhiskyShop};
use crate::llm::{ApiError, ApiErrorKind, ChatClient, ChatRequest};
use crate::retry::Sleeper;
use crate::types::{ArticleRecord, ContentType, MetaBlock, TopicDescriptor, UsedTopicRecord};

// =========================================================================
// Builders
// =========================================================================

pub fn topic(title: &str, category: &str) -> TopicDescriptor {
    TopicDescriptor {
        title: title.to_string(),
        category: category.to_string(),
        tags: vec![category.to_lowercase(), "schottland".to_string()],
        content_type: ContentType::Article,
    }
}

pub fn used(title: &str) -> UsedTopicRecord {
    UsedTopicRecord {
        title: title.to_string(),
        date: "2025-01-01T12:00:00".to_string(),
    }
}

/// A complete record with slug, date and teaser.
pub fn record(title: &str, category: &str, slug: &str, date: &str) -> ArticleRecord {
    ArticleRecord {
        title: title.to_string(),
        html_content: format!("<h2>{title}</h2><p>Text über {title}.</p>"),
        category: category.to_string(),
        tags: vec![category.to_lowercase(), "schottland".to_string()],
        content_type: ContentType::Article,
        meta: MetaBlock {
            meta_description: format!("Alles über {title}"),
            teaser: format!("Teaser zu {title}"),
            slug: slug.to_string(),
            keywords: "whisky, schottland".to_string(),
            og_description: format!("{title} entdecken"),
        },
        date: date.to_string(),
        date_display: crate::naming::german_date(date),
    }
}

/// Config with a usable key and a base URL for absolute sitemap links.
pub fn sample_config() -> Config {
    let mut config = Config::default();
    config.openai.api_key = "sk-test-key".to_string();
    config.site.base_url = "https://magazin.example".to_string();
    config.affiliate_links.amazon_tag = "magazin-21".to_string();
    config.affiliate_links.whisky_shops = vec![WhiskyShop {
        name: "Whisky.de".to_string(),
        url_template: "https://www.whisky.de/shop/?q={query}".to_string(),
    }];
    config.affiliate_links.travel_links.insert(
        "faehre".to_string(),
        "https://www.directferries.de/".to_string(),
    );
    config
}

/// A valid metadata completion.
pub const META_JSON: &str = r#"{
    "meta_description": "Islay entdecken: Torf, Meer und Destillerien.",
    "teaser": "Eine Reise zu den rauchigsten Whiskys Schottlands.",
    "slug": "islay-entdecken",
    "keywords": "islay, whisky, torf",
    "og_description": "Islay für Whisky-Fans"
}"#;

// =========================================================================
// Scripted chat client
// =========================================================================

/// Replays queued responses in order; an empty queue is a permanent error.
#[derive(Default)]
pub struct ScriptedClient {
    responses: RefCell<VecDeque<Result<String, ApiError>>>,
    requests: RefCell<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<Result<String, ApiError>>) -> Self {
        Self {
            responses: RefCell::new(responses.into()),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.borrow().clone()
    }
}

impl ChatClient for ScriptedClient {
    fn complete(&self, request: &ChatRequest) -> Result<String, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        self.responses.borrow_mut().pop_front().unwrap_or_else(|| {
            Err(ApiError::new(
                ApiErrorKind::Rejected,
                "scripted client ran out of responses",
            ))
        })
    }
}

// =========================================================================
// Recording sleeper
// =========================================================================

#[derive(Default)]
pub struct RecordingSleeper {
    delays: RefCell<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.delays.borrow_mut().push(duration);
    }
}

// =========================================================================
// HTML assertions
// =========================================================================

/// Number of non-overlapping occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
