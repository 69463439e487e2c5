//! Site configuration module.
//!
//! Handles loading, validating, and normalizing `config.toml`. Every optional
//! value has its default in exactly one place (the `Default` impls below);
//! the user file is merged over the serialized stock defaults, so components
//! never carry fallback literals of their own.
//!
//! ## Config File Location
//!
//! `config.toml` lives in the project root, next to `articles/` and `site/`:
//!
//! ```text
//! whisky-magazin/
//! ├── config.toml
//! ├── articles/            # one JSON file per generated article
//! ├── site/                # rendered static site
//! ├── used_topics.json     # consumed-topic history
//! └── magazin.log          # activity log
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [openai]
//! api_key = "sk-..."       # required
//! model = "gpt-4o"
//! temperature = 0.7
//! max_tokens = 4000
//!
//! [site]
//! name = "Whisky Magazin"
//! tagline = "Whisky, Reisen & mehr"
//! author = "Ellas"
//! base_url = ""
//!
//! [content_settings]
//! min_word_count = 1200
//! max_word_count = 2500
//!
//! [affiliate_links]
//! amazon_tag = "whiskymagazin-21"
//! whisky_shops = [{ name = "Whisky.de", url_template = "https://www.whisky.de/shop/?q={query}" }]
//!
//! [affiliate_links.travel_links]
//! faehre = "https://www.directferries.de/"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the config inside the project root.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Prefix of the API key shipped in the example config.
const PLACEHOLDER_KEY_PREFIX: &str = "sk-DEIN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config file not found: {0}")]
    Missing(String),
    #[error("API key is still the placeholder from the example config")]
    PlaceholderKey,
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full configuration after defaults have been applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Chat-completion API credentials and parameters.
    pub openai: OpenAiConfig,
    /// Site identity used in page chrome and absolute URLs.
    pub site: SiteIdentity,
    /// Word-count bounds passed into the body prompt.
    pub content_settings: ContentSettings,
    /// Affiliate link tables for prompts and call-to-action blocks.
    pub affiliate_links: AffiliateLinks,
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let key = self.openai.api_key.trim();
        if key.is_empty() {
            return Err(ConfigError::Validation("openai.api_key must be set".into()));
        }
        if key.starts_with(PLACEHOLDER_KEY_PREFIX) {
            return Err(ConfigError::PlaceholderKey);
        }
        if !(0.0..=2.0).contains(&self.openai.temperature) {
            return Err(ConfigError::Validation(
                "openai.temperature must be between 0 and 2".into(),
            ));
        }
        if self.openai.max_tokens == 0 {
            return Err(ConfigError::Validation(
                "openai.max_tokens must be positive".into(),
            ));
        }
        if self.content_settings.min_word_count > self.content_settings.max_word_count {
            return Err(ConfigError::Validation(
                "content_settings.min_word_count must not exceed max_word_count".into(),
            ));
        }
        Ok(())
    }
}

/// Chat-completion API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    /// Output token budget for the article body.
    pub max_tokens: u32,
    /// API root; `/chat/completions` is appended.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            max_tokens: 4000,
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteIdentity {
    pub name: String,
    pub tagline: String,
    pub author: String,
    /// Prefix for every emitted link. Empty means root-relative links.
    pub base_url: String,
    /// External brand site linked from the nav and footer.
    pub home_url: String,
}

impl Default for SiteIdentity {
    fn default() -> Self {
        Self {
            name: "Whisky Magazin".to_string(),
            tagline: "Single Malts, Destillerien und die schönsten Whisky-Reisen".to_string(),
            author: "Ellas".to_string(),
            base_url: String::new(),
            home_url: "https://www.whisky.reise".to_string(),
        }
    }
}

/// Word-count bounds for generated articles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentSettings {
    pub min_word_count: u32,
    pub max_word_count: u32,
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            min_word_count: 1200,
            max_word_count: 2500,
        }
    }
}

/// A shop the model may link to for product recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WhiskyShop {
    pub name: String,
    pub url_template: String,
}

/// Affiliate link tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AffiliateLinks {
    pub whisky_shops: Vec<WhiskyShop>,
    /// Named travel links. Ordered by name so prompts are stable.
    pub travel_links: BTreeMap<String, String>,
    pub amazon_tag: String,
}

impl AffiliateLinks {
    /// Ferry booking link used by the article-page CTA, `#` when unset.
    pub fn ferry_url(&self) -> &str {
        self.travel_links
            .get("faehre")
            .map(String::as_str)
            .unwrap_or("#")
    }

    /// Amazon single-malt search carrying the affiliate tag.
    pub fn amazon_search_url(&self) -> String {
        format!(
            "https://www.amazon.de/s?k=single+malt+whisky&tag={}",
            self.amazon_tag
        )
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(Config::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse config text over the stock defaults, then validate.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let overlay: toml::Value = toml::from_str(content)?;
    let merged = merge_toml(stock_defaults_value()?, overlay);
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `config.toml` from the project root.
///
/// The file is required: a missing file is [`ConfigError::Missing`].
pub fn load_config(root: &Path) -> Result<Config, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Err(ConfigError::Missing(config_path.display().to_string()));
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Whisky Magazin Configuration
# ============================
# Only [openai].api_key is required. Everything else shows its default.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Chat-completion API
# ---------------------------------------------------------------------------
[openai]
# Replace with your real key.
api_key = "sk-DEIN_OPENAI_API_KEY"
model = "gpt-4o"
# Sampling temperature for the article body (metadata always uses 0.3).
temperature = 0.7
# Output token budget for the article body.
max_tokens = 4000
# API root; /chat/completions is appended.
base_url = "https://api.openai.com/v1"
# Per-request timeout in seconds.
timeout_secs = 120

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "Whisky Magazin"
tagline = "Single Malts, Destillerien und die schönsten Whisky-Reisen"
author = "Ellas"
# Prefix for all links, e.g. "https://magazin.example.com". Empty = root-relative.
base_url = ""
# External brand site linked from navigation and footer.
home_url = "https://www.whisky.reise"

# ---------------------------------------------------------------------------
# Article length
# ---------------------------------------------------------------------------
[content_settings]
min_word_count = 1200
max_word_count = 2500

# ---------------------------------------------------------------------------
# Affiliate links
# ---------------------------------------------------------------------------
[affiliate_links]
amazon_tag = "deintag-21"

[[affiliate_links.whisky_shops]]
name = "Whisky.de"
url_template = "https://www.whisky.de/shop/suche?q={produkt}"

[[affiliate_links.whisky_shops]]
name = "Amazon"
url_template = "https://www.amazon.de/s?k={produkt}&tag=deintag-21"

[affiliate_links.travel_links]
faehre = "https://www.directferries.de/"
hotels = "https://www.booking.com/"
mietwagen = "https://www.check24.de/mietwagen/"
"##
}
