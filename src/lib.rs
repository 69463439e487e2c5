//! # Whisky Magazin
//!
//! Writes German whisky and travel articles with a chat-completion API and
//! publishes them as a static website. No CMS, no database: every article
//! is a JSON file, and the site is rebuilt from those files.
//!
//! # Architecture: Generate, Store, Build
//!
//! ```text
//! 1. Select    catalog + used_topics.json  →  topic          (no repeats until exhausted)
//! 2. Generate  topic + config              →  ArticleRecord  (two API calls, retried)
//! 3. Store     ArticleRecord               →  articles/{date}_{slug}.json
//! 4. Build     articles/*.json             →  site/          (HTML pages + sitemap)
//! ```
//!
//! Generation and building are independent commands. A build only reads the
//! article files, so hand-edited or deleted articles show up on the next
//! build without touching the API.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Built-in topic catalog and the default category set |
//! | [`topics`] | Next-topic selection with category diversity |
//! | [`llm`] | Chat-completion client seam, request types, structured error kinds |
//! | [`retry`] | Exponential backoff for transient API failures |
//! | [`generator`] | Prompts, code-fence cleanup, metadata parsing with fallback |
//! | [`store`] | Article files, used-topic history, activity log |
//! | [`site`] | Maud-rendered article, index and category pages plus sitemap |
//! | [`pipeline`] | Batch generation, auto mode, connection test, stats |
//! | [`serve`] | Local preview server |
//! | [`config`] | `config.toml` loading, defaults, validation |
//! | [`naming`] | Slugs, page paths, German dates |
//! | [`types`] | Records shared between modules and stored on disk |
//! | [`output`] | CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Injected I/O Seams
//!
//! The API client ([`llm::ChatClient`]) and the wait between retries and
//! articles ([`retry::Sleeper`]) are traits. Tests drive the whole pipeline
//! with scripted completions and recorded delays, without network or clock.
//!
//! ## Structured Error Kinds
//!
//! Whether a failure is worth retrying is decided once, at the client
//! boundary, from HTTP status and the error body. Text matching is only the
//! fallback for errors that carry neither.
//!
//! ## Maud Over Template Engines
//!
//! Pages are rendered with [Maud](https://maud.lambda.xyz/): malformed HTML
//! is a build error and every interpolation is escaped, except the article
//! body, which is model-written HTML and inserted as-is.
//!
//! ## Deterministic Builds
//!
//! A build embeds no timestamps and no random choices. The same article
//! files always produce the same bytes.

pub mod catalog;
pub mod config;
pub mod generator;
pub mod llm;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod serve;
pub mod site;
pub mod store;
pub mod topics;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
