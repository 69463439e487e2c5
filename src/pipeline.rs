//! Command orchestration: batch generation, auto mode, connection test, stats.
//!
//! Everything here is sequential. A batch picks a topic, generates, saves,
//! records the topic as used, and moves on; a failed topic is logged and
//! counted but never stops the batch. Between articles the batch pauses a
//! random 3 to 8 seconds through the injected [`Sleeper`].

use crate::catalog::whisky_topics;
use crate::config::Config;
use crate::generator::{ArticleGenerator, GenerateError};
use crate::llm::{ChatClient, ChatMessage, ChatRequest};
use crate::naming::short_date;
use crate::retry::{RetryError, RetryPolicy, Sleeper, call_with_retry};
use crate::site::{self, BuildError, BuildSummary};
use crate::store::{ActivityLog, ArticleStore, StoreError, UsedTopicsLog};
use crate::topics::pick_next;
use crate::types::TopicDescriptor;
use chrono::{Local, NaiveDateTime};
use rand::Rng;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

/// Seconds to pause between two articles of a batch, inclusive.
const PAUSE_SECS: (u64, u64) = (3, 8);
const TEST_PROMPT: &str = "Sage 'Slainte Mhath!' und erklaere es in einem Satz auf Deutsch.";
const TEST_MAX_TOKENS: u32 = 30;
/// Failure label when the used-topic history cannot be read.
const HISTORY_LABEL: &str = "Themenverlauf";
/// How many titles the stats list shows.
pub const STATS_RECENT: usize = 5;
/// Stats truncate titles to this many characters.
pub const STATS_TITLE_WIDTH: usize = 45;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Build error: {0}")]
    Build(#[from] BuildError),
    #[error("Topic catalog is empty")]
    EmptyCatalog,
}

/// File layout below the project root.
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
    pub articles: PathBuf,
    pub site: PathBuf,
    pub used_topics: PathBuf,
    pub activity_log: PathBuf,
}

impl Paths {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            articles: root.join("articles"),
            site: root.join("site"),
            used_topics: root.join("used_topics.json"),
            activity_log: root.join("magazin.log"),
        }
    }

    pub fn store(&self) -> ArticleStore {
        ArticleStore::new(&self.articles)
    }

    pub fn used_topics_log(&self) -> UsedTopicsLog {
        UsedTopicsLog::new(&self.used_topics)
    }

    pub fn activity_log(&self) -> ActivityLog {
        ActivityLog::new(&self.activity_log)
    }
}

/// Result of one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub successes: usize,
    pub total: usize,
    /// `(topic title, error text)` per failed topic.
    pub failures: Vec<(String, String)>,
}

#[derive(Error, Debug)]
enum TopicError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything a command needs: where files live, config, and the I/O seams.
pub struct Pipeline<'a> {
    pub paths: &'a Paths,
    pub config: &'a Config,
    pub client: &'a dyn ChatClient,
    pub sleeper: &'a dyn Sleeper,
    pub retry: RetryPolicy,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        paths: &'a Paths,
        config: &'a Config,
        client: &'a dyn ChatClient,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            paths,
            config,
            client,
            sleeper,
            retry: RetryPolicy::default(),
        }
    }

    /// Generate `count` articles from the built-in catalog.
    pub fn generate_batch<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<BatchReport, PipelineError> {
        self.generate_batch_from(&whisky_topics(), count, rng)
    }

    /// Generate `count` articles, picking topics from `catalog`.
    pub fn generate_batch_from<R: Rng + ?Sized>(
        &self,
        catalog: &[TopicDescriptor],
        count: usize,
        rng: &mut R,
    ) -> Result<BatchReport, PipelineError> {
        let generator = ArticleGenerator::new(self.client, self.sleeper).with_policy(self.retry);
        let used_log = self.paths.used_topics_log();
        let activity = self.paths.activity_log();
        let store = self.paths.store();
        let mut report = BatchReport {
            total: count,
            ..BatchReport::default()
        };

        if catalog.is_empty() {
            return Err(PipelineError::EmptyCatalog);
        }

        for i in 0..count {
            info!("Article {} of {count}", i + 1);
            let now = Local::now().naive_local();
            match used_log.load() {
                Ok(history) => {
                    let topic = pick_next(catalog, &history, rng).ok_or(PipelineError::EmptyCatalog)?;
                    info!(
                        "Topic: {} (category {}, type {})",
                        topic.title, topic.category, topic.content_type
                    );
                    match self.write_one(&generator, &store, &used_log, topic, now) {
                        Ok(path) => {
                            info!("Saved {}", path.display());
                            log_activity(&activity, now, "GENERATED", &topic.title);
                            report.successes += 1;
                        }
                        Err(e) => {
                            error!("Failed to write {:?}: {e}", topic.title);
                            log_activity(&activity, now, "ERROR", &format!("{} | {e}", topic.title));
                            report.failures.push((topic.title.clone(), e.to_string()));
                        }
                    }
                }
                Err(e) => {
                    error!("Cannot read {}: {e}", self.paths.used_topics.display());
                    log_activity(&activity, now, "ERROR", &format!("{HISTORY_LABEL} | {e}"));
                    report.failures.push((HISTORY_LABEL.to_string(), e.to_string()));
                }
            }

            if i + 1 < count {
                let secs = rng.gen_range(PAUSE_SECS.0..=PAUSE_SECS.1);
                info!("Waiting {secs}s before the next article");
                self.sleeper.sleep(Duration::from_secs(secs));
            }
        }

        Ok(report)
    }

    fn write_one(
        &self,
        generator: &ArticleGenerator<'_>,
        store: &ArticleStore,
        used_log: &UsedTopicsLog,
        topic: &TopicDescriptor,
        now: NaiveDateTime,
    ) -> Result<PathBuf, TopicError> {
        let record = generator.generate(topic, self.config, now.date())?;
        let path = store.save(&record)?;
        used_log.record(&topic.title, &now.format("%Y-%m-%dT%H:%M:%S").to_string())?;
        Ok(path)
    }

    /// Rebuild the site from every stored article.
    pub fn build(&self) -> Result<BuildSummary, PipelineError> {
        let summary = site::build(self.config, &self.paths.articles, &self.paths.site)?;
        log_activity(
            &self.paths.activity_log(),
            Local::now().naive_local(),
            "BUILD",
            &format!("{} Seiten", summary.article_pages),
        );
        Ok(summary)
    }

    /// Generate a batch, then rebuild the site if anything succeeded.
    pub fn auto<R: Rng + ?Sized>(
        &self,
        count: usize,
        rng: &mut R,
    ) -> Result<(BatchReport, Option<BuildSummary>), PipelineError> {
        self.auto_from(&whisky_topics(), count, rng)
    }

    pub fn auto_from<R: Rng + ?Sized>(
        &self,
        catalog: &[TopicDescriptor],
        count: usize,
        rng: &mut R,
    ) -> Result<(BatchReport, Option<BuildSummary>), PipelineError> {
        let report = self.generate_batch_from(catalog, count, rng)?;
        let summary = if report.successes > 0 {
            Some(self.build()?)
        } else {
            None
        };
        Ok((report, summary))
    }

    /// One short round trip to check key and model.
    pub fn test_connection(&self) -> Result<String, RetryError> {
        let request = ChatRequest {
            model: self.config.openai.model.clone(),
            temperature: None,
            max_tokens: TEST_MAX_TOKENS,
            messages: vec![ChatMessage::user(TEST_PROMPT)],
        };
        call_with_retry(&self.retry, self.sleeper, || self.client.complete(&request))
    }
}

fn log_timestamp(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Append to the activity log. A failed write is reported but never aborts
/// the command that triggered it.
fn log_activity(activity: &ActivityLog, now: NaiveDateTime, action: &str, details: &str) {
    if let Err(e) = activity.append(&log_timestamp(now), action, details) {
        warn!("Could not write activity log ({action}): {e}");
    }
}

// ============================================================================
// Stats
// ============================================================================

/// Snapshot for the `stats` command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stats {
    pub articles: usize,
    pub topics_used: usize,
    pub topics_total: usize,
    /// Articles per category, most articles first.
    pub by_category: Vec<(String, usize)>,
    pub errors: usize,
    /// `(DD.MM.YYYY, truncated title)` of the newest articles.
    pub recent: Vec<(String, String)>,
}

impl Stats {
    pub fn topics_remaining(&self) -> usize {
        self.topics_total.saturating_sub(self.topics_used)
    }

    /// Share of the catalog already used, in percent.
    pub fn progress_percent(&self) -> f64 {
        if self.topics_total == 0 {
            return 0.0;
        }
        self.topics_used as f64 / self.topics_total as f64 * 100.0
    }

    /// Weeks of material left at three articles a week.
    pub fn weeks_left(&self) -> f64 {
        self.topics_remaining() as f64 / 3.0
    }
}

/// Gather stats from the files under `paths`.
pub fn collect_stats(paths: &Paths, catalog_size: usize) -> Result<Stats, PipelineError> {
    let articles = paths.store().load_all()?;
    let used = paths.used_topics_log().load()?;
    let errors = paths.activity_log().error_count()?;

    let mut by_category: Vec<(String, usize)> = Vec::new();
    for article in &articles {
        match by_category.iter_mut().find(|(c, _)| *c == article.category) {
            Some((_, n)) => *n += 1,
            None => by_category.push((article.category.clone(), 1)),
        }
    }
    // Stable: ties keep first-seen order.
    by_category.sort_by(|a, b| b.1.cmp(&a.1));

    let recent = articles
        .iter()
        .take(STATS_RECENT)
        .map(|a| {
            (
                short_date(&a.date),
                a.title.chars().take(STATS_TITLE_WIDTH).collect(),
            )
        })
        .collect();

    Ok(Stats {
        articles: articles.len(),
        topics_used: used.len(),
        topics_total: catalog_size,
        by_category,
        errors,
        recent,
    })
}
