//! CLI output formatting for every command.
//!
//! Diagnostics go through `tracing` on stderr; this module renders the
//! operator-facing reports on stdout: batch tallies, build summaries, the
//! stats screen, the interactive menu and config guidance.
//!
//! # Output Format
//!
//! ## Batch
//!
//! ```text
//! ====================================
//! ERGEBNIS: 2/3 Artikel generiert
//! ====================================
//! Fehlgeschlagen:
//!     Islay entdecken: API failed after 3 attempts: ...
//! ```
//!
//! ## Stats
//!
//! ```text
//! Artikel generiert:   12
//! Themen verwendet:    12 / 73
//! Themen übrig:        61
//! Fortschritt:         [####---------------------] 16%
//! Reicht noch für:     ca. 20 Wochen (bei 3/Woche)
//!
//! Artikel nach Kategorie:
//!     Whisky: 7
//!     Reise: 5
//!
//! Letzte 5 Artikel:
//!     05.03.2025  Islay entdecken
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::config::ConfigError;
use crate::pipeline::{BatchReport, Stats};
use crate::retry::RetryError;
use crate::site::BuildSummary;
use std::path::Path;

const RULE: &str = "====================================";
const BAR_WIDTH: usize = 25;

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Batch
// ============================================================================

pub fn format_batch_report(report: &BatchReport) -> Vec<String> {
    let mut lines = vec![
        RULE.to_string(),
        format!(
            "ERGEBNIS: {}/{} Artikel generiert",
            report.successes, report.total
        ),
        RULE.to_string(),
    ];
    if !report.failures.is_empty() {
        lines.push("Fehlgeschlagen:".to_string());
        for (title, err) in &report.failures {
            lines.push(format!("{}{title}: {err}", indent(1)));
        }
    }
    lines
}

pub fn print_batch_report(report: &BatchReport) {
    for line in format_batch_report(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_summary(summary: &BuildSummary, site_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    if summary.articles_found == 0 {
        lines.push("Noch keine Artikel vorhanden. Generiere zuerst welche.".to_string());
    }
    lines.push(format!("Artikelseiten:   {}", summary.article_pages));
    if summary.skipped > 0 {
        lines.push(format!("{}ohne Slug übersprungen: {}", indent(1), summary.skipped));
    }
    lines.push(format!("Kategorieseiten: {}", summary.category_pages));
    lines.push(format!("Sitemap:         {} URLs", summary.sitemap_urls));
    lines.push(format!("Website bereit unter {}", site_dir.display()));
    lines
}

pub fn print_build_summary(summary: &BuildSummary, site_dir: &Path) {
    for line in format_build_summary(summary, site_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Stats
// ============================================================================

/// `[####-----]` for `percent` of `width`, clamped to full.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((width as f64 * percent / 100.0) as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

pub fn format_stats(stats: &Stats) -> Vec<String> {
    let mut lines = vec![
        format!("Artikel generiert:   {}", stats.articles),
        format!(
            "Themen verwendet:    {} / {}",
            stats.topics_used, stats.topics_total
        ),
        format!("Themen übrig:        {}", stats.topics_remaining()),
    ];
    if stats.topics_total > 0 {
        lines.push(format!(
            "Fortschritt:         {} {:.0}%",
            progress_bar(stats.progress_percent(), BAR_WIDTH),
            stats.progress_percent()
        ));
    }
    if stats.topics_remaining() > 0 {
        lines.push(format!(
            "Reicht noch für:     ca. {:.0} Wochen (bei 3/Woche)",
            stats.weeks_left()
        ));
    }

    if !stats.by_category.is_empty() {
        lines.push(String::new());
        lines.push("Artikel nach Kategorie:".to_string());
        for (category, count) in &stats.by_category {
            lines.push(format!("{}{category}: {count}", indent(1)));
        }
    }

    if stats.errors > 0 {
        lines.push(String::new());
        lines.push(format!("Fehler im Log: {}", stats.errors));
    }

    if !stats.recent.is_empty() {
        lines.push(String::new());
        lines.push(format!("Letzte {} Artikel:", stats.recent.len()));
        for (date, title) in &stats.recent {
            lines.push(format!("{}{date}  {title}", indent(1)));
        }
    }
    lines
}

pub fn print_stats(stats: &Stats) {
    for line in format_stats(stats) {
        println!("{}", line);
    }
}

// ============================================================================
// Connection test
// ============================================================================

pub fn format_test_result(result: &Result<String, RetryError>) -> Vec<String> {
    match result {
        Ok(reply) => vec![
            "API OK!".to_string(),
            format!("Antwort: {reply}"),
            "Alles bereit, du kannst jetzt Artikel generieren.".to_string(),
        ],
        Err(e) => vec![
            format!("FEHLER: {e}"),
            "Bitte prüfe API-Key und Modell in config.toml.".to_string(),
        ],
    }
}

pub fn print_test_result(result: &Result<String, RetryError>) {
    for line in format_test_result(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Menu and guidance
// ============================================================================

pub fn format_menu(article_count: usize) -> Vec<String> {
    vec![
        "Was möchtest du tun?".to_string(),
        String::new(),
        "[1] Verbindung testen".to_string(),
        "[2] Einen Artikel generieren + Website bauen".to_string(),
        "[3] Drei Artikel generieren + Website bauen".to_string(),
        format!("[4] Website bauen (aus {article_count} Artikeln)"),
        "[5] Komplett: Artikel generieren + Website bauen".to_string(),
        "[6] Website im Browser anzeigen".to_string(),
        "[7] Statistiken".to_string(),
        "[8] Beenden".to_string(),
    ]
}

pub fn print_menu(article_count: usize) {
    for line in format_menu(article_count) {
        println!("{}", line);
    }
}

/// What to tell the operator when the config cannot be used.
pub fn format_config_error(err: &ConfigError) -> Vec<String> {
    match err {
        ConfigError::Missing(path) => vec![
            format!("config.toml nicht gefunden: {path}"),
            "Erzeuge eine Vorlage mit 'whisky-magazin gen-config > config.toml'".to_string(),
            "und trage deinen API-Key ein.".to_string(),
        ],
        ConfigError::PlaceholderKey => vec![
            "FEHLER: Der API-Key ist noch nicht eingetragen!".to_string(),
            "Öffne config.toml und ersetze 'sk-DEIN_OPENAI_API_KEY' durch deinen echten Key."
                .to_string(),
        ],
        other => vec![
            format!("FEHLER in config.toml: {other}"),
            "Mit 'whisky-magazin gen-config' siehst du alle Optionen.".to_string(),
        ],
    }
}

pub fn print_config_error(err: &ConfigError) {
    for line in format_config_error(err) {
        eprintln!("{}", line);
    }
}
