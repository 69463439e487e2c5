//! Static site generation.
//!
//! Turns every stored [`ArticleRecord`] into a browsable HTML site. The build
//! is a pure function of the records and the config: no timestamps, no
//! randomness, so rebuilding unchanged input rewrites identical bytes.
//!
//! ## Generated Pages
//!
//! - **Article pages** (`/artikel/{slug}.html`): header, body, tags, a
//!   sidebar of recent articles and two call-to-action boxes
//! - **Index page** (`/index.html`): hero, the 12 newest articles as cards,
//!   category counts, tag cloud, shop CTA and an about box
//! - **Category pages** (`/kategorie/{name}.html`): one per category seen in
//!   the records plus the default set, matched case-insensitively
//! - **Sitemap** (`/sitemap.xml`): the index followed by every article page
//!
//! ## Output Structure
//!
//! ```text
//! site/
//! ├── index.html
//! ├── sitemap.xml
//! ├── artikel/
//! │   ├── islay-entdecken.html
//! │   └── ...
//! └── kategorie/
//!     ├── whisky.html
//!     ├── reise.html
//!     └── ...
//! ```
//!
//! Records without a usable slug are left out of every page; they have
//! nothing to link to. Files from earlier builds that are not rewritten stay
//! in place.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Titles, teasers and tags are escaped; the article body is model-written
//! HTML and is inserted as-is.

use crate::catalog::DEFAULT_CATEGORIES;
use crate::config::Config;
use crate::naming::{article_path, category_file_stem, category_path, german_date, is_url_safe};
use crate::store::{ArticleStore, StoreError};
use crate::types::ArticleRecord;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// What a build wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    pub articles_found: usize,
    pub article_pages: usize,
    /// Records without a usable slug.
    pub skipped: usize,
    pub category_pages: usize,
    pub sitemap_urls: usize,
}

const CSS: &str = include_str!("../static/style.css");
const INDEX_CARD_LIMIT: usize = 12;
const SIDEBAR_RECENT_LIMIT: usize = 5;
const TAG_CLOUD_LIMIT: usize = 20;
const INDEX_KEYWORDS: &str = "Whisky, Scotch, Single Malt, Reise, Schottland, Destillerien";
const EMPTY_CATEGORY_NOTE: &str = "Noch keine Artikel in dieser Kategorie.";

/// Load every record from `articles_dir` and build the site into `output_dir`.
pub fn build(
    config: &Config,
    articles_dir: &Path,
    output_dir: &Path,
) -> Result<BuildSummary, BuildError> {
    let articles = ArticleStore::new(articles_dir).load_all()?;
    info!("{} articles found", articles.len());
    build_site(&articles, config, output_dir)
}

/// Build the site from already loaded records (newest first).
pub fn build_site(
    articles: &[ArticleRecord],
    config: &Config,
    output_dir: &Path,
) -> Result<BuildSummary, BuildError> {
    fs::create_dir_all(output_dir.join("artikel"))?;
    fs::create_dir_all(output_dir.join("kategorie"))?;

    let mut summary = BuildSummary {
        articles_found: articles.len(),
        ..BuildSummary::default()
    };

    for article in articles {
        let Some(slug) = page_slug(article) else {
            warn!("Skipping {:?}: no usable slug", article.title);
            summary.skipped += 1;
            continue;
        };
        let page = render_article_page(article, articles, config);
        fs::write(output_dir.join(article_path(slug)), page.into_string())?;
        summary.article_pages += 1;
    }
    info!("{} article pages written", summary.article_pages);

    fs::write(
        output_dir.join("index.html"),
        render_index(articles, config).into_string(),
    )?;

    let categories = category_set(articles);
    for category in &categories {
        let page = render_category_page(category, articles, config);
        fs::write(output_dir.join(category_path(category)), page.into_string())?;
    }
    summary.category_pages = categories.len();
    info!("{} category pages written", summary.category_pages);

    let sitemap = render_sitemap(articles, config);
    summary.sitemap_urls = sitemap.matches("<loc>").count();
    fs::write(output_dir.join("sitemap.xml"), sitemap)?;

    info!("Site ready at {}", output_dir.display());
    Ok(summary)
}

/// The slug a page is written under, if the record can have one.
fn page_slug(article: &ArticleRecord) -> Option<&str> {
    article.slug().filter(|slug| is_url_safe(slug))
}

fn linkable(articles: &[ArticleRecord]) -> impl Iterator<Item = (&ArticleRecord, &str)> {
    articles
        .iter()
        .filter_map(|a| page_slug(a).map(|slug| (a, slug)))
}

/// Every category present in `articles` plus the defaults, one entry per
/// page file stem. The first spelling seen wins, records before
/// defaults.
pub fn category_set(articles: &[ArticleRecord]) -> Vec<String> {
    let mut by_key: BTreeMap<String, String> = BTreeMap::new();
    let names = articles
        .iter()
        .map(|a| a.category.as_str())
        .chain(DEFAULT_CATEGORIES.iter().copied());
    for name in names {
        by_key
            .entry(category_file_stem(name))
            .or_insert_with(|| name.to_string());
    }
    by_key.into_values().collect()
}

fn site_url(config: &Config, path: &str) -> String {
    format!("{}/{}", config.site.base_url.trim_end_matches('/'), path)
}

// ============================================================================
// HTML Components
// ============================================================================

/// Head metadata for one page.
struct PageHead<'a> {
    title: &'a str,
    description: &'a str,
    keywords: &'a str,
    og_description: &'a str,
    og_type: &'a str,
    canonical: String,
}

/// Renders the base HTML document shared by every page.
fn base_document(head: &PageHead, config: &Config, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="de" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (head.title) " | " (config.site.name) }
                meta name="description" content=(head.description);
                meta name="keywords" content=(head.keywords);
                meta property="og:title" content=(head.title);
                meta property="og:description" content=(head.og_description);
                meta property="og:type" content=(head.og_type);
                link rel="canonical" href=(head.canonical);
                style { (PreEscaped(CSS)) }
            }
            body {
                (site_header(config))
                (content)
                (site_footer(config))
            }
        }
    }
}

fn site_header(config: &Config) -> Markup {
    html! {
        header.site-header {
            div.header-inner {
                a.logo href=(site_url(config, "index.html")) { "WHISKY" span { ".MAGAZIN" } }
                nav.site-nav {
                    a href=(site_url(config, "index.html")) { "Start" }
                    @for category in ["Whisky", "Reise", "Lifestyle"] {
                        a href=(site_url(config, &category_path(category))) { (category) }
                    }
                    a href=(config.site.home_url) target="_blank" rel="noopener" { "whisky.reise" }
                }
            }
        }
    }
}

fn site_footer(config: &Config) -> Markup {
    html! {
        footer.site-footer {
            p {
                "Ein Projekt von "
                a href=(config.site.home_url) { "whisky.reise" }
                ", rund um Whisky, Reisen und gutes Leben."
            }
            p.footer-note {
                "* Affiliate-Links: Kaufst du über markierte Links, bekommen wir eine kleine Provision."
            }
        }
    }
}

fn article_card(article: &ArticleRecord, slug: &str, config: &Config, show_category: bool) -> Markup {
    let href = site_url(config, &article_path(slug));
    html! {
        div.article-card {
            div.card-body {
                div.card-meta {
                    @if show_category {
                        span.cat { (article.category) }
                    }
                    span { (german_date(&article.date)) }
                }
                h2 { a href=(href) { (article.title) } }
                p.teaser { (article.teaser()) }
                a.read-more href=(href) { "Weiterlesen →" }
            }
        }
    }
}

fn shop_cta(config: &Config, heading: &str, text: &str, label: &str) -> Markup {
    html! {
        div.cta-box {
            h3 { (heading) }
            p { (text) }
            a href=(config.affiliate_links.amazon_search_url()) target="_blank" rel="noopener noreferrer" { (label) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders one article page. `all` supplies the recent-articles sidebar.
pub fn render_article_page(article: &ArticleRecord, all: &[ArticleRecord], config: &Config) -> Markup {
    let recent: Vec<(&ArticleRecord, &str)> = linkable(all)
        .filter(|(other, _)| !std::ptr::eq(*other, article))
        .take(SIDEBAR_RECENT_LIMIT)
        .collect();
    let own_slug = article.slug().unwrap_or_default();
    let meta = &article.meta;

    let content = html! {
        div.article-header {
            h1 { (article.title) }
            div.meta-line {
                (german_date(&article.date)) " • " (article.category) " • von " (config.site.author)
            }
        }
        div.container {
            div.content-grid {
                main {
                    div.article-body {
                        (PreEscaped(&article.html_content))
                        @if !article.tags.is_empty() {
                            div.article-tags {
                                div.tag-cloud {
                                    @for tag in &article.tags {
                                        span.tag { (tag) }
                                    }
                                }
                            }
                        }
                    }
                }
                aside.sidebar {
                    div.sidebar-box {
                        h3 { "Neueste Artikel" }
                        ul {
                            @for (other, slug) in &recent {
                                li { a href=(site_url(config, &article_path(slug))) { (other.title) } }
                            }
                        }
                    }
                    (shop_cta(config, "Whisky entdecken", "Finde deinen nächsten Lieblings-Dram", "Whisky bei Amazon →"))
                    div.cta-box {
                        h3 { "Schottland-Reise planen" }
                        p { "Fähren, Flüge und Hotels" }
                        a href=(config.affiliate_links.ferry_url()) target="_blank" rel="noopener noreferrer" { "Fähre buchen →" }
                    }
                }
            }
        }
    };

    let description = if meta.meta_description.is_empty() {
        article.title.as_str()
    } else {
        meta.meta_description.as_str()
    };
    let og_description = if meta.og_description.is_empty() {
        meta.meta_description.as_str()
    } else {
        meta.og_description.as_str()
    };
    let head = PageHead {
        title: &article.title,
        description,
        keywords: &meta.keywords,
        og_description,
        og_type: "article",
        canonical: site_url(config, &article_path(own_slug)),
    };
    base_document(&head, config, content)
}

/// Renders the index page.
pub fn render_index(articles: &[ArticleRecord], config: &Config) -> Markup {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut tags: BTreeSet<&str> = BTreeSet::new();
    for article in articles {
        *counts.entry(article.category.as_str()).or_insert(0) += 1;
        tags.extend(article.tags.iter().map(String::as_str));
    }

    let content = html! {
        div.hero {
            h1 { (config.site.name) }
            p { (config.site.tagline) }
        }
        div.container {
            div.content-grid {
                main {
                    @for (article, slug) in linkable(articles).take(INDEX_CARD_LIMIT) {
                        (article_card(article, slug, config, true))
                    }
                }
                aside.sidebar {
                    div.sidebar-box {
                        h3 { "Kategorien" }
                        ul {
                            @for (category, count) in &counts {
                                li { a href=(site_url(config, &category_path(category))) { (category) " (" (count) ")" } }
                            }
                        }
                    }
                    div.sidebar-box {
                        h3 { "Schlagwörter" }
                        div.tag-cloud {
                            @for tag in tags.iter().take(TAG_CLOUD_LIMIT) {
                                span.tag { (tag) }
                            }
                        }
                    }
                    (shop_cta(config, "Whisky shoppen", "Die besten Single Malts auf einen Blick", "Jetzt entdecken →"))
                    div.sidebar-box {
                        h3 { "Über uns" }
                        p.about-text {
                            "Wir lieben Whisky und das Reisen. Hier erzählen wir von Single Malts, "
                            "Destillerien und den schönsten Whisky-Regionen der Welt."
                        }
                        p { a href=(config.site.home_url) target="_blank" rel="noopener" { "→ Mehr auf whisky.reise" } }
                    }
                }
            }
        }
    };

    let head = PageHead {
        title: "Start",
        description: &config.site.tagline,
        keywords: INDEX_KEYWORDS,
        og_description: &config.site.tagline,
        og_type: "website",
        canonical: site_url(config, "index.html"),
    };
    base_document(&head, config, content)
}

/// Renders the page for `category`, listing matching articles.
pub fn render_category_page(category: &str, articles: &[ArticleRecord], config: &Config) -> Markup {
    let key = category_file_stem(category);
    let matching: Vec<(&ArticleRecord, &str)> = linkable(articles)
        .filter(|(a, _)| category_file_stem(&a.category) == key)
        .collect();

    let title = format!("Kategorie: {category}");
    let description = format!("Alle Artikel in der Kategorie {category}");

    let content = html! {
        div.article-header {
            h1 { (title) }
            div.meta-line { (matching.len()) " Artikel" }
        }
        div.container {
            div.content-grid {
                main {
                    @for (article, slug) in &matching {
                        (article_card(article, slug, config, false))
                    }
                    @if matching.is_empty() {
                        p.empty-note { (EMPTY_CATEGORY_NOTE) }
                    }
                }
                aside.sidebar {
                    div.cta-box {
                        h3 { "Alle Artikel" }
                        p { "Zurück zur Übersicht" }
                        a href=(site_url(config, "index.html")) { "Zur Startseite →" }
                    }
                }
            }
        }
    };

    let head = PageHead {
        title: &title,
        description: &description,
        keywords: category,
        og_description: &description,
        og_type: "website",
        canonical: site_url(config, &category_path(category)),
    };
    base_document(&head, config, content)
}

/// Renders `sitemap.xml`: the index first, then articles in store order.
pub fn render_sitemap(articles: &[ArticleRecord], config: &Config) -> String {
    let urls = std::iter::once(site_url(config, "index.html")).chain(
        linkable(articles).map(|(_, slug)| site_url(config, &article_path(slug))),
    );

    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for url in urls {
        xml.push_str("  <url><loc>");
        xml.push_str(&xml_escape(&url));
        xml.push_str("</loc></url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn read(dir: &Path, rel: &str) -> String {
        fs::read_to_string(dir.join(rel)).unwrap()
    }

    fn sample_articles() -> Vec<ArticleRecord> {
        vec![
            record("Speyside entdecken", "Whisky", "speyside-entdecken", "2025-03-07"),
            record("Edinburgh im Winter", "Reise", "edinburgh-im-winter", "2025-03-06"),
            record("Islay entdecken", "whisky", "islay-entdecken", "2025-03-05"),
        ]
    }

    // =========================================================================
    // Article pages
    // =========================================================================

    #[test]
    fn article_page_has_title_meta_and_body() {
        let config = sample_config();
        let articles = sample_articles();
        let html = render_article_page(&articles[0], &articles, &config).into_string();

        assert!(html.contains("<title>Speyside entdecken | Whisky Magazin</title>"));
        assert!(html.contains("<h2>Speyside entdecken</h2><p>Text über Speyside entdecken.</p>"));
        assert!(html.contains("7. März 2025 • Whisky • von Ellas"));
        assert!(html.contains(
            r#"<link rel="canonical" href="https://magazin.example/artikel/speyside-entdecken.html">"#
        ));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains(r#"<html lang="de">"#));
    }

    #[test]
    fn article_page_escapes_title_but_not_body() {
        let config = sample_config();
        let mut article = record("Whisky <&> Käse", "Lifestyle", "whisky-kaese", "2025-03-05");
        article.html_content = "<p><strong>Slàinte</strong></p>".to_string();
        let html = render_article_page(&article, &[], &config).into_string();
        assert!(html.contains("Whisky &lt;&amp;&gt; Käse"));
        assert!(html.contains("<p><strong>Slàinte</strong></p>"));
    }

    #[test]
    fn sidebar_lists_other_articles_only() {
        let config = sample_config();
        let mut articles: Vec<ArticleRecord> = (0..8)
            .map(|i| record(&format!("Artikel {i}"), "Whisky", &format!("artikel-{i}"), "2025-01-01"))
            .collect();
        articles.insert(1, record("Ohne Slug", "Whisky", "", "2025-01-01"));

        let html = render_article_page(&articles[0], &articles, &config).into_string();
        let sidebar = html.split("Neueste Artikel").nth(1).unwrap();
        let sidebar = sidebar.split("</ul>").next().unwrap();
        assert_eq!(count_occurrences(sidebar, "<li>"), 5);
        assert!(!sidebar.contains("artikel-0.html"));
        assert!(!sidebar.contains("Ohne Slug"));
        assert!(sidebar.contains("artikel-1.html"));
        assert!(sidebar.contains("artikel-5.html"));
        assert!(!sidebar.contains("artikel-6.html"));
    }

    #[test]
    fn sidebar_keeps_other_article_sharing_the_slug() {
        let config = sample_config();
        let articles = vec![
            record("Islay entdecken", "Whisky", "islay-entdecken", "2025-03-07"),
            record("Islay entdecken (alt)", "Whisky", "islay-entdecken", "2025-01-02"),
        ];

        let html = render_article_page(&articles[0], &articles, &config).into_string();
        let sidebar = html.split("Neueste Artikel").nth(1).unwrap();
        let sidebar = sidebar.split("</ul>").next().unwrap();
        assert_eq!(count_occurrences(sidebar, "<li>"), 1);
        assert!(sidebar.contains("Islay entdecken (alt)"));
    }

    #[test]
    fn article_page_ctas_use_affiliate_links() {
        let config = sample_config();
        let articles = sample_articles();
        let html = render_article_page(&articles[0], &articles, &config).into_string();
        assert!(html.contains("https://www.amazon.de/s?k=single+malt+whisky&amp;tag=magazin-21"));
        assert!(html.contains(r#"href="https://www.directferries.de/""#));

        let mut no_ferry = config.clone();
        no_ferry.affiliate_links.travel_links.clear();
        let html = render_article_page(&articles[0], &articles, &no_ferry).into_string();
        assert!(html.contains(r##"href="#""##));
    }

    // =========================================================================
    // Index
    // =========================================================================

    #[test]
    fn index_shows_at_most_twelve_cards() {
        let config = sample_config();
        let articles: Vec<ArticleRecord> = (0..15)
            .map(|i| record(&format!("Artikel {i}"), "Whisky", &format!("artikel-{i}"), "2025-01-01"))
            .collect();
        let html = render_index(&articles, &config).into_string();
        assert_eq!(count_occurrences(&html, r#"class="article-card""#), 12);
        assert!(html.contains("artikel-11.html"));
        assert!(!html.contains("artikel-12.html"));
    }

    #[test]
    fn index_counts_categories_alphabetically() {
        let config = sample_config();
        let articles = vec![
            record("A", "Whisky", "a", "2025-01-03"),
            record("B", "Reise", "b", "2025-01-02"),
            record("C", "Whisky", "c", "2025-01-01"),
        ];
        let html = render_index(&articles, &config).into_string();
        let reise = html.find("Reise (1)").unwrap();
        let whisky = html.find("Whisky (2)").unwrap();
        assert!(reise < whisky);
        assert!(html.contains("<title>Start | Whisky Magazin</title>"));
    }

    #[test]
    fn tag_cloud_is_sorted_and_capped() {
        let config = sample_config();
        let mut article = record("Viele Tags", "Whisky", "viele-tags", "2025-01-01");
        article.tags = (0..30).rev().map(|i| format!("tag{i:02}")).collect();
        let html = render_index(&[article], &config).into_string();
        let cloud = html.split("Schlagwörter").nth(1).unwrap();
        let cloud = cloud.split("</div>").next().unwrap();
        assert_eq!(count_occurrences(cloud, r#"class="tag""#), 20);
        assert!(cloud.find("tag00").unwrap() < cloud.find("tag19").unwrap());
        assert!(!cloud.contains("tag20"));
    }

    #[test]
    fn card_teaser_falls_back_to_meta_description() {
        let config = sample_config();
        let mut article = record("Islay", "Whisky", "islay", "2025-01-01");
        article.meta.teaser.clear();
        let html = render_index(&[article], &config).into_string();
        assert!(html.contains(r#"<p class="teaser">Alles über Islay</p>"#));
    }

    // =========================================================================
    // Categories
    // =========================================================================

    #[test]
    fn category_set_merges_case_insensitively() {
        let articles = vec![
            record("A", "whisky", "a", "2025-01-01"),
            record("B", "Whisky", "b", "2025-01-01"),
            record("C", "Genuss", "c", "2025-01-01"),
        ];
        let set = category_set(&articles);
        assert_eq!(set, vec!["Genuss", "Lifestyle", "Natur", "Reise", "Urlaub", "whisky"]);
    }

    #[test]
    fn category_page_matches_case_insensitively() {
        let config = sample_config();
        let html = render_category_page("Whisky", &sample_articles(), &config).into_string();
        assert_eq!(count_occurrences(&html, r#"class="article-card""#), 2);
        assert!(html.contains("Kategorie: Whisky"));
        assert!(html.contains("2 Artikel"));
    }

    #[test]
    fn empty_category_shows_placeholder() {
        let config = sample_config();
        let html = render_category_page("Natur", &sample_articles(), &config).into_string();
        assert!(html.contains("Noch keine Artikel in dieser Kategorie."));
        assert_eq!(count_occurrences(&html, r#"class="article-card""#), 0);
    }

    // =========================================================================
    // Sitemap
    // =========================================================================

    #[test]
    fn sitemap_lists_index_then_articles() {
        let config = sample_config();
        let mut articles = sample_articles();
        articles.push(record("Ohne Slug", "Whisky", "", "2025-01-01"));
        let xml = render_sitemap(&articles, &config);
        let locs: Vec<&str> = xml
            .lines()
            .filter_map(|l| l.trim().strip_prefix("<url><loc>"))
            .filter_map(|l| l.strip_suffix("</loc></url>"))
            .collect();
        assert_eq!(
            locs,
            vec![
                "https://magazin.example/index.html",
                "https://magazin.example/artikel/speyside-entdecken.html",
                "https://magazin.example/artikel/edinburgh-im-winter.html",
                "https://magazin.example/artikel/islay-entdecken.html",
            ]
        );
    }

    #[test]
    fn empty_base_url_gives_root_relative_links() {
        let mut config = sample_config();
        config.site.base_url.clear();
        let xml = render_sitemap(&sample_articles(), &config);
        assert!(xml.contains("<loc>/index.html</loc>"));
    }

    // =========================================================================
    // Full build
    // =========================================================================

    #[test]
    fn build_writes_all_pages() {
        let tmp = TempDir::new().unwrap();
        let config = sample_config();
        let mut articles = sample_articles();
        articles.push(record("Ohne Slug", "Natur", "", "2025-01-01"));

        let summary = build_site(&articles, &config, tmp.path()).unwrap();
        assert_eq!(
            summary,
            BuildSummary {
                articles_found: 4,
                article_pages: 3,
                skipped: 1,
                category_pages: 5,
                sitemap_urls: 4,
            }
        );
        assert!(tmp.path().join("index.html").exists());
        assert!(tmp.path().join("artikel/islay-entdecken.html").exists());
        assert!(tmp.path().join("kategorie/urlaub.html").exists());
        assert_eq!(
            count_occurrences(&read(tmp.path(), "kategorie/whisky.html"), r#"class="article-card""#),
            2
        );
    }

    #[test]
    fn build_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let config = sample_config();
        let articles = sample_articles();

        build_site(&articles, &config, tmp.path()).unwrap();
        let first: Vec<String> = ["index.html", "sitemap.xml", "kategorie/reise.html", "artikel/islay-entdecken.html"]
            .iter()
            .map(|p| read(tmp.path(), p))
            .collect();
        build_site(&articles, &config, tmp.path()).unwrap();
        let second: Vec<String> = ["index.html", "sitemap.xml", "kategorie/reise.html", "artikel/islay-entdecken.html"]
            .iter()
            .map(|p| read(tmp.path(), p))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn unsafe_slug_is_not_written() {
        let tmp = TempDir::new().unwrap();
        let config = sample_config();
        let articles = vec![record("Böse", "Whisky", "../../etc/x", "2025-01-01")];
        let summary = build_site(&articles, &config, tmp.path()).unwrap();
        assert_eq!(summary.article_pages, 0);
        assert_eq!(summary.skipped, 1);
    }

    #[test]
    fn category_names_cannot_escape_the_site() {
        let tmp = TempDir::new().unwrap();
        let site = tmp.path().join("site");
        let config = sample_config();
        let articles = vec![
            record("Tasting-Notizen", "Whisky/Tasting", "tasting-notizen", "2025-01-02"),
            record("Ausbruch", "../../escaped", "ausbruch", "2025-01-01"),
        ];

        let summary = build_site(&articles, &config, &site).unwrap();
        assert_eq!(summary.article_pages, 2);
        assert!(site.join("kategorie/whiskytasting.html").exists());
        assert!(site.join("kategorie/escaped.html").exists());
        assert!(!tmp.path().join("escaped.html").exists());

        let index = read(&site, "index.html");
        assert!(index.contains("kategorie/whiskytasting.html"));
        assert!(index.contains("kategorie/escaped.html"));
        let page = read(&site, "kategorie/whiskytasting.html");
        assert!(page.contains("tasting-notizen.html"));
    }

    #[test]
    fn build_from_empty_store_still_writes_index_and_categories() {
        let tmp = TempDir::new().unwrap();
        let summary = build(&sample_config(), &tmp.path().join("articles"), &tmp.path().join("site")).unwrap();
        assert_eq!(summary.articles_found, 0);
        assert_eq!(summary.category_pages, 5);
        assert!(tmp.path().join("site/index.html").exists());
        assert!(tmp.path().join("site/kategorie/whisky.html").exists());
    }
}
