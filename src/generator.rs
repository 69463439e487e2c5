//! Article generation: two chat-completion calls per topic.
//!
//! 1. The body call returns an HTML fragment written to the topic's title,
//!    content type, word range and the configured affiliate links.
//! 2. The metadata call returns a small JSON object with SEO fields.
//!
//! Both run under the retry policy. A metadata answer that is not valid JSON
//! never fails the article: a fallback block is derived from the topic. The
//! slug always ends up URL-safe, whichever path produced it.

use crate::config::{AffiliateLinks, Config, ContentSettings};
use crate::llm::{ApiError, ChatClient, ChatMessage, ChatRequest};
use crate::naming::{german_long_date, slugify};
use crate::retry::{RetryError, RetryPolicy, Sleeper, call_with_retry};
use crate::types::{ArticleRecord, ContentType, MetaBlock, TopicDescriptor};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

const BODY_SYSTEM_PROMPT: &str =
    "Du bist ein professioneller Blog-Autor. Antworte nur mit HTML-Inhalt.";
const META_SYSTEM_PROMPT: &str = "Du bist ein SEO-Experte. Antworte nur mit validem JSON.";
const META_TEMPERATURE: f64 = 0.3;
const META_MAX_TOKENS: u32 = 500;
/// Slug used when neither the model nor the title yields one.
pub const FALLBACK_SLUG: &str = "artikel";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("API error: {0}")]
    Api(ApiError),
    #[error("API failed after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: ApiError },
}

impl From<RetryError> for GenerateError {
    fn from(err: RetryError) -> Self {
        match err {
            RetryError::Permanent(e) => GenerateError::Api(e),
            RetryError::RetriesExhausted { attempts, last } => {
                GenerateError::RetriesExhausted { attempts, last }
            }
        }
    }
}

// ============================================================================
// Prompts
// ============================================================================

fn type_instruction(content_type: ContentType) -> &'static str {
    match content_type {
        ContentType::Guide => {
            "Ein praktischer Guide: konkrete Tipps, Empfehlungen und nuetzliche Infos, \
             gern mit Infoboxen und Hinweisen fuer unterwegs."
        }
        ContentType::Review => {
            "Eine ehrliche, ausfuehrliche Review mit Verkostungsnotizen, Aromen und \
             deiner persoenlichen Einschaetzung. Schliesse mit einer Gesamtbewertung."
        }
        ContentType::Listicle => {
            "Ein Listen-Artikel mit nummerierten Punkten. Jeder Punkt bekommt eine klare \
             Beschreibung und eine praktische Empfehlung."
        }
        ContentType::Article => {
            "Ein gut recherchierter, informativer Artikel mit spannenden Fakten und \
             persoenlichen Einschaetzungen."
        }
    }
}

/// The body prompt for `topic`.
pub fn build_article_prompt(
    topic: &TopicDescriptor,
    links: &AffiliateLinks,
    settings: &ContentSettings,
    author: &str,
) -> String {
    let shop_lines: Vec<String> = links
        .whisky_shops
        .iter()
        .map(|shop| format!("- {}: {}", shop.name, shop.url_template))
        .collect();
    let travel_lines: Vec<String> = links
        .travel_links
        .iter()
        .map(|(name, url)| format!("- {name}: {url}"))
        .collect();

    format!(
        "Du schreibst als {author}, Whisky-Kennerin und Reisebloggerin, die seit Jahren \
durch Schottland und die Welt reist. Dein Ton ist warm, persoenlich und fachkundig. \
Du schreibst auf Deutsch und duzt deine Leser.

THEMA: \"{title}\"

ART DES ARTIKELS: {kind}

REGELN:
1. Laenge: {min} bis {max} Woerter.
2. Format: HTML mit <h2>, <h3>, <p>, <ul>, <li>, <ol>, <strong>, <em>, <blockquote>.
3. Kein <h1>, die Ueberschrift setzen wir selbst.
4. Mindestens 4 bis 6 Abschnitte mit <h2>.
5. Das Hauptkeyword steht im ersten Absatz, in Ueberschriften und natuerlich im Text.
6. Setze Affiliate-Links dort, wo sie thematisch passen.

Whisky-Shops (fuer Produktempfehlungen):
{shops}

Reise-Links (fuer Reisetipps):
{travel}

7. Link-Format: <a href=\"LINK\" target=\"_blank\" rel=\"noopener noreferrer\" class=\"affiliate-link\">Linktext</a>
   Insgesamt 3 bis 6 Affiliate-Links.
8. Ein <blockquote> mit einem Whisky-Zitat oder einem persoenlichen Tipp.
9. Zum Schluss ein Abschnitt \"Fazit\".
10. Lebendig und mit Persoenlichkeit schreiben, keine trockene Aufzaehlung.
11. Ganz am Ende eine Box mit verwandten Themen:
    <div class=\"related-box\"><h3>Das koennte dich auch interessieren</h3><ul><li>3 bis 4 Themenvorschlaege</li></ul></div>

Antworte ausschliesslich mit dem HTML-Inhalt, ohne weiteren Text.",
        title = topic.title,
        kind = type_instruction(topic.content_type),
        min = settings.min_word_count,
        max = settings.max_word_count,
        shops = shop_lines.join("\n"),
        travel = travel_lines.join("\n"),
    )
}

/// The metadata prompt for `topic`.
pub fn build_meta_prompt(topic: &TopicDescriptor) -> String {
    format!(
        "Zum Blog-Artikel \"{title}\" brauche ich:

1. eine SEO-Meta-Description (hoechstens 155 Zeichen, Deutsch)
2. einen Teaser, der neugierig macht (hoechstens 200 Zeichen, Deutsch)
3. einen URL-Slug (Kleinbuchstaben, Bindestriche, keine Umlaute, keine Sonderzeichen)
4. 3 bis 5 Focus-Keywords, durch Kommas getrennt
5. eine Open-Graph-Beschreibung (hoechstens 200 Zeichen, Deutsch)

Gib genau dieses JSON-Objekt zurueck:
{{\"meta_description\": \"...\", \"teaser\": \"...\", \"slug\": \"...\", \"keywords\": \"...\", \"og_description\": \"...\"}}

Nur JSON, kein weiterer Text.",
        title = topic.title
    )
}

// ============================================================================
// Response cleanup
// ============================================================================

/// Remove a Markdown code fence wrapping the whole response.
///
/// The opening fence may carry `lang` as its info string. Text without a
/// leading fence is returned trimmed and otherwise unchanged.
pub fn strip_code_fence(text: &str, lang: &str) -> String {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let rest = rest.strip_prefix(lang).unwrap_or(rest);
    let rest = rest.trim_start();
    let rest = match rest.trim_end().strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => rest,
    };
    rest.to_string()
}

/// Metadata derived from the topic alone.
pub fn fallback_meta(topic: &TopicDescriptor) -> MetaBlock {
    MetaBlock {
        meta_description: topic.title.clone(),
        teaser: topic.title.clone(),
        slug: title_slug(topic),
        keywords: topic.tags.join(", "),
        og_description: topic.title.clone(),
    }
}

fn title_slug(topic: &TopicDescriptor) -> String {
    let slug = slugify(&topic.title);
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// Parse the metadata answer, falling back to [`fallback_meta`] when it is
/// not a JSON object. The slug is always normalized.
pub fn parse_meta(raw: &str, topic: &TopicDescriptor) -> MetaBlock {
    let cleaned = strip_code_fence(raw, "json");
    let mut meta = match serde_json::from_str::<MetaBlock>(&cleaned) {
        Ok(meta) => meta,
        Err(e) => {
            warn!("Unusable metadata for {:?} ({e}), using fallback", topic.title);
            return fallback_meta(topic);
        }
    };

    let normalized = slugify(&meta.slug);
    meta.slug = if normalized.is_empty() {
        title_slug(topic)
    } else {
        normalized
    };
    meta
}

// ============================================================================
// Generator
// ============================================================================

pub struct ArticleGenerator<'a> {
    client: &'a dyn ChatClient,
    sleeper: &'a dyn Sleeper,
    policy: RetryPolicy,
}

impl<'a> ArticleGenerator<'a> {
    pub fn new(client: &'a dyn ChatClient, sleeper: &'a dyn Sleeper) -> Self {
        Self {
            client,
            sleeper,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn complete(&self, request: &ChatRequest) -> Result<String, GenerateError> {
        Ok(call_with_retry(&self.policy, self.sleeper, || {
            self.client.complete(request)
        })?)
    }

    /// Write one article for `topic`, dated `today`.
    pub fn generate(
        &self,
        topic: &TopicDescriptor,
        config: &Config,
        today: NaiveDate,
    ) -> Result<ArticleRecord, GenerateError> {
        info!("[1/2] Writing article: {}", topic.title);
        let body_request = ChatRequest {
            model: config.openai.model.clone(),
            temperature: Some(config.openai.temperature),
            max_tokens: config.openai.max_tokens,
            messages: vec![
                ChatMessage::system(BODY_SYSTEM_PROMPT),
                ChatMessage::user(build_article_prompt(
                    topic,
                    &config.affiliate_links,
                    &config.content_settings,
                    &config.site.author,
                )),
            ],
        };
        let html_content = strip_code_fence(&self.complete(&body_request)?, "html");

        info!("[2/2] Writing metadata");
        let meta_request = ChatRequest {
            model: config.openai.model.clone(),
            temperature: Some(META_TEMPERATURE),
            max_tokens: META_MAX_TOKENS,
            messages: vec![
                ChatMessage::system(META_SYSTEM_PROMPT),
                ChatMessage::user(build_meta_prompt(topic)),
            ],
        };
        let meta = parse_meta(&self.complete(&meta_request)?, topic);

        Ok(ArticleRecord {
            title: topic.title.clone(),
            html_content,
            category: topic.category.clone(),
            tags: topic.tags.clone(),
            content_type: topic.content_type,
            meta,
            date: today.format("%Y-%m-%d").to_string(),
            date_display: german_long_date(today),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ApiErrorKind, Role};
    use crate::naming::is_url_safe;
    use crate::test_helpers::*;
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    #[test]
    fn strips_html_fence() {
        assert_eq!(strip_code_fence("```html\n<p>a</p>\n```", "html"), "<p>a</p>");
        assert_eq!(strip_code_fence("```\n<p>a</p>\n```  ", "html"), "<p>a</p>");
    }

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```", "json"), "{\"a\": 1}");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fence("  <p>a ``` b</p>\n", "html"), "<p>a ``` b</p>");
    }

    #[test]
    fn fence_stripping_keeps_inner_content_intact() {
        let inner = "<h2>Fazit</h2>\n\n<p>Slàinte!</p>";
        let fenced = format!("```html\n{inner}\n```");
        assert_eq!(strip_code_fence(&fenced, "html"), inner);
    }

    #[test]
    fn parse_meta_reads_valid_json() {
        let t = topic("Islay entdecken", "Whisky");
        let meta = parse_meta(META_JSON, &t);
        assert_eq!(meta.slug, "islay-entdecken");
        assert_eq!(meta.keywords, "islay, whisky, torf");
    }

    #[test]
    fn parse_meta_keeps_model_fields_when_keywords_are_a_list() {
        let t = topic("Islay entdecken", "Whisky");
        let raw = r#"```json
{"meta_description": "Torf, Meer und acht Destillerien", "teaser": "Die Insel des Rauchs",
 "slug": "islay-torf-guide", "keywords": ["islay", "torf"], "og_description": "Islay für Genießer"}
```"#;
        let meta = parse_meta(raw, &t);
        assert_eq!(meta.slug, "islay-torf-guide");
        assert_eq!(meta.keywords, "islay, torf");
        assert_eq!(meta.meta_description, "Torf, Meer und acht Destillerien");
        assert_eq!(meta.teaser, "Die Insel des Rauchs");
    }

    #[test]
    fn parse_meta_falls_back_on_non_object_json() {
        let t = topic("Islay entdecken", "Whisky");
        let meta = parse_meta(r#"["islay-entdecken"]"#, &t);
        assert_eq!(meta, fallback_meta(&t));
    }

    #[test]
    fn parse_meta_normalizes_model_slug() {
        let t = topic("Islay", "Whisky");
        let meta = parse_meta(r#"{"slug": "Islay Über Alles!"}"#, &t);
        assert_eq!(meta.slug, "islay-ueber-alles");
        assert!(is_url_safe(&meta.slug));
    }

    #[test]
    fn invalid_json_falls_back_to_title() {
        let mut t = topic("Whisky & Käse: Die perfekte Kombination", "Lifestyle");
        t.tags = vec!["whisky".into(), "käse".into()];
        let meta = parse_meta("Hier sind deine Daten: slug=kaese", &t);
        assert_eq!(meta.slug, "whisky-kaese-die-perfekte-kombination");
        assert!(is_url_safe(&meta.slug));
        assert_eq!(meta.meta_description, t.title);
        assert_eq!(meta.teaser, t.title);
        assert_eq!(meta.og_description, t.title);
        assert_eq!(meta.keywords, "whisky, käse");
    }

    #[test]
    fn unsluggable_title_falls_back_to_default_slug() {
        let t = topic("???", "Whisky");
        assert_eq!(parse_meta("nope", &t).slug, FALLBACK_SLUG);
        assert_eq!(parse_meta(r#"{"slug": ""}"#, &t).slug, FALLBACK_SLUG);
    }

    #[test]
    fn article_prompt_lists_links_and_rules() {
        let config = sample_config();
        let mut t = topic("Speyside entdecken", "Reise");
        t.content_type = ContentType::Guide;
        let prompt = build_article_prompt(&t, &config.affiliate_links, &config.content_settings, "Ellas");
        assert!(prompt.contains("\"Speyside entdecken\""));
        assert!(prompt.contains("1200 bis 2500"));
        assert!(prompt.contains("praktischer Guide"));
        assert!(prompt.contains("class=\"affiliate-link\""));
        assert!(prompt.contains("related-box"));
        for shop in &config.affiliate_links.whisky_shops {
            assert!(prompt.contains(&format!("- {}: {}", shop.name, shop.url_template)));
        }
        for (name, url) in &config.affiliate_links.travel_links {
            assert!(prompt.contains(&format!("- {name}: {url}")));
        }
    }

    #[test]
    fn generate_makes_body_then_meta_call() {
        let client = ScriptedClient::new(vec![
            Ok("```html\n<h2>Islay</h2><p>Torf.</p>\n```".into()),
            Ok(format!("```json\n{META_JSON}\n```")),
        ]);
        let sleeper = RecordingSleeper::default();
        let config = sample_config();
        let t = topic("Islay entdecken", "Whisky");

        let record = ArticleGenerator::new(&client, &sleeper)
            .generate(&t, &config, today())
            .unwrap();

        assert_eq!(record.title, "Islay entdecken");
        assert_eq!(record.html_content, "<h2>Islay</h2><p>Torf.</p>");
        assert_eq!(record.category, "Whisky");
        assert_eq!(record.meta.slug, "islay-entdecken");
        assert_eq!(record.date, "2025-03-05");
        assert_eq!(record.date_display, "5. März 2025");

        let requests = client.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].model, config.openai.model);
        assert_eq!(requests[0].temperature, Some(config.openai.temperature));
        assert_eq!(requests[0].max_tokens, config.openai.max_tokens);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert_eq!(requests[0].messages[0].content, BODY_SYSTEM_PROMPT);
        assert_eq!(requests[1].temperature, Some(0.3));
        assert_eq!(requests[1].max_tokens, 500);
        assert_eq!(requests[1].messages[0].content, META_SYSTEM_PROMPT);
        assert!(sleeper.delays().is_empty());
    }

    #[test]
    fn transient_failures_are_retried_inside_generate() {
        let client = ScriptedClient::new(vec![
            Err(ApiError::new(ApiErrorKind::RateLimited, "429")),
            Err(ApiError::new(ApiErrorKind::ServerError, "502")),
            Ok("<p>body</p>".into()),
            Ok(META_JSON.into()),
        ]);
        let sleeper = RecordingSleeper::default();
        let record = ArticleGenerator::new(&client, &sleeper)
            .generate(&topic("Islay", "Whisky"), &sample_config(), today())
            .unwrap();
        assert_eq!(record.html_content, "<p>body</p>");
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(5), Duration::from_secs(10)]
        );
    }

    #[test]
    fn exhausted_retries_surface_as_generate_error() {
        let timeout = || Err(ApiError::new(ApiErrorKind::Timeout, "timeout"));
        let client = ScriptedClient::new(vec![timeout(), timeout(), timeout()]);
        let sleeper = RecordingSleeper::default();
        let err = ArticleGenerator::new(&client, &sleeper)
            .generate(&topic("Islay", "Whisky"), &sample_config(), today())
            .unwrap_err();
        assert!(matches!(err, GenerateError::RetriesExhausted { attempts: 3, .. }));
        assert!(err.to_string().contains("3 attempts"));
    }

    #[test]
    fn permanent_failure_stops_immediately() {
        let client = ScriptedClient::new(vec![Err(ApiError::new(
            ApiErrorKind::Rejected,
            "HTTP 401: invalid key",
        ))]);
        let sleeper = RecordingSleeper::default();
        let err = ArticleGenerator::new(&client, &sleeper)
            .generate(&topic("Islay", "Whisky"), &sample_config(), today())
            .unwrap_err();
        assert!(matches!(err, GenerateError::Api(_)));
        assert_eq!(client.requests().len(), 1);
        assert!(sleeper.delays().is_empty());
    }
}
