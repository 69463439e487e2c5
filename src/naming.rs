//! Slugs, category file names, and German date formatting.
//!
//! Every link the site builder emits is derived from these helpers, so the
//! generator (which names article files) and the builder (which links them)
//! agree on one convention:
//!
//! - `"Speyside entdecken: Schottlands Whisky-Herz"` → `speyside-entdecken-schottlands-whisky-herz`
//! - `"Glenfiddich vs. Glenlivet"` → `glenfiddich-vs-glenlivet`
//! - `"Käse & Whisky"` → `kaese-whisky`
//! - category `"Whisky"` → `kategorie/whisky.html`
//! - `"2025-03-05"` → `"5. März 2025"`

use chrono::{Datelike, NaiveDate};

/// German month names, January first.
const MONTHS_DE: [&str; 12] = [
    "Januar",
    "Februar",
    "März",
    "April",
    "Mai",
    "Juni",
    "Juli",
    "August",
    "September",
    "Oktober",
    "November",
    "Dezember",
];

/// Derive a URL-safe slug: lowercase ASCII letters, digits and single dashes.
///
/// Umlauts are transliterated (`ä` → `ae`, `ß` → `ss`), other Latin
/// diacritics lose their accent, whitespace and underscores become dashes,
/// and everything else is dropped. May return an empty string when the input
/// has no usable characters.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            'a'..='z' | '0'..='9' => slug.push(c),
            '-' | '_' => slug.push('-'),
            c if c.is_whitespace() => slug.push('-'),
            'ä' => slug.push_str("ae"),
            'ö' => slug.push_str("oe"),
            'ü' => slug.push_str("ue"),
            'ß' => slug.push_str("ss"),
            other => {
                if let Some(base) = fold_diacritic(other) {
                    slug.push(base);
                }
            }
        }
    }
    collapse_dashes(&slug)
}

fn fold_diacritic(c: char) -> Option<char> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ø' => 'o',
        'ù' | 'ú' | 'û' => 'u',
        'ý' | 'ÿ' => 'y',
        _ => return None,
    };
    Some(base)
}

fn collapse_dashes(raw: &str) -> String {
    raw.split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// True if `slug` only contains `[a-z0-9-]`, has no empty segments, and is non-empty.
pub fn is_url_safe(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && slug.split('-').all(|part| !part.is_empty())
}

/// Stem used when a category name has no usable characters.
pub const FALLBACK_CATEGORY_STEM: &str = "sonstige";

/// File stem of a category page: the slugified name, so stored categories
/// can never leave `kategorie/`. Display keeps the original casing.
pub fn category_file_stem(category: &str) -> String {
    let stem = slugify(category);
    if stem.is_empty() {
        FALLBACK_CATEGORY_STEM.to_string()
    } else {
        stem
    }
}

/// Site-relative path of an article page.
pub fn article_path(slug: &str) -> String {
    format!("artikel/{slug}.html")
}

/// Site-relative path of a category page.
pub fn category_path(category: &str) -> String {
    format!("kategorie/{}.html", category_file_stem(category))
}

/// Long German date, e.g. `5. März 2025`.
pub fn german_long_date(date: NaiveDate) -> String {
    format!(
        "{}. {} {}",
        date.day(),
        MONTHS_DE[date.month0() as usize],
        date.year()
    )
}

/// Format a stored `YYYY-MM-DD` string as a long German date.
/// Strings that do not parse are returned unchanged.
pub fn german_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => german_long_date(d),
        Err(_) => date.to_string(),
    }
}

/// Short German date `DD.MM.YYYY`; unparseable input is returned unchanged.
pub fn short_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => d.format("%d.%m.%Y").to_string(),
        Err(_) => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_plain_title() {
        assert_eq!(
            slugify("Speyside entdecken: Schottlands Whisky-Herz"),
            "speyside-entdecken-schottlands-whisky-herz"
        );
    }

    #[test]
    fn slugify_drops_punctuation() {
        assert_eq!(
            slugify("Glenfiddich vs. Glenlivet: Der grosse Vergleich"),
            "glenfiddich-vs-glenlivet-der-grosse-vergleich"
        );
        assert_eq!(slugify("Ardbeg: Der intensivste Whisky der Welt?"), "ardbeg-der-intensivste-whisky-der-welt");
    }

    #[test]
    fn slugify_transliterates_umlauts() {
        assert_eq!(slugify("Käse & Whisky für Anfänger"), "kaese-whisky-fuer-anfaenger");
        assert_eq!(slugify("Straße"), "strasse");
        assert_eq!(slugify("ÜBER ALLES"), "ueber-alles");
    }

    #[test]
    fn slugify_folds_other_diacritics() {
        assert_eq!(slugify("Crème brûlée"), "creme-brulee");
    }

    #[test]
    fn slugify_collapses_and_trims_dashes() {
        assert_eq!(slugify("  -- B&Bs in   Schottland --  "), "bbs-in-schottland");
    }

    #[test]
    fn slugify_keeps_digits() {
        assert_eq!(slugify("Die 10 besten Whiskys unter 50 Euro"), "die-10-besten-whiskys-unter-50-euro");
    }

    #[test]
    fn slugify_can_be_empty() {
        assert_eq!(slugify("!!! ???"), "");
    }

    #[test]
    fn url_safe_check() {
        assert!(is_url_safe("whisky-tasting-101"));
        assert!(!is_url_safe(""));
        assert!(!is_url_safe("Whisky"));
        assert!(!is_url_safe("a--b"));
        assert!(!is_url_safe("-a"));
        assert!(!is_url_safe("käse"));
    }

    #[test]
    fn category_paths_are_lowercase() {
        assert_eq!(category_path("Whisky"), "kategorie/whisky.html");
        assert_eq!(category_file_stem("Lifestyle"), "lifestyle");
    }

    #[test]
    fn category_stems_stay_inside_the_category_dir() {
        assert_eq!(category_path("Whisky/Tasting"), "kategorie/whiskytasting.html");
        assert_eq!(category_path("../../escaped"), "kategorie/escaped.html");
        assert_eq!(category_file_stem("Genuss & Küche"), "genuss-kueche");
        assert_eq!(category_file_stem("/.."), FALLBACK_CATEGORY_STEM);
    }

    #[test]
    fn german_dates() {
        assert_eq!(german_date("2025-03-05"), "5. März 2025");
        assert_eq!(german_date("2024-12-24"), "24. Dezember 2024");
        assert_eq!(german_date("gestern"), "gestern");
    }

    #[test]
    fn short_dates() {
        assert_eq!(short_date("2025-03-05"), "05.03.2025");
        assert_eq!(short_date(""), "");
    }
}
