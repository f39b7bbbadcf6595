//! Text parsers for intake replies.
//!
//! These mirror the validators the intake prompts describe to the
//! operator: plain numbers for block counts, `DD/MM` (current year)
//! or `today` for dates, and `http(s)` URLs for evidence.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{1,2})/(\d{1,2})$").expect("valid date pattern"))
}

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"https?://[^\s>]+").expect("valid link pattern"))
}

/// Parses a blocks-affected answer: a plain non-negative number.
#[must_use]
pub fn parse_blocks(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

/// Parses a `DD/MM` date in `today`'s year, or the literal `today`.
///
/// `chrono` validates the calendar, so `31/02` is rejected the same
/// way `99/99` is.
#[must_use]
pub fn parse_happened_at(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("today") {
        return Some(today);
    }
    let captures = date_pattern().captures(text)?;
    let day = captures[1].parse().ok()?;
    let month = captures[2].parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month, day)
}

/// Extracts every `http(s)` link from a reply's text.
#[must_use]
pub fn extract_links(text: &str) -> Vec<String> {
    link_pattern()
        .find_iter(text)
        .map(|link| link.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 29).expect("valid date")
    }

    // ── Blocks ──────────────────────────────────────────────────────

    #[test]
    fn blocks_accepts_plain_numbers() {
        assert_eq!(parse_blocks("42"), Some(42));
        assert_eq!(parse_blocks("  0 "), Some(0));
    }

    #[test]
    fn blocks_rejects_everything_else() {
        assert_eq!(parse_blocks("abc"), None);
        assert_eq!(parse_blocks("-5"), None);
        assert_eq!(parse_blocks("4 2"), None);
        assert_eq!(parse_blocks(""), None);
    }

    // ── Dates ───────────────────────────────────────────────────────

    #[test]
    fn date_accepts_day_slash_month() {
        assert_eq!(
            parse_happened_at("30/07", today()),
            NaiveDate::from_ymd_opt(2026, 7, 30)
        );
        assert_eq!(
            parse_happened_at("1/1", today()),
            NaiveDate::from_ymd_opt(2026, 1, 1)
        );
    }

    #[test]
    fn date_accepts_today_keyword() {
        assert_eq!(parse_happened_at("today", today()), Some(today()));
        assert_eq!(parse_happened_at(" TODAY ", today()), Some(today()));
    }

    #[test]
    fn date_rejects_impossible_calendar_dates() {
        assert_eq!(parse_happened_at("31/02", today()), None);
        assert_eq!(parse_happened_at("99/99", today()), None);
        assert_eq!(parse_happened_at("0/5", today()), None);
    }

    #[test]
    fn date_rejects_other_formats() {
        assert_eq!(parse_happened_at("yesterday", today()), None);
        assert_eq!(parse_happened_at("30/07/2026", today()), None);
        assert_eq!(parse_happened_at("30-07", today()), None);
        assert_eq!(parse_happened_at("", today()), None);
    }

    // ── Links ───────────────────────────────────────────────────────

    #[test]
    fn links_are_extracted_from_prose() {
        let links = extract_links(
            "proof: https://img.example/a.png and also http://img.example/b.jpg here",
        );
        assert_eq!(
            links,
            vec!["https://img.example/a.png", "http://img.example/b.jpg"]
        );
    }

    #[test]
    fn text_without_links_yields_nothing() {
        assert!(extract_links("no proof yet").is_empty());
        assert!(extract_links("ftp://old.example/file").is_empty());
    }
}
