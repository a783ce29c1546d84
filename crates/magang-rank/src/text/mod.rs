//! Resume text cleaning.
//!
//! Not applied by default on the classification path; enable with
//! `MAGANG_CLEAN_BEFORE_CLASSIFY` (see [`crate::config::Config`]).


use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bhttps?://\S+|\bwww\.\S+").expect("valid URL pattern"));

static NON_ALPHA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z\s]").expect("valid character pattern"));

static WHITESPACE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Cleans resume text: strips URLs and non-alphabetic characters, lowercases,
/// and collapses runs of whitespace.
pub fn clean_text(text: &str) -> String {
    let text = URL_PATTERN.replace_all(text, "");
    let text = NON_ALPHA_PATTERN.replace_all(&text, "");
    let text = text.to_lowercase();
    WHITESPACE_PATTERN.replace_all(&text, " ").trim().to_string()
}
