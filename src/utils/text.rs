//! Text preprocessing for synthesis requests.
//!
//! Voice-over scripts carry inline markers such as `<bookmark mark="A"/>` so the
//! animation side can wait on a word. Providers must never see them.

use once_cell::sync::Lazy;
use regex::Regex;

static BOOKMARK_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"<bookmark\s*mark\s*=\s*['"]\w*['"]\s*/>"#).expect("bookmark pattern is valid")
});

static NON_SLUG_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").expect("slug pattern is valid"));

/// Strip `<bookmark mark="..."/>` markers from `text`; any other markup is
/// kept as written.
///
/// Surrounding whitespace is left alone, so `"Hi <bookmark mark='A'/>there"`
/// becomes `"Hi there"`.
pub fn remove_bookmarks(text: &str) -> String {
    BOOKMARK_PATTERN.replace_all(text, "").into_owned()
}

/// Lowercase `text` and collapse every run of non alphanumeric characters
/// into a single `-`, trimming dashes at both ends.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_SLUG_RUN
        .replace_all(&lowered, "-")
        .trim_matches('-')
        .to_string()
}
