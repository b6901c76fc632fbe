use crate::models::SuggestedMatch;
use regex::Regex;

/// Longest run of text still accepted as a name
pub const MAX_NAME_CHARS: usize = 80;

lazy_static::lazy_static! {
    // Everything up to the first " (" on the line
    static ref NAME_RE: Regex = Regex::new(r"^(.*?) \(").unwrap();
    static ref SCORE_RE: Regex = Regex::new(r"\(([0-9]+)/100\)").unwrap();
}

/// Extract the name preceding the first `" ("` on a line.
///
/// Returns `None` when there is no such delimiter, when the captured text is
/// blank, or when it is too long to plausibly be a name.
pub fn extract_name(line: &str) -> Option<&str> {
    let name = NAME_RE.captures(line)?.get(1)?.as_str().trim();

    if name.is_empty() || name.chars().count() > MAX_NAME_CHARS {
        return None;
    }

    Some(name)
}

/// Extract the score from the first `(<digits>/100)` on a line.
///
/// The value is not range-checked: `(150/100)` yields 150. Digit runs too
/// large for a `u32` are treated as absent.
pub fn extract_score(line: &str) -> Option<u32> {
    SCORE_RE
        .captures(line)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// Positional fallback name, 1-based
pub fn placeholder_name(index: usize) -> String {
    format!("Match {}", index + 1)
}

/// Deterministic placeholder avatar for the record at `index`
pub fn placeholder_image_url(index: usize) -> String {
    format!("https://picsum.photos/seed/match{}/200/200", index)
}

/// Build the record for the `index`-th non-blank line
pub fn build_record(index: usize, line: &str) -> SuggestedMatch {
    let name = extract_name(line)
        .map(str::to_string)
        .unwrap_or_else(|| placeholder_name(index));

    SuggestedMatch {
        id: index.to_string(),
        name,
        compatibility_score: extract_score(line).unwrap_or(0),
        bio: line.to_string(),
        image_url: placeholder_image_url(index),
    }
}

/// Lazily decompose model output into suggestion records, one per non-blank line
pub fn suggestions(text: &str) -> impl Iterator<Item = SuggestedMatch> + '_ {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(index, line)| build_record(index, line))
}

/// Parse model output into an ordered list of suggestion records.
///
/// Never fails: absent or empty text gives an empty list, and lines that do
/// not follow the `Name (Score/100) text` convention fall back to placeholder
/// values.
pub fn parse_suggestions(text: Option<&str>) -> Vec<SuggestedMatch> {
    match text {
        Some(text) if !text.is_empty() => suggestions(text).collect(),
        _ => Vec::new(),
    }
}
