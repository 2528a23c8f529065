//! Export file naming.

use once_cell::sync::Lazy;
use regex::Regex;

const FALLBACK_FILE_STEM: &str = "flowchart";
const MAX_FILE_STEM_CHARS: usize = 50;

static DISALLOWED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\-_\s]").expect("valid file stem regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Derives a `.json` file name from a diagram title.
///
/// Lowercases, strips characters outside `[a-z0-9-_]` and whitespace, turns
/// whitespace runs into `-` and caps the stem at 50 characters.
pub fn suggested_file_name(title: &str) -> String {
    let lowered = title.trim().to_lowercase();
    let stripped = DISALLOWED_RE.replace_all(&lowered, "");
    let dashed = WHITESPACE_RE.replace_all(&stripped, "-");
    let stem: String = dashed.chars().take(MAX_FILE_STEM_CHARS).collect();

    if stem.is_empty() {
        format!("{FALLBACK_FILE_STEM}.json")
    } else {
        format!("{stem}.json")
    }
}
