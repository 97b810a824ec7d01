//! Parsing of formatted level strings (`"Name (Code)-Suffix"`).

use regex::Regex;
use serde::Serialize;

fn level_re() -> &'static Regex {
    static RE: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    // Greedy name so that `"A (x) B (7)-Q"` takes the last parenthesized group as the code.
    RE.get_or_init(|| Regex::new(r"^(.*)\(([^()]*)\)-([A-Za-z0-9]+)$").expect("valid regex"))
}

/// Structured fields extracted from one level string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedLevel {
    pub name: String,
    pub code: String,
    pub suffix: String,
    /// The unmodified input.
    pub raw: String,
}

/// Returns `true` when `raw` carries no level (absent, empty or whitespace only).
pub fn is_blank(raw: Option<&str>) -> bool {
    raw.is_none_or(|s| s.trim().is_empty())
}

/// Parses a level string.
///
/// `None` means "no level present here" and is not an error. Strings that do not follow the
/// `Name (Code)-Suffix` shape fall back to a name-only parse.
pub fn parse_level(raw: Option<&str>) -> Option<ParsedLevel> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    Some(parse_present(raw))
}

/// Parses a level string already known to be non-blank.
pub(crate) fn parse_present(raw: &str) -> ParsedLevel {
    let trimmed = raw.trim();
    match level_re().captures(trimmed) {
        Some(caps) => ParsedLevel {
            name: caps[1].trim().to_string(),
            code: caps[2].to_string(),
            suffix: caps[3].to_string(),
            raw: raw.to_string(),
        },
        None => ParsedLevel {
            name: trimmed.to_string(),
            code: String::new(),
            suffix: String::new(),
            raw: raw.to_string(),
        },
    }
}
