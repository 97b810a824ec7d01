use std::borrow::Cow;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

pub const ELLIPSIS: char = '…';

/// Shortens `text` to at most `max_columns` terminal columns, ellipsis included.
///
/// Wide characters (CJK, emoji) count as two columns. At least the ellipsis is always kept.
pub fn truncate_with_ellipsis(text: &str, max_columns: usize) -> Cow<'_, str> {
    if UnicodeWidthStr::width(text) <= max_columns {
        return Cow::Borrowed(text);
    }

    let budget = max_columns.saturating_sub(1);
    let mut used = 0usize;
    let mut end = 0usize;
    for (idx, ch) in text.char_indices() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + ch.len_utf8();
    }

    let mut out = text[..end].trim_end().to_string();
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_borrowed() {
        assert!(matches!(truncate_with_ellipsis("abc", 3), Cow::Borrowed("abc")));
    }

    #[test]
    fn long_text_keeps_budget_including_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abcdefgh", 5), "abcd…");
        assert_eq!(truncate_with_ellipsis("ab cdefgh", 4), "ab…");
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(truncate_with_ellipsis("東京都庁舎", 5), "東京…");
    }

    #[test]
    fn zero_budget_keeps_only_ellipsis() {
        assert_eq!(truncate_with_ellipsis("abc", 0), "…");
    }
}
