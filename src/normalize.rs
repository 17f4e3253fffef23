//! Name canonicalization used to compare insurer names with folder names.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a free-text name for comparison.
///
/// Diacritics are removed, runs of `-`/`_` become a single space, whitespace
/// is collapsed, leading non-alphanumeric characters are dropped and the
/// result is uppercased. `normalize(normalize(s)) == normalize(s)`.
///
/// ```text
/// "ZP Škoda"   → "ZP SKODA"
/// "zp-skoda"   → "ZP SKODA"
/// "  (VZP)_2025" → "VZP) 2025"
/// ```
pub fn normalize(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let without_marks: String = trimmed.nfd().filter(|c| !is_combining_mark(*c)).collect();

    let spaced: String = without_marks
        .chars()
        .map(|c| if c == '-' || c == '_' { ' ' } else { c })
        .collect();

    // split_whitespace also takes care of collapsing the `-`/`_` runs
    let collapsed = spaced.split_whitespace().collect::<Vec<_>>().join(" ");

    collapsed
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end()
        .to_uppercase()
}

/// True when the tokens of `needle` appear as a contiguous run inside the
/// tokens of `haystack`. Both arguments are expected to be normalized.
///
/// An empty needle never matches, and a longer needle can never be found in
/// a shorter haystack.
pub fn token_sequence_contains(haystack: &str, needle: &str) -> bool {
    let needle_tokens: Vec<&str> = needle.split_whitespace().collect();
    if needle_tokens.is_empty() {
        return false;
    }
    if haystack == needle {
        return true;
    }

    let haystack_tokens: Vec<&str> = haystack.split_whitespace().collect();
    if needle_tokens.len() > haystack_tokens.len() {
        return false;
    }

    haystack_tokens
        .windows(needle_tokens.len())
        .any(|window| window == needle_tokens.as_slice())
}
