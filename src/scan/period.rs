//! Year-month extraction from report file names.
//!
//! Four strategies are tried in a fixed order and the first hit wins:
//! adjacent `YYYY` + `MM` tokens, a single `YYYYMM` token, an isolated
//! `YYYY-MM` substring, then an isolated `YYYYMM` substring.

use regex::Regex;

/// What a strategy gets to look at.
pub struct Candidate<'a> {
    /// Tokens of the base name after splitting on `-`, `_` and whitespace.
    pub tokens: &'a [&'a str],
    /// Base name with every whitespace/`_` run replaced by `-`.
    pub hyphenated: &'a str,
}

type Strategy = fn(&YearMonthExtractor, &Candidate<'_>) -> Option<(i32, u32)>;

const STRATEGIES: [Strategy; 4] = [
    adjacent_tokens,
    compact_token,
    dashed_substring,
    compact_substring,
];

pub struct YearMonthExtractor {
    dashed: Regex,
    compact: Regex,
}

impl YearMonthExtractor {
    pub fn new() -> Self {
        Self {
            dashed: Regex::new(r"(?:^|[^0-9])([0-9]{4})-(0[1-9]|1[0-2])(?:[^0-9]|$)")
                .expect("Invalid regex pattern"),
            compact: Regex::new(r"(?:^|[^0-9])([0-9]{4})(0[1-9]|1[0-2])(?:[^0-9]|$)")
                .expect("Invalid regex pattern"),
        }
    }

    /// Run the strategies in priority order.
    pub fn extract(&self, candidate: &Candidate<'_>) -> Option<(i32, u32)> {
        STRATEGIES
            .iter()
            .find_map(|strategy| strategy(self, candidate))
    }
}

impl Default for YearMonthExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.bytes().all(|b| b.is_ascii_digit())
}

fn parse_year(value: &str) -> Option<i32> {
    if !is_digits(value, 4) {
        return None;
    }
    value.parse().ok()
}

/// `01`..=`12`, always two digits.
fn parse_month(value: &str) -> Option<u32> {
    if !is_digits(value, 2) {
        return None;
    }
    let month: u32 = value.parse().ok()?;
    (1..=12).contains(&month).then_some(month)
}

fn adjacent_tokens(_: &YearMonthExtractor, candidate: &Candidate<'_>) -> Option<(i32, u32)> {
    candidate.tokens.windows(2).find_map(|pair| {
        let year = parse_year(pair[0])?;
        let month = parse_month(pair[1])?;
        Some((year, month))
    })
}

fn compact_token(_: &YearMonthExtractor, candidate: &Candidate<'_>) -> Option<(i32, u32)> {
    candidate.tokens.iter().find_map(|token| {
        if !is_digits(token, 6) {
            return None;
        }
        let year = parse_year(&token[..4])?;
        let month = parse_month(&token[4..])?;
        Some((year, month))
    })
}

fn dashed_substring(extractor: &YearMonthExtractor, candidate: &Candidate<'_>) -> Option<(i32, u32)> {
    captures_year_month(&extractor.dashed, candidate.hyphenated)
}

fn compact_substring(extractor: &YearMonthExtractor, candidate: &Candidate<'_>) -> Option<(i32, u32)> {
    captures_year_month(&extractor.compact, candidate.hyphenated)
}

fn captures_year_month(regex: &Regex, haystack: &str) -> Option<(i32, u32)> {
    let caps = regex.captures(haystack)?;
    let year = caps.get(1)?.as_str().parse().ok()?;
    let month = caps.get(2)?.as_str().parse().ok()?;
    Some((year, month))
}
