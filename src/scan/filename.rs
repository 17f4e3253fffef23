use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::path::Path;

use crate::error::ParseError;
use crate::insurer::{catalog, Insurer};
use crate::normalize::{normalize, token_sequence_contains};
use crate::scan::period::{Candidate, YearMonthExtractor};

/// A report file whose name was successfully parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedFileName {
    /// 8-digit organization identifier
    pub ico: String,
    /// First day of the reported month
    pub report_date: NaiveDate,
    pub insurer: Insurer,
    /// No alias matched; `insurer` is the tolerant-policy fallback
    pub insurer_defaulted: bool,
    pub file_path: String,
    /// The parent folder does not name the resolved insurer
    pub invalid_directory: bool,
    pub parent_dir_name: String,
}

/// What to do when no insurer alias can be found in a file name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InsurerPolicy {
    /// Attribute the file to the first catalog entry and log a warning.
    #[default]
    Tolerant,
    /// Reject the file with `ParseError::UnknownInsurer`.
    Strict,
}

/// Turns report file paths into `ParsedFileName` records.
///
/// Regexes are compiled once in `new`; parsing itself is a pure function of
/// the path.
pub struct FilenameParser {
    separators: Regex,
    ico: Regex,
    year_month: YearMonthExtractor,
    policy: InsurerPolicy,
}

impl FilenameParser {
    pub fn new() -> Self {
        Self::with_policy(InsurerPolicy::default())
    }

    pub fn with_policy(policy: InsurerPolicy) -> Self {
        Self {
            separators: Regex::new(r"[\s_]+").expect("Invalid regex pattern"),
            ico: Regex::new(r"(?:^|[^0-9])([0-9]{8})(?:[^0-9]|$)").expect("Invalid regex pattern"),
            year_month: YearMonthExtractor::new(),
            policy,
        }
    }

    /// Parse a single report file path.
    ///
    /// # Examples
    ///
    /// ```text
    /// "VZP/10751416_VZP_2025_11.pdf"   → ico 10751416, 2025-11-01, VZP
    /// "OZP/PPPZ-02604477-2025-11.pdf"  → ico 02604477, 2025-11-01, VZP (fallback)
    /// "PPPZ-12345678-VZP.pdf"          → MissingYearMonth
    /// ```
    pub fn parse(&self, path: &Path) -> Result<ParsedFileName, ParseError> {
        let file_name = path
            .file_name()
            .map(|n| n.to_str().ok_or_else(|| ParseError::NonUtf8Name(n.to_string_lossy().to_string())))
            .transpose()?
            .unwrap_or_default();

        let base_name = strip_extension(file_name);
        let hyphenated = self.separators.replace_all(base_name, "-");
        let tokens: Vec<&str> = hyphenated.split('-').filter(|t| !t.is_empty()).collect();

        if tokens.len() < 3 {
            return Err(ParseError::InsufficientSegments(file_name.to_string()));
        }

        let ico = self
            .ico
            .captures(base_name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| ParseError::MissingIco(file_name.to_string()))?;

        let (year, month) = self
            .year_month
            .extract(&Candidate {
                tokens: &tokens,
                hyphenated: &hyphenated,
            })
            .ok_or_else(|| ParseError::MissingYearMonth(file_name.to_string()))?;

        let report_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| ParseError::InvalidDate {
            name: file_name.to_string(),
            year,
            month,
        })?;

        let (insurer, insurer_defaulted) = self.resolve_insurer(file_name, base_name, &tokens)?;

        let parent_dir_name = path
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let invalid_directory = !directory_matches(&parent_dir_name, insurer);

        Ok(ParsedFileName {
            ico,
            report_date,
            insurer,
            insurer_defaulted,
            file_path: path.to_string_lossy().to_string(),
            invalid_directory,
            parent_dir_name,
        })
    }

    /// The resolved insurer and whether it is only the fallback.
    fn resolve_insurer(&self, file_name: &str, base_name: &str, tokens: &[&str]) -> Result<(Insurer, bool), ParseError> {
        // Exact alias token first, then alias anywhere in the name
        let exact = catalog().iter().find(|info| {
            info.aliases
                .iter()
                .any(|alias| tokens.iter().any(|t| t.to_lowercase() == alias.to_lowercase()))
        });
        if let Some(info) = exact {
            return Ok((info.insurer, false));
        }

        let lowered = base_name.to_lowercase();
        let contained = catalog()
            .iter()
            .find(|info| info.aliases.iter().any(|alias| lowered.contains(&alias.to_lowercase())));
        if let Some(info) = contained {
            return Ok((info.insurer, false));
        }

        match self.policy {
            InsurerPolicy::Tolerant => {
                let fallback = Insurer::default_fallback();
                log::warn!("No insurer recognised in {}, assuming {}", file_name, fallback);
                Ok((fallback, true))
            }
            InsurerPolicy::Strict => Err(ParseError::UnknownInsurer(file_name.to_string())),
        }
    }
}

impl Default for FilenameParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything before the last `.`, unless the dot is the first character.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Whether a folder name names the insurer (token-sequence containment of
/// any normalized alias). A blank folder name never matches.
pub fn directory_matches(dir_name: &str, insurer: Insurer) -> bool {
    if dir_name.trim().is_empty() {
        return false;
    }
    let normalized_dir = normalize(dir_name);
    insurer
        .aliases()
        .iter()
        .any(|alias| token_sequence_contains(&normalized_dir, &normalize(alias)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(path: &str) -> Result<ParsedFileName, ParseError> {
        FilenameParser::new().parse(Path::new(path))
    }

    #[test]
    fn test_parse_underscore_name() {
        let parsed = parse("/reports/VZP/10751416_VZP_2025_11.pdf").unwrap();
        assert_eq!(parsed.ico, "10751416");
        assert_eq!(parsed.report_date, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        assert_eq!(parsed.insurer, Insurer::Vzp);
        assert!(!parsed.insurer_defaulted);
        assert_eq!(parsed.parent_dir_name, "VZP");
        assert!(!parsed.invalid_directory);
        assert_eq!(parsed.file_path, "/reports/VZP/10751416_VZP_2025_11.pdf");
    }

    #[test]
    fn test_parse_hyphen_name_with_leading_zero_ico() {
        let parsed = parse("/reports/misc/PPPZ-02604477-2025-11.pdf").unwrap();
        assert_eq!(parsed.ico, "02604477");
        assert_eq!(parsed.report_date, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
    }

    #[test]
    fn test_missing_year_month() {
        let err = parse("/reports/VZP/PPPZ-12345678-VZP.pdf").unwrap_err();
        assert!(matches!(err, ParseError::MissingYearMonth(_)));
        assert!(err.to_string().contains("year-month information"));
    }

    #[test]
    fn test_insufficient_segments_regardless_of_digits() {
        for name in ["10751416_202511.pdf", "10751416.pdf", "a-b", "2025 11", ".hidden"] {
            let err = parse(name).unwrap_err();
            assert!(
                matches!(err, ParseError::InsufficientSegments(_)),
                "{} gave {:?}",
                name,
                err
            );
        }
    }

    #[test]
    fn test_missing_ico() {
        let err = parse("VZP/report_VZP_2025_11.pdf").unwrap_err();
        assert!(matches!(err, ParseError::MissingIco(_)));
        // 9 digits is not an isolated 8-digit run
        let err = parse("VZP/107514160_VZP_2025_11.pdf").unwrap_err();
        assert!(matches!(err, ParseError::MissingIco(_)));
    }

    #[test]
    fn test_extension_stripping() {
        // no extension at all
        let parsed = parse("VZP/10751416 VZP 2025 11").unwrap();
        assert_eq!(parsed.report_date, NaiveDate::from_ymd_opt(2025, 11, 1).unwrap());
        // only the last extension is stripped
        let parsed = parse("OZP/10751416_OZP_202503.tar.gz").unwrap();
        assert_eq!(parsed.report_date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    #[test]
    fn test_insurer_exact_token_case_insensitive() {
        let parsed = parse("ozp/10751416_ozp_2025_01.pdf").unwrap();
        assert_eq!(parsed.insurer, Insurer::Ozp);
        assert!(!parsed.invalid_directory);
    }

    #[test]
    fn test_insurer_substring() {
        let parsed = parse("x/10751416_reportZPMV_2025_01.pdf").unwrap();
        assert_eq!(parsed.insurer, Insurer::Zpmv);
        assert!(!parsed.insurer_defaulted);
        assert!(parsed.invalid_directory);
    }

    #[test]
    fn test_insurer_with_diacritics() {
        let parsed = parse("ZP Škoda/10751416_ZPŠ_2025_02.pdf").unwrap();
        assert_eq!(parsed.insurer, Insurer::Zps);
        assert!(!parsed.invalid_directory);
    }

    #[test]
    fn test_insurer_tolerant_fallback() {
        let parsed = parse("Reports/PPPZ-02604477-2025-11.pdf").unwrap();
        assert_eq!(parsed.insurer, Insurer::Vzp);
        assert!(parsed.insurer_defaulted);
        assert!(parsed.invalid_directory);
    }

    #[test]
    fn test_insurer_strict_policy() {
        let parser = FilenameParser::with_policy(InsurerPolicy::Strict);
        let err = parser.parse(Path::new("Reports/PPPZ-02604477-2025-11.pdf")).unwrap_err();
        assert!(matches!(err, ParseError::UnknownInsurer(_)));
        assert!(parser.parse(Path::new("VZP/10751416_VZP_2025_11.pdf")).is_ok());
    }

    #[test]
    fn test_blank_parent_is_invalid_directory() {
        let parsed = parse("10751416_VZP_2025_11.pdf").unwrap();
        assert_eq!(parsed.parent_dir_name, "");
        assert!(parsed.invalid_directory);
    }

    #[test]
    fn test_directory_validity_by_full_name() {
        let path: PathBuf = ["root", "Oborová zdravotní pojišťovna - 2025", "10751416_OZP_2025_11.pdf"]
            .iter()
            .collect();
        let parsed = FilenameParser::new().parse(&path).unwrap();
        assert_eq!(parsed.insurer, Insurer::Ozp);
        assert!(!parsed.invalid_directory);
    }

    #[test]
    fn test_wrong_directory() {
        let parsed = parse("VZP/10751416_OZP_2025_11.pdf").unwrap();
        assert_eq!(parsed.insurer, Insurer::Ozp);
        assert!(parsed.invalid_directory);
        // VoZP folder does not satisfy OZP: tokens must match whole
        let parsed = parse("VoZP/10751416_OZP_2025_11.pdf").unwrap();
        assert!(parsed.invalid_directory);
    }

    #[test]
    fn test_directory_matches() {
        assert!(directory_matches("VZP 2025", Insurer::Vzp));
        assert!(directory_matches("zp-skoda", Insurer::Zps));
        assert!(!directory_matches("   ", Insurer::Vzp));
        assert!(!directory_matches("Archive", Insurer::Rbp));
    }
}
