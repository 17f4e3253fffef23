//! Closed catalog of Czech public health insurers.
//!
//! The catalog order is significant: the first entry is the fallback used by
//! the tolerant filename parser when no alias matches.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ReportcheckError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Insurer {
    Vzp,
    Vozp,
    Cpzp,
    Ozp,
    Zps,
    Zpmv,
    Rbp,
}

/// Static catalog entry for one insurer.
#[derive(Debug)]
pub struct InsurerInfo {
    pub insurer: Insurer,
    /// Numeric insurer code assigned by the state registry.
    pub code: u16,
    /// Short code, also used as the roster/spreadsheet column identifier.
    pub column_id: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
}

static CATALOG: [InsurerInfo; 7] = [
    InsurerInfo {
        insurer: Insurer::Vzp,
        code: 111,
        column_id: "VZP",
        display_name: "Všeobecná zdravotní pojišťovna",
        aliases: &["VZP", "Všeobecná zdravotní pojišťovna"],
    },
    InsurerInfo {
        insurer: Insurer::Vozp,
        code: 201,
        column_id: "VOZP",
        display_name: "Vojenská zdravotní pojišťovna",
        aliases: &["VoZP", "Vojenská zdravotní pojišťovna"],
    },
    InsurerInfo {
        insurer: Insurer::Cpzp,
        code: 205,
        column_id: "CPZP",
        display_name: "Česká průmyslová zdravotní pojišťovna",
        aliases: &["ČPZP", "CPZP", "Česká průmyslová zdravotní pojišťovna"],
    },
    InsurerInfo {
        insurer: Insurer::Ozp,
        code: 207,
        column_id: "OZP",
        display_name: "Oborová zdravotní pojišťovna",
        aliases: &["OZP", "Oborová zdravotní pojišťovna"],
    },
    InsurerInfo {
        insurer: Insurer::Zps,
        code: 209,
        column_id: "ZPS",
        display_name: "Zaměstnanecká pojišťovna Škoda",
        aliases: &["ZPŠ", "ZPS", "ZP Škoda", "Zaměstnanecká pojišťovna Škoda"],
    },
    InsurerInfo {
        insurer: Insurer::Zpmv,
        code: 211,
        column_id: "ZPMV",
        display_name: "Zdravotní pojišťovna ministerstva vnitra",
        aliases: &["ZPMV", "Zdravotní pojišťovna ministerstva vnitra"],
    },
    InsurerInfo {
        insurer: Insurer::Rbp,
        code: 213,
        column_id: "RBP",
        display_name: "RBP, zdravotní pojišťovna",
        aliases: &["RBP", "RBP zdravotní pojišťovna"],
    },
];

impl Insurer {
    /// Every insurer in catalog order.
    pub const ALL: [Insurer; 7] = [
        Insurer::Vzp,
        Insurer::Vozp,
        Insurer::Cpzp,
        Insurer::Ozp,
        Insurer::Zps,
        Insurer::Zpmv,
        Insurer::Rbp,
    ];

    /// Fallback insurer: the first catalog entry.
    pub fn default_fallback() -> Insurer {
        CATALOG[0].insurer
    }

    pub fn info(self) -> &'static InsurerInfo {
        // CATALOG is declared in the same order as the enum variants
        &CATALOG[self as usize]
    }

    pub fn display_name(self) -> &'static str {
        self.info().display_name
    }

    pub fn aliases(self) -> &'static [&'static str] {
        self.info().aliases
    }

    pub fn column_id(self) -> &'static str {
        self.info().column_id
    }

    pub fn code(self) -> u16 {
        self.info().code
    }

    /// Case-insensitive exact lookup against every alias in the catalog.
    pub fn from_alias(value: &str) -> Option<Insurer> {
        let needle = value.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        CATALOG
            .iter()
            .find(|info| info.aliases.iter().any(|a| a.to_lowercase() == needle))
            .map(|info| info.insurer)
    }
}

/// The full catalog in order.
pub fn catalog() -> &'static [InsurerInfo] {
    &CATALOG
}

impl fmt::Display for Insurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.column_id())
    }
}

impl FromStr for Insurer {
    type Err = ReportcheckError;

    /// Accepts the column identifier, the numeric code, or any alias.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(info) = CATALOG.iter().find(|info| {
            info.column_id.eq_ignore_ascii_case(trimmed) || info.code.to_string() == trimmed
        }) {
            return Ok(info.insurer);
        }
        Insurer::from_alias(trimmed)
            .ok_or_else(|| ReportcheckError::InvalidInput(format!("Unknown insurer: {}", s)))
    }
}

impl TryFrom<String> for Insurer {
    type Error = ReportcheckError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Insurer> for String {
    fn from(value: Insurer) -> Self {
        value.column_id().to_string()
    }
}
