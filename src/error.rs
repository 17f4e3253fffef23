use thiserror::Error;

/// Main error type for reportcheck
#[derive(Error, Debug)]
pub enum ReportcheckError {
    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Roster (de)serialization errors
    #[error("Roster error: {0}")]
    Roster(#[from] serde_json::Error),

    /// Filename parse errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Directory tree could not be enumerated
    #[error("Failed to read directory {path}: {message}")]
    DirectoryReadFailure { path: String, message: String },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Reasons a single report file name cannot be turned into a `ParsedFileName`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("File name has fewer than 3 segments: {0}")]
    InsufficientSegments(String),

    #[error("Could not find an 8-digit ICO in file name: {0}")]
    MissingIco(String),

    #[error("Could not find year-month information in file name: {0}")]
    MissingYearMonth(String),

    #[error("Invalid report date {year}-{month:02} in file name: {name}")]
    InvalidDate { name: String, year: i32, month: u32 },

    /// Only produced when the parser runs with the strict insurer policy.
    #[error("No known insurer matches file name: {0}")]
    UnknownInsurer(String),

    #[error("Unexpected error while processing file: name is not valid UTF-8: {0}")]
    NonUtf8Name(String),
}

/// Convenient Result type using ReportcheckError
pub type Result<T> = std::result::Result<T, ReportcheckError>;
