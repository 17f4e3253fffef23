pub mod config;
pub mod error;
pub mod insurer;
pub mod normalize;
pub mod period;
pub mod scan;
pub mod roster;
pub mod matching;
pub mod organize;

pub use config::Config;
pub use error::{ParseError, ReportcheckError, Result};
pub use insurer::Insurer;
pub use matching::{client_statuses, evaluate, missing_clients, ClientStatus};
pub use normalize::{normalize, token_sequence_contains};
pub use organize::{ensure_folder, find_folder, misplaced, move_file, relocate_misplaced, Relocation};
pub use period::ReportPeriod;
pub use roster::Client;
pub use scan::{walk, ErrorReport, FilenameParser, ParsedFileName, Scanner, WalkResult};
