pub mod period;
pub mod filename;
pub mod walker;

pub use filename::{directory_matches, FilenameParser, InsurerPolicy, ParsedFileName};
pub use period::YearMonthExtractor;
pub use walker::{walk, ErrorReport, Scanner, WalkResult};
