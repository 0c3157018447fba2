pub mod match_files;
pub mod mock_source;
pub mod source;

pub use match_files::MatchFileSource;
pub use mock_source::MockMatchSource;
pub use source::{MatchBundle, MatchSource, SourceError};
