use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Core memory unavailable: {0}")]
    MemoryUnavailable(String),

    #[error("Core memory region changed size: expected {expected} bytes, got {actual}")]
    RegionSizeChanged { expected: usize, actual: usize },

    #[error("Search not initialized")]
    SearchNotInitialized,

    #[error("Too many matches to add: {matches} matches + {existing} cheats exceeds {limit}")]
    TooManyMatches {
        matches: usize,
        existing: usize,
        limit: usize,
    },

    #[error("Match index {index} out of range ({count} matches)")]
    MatchIndexOutOfRange { index: usize, count: usize },

    #[error("Cheat index {index} out of range ({len} cheats)")]
    CheatIndexOutOfRange { index: usize, len: usize },

    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    #[error("Cheat file error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
