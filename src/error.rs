use std::path::PathBuf;

/// Errors raised while loading maps and configuration.
///
/// Nothing in the per-frame path returns these; rendering faults degrade the
/// frame instead of failing it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file")]
    Config(#[from] toml::de::Error),

    #[error("unexpected map character {found:?} at line {line}, column {column}")]
    MapParse {
        line: usize,
        column: usize,
        found: char,
    },

    #[error("map has no rows")]
    EmptyMap,

    #[error("map row {row} has {found} cells, expected {expected}")]
    RaggedMap {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
