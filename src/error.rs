use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Key domain or range size cannot be sampled from.
    #[error("invalid key domain: key_max={key_max}, range_size={range_size}")]
    InvalidDomain { key_max: u64, range_size: u64 },

    /// Too many distinct values requested for one insert.
    #[error("cannot draw {dims} distinct values below {max}")]
    InvalidDimension { dims: usize, max: u32 },

    #[error("invalid key distribution: {0}")]
    InvalidDistribution(String),

    #[error("invalid mix entry: {0}")]
    InvalidProportion(String),

    #[error("i/o failure on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {reason}")]
    Parse { line: usize, reason: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        Error::Parse { line, reason: reason.into() }
    }
}
