use std::backtrace::Backtrace;
pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search requires at least one worker")]
    NoWorkers,
    #[error("commit distance must be at least 1")]
    InvalidCommitDistance,
    #[error("adaptive recomputation distance must be at least 1")]
    InvalidAdaptDistance,
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Inner: {inner}\n{backtrace}")]
    Inner {
        inner: Box<SearchError>,
        backtrace: Box<Backtrace>,
    },
}

impl From<SearchError> for Error {
    fn from(inner: SearchError) -> Self {
        Error::Inner {
            inner: Box::new(inner),
            backtrace: Box::new(std::backtrace::Backtrace::capture()),
        }
    }
}
