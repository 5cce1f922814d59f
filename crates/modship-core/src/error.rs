use std::path::PathBuf;
use thiserror::Error;

/// Core error type for modship operations.
///
/// `NotFound` is a hard failure when serving a module directly, but the
/// dependency scanner swallows it for referenced files (a stale or
/// optional reference must not abort a whole graph walk).
#[derive(Error, Debug)]
pub enum Error {
    #[error("forbidden: '{id}' resolves outside the served tree ({})", path.display())]
    Forbidden { id: String, path: PathBuf },

    #[error("module not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{hook} hook failed for '{id}': {message}")]
    Hook {
        hook: &'static str,
        id: String,
        message: String,
    },

    #[error("invalid bundle declarations: {source}")]
    Declarations {
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// True when the underlying cause is an absent file.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Read { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
