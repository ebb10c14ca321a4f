use std::path::PathBuf;
use thiserror::Error;

/// Why the visitor dataset could not be loaded.
///
/// The front-end matches on the variant to pick its warning; no variant is
/// recovered from, the dashboard simply stays in the "no data" state.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid CSV in {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("required column '{0}' is missing")]
    MissingColumn(&'static str),
}

impl LoadError {
    /// Short, user-facing label for the warning banner.
    pub fn headline(&self) -> &'static str {
        match self {
            LoadError::Io { .. } => "Data file not found or unreadable",
            LoadError::Csv { .. } => "Data file is not valid CSV",
            LoadError::MissingColumn(_) => "Data file is missing a required column",
        }
    }
}
