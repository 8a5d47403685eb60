//! Errors raised while analysing one fare artifact.
//!
//! Problems inside single cells never get here: an unreadable fare is recorded as unknown.
//! A missing route is not an error either, see `solver::cheapest_route`.

use std::{fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum AnalysisError {
    /// The artifact cannot describe an itinerary
    MalformedInput(String),
    /// The artifact could not be opened or created
    FileAccess { path: PathBuf, source: io::Error },
    /// The tab-separated layer failed, e.g. on invalid UTF-8
    Csv(csv::Error),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::MalformedInput(reason) => write!(f, "Malformed fare artifact: {reason}"),
            AnalysisError::FileAccess { path, source } => {
                write!(f, "Cannot access {}: {}", path.display(), source)
            }
            AnalysisError::Csv(err) => write!(f, "Cannot read fare artifact: {err}"),
        }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::MalformedInput(_) => None,
            AnalysisError::FileAccess { source, .. } => Some(source),
            AnalysisError::Csv(err) => Some(err),
        }
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(err: csv::Error) -> Self {
        AnalysisError::Csv(err)
    }
}
