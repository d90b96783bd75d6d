//! Errors that can occur while fetching, parsing, validating or exporting election results.

use std::fmt;
use std::path::PathBuf;
use serde::{Serialize, Deserialize};
use thiserror::Error;

#[derive(Error,Debug,Clone,PartialEq)]
pub enum ScrapeError {
    #[error("Timed out fetching {url}")]
    FetchTimeout { url : String },
    #[error("Could not fetch {url} : {cause}")]
    Fetch { url : String, cause : String },
    /// The expected html structure was absent, or a structural field did not parse.
    #[error("Parse error : {0}")]
    Parse(String),
    /// A result refers to a state not in the state list for this run.
    #[error("Unknown state {0}")]
    UnknownState(String),
    #[error("{field} {value} is out of range")]
    Range { field : &'static str, value : String },
    #[error("Could not export to {path} : {cause}")]
    Export { path : PathBuf, cause : String },
}

impl ScrapeError {
    pub fn parse(message:impl Into<String>) -> Self { ScrapeError::Parse(message.into()) }

    pub(crate) fn export(path:&std::path::Path,cause:impl fmt::Display) -> Self {
        ScrapeError::Export { path: path.to_path_buf(), cause: cause.to_string() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::FetchTimeout { .. } => ErrorKind::FetchTimeout,
            ScrapeError::Fetch { .. } => ErrorKind::FetchError,
            ScrapeError::Parse(_) => ErrorKind::ParseError,
            ScrapeError::UnknownState(_) => ErrorKind::UnknownStateError,
            ScrapeError::Range { .. } => ErrorKind::RangeError,
            ScrapeError::Export { .. } => ErrorKind::ExportError,
        }
    }
}

/// The category of a [ScrapeError], used when reporting failed work.
#[derive(Debug,Clone,Copy,Serialize,Deserialize,Eq,PartialEq,Hash,Ord,PartialOrd)]
pub enum ErrorKind {
    FetchTimeout,
    FetchError,
    ParseError,
    UnknownStateError,
    RangeError,
    ExportError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
