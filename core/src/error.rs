use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the core can report. Nothing is retried; the caller decides.
#[derive(Debug, Error)]
pub enum Error {
    /// A term that must resolve through the dictionary was never observed.
    #[error("unknown term: {0:?}")]
    UnknownTerm(String),

    /// Malformed boolean query text.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// A set operation tag other than `union` or `intersection`.
    #[error("invalid set operation: {0:?}")]
    InvalidOperation(String),

    /// Artifacts disagree with each other or break an index invariant.
    #[error("corpus inconsistency: {0}")]
    CorpusInconsistency(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line of an artifact file could not be parsed.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub(crate) fn parse(path: &std::path::Path, line: usize, message: impl Into<String>) -> Self {
        Error::Parse { path: path.to_path_buf(), line, message: message.into() }
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_names_file_and_line() {
        let err = Error::parse(std::path::Path::new("idx/df.txt"), 7, "missing tab");
        assert_eq!(err.to_string(), "idx/df.txt:7: missing tab");
    }

    #[test]
    fn unknown_term_quotes_the_term() {
        let err = Error::UnknownTerm("кот".into());
        assert!(err.to_string().contains("\"кот\""));
    }
}
