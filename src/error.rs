//! Error types for scanning, parsing and reading input
//!
//! [`ParseError`] covers everything the core can reject: lexical errors raised
//! while scanning and syntax errors raised while building the tree. Both are
//! fatal; no partial token list or tree is ever returned alongside them.
//!
//! [`Error`] is the crate-level error used by callers that also open files.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Broad category of a [`ParseError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "lexical error"),
            ErrorKind::Syntax => write!(f, "syntax error"),
        }
    }
}

/// A fatal scanning or parsing failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Unterminated literal or block comment
    #[error("At {offset}: {message}")]
    Lexical { message: String, offset: usize },

    /// The lookahead token does not fit any grammar rule
    #[error("At {offset}: Expected '{expected}', got {found} for next token")]
    Syntax {
        expected: String,
        found: String,
        offset: usize,
    },
}

impl ParseError {
    pub(crate) fn lexical(message: impl Into<String>, offset: usize) -> Self {
        ParseError::Lexical {
            message: message.into(),
            offset,
        }
    }

    pub(crate) fn syntax(
        expected: impl Into<String>,
        found: impl Into<String>,
        offset: usize,
    ) -> Self {
        ParseError::Syntax {
            expected: expected.into(),
            found: found.into(),
            offset,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Lexical { .. } => ErrorKind::Lexical,
            ParseError::Syntax { .. } => ErrorKind::Syntax,
        }
    }

    /// Byte offset in the source where the offending token (or literal) began.
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Lexical { offset, .. } | ParseError::Syntax { offset, .. } => *offset,
        }
    }

    /// Human-readable description without the offset prefix.
    pub fn message(&self) -> String {
        match self {
            ParseError::Lexical { message, .. } => message.clone(),
            ParseError::Syntax {
                expected, found, ..
            } => format!("Expected '{}', got {} for next token", expected, found),
        }
    }
}

/// Problems reading canonical tuples back into a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TupleError {
    #[error("malformed tuple line: {0:?}")]
    Malformed(String),

    #[error("no tuples to rebuild from")]
    Empty,

    #[error("root tuple {id} names parent {parent}")]
    RootHasParent { id: u32, parent: u32 },

    #[error("tuple {id} refers to unknown parent {parent}")]
    UnknownParent { id: u32, parent: u32 },

    #[error("duplicate tuple id {0}")]
    DuplicateId(u32),
}

/// Errors surfaced to callers that read input from the filesystem
#[derive(Debug, Error)]
pub enum Error {
    #[error("Error occurred during opening {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{kind}: {0}", kind = .0.kind())]
    Parse(#[from] ParseError),

    #[error("error writing output: {0}")]
    Output(#[source] std::io::Error),
}
