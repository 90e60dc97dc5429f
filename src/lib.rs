//! # Introduction
//!
//! cfgtree reads brace-nested `name = value` configuration text and flattens
//! it into an ordered list of `(id, parent_id, name, data)` tuples.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → Tree → Tuples
//! ```
//!
//! 1. [`parser::lexer`] — scans bytes into [`parser::token::Token`]s, dropping
//!    whitespace and line ends (and, optionally, comments).
//! 2. [`parser::parse`] — builds the [`tree::Tree`] in one pass with one token
//!    of lookahead.
//! 3. [`tree`] — the node arena; ids are assigned in creation order.
//! 4. [`render`] — projects the tree onto canonical tuple lines.
//!
//! Every scanning or parsing failure is a [`error::ParseError`]; nothing is
//! returned alongside it.
//!
//! ```
//! use cfgtree::parser::lexer::ScanOptions;
//!
//! let tree = cfgtree::parse_str("name = \"value\"", ScanOptions::default()).unwrap();
//! assert_eq!(
//!     cfgtree::render(&tree),
//!     vec!["(1, 0, , )", "(2, 1, name, value)"]
//! );
//! ```

pub mod error;
pub mod parser;
pub mod render;
pub mod tree;

pub use error::{Error, ErrorKind, ParseError};
pub use parser::lexer::{scan, scan_str, ScanOptions};
pub use parser::parse::{parse, parse_str};
pub use render::{render, write_tuples};
pub use tree::{Node, NodeId, Tree};

use std::io::Write;
use std::path::Path;

/// Read `path` and parse its contents.
pub fn parse_file(path: &Path, options: ScanOptions) -> Result<Tree, Error> {
    let bytes = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tokens = scan(parser::lexer::SliceSource::new(&bytes), options)?;
    Ok(parse(tokens)?)
}

/// Parse `source` and write its tuples to the sink produced by `open`.
///
/// `open` runs only after scanning and parsing succeed, so a file sink is
/// never created or truncated for input that fails to parse.
pub fn convert<W, F>(source: &[u8], options: ScanOptions, open: F) -> Result<(), Error>
where
    W: Write,
    F: FnOnce() -> W,
{
    let tokens = scan(parser::lexer::SliceSource::new(source), options)?;
    let tree = parse(tokens)?;
    write_tuples(&tree, open()).map_err(Error::Output)
}
