//! Canonical tuple rendering
//!
//! Projects a [`Tree`] into one `(id, parent_id, name, data)` line per node,
//! in node-creation order. The root's parent is written as `0`. Names and data
//! are written verbatim, without escaping.

use crate::error::TupleError;
use crate::tree::{Node, Tree};
use std::fmt;
use std::io::{self, Write};
use tracing::debug;

/// One canonical record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tuple {
    pub id: u32,
    /// `0` for the root
    pub parent: u32,
    pub name: String,
    pub data: String,
}

impl From<&Node> for Tuple {
    fn from(node: &Node) -> Self {
        Tuple {
            id: node.id().get(),
            parent: node.parent().map_or(0, |p| p.get()),
            name: node.name().to_string(),
            data: node.data().to_string(),
        }
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.id, self.parent, self.name, self.data)
    }
}

pub fn tuples(tree: &Tree) -> Vec<Tuple> {
    tree.iter().map(Tuple::from).collect()
}

/// Render every node as a canonical line (without trailing newline).
pub fn render(tree: &Tree) -> Vec<String> {
    tree.iter().map(|node| Tuple::from(node).to_string()).collect()
}

/// Write one newline-terminated line per node to `out`.
pub fn write_tuples<W: Write>(tree: &Tree, mut out: W) -> io::Result<()> {
    for node in tree {
        writeln!(out, "{}", Tuple::from(node))?;
    }
    out.flush()?;
    debug!(target: "cfgtree::render", lines = tree.len(), "tuples written");
    Ok(())
}

/// Read back a line produced by [`render`].
///
/// Data is the last field, so it may itself contain `, `.
pub fn parse_tuple_line(line: &str) -> Result<Tuple, TupleError> {
    let malformed = || TupleError::Malformed(line.to_string());

    let inner = line
        .trim_end_matches(['\r', '\n'])
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(malformed)?;

    let mut fields = inner.splitn(4, ", ");
    let id = fields.next().and_then(|f| f.parse().ok()).ok_or_else(malformed)?;
    let parent = fields.next().and_then(|f| f.parse().ok()).ok_or_else(malformed)?;
    let name = fields.next().ok_or_else(malformed)?;
    let data = fields.next().ok_or_else(malformed)?;

    Ok(Tuple {
        id,
        parent,
        name: name.to_string(),
        data: data.to_string(),
    })
}
