//! Tree builder
//!
//! Consumes the token sequence left to right with one token of lookahead and
//! grows a [`Tree`] as it goes. There is no backtracking and no error
//! recovery: the first token whose lookahead fits no rule ends the parse with
//! a [`ParseError`].
//!
//! # Grammar
//!
//! ```text
//! member := SYMBOL '=' value
//! value  := STRING | CHAR | INTEGER | '{' member+ '}'
//! ```
//!
//! Open blocks are tracked on an explicit stack, pushed on `{` and popped on
//! `}`, so closing braces unwind any depth of nesting.
//!
//! # Top level
//!
//! The root node (id 1) exists before the first token is read. When the first
//! member's value is a block, the root *is* that member: it takes the key as
//! its name and only end of input may follow its closing brace. When the
//! first member's value is a scalar, the root stays an unnamed container and
//! every top-level member becomes one of its children.

use super::lexer::{scan_str, ScanOptions};
use super::token::Token;
use crate::error::ParseError;
use crate::tree::{NodeId, Tree};
use std::iter::Peekable;
use std::vec::IntoIter;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopLevel {
    /// Nothing assigned to the root yet
    Pending,
    /// The root was opened as a named block
    Block,
    /// The root is an unnamed container of top-level members
    Members,
}

/// One-token-lookahead parser
pub struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    builder: Builder,
}

/// Mutable tree-building state, kept apart from the token cursor so a step
/// can borrow the lookahead while growing the tree.
struct Builder {
    tree: Tree,
    current: NodeId,
    open: Vec<NodeId>,
    top: TopLevel,
}

impl Parser {
    /// Build a parser over an already scanned token sequence. A missing
    /// trailing end-of-file token is supplied, placed right after the last
    /// significant token.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        tokens.retain(|t| !t.is_trivia());
        if !matches!(tokens.last(), Some(Token::EndOfFile(_))) {
            let end = tokens.last().map_or(0, |t| t.offset() + t.source_len());
            tokens.push(Token::EndOfFile(end));
        }

        Self {
            tokens: tokens.into_iter().peekable(),
            builder: Builder {
                tree: Tree::new(),
                current: NodeId::ROOT,
                open: Vec::new(),
                top: TopLevel::Pending,
            },
        }
    }

    /// Scan `source` and build a parser over the result.
    pub fn from_source(source: &str, options: ScanOptions) -> Result<Self, ParseError> {
        Ok(Self::new(scan_str(source, options)?))
    }

    /// Run the whole pass and hand back the finished tree.
    pub fn parse(mut self) -> Result<Tree, ParseError> {
        match self.run() {
            Ok(()) => {
                debug!(target: "cfgtree::parser", nodes = self.builder.tree.len(), "parse complete");
                Ok(self.builder.tree)
            }
            Err(err) => {
                warn!(target: "cfgtree::parser", offset = err.offset(), "{}", err.message());
                Err(err)
            }
        }
    }

    fn run(&mut self) -> Result<(), ParseError> {
        if let Some(first) = self.tokens.peek() {
            if !matches!(first, Token::Symbol(..) | Token::EndOfFile(_)) {
                return Err(expected("a symbol", first));
            }
        }

        while let Some(token) = self.tokens.next() {
            if matches!(token, Token::EndOfFile(_)) {
                break;
            }
            let Some(next) = self.tokens.peek() else {
                break;
            };
            self.builder.step(&token, next)?;
        }

        Ok(())
    }
}

impl Builder {
    fn step(&mut self, token: &Token, next: &Token) -> Result<(), ParseError> {
        match token {
            Token::Symbol(name, _) => {
                self.tree.set_name(self.current, name);
                if next.is_punct("=") {
                    Ok(())
                } else {
                    Err(expected("=", next))
                }
            }
            Token::Punctuation(p, _) if p == "=" => {
                if next.is_punct("{") || next.is_scalar() {
                    Ok(())
                } else {
                    Err(expected("{ or \"value\"", next))
                }
            }
            Token::Punctuation(p, _) if p == "{" => self.open_block(next),
            Token::Punctuation(p, _) if p == "}" => self.close_block(token, next),
            scalar if scalar.is_scalar() => self.assign(scalar.text(), next),
            other => Err(expected("a symbol", other)),
        }
    }

    /// `{`: the current node becomes a container and its first child the
    /// new current node.
    fn open_block(&mut self, next: &Token) -> Result<(), ParseError> {
        if !matches!(next, Token::Symbol(..)) {
            return Err(expected("a symbol", next));
        }

        if self.open.is_empty() && self.current == NodeId::ROOT {
            self.top = TopLevel::Block;
        }
        self.open.push(self.current);
        self.current = self.new_node(self.current);
        Ok(())
    }

    /// `}`: pop one open block, then start a sibling member if one follows.
    fn close_block(&mut self, token: &Token, next: &Token) -> Result<(), ParseError> {
        let Some(closed) = self.open.pop() else {
            return Err(expected(self.member_end(), token));
        };
        self.current = closed;

        match next {
            Token::Symbol(..) if !self.open.is_empty() || self.top == TopLevel::Members => {
                self.current = self.new_node(self.enclosing());
                Ok(())
            }
            t if t.is_punct("}") && !self.open.is_empty() => Ok(()),
            Token::EndOfFile(_) if self.open.is_empty() => Ok(()),
            other => Err(expected(self.member_end(), other)),
        }
    }

    /// Scalar value: store it on the current node, then start a sibling
    /// member if one follows.
    fn assign(&mut self, data: &str, next: &Token) -> Result<(), ParseError> {
        if self.open.is_empty() && self.current == NodeId::ROOT {
            // A scalar at the top: move the key off the root onto a child.
            let name = self.tree.take_name(NodeId::ROOT);
            self.top = TopLevel::Members;
            self.current = self.new_node(NodeId::ROOT);
            self.tree.set_name(self.current, &name);
        }
        self.tree.set_data(self.current, data);

        match next {
            Token::Symbol(..) => {
                self.current = self.new_node(self.enclosing());
                Ok(())
            }
            t if t.is_punct("}") && !self.open.is_empty() => Ok(()),
            Token::EndOfFile(_) if self.open.is_empty() => Ok(()),
            other => Err(expected(self.member_end(), other)),
        }
    }

    fn new_node(&mut self, parent: NodeId) -> NodeId {
        let id = self.tree.add_child(parent);
        trace!(target: "cfgtree::parser", id = id.get(), parent = parent.get(), "node created");
        id
    }

    /// The container new sibling members are attached to.
    fn enclosing(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId::ROOT)
    }

    /// What may legally follow a finished member at the current depth.
    fn member_end(&self) -> &'static str {
        if !self.open.is_empty() {
            "a symbol or }"
        } else if self.top == TopLevel::Block {
            "end of input"
        } else {
            "a symbol or end of input"
        }
    }
}

fn expected(what: &str, found: &Token) -> ParseError {
    ParseError::syntax(what, found.describe(), found.offset())
}

/// Build a tree from a scanned token sequence.
pub fn parse(tokens: Vec<Token>) -> Result<Tree, ParseError> {
    Parser::new(tokens).parse()
}

/// Scan and parse `source` in one call.
pub fn parse_str(source: &str, options: ScanOptions) -> Result<Tree, ParseError> {
    Parser::from_source(source, options)?.parse()
}
