//! Configuration source parser
//!
//! This module turns source text into a [`Tree`](crate::tree::Tree):
//! - [`token`]: Token model shared by both phases
//! - [`lexer`]: Scanning (bytes → tokens)
//! - [`parse`]: Tree building (tokens → tree)
//!
//! # Accepted language
//!
//! A single object-literal-like language: `name = value` where a value is a
//! string, character or integer literal, or a non-empty `{ ... }` block of
//! further members. The scanner itself recognises the full C/C++ punctuation
//! set; the tree builder only ever accepts `=`, `{` and `}`.
//!
//! # Implementation
//!
//! Hand-written scanner with one byte of lookahead and a single-pass tree
//! builder with one token of lookahead. No parser generator dependencies.

pub mod lexer;
pub mod parse;
pub mod token;
