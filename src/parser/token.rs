//! Token model shared by the lexer and the tree builder
//!
//! Each [`Token`] variant carries its textual payload (when it has one) and the
//! byte offset where its first character was read. [`TokenKind`] is the
//! payload-free tag used for diagnostics and assertions.

use std::fmt;

/// Byte offset into the source text.
pub type Offset = usize;

/// All token variants produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Identifier-like key: letters, digits and `_`, not starting with a digit
    Symbol(String, Offset),
    /// Decimal or `0x`-prefixed hexadecimal integer, kept as written
    Integer(String, Offset),
    /// Contents of a `"..."` literal without the quotes, escapes kept raw
    StringLiteral(String, Offset),
    /// Contents of a `'...'` literal without the quotes, escapes kept raw
    CharLiteral(String, Offset),
    /// One to three characters from the punctuation table
    Punctuation(String, Offset),
    Whitespace(Offset),
    EndOfLine(Offset),
    EndOfFile(Offset),
    /// A single byte that starts no other token
    Invalid(String, Offset),
}

/// Payload-free token tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Symbol,
    Integer,
    StringLiteral,
    CharLiteral,
    Punctuation,
    Whitespace,
    EndOfLine,
    EndOfFile,
    Invalid,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Symbol(..) => TokenKind::Symbol,
            Token::Integer(..) => TokenKind::Integer,
            Token::StringLiteral(..) => TokenKind::StringLiteral,
            Token::CharLiteral(..) => TokenKind::CharLiteral,
            Token::Punctuation(..) => TokenKind::Punctuation,
            Token::Whitespace(_) => TokenKind::Whitespace,
            Token::EndOfLine(_) => TokenKind::EndOfLine,
            Token::EndOfFile(_) => TokenKind::EndOfFile,
            Token::Invalid(..) => TokenKind::Invalid,
        }
    }

    /// Returns the byte offset where this token begins.
    pub fn offset(&self) -> Offset {
        match self {
            Token::Symbol(_, at)
            | Token::Integer(_, at)
            | Token::StringLiteral(_, at)
            | Token::CharLiteral(_, at)
            | Token::Punctuation(_, at)
            | Token::Invalid(_, at)
            | Token::Whitespace(at)
            | Token::EndOfLine(at)
            | Token::EndOfFile(at) => *at,
        }
    }

    /// Returns the accumulated payload; empty for whitespace, end-of-line and
    /// end-of-file.
    pub fn text(&self) -> &str {
        match self {
            Token::Symbol(s, _)
            | Token::Integer(s, _)
            | Token::StringLiteral(s, _)
            | Token::CharLiteral(s, _)
            | Token::Punctuation(s, _)
            | Token::Invalid(s, _) => s,
            Token::Whitespace(_) | Token::EndOfLine(_) | Token::EndOfFile(_) => "",
        }
    }

    /// Number of source bytes the token covers. Quoted literals count their
    /// quotes; trivia and end-of-file report the one byte they are known to
    /// start with (or none).
    pub fn source_len(&self) -> usize {
        match self {
            Token::StringLiteral(s, _) | Token::CharLiteral(s, _) => s.len() + 2,
            Token::Symbol(s, _) | Token::Integer(s, _) | Token::Punctuation(s, _) => s.len(),
            Token::Invalid(..) | Token::Whitespace(_) | Token::EndOfLine(_) => 1,
            Token::EndOfFile(_) => 0,
        }
    }

    /// True for the punctuation token spelled exactly `p`.
    pub fn is_punct(&self, p: &str) -> bool {
        matches!(self, Token::Punctuation(s, _) if s == p)
    }

    /// True for tokens that can be assigned as node data.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Token::StringLiteral(..) | Token::CharLiteral(..) | Token::Integer(..)
        )
    }

    /// Whitespace and end-of-line never reach the tree builder.
    pub fn is_trivia(&self) -> bool {
        matches!(self, Token::Whitespace(_) | Token::EndOfLine(_))
    }

    /// How this token is named in a syntax error.
    pub fn describe(&self) -> String {
        match self {
            Token::EndOfFile(_) => "end of input".to_string(),
            Token::EndOfLine(_) => "end of line".to_string(),
            Token::Whitespace(_) => "whitespace".to_string(),
            other => other.text().to_string(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Symbol => "symbol",
            TokenKind::Integer => "integer",
            TokenKind::StringLiteral => "literal",
            TokenKind::CharLiteral => "constant literal",
            TokenKind::Punctuation => "punctuation",
            TokenKind::Whitespace => "whitespace",
            TokenKind::EndOfLine => "EOL",
            TokenKind::EndOfFile => "EOF",
            TokenKind::Invalid => "INVALID",
        };
        f.write_str(name)
    }
}

/// Token listing format, one token per line: `TOKEN["symbol" , "shape"]`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Integer(s, _) => write!(f, "TOKEN[\"integer\" , {}]", s),
            Token::Whitespace(_) => write!(f, "TOKEN[\"whitespace\" , \" \"]"),
            Token::EndOfLine(_) | Token::EndOfFile(_) => write!(f, "TOKEN[\"{}\"]", self.kind()),
            Token::Invalid(s, _) => write!(f, "TOKEN[\"INVALID\" , {:?}]", s),
            other => write!(f, "TOKEN[\"{}\" , \"{}\"]", other.kind(), other.text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dump_format() {
        let sym = Token::Symbol("shape".to_string(), 0);
        let int = Token::Integer("0x1F".to_string(), 4);
        let lit = Token::StringLiteral("tetrahedron".to_string(), 9);
        assert_eq!(sym.to_string(), r#"TOKEN["symbol" , "shape"]"#);
        assert_eq!(int.to_string(), r#"TOKEN["integer" , 0x1F]"#);
        assert_eq!(lit.to_string(), r#"TOKEN["literal" , "tetrahedron"]"#);
        assert_eq!(Token::EndOfFile(20).to_string(), r#"TOKEN["EOF"]"#);
    }

    #[test]
    fn test_text_and_describe() {
        assert_eq!(Token::EndOfFile(3).text(), "");
        assert_eq!(Token::EndOfFile(3).describe(), "end of input");
        assert_eq!(Token::Punctuation("{".to_string(), 1).describe(), "{");
        assert!(Token::Punctuation("=".to_string(), 1).is_punct("="));
        assert!(!Token::Punctuation("==".to_string(), 1).is_punct("="));
        assert!(Token::CharLiteral("a".to_string(), 0).is_scalar());
    }

    #[test]
    fn test_source_len_counts_quotes() {
        assert_eq!(Token::StringLiteral(r#"a\"b"#.to_string(), 0).source_len(), 6);
        assert_eq!(Token::CharLiteral("x".to_string(), 0).source_len(), 3);
        assert_eq!(Token::Punctuation("<<=".to_string(), 0).source_len(), 3);
        assert_eq!(Token::EndOfFile(9).source_len(), 0);
    }
}
