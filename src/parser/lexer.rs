//! Lexer (scanner) for configuration source text
//!
//! Reads a [`CharSource`] one byte at a time, with a single byte of lookahead,
//! and produces the flat [`Token`] sequence consumed by the tree builder.
//! Whitespace and end-of-line tokens are recognised but dropped before they
//! reach the output, which always ends with exactly one
//! [`Token::EndOfFile`].
//!
//! Comment stripping (`// ...` and `/* ... */`) is off unless enabled through
//! [`ScanOptions`]; with it off, `/` is ordinary punctuation.

use super::token::{Offset, Token};
use crate::error::ParseError;
use tracing::{debug, trace, warn};

/// A read-once character stream with one byte of lookahead.
pub trait CharSource {
    /// Consume and return the next byte.
    fn next_char(&mut self) -> Option<u8>;

    /// Return the next byte without consuming it.
    fn peek_char(&mut self) -> Option<u8>;

    /// Byte offset of the next byte to be read.
    fn offset(&self) -> Offset;
}

/// [`CharSource`] over an in-memory buffer
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl<'a> SliceSource<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }
}

impl<'a> From<&'a str> for SliceSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl CharSource for SliceSource<'_> {
    fn next_char(&mut self) -> Option<u8> {
        let ch = self.bytes.get(self.position).copied()?;
        self.position += 1;
        Some(ch)
    }

    fn peek_char(&mut self) -> Option<u8> {
        self.bytes.get(self.position).copied()
    }

    fn offset(&self) -> Offset {
        self.position
    }
}

/// Scanner switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanOptions {
    /// Treat `//` and `/* */` as comments instead of punctuation.
    pub strip_comments: bool,
}

impl ScanOptions {
    pub fn with_comments() -> Self {
        Self {
            strip_comments: true,
        }
    }
}

/// Lexer over any [`CharSource`]
pub struct Lexer<S> {
    source: S,
    options: ScanOptions,
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S, options: ScanOptions) -> Self {
        Self { source, options }
    }

    /// Tokenize the entire input, dropping whitespace and end-of-line tokens.
    pub fn tokenize(mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            let token = match self.next_token() {
                Ok(token) => token,
                Err(err) => {
                    warn!(target: "cfgtree::lexer", offset = err.offset(), "{}", err.message());
                    return Err(err);
                }
            };

            if token.is_trivia() {
                continue;
            }

            trace!(target: "cfgtree::lexer", kind = ?token.kind(), text = token.text(), offset = token.offset(), "token");
            let at_end = matches!(token, Token::EndOfFile(_));
            tokens.push(token);
            if at_end {
                break;
            }
        }

        debug!(target: "cfgtree::lexer", count = tokens.len(), "scan complete");
        Ok(tokens)
    }

    /// Scan one token, including whitespace and end-of-line.
    pub fn next_token(&mut self) -> Result<Token, ParseError> {
        let start = self.source.offset();
        let Some(ch) = self.source.next_char() else {
            return Ok(Token::EndOfFile(start));
        };

        match ch {
            b'/' if self.options.strip_comments
                && matches!(self.source.peek_char(), Some(b'/') | Some(b'*')) =>
            {
                self.comment(start)
            }
            c if c.is_ascii_alphabetic() || c == b'_' => Ok(self.symbol(c, start)),
            b'\n' => Ok(Token::EndOfLine(start)),
            c if is_whitespace(c) => {
                self.skip_while(is_whitespace);
                Ok(Token::Whitespace(start))
            }
            b'"' => self
                .quoted(b'"', "literal", start)
                .map(|s| Token::StringLiteral(s, start)),
            b'\'' => self
                .quoted(b'\'', "constant literal", start)
                .map(|s| Token::CharLiteral(s, start)),
            c if c.is_ascii_digit() => Ok(self.integer(c, start)),
            c if c.is_ascii_punctuation() => Ok(self.punctuation(c, start)),
            c => Ok(Token::Invalid(
                String::from_utf8_lossy(&[c]).into_owned(),
                start,
            )),
        }
    }

    fn symbol(&mut self, first: u8, start: Offset) -> Token {
        let mut text = String::from(first as char);
        self.take_while(&mut text, |c| c.is_ascii_alphanumeric() || c == b'_');
        Token::Symbol(text, start)
    }

    /// Decimal digits, or hex digits after a `0x`/`0X` prefix (kept in the text).
    fn integer(&mut self, first: u8, start: Offset) -> Token {
        let mut text = String::from(first as char);
        if first == b'0' && self.eat(&mut text, b"xX").is_some() {
            self.take_while(&mut text, |c| c.is_ascii_hexdigit());
        } else {
            self.take_while(&mut text, |c| c.is_ascii_digit());
        }
        Token::Integer(text, start)
    }

    /// Body of a quoted literal after its opening `delim`.
    ///
    /// A backslash is kept verbatim; when it precedes `delim` or another
    /// backslash that character is consumed with it.
    fn quoted(&mut self, delim: u8, what: &str, start: Offset) -> Result<String, ParseError> {
        let mut bytes = Vec::new();

        loop {
            match self.source.next_char() {
                Some(c) if c == delim => {
                    return Ok(String::from_utf8_lossy(&bytes).into_owned());
                }
                Some(b'\\') => {
                    bytes.push(b'\\');
                    if let Some(c) = self.source.peek_char() {
                        if c == delim || c == b'\\' {
                            self.source.next_char();
                            bytes.push(c);
                        }
                    }
                }
                Some(b'\n') => {
                    return Err(ParseError::lexical(
                        format!("EOL encountered before closing {} quotes", what),
                        start,
                    ));
                }
                Some(c) => bytes.push(c),
                None => {
                    return Err(ParseError::lexical(
                        format!("EOF encountered before closing {} quotes", what),
                        start,
                    ));
                }
            }
        }
    }

    /// Greedy match against the multi-character punctuation table.
    fn punctuation(&mut self, first: u8, start: Offset) -> Token {
        let mut text = String::from(first as char);

        match first {
            b'!' | b'%' | b'*' | b'/' | b'=' => {
                self.eat(&mut text, b"=");
            }
            b'#' => {
                self.eat(&mut text, b"#");
            }
            b':' => {
                self.eat(&mut text, b":");
            }
            b'&' => {
                self.eat(&mut text, b"&=");
            }
            b'+' => {
                self.eat(&mut text, b"+=");
            }
            b'|' => {
                self.eat(&mut text, b"|=");
            }
            b'-' => {
                // - -- -= -> ->*
                if self.eat(&mut text, b"-=>") == Some(b'>') {
                    self.eat(&mut text, b"*");
                }
            }
            b'.' => {
                // `..` is accepted here and left for the grammar to reject
                if self.eat(&mut text, b".").is_some() {
                    self.eat(&mut text, b".");
                }
            }
            b'<' | b'>' => {
                // < <= << <<= (and the same for >)
                self.eat(&mut text, &[first]);
                self.eat(&mut text, b"=");
            }
            _ => {}
        }

        Token::Punctuation(text, start)
    }

    /// Line comments become an end-of-line, block comments become whitespace.
    fn comment(&mut self, start: Offset) -> Result<Token, ParseError> {
        if self.source.next_char() == Some(b'/') {
            while let Some(c) = self.source.next_char() {
                if c == b'\n' {
                    break;
                }
            }
            return Ok(Token::EndOfLine(start));
        }

        loop {
            match self.source.next_char() {
                None => {
                    return Err(ParseError::lexical(
                        "block comment not terminated before EOF",
                        start,
                    ));
                }
                Some(b'*') if self.source.peek_char() == Some(b'/') => {
                    self.source.next_char();
                    return Ok(Token::Whitespace(start));
                }
                Some(_) => {}
            }
        }
    }

    /// Consume the next byte if it is one of `accepted`, appending it to `text`.
    fn eat(&mut self, text: &mut String, accepted: &[u8]) -> Option<u8> {
        let c = self.source.peek_char().filter(|c| accepted.contains(c))?;
        self.source.next_char();
        text.push(c as char);
        Some(c)
    }

    fn take_while(&mut self, text: &mut String, pred: impl Fn(u8) -> bool) {
        while let Some(c) = self.source.peek_char() {
            if !pred(c) {
                break;
            }
            self.source.next_char();
            text.push(c as char);
        }
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.source.peek_char().is_some_and(&pred) {
            self.source.next_char();
        }
    }
}

/// Space, tab, vertical tab, form feed and carriage return. Line feed is
/// scanned separately as an end-of-line.
fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | 0x0B | 0x0C | b'\r')
}

/// Tokenize `source`, returning the parser-facing token sequence.
pub fn scan<S: CharSource>(source: S, options: ScanOptions) -> Result<Vec<Token>, ParseError> {
    Lexer::new(source, options).tokenize()
}

/// Convenience wrapper around [`scan`] for in-memory text.
pub fn scan_str(text: &str, options: ScanOptions) -> Result<Vec<Token>, ParseError> {
    scan(SliceSource::from(text), options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::parser::token::TokenKind;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text()).collect()
    }

    #[test]
    fn test_simple_assignment() {
        let tokens = scan_str("name = \"value\"", ScanOptions::default()).unwrap();

        assert!(matches!(tokens[0], Token::Symbol(ref s, 0) if s == "name"));
        assert!(matches!(tokens[1], Token::Punctuation(ref s, 5) if s == "="));
        assert!(matches!(tokens[2], Token::StringLiteral(ref s, 7) if s == "value"));
        assert!(matches!(tokens[3], Token::EndOfFile(14)));
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_trivia_is_dropped() {
        let tokens = scan_str(" a\t=\r\n\x0B{ }\n", ScanOptions::default()).unwrap();
        let kinds: Vec<TokenKind> = tokens.iter().map(Token::kind).collect();

        assert_eq!(
            kinds,
            vec![
                TokenKind::Symbol,
                TokenKind::Punctuation,
                TokenKind::Punctuation,
                TokenKind::Punctuation,
                TokenKind::EndOfFile,
            ]
        );
    }

    #[test]
    fn test_next_token_reports_trivia() {
        let mut lexer = Lexer::new(SliceSource::from("  \nx"), ScanOptions::default());

        assert_eq!(lexer.next_token().unwrap(), Token::Whitespace(0));
        assert_eq!(lexer.next_token().unwrap(), Token::EndOfLine(2));
        assert_eq!(lexer.next_token().unwrap(), Token::Symbol("x".to_string(), 3));
        assert_eq!(lexer.next_token().unwrap(), Token::EndOfFile(4));
    }

    #[test]
    fn test_maximal_punctuation() {
        let tokens = scan_str("<<=x", ScanOptions::default()).unwrap();
        assert_eq!(tokens[0], Token::Punctuation("<<=".to_string(), 0));
        assert_eq!(tokens[1], Token::Symbol("x".to_string(), 3));

        let tokens = scan_str("->* -> -- -= ... .. != && &= || |= :: ## >>= >= ^", ScanOptions::default()).unwrap();
        assert_eq!(
            texts(&tokens),
            vec!["->*", "->", "--", "-=", "...", "..", "!=", "&&", "&=", "||", "|=", "::", "##", ">>=", ">=", "^", ""]
        );
    }

    #[test]
    fn test_adjacent_punctuation_splits() {
        let tokens = scan_str("={}", ScanOptions::default()).unwrap();
        assert_eq!(texts(&tokens), vec!["=", "{", "}", ""]);

        let tokens = scan_str("====", ScanOptions::default()).unwrap();
        assert_eq!(texts(&tokens), vec!["==", "==", ""]);
    }

    #[test]
    fn test_integers() {
        let tokens = scan_str("0x1F 0XdeadBEEF 42 007 0x", ScanOptions::default()).unwrap();
        assert_eq!(texts(&tokens), vec!["0x1F", "0XdeadBEEF", "42", "007", "0x", ""]);
        assert!(tokens[..5].iter().all(|t| t.kind() == TokenKind::Integer));
    }

    #[test]
    fn test_symbol_boundaries() {
        let tokens = scan_str("_a1b2 9lives", ScanOptions::default()).unwrap();
        assert_eq!(tokens[0], Token::Symbol("_a1b2".to_string(), 0));
        assert_eq!(tokens[1], Token::Integer("9".to_string(), 6));
        assert_eq!(tokens[2], Token::Symbol("lives".to_string(), 7));
    }

    #[test]
    fn test_string_escapes_are_kept_raw() {
        let tokens = scan_str(r#""say \"hi\" \\ \n""#, ScanOptions::default()).unwrap();
        assert_eq!(tokens[0].text(), r#"say \"hi\" \\ \n"#);
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_char_literal() {
        let tokens = scan_str(r"'a' '\'' '\\'", ScanOptions::default()).unwrap();
        assert_eq!(tokens[0], Token::CharLiteral("a".to_string(), 0));
        assert_eq!(tokens[1], Token::CharLiteral(r"\'".to_string(), 4));
        assert_eq!(tokens[2], Token::CharLiteral(r"\\".to_string(), 9));
    }

    #[test]
    fn test_unterminated_string_at_eof() {
        let err = scan_str("name = \"value", ScanOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert_eq!(err.offset(), 7);
        assert!(err.message().contains("EOF"));
    }

    #[test]
    fn test_unterminated_string_at_eol() {
        let err = scan_str("a = \"x\ny\"", ScanOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert!(err.message().contains("EOL"));
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        let err = scan_str(r#"a = "x\""#, ScanOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lexical);
    }

    #[test]
    fn test_unterminated_char_literal() {
        let err = scan_str("c = 'x", ScanOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert!(err.message().contains("constant literal"));
    }

    #[test]
    fn test_invalid_byte() {
        let tokens = scan_str("a\x01b", ScanOptions::default()).unwrap();
        assert_eq!(tokens[1], Token::Invalid("\u{1}".to_string(), 1));
        assert_eq!(tokens[2], Token::Symbol("b".to_string(), 2));
    }

    #[test]
    fn test_slashes_without_comment_stripping() {
        let tokens = scan_str("a // b", ScanOptions::default()).unwrap();
        assert_eq!(texts(&tokens), vec!["a", "/", "/", "b", ""]);
    }

    #[test]
    fn test_comments() {
        let source = "a = \"1\" // trailing\nb /* inline\nblock */ = 2 /= 3";
        let tokens = scan_str(source, ScanOptions::with_comments()).unwrap();
        assert_eq!(texts(&tokens), vec!["a", "=", "1", "b", "=", "2", "/=", "3", ""]);
    }

    #[test]
    fn test_line_comment_at_eof() {
        let tokens = scan_str("x // no newline", ScanOptions::with_comments()).unwrap();
        assert_eq!(texts(&tokens), vec!["x", ""]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let err = scan_str("a /* never closed *", ScanOptions::with_comments()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lexical);
        assert_eq!(err.offset(), 2);
    }

    #[test]
    fn test_empty_input() {
        let tokens = scan_str("", ScanOptions::default()).unwrap();
        assert_eq!(tokens, vec![Token::EndOfFile(0)]);
    }
}
