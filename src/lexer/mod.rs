//! Lexical analysis for the pseudocode dialect.
//!
//! This module converts source text into a stream of [`Token`]s. It handles:
//!
//! - Ordered lexical rules (see [`token`](self::TokenKind) for the order)
//! - Line/column tracking for diagnostics
//! - Dropping whitespace and `//` comments
//! - Appending the end-of-input sentinel
//!
//! ## Example
//!
//! ```
//! use lumin::lexer::{lex, TokenKind};
//!
//! let tokens = lex("DECLARE x : INTEGER").unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::Declare);
//! assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
//! ```
//!
//! ## Position tracking
//!
//! A newline resets the column to 1 and increments the line. A semicolon also
//! increments the line but leaves the column running, because the dialect
//! treats `;` as an alternate statement terminator. This is surprising when
//! reading diagnostics for code such as `x <- 1; y <- 2` (the `y` is reported
//! on the next line), but it is the dialect's rule and is kept on purpose.
//! Every consumed character counts, including those inside strings and
//! comments.

mod token;

pub use token::{Token, TokenClass, TokenKind};

use log::trace;
use logos::Logos;

use crate::error::{Diagnostic, DiagnosticKind};

/// Running line/column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Position {
    line: usize,
    column: usize,
}

impl Position {
    fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Moves the position past `text`.
    fn consume(&mut self, text: &str) {
        let newlines = text.matches('\n').count();
        let semicolons = text.matches(';').count();
        self.line += newlines + semicolons;

        match text.rfind('\n') {
            Some(idx) => self.column = text[idx + 1..].chars().count() + 1,
            None => self.column += text.chars().count(),
        }
    }
}

/// The lexer for pseudocode source.
///
/// Wraps a `logos` lexer and yields position-tagged [`Token`]s. The last
/// item is always the [`TokenKind::Eof`] sentinel, unless an error ends the
/// stream first.
pub struct Lexer<'source> {
    inner: logos::Lexer<'source, TokenKind>,
    source: &'source str,
    position: Position,
    /// Byte offset up to which `position` has been advanced.
    offset: usize,
    finished: bool,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'source str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            source,
            position: Position::start(),
            offset: 0,
            finished: false,
        }
    }

    /// Get the next token.
    ///
    /// Returns `None` after the end-of-input sentinel has been produced or
    /// after an error.
    pub fn next_token(&mut self) -> Option<Result<Token, Diagnostic>> {
        if self.finished {
            return None;
        }

        let Some(result) = self.inner.next() else {
            self.position.consume(&self.source[self.offset..]);
            self.finished = true;
            return Some(Ok(Token::eof(
                self.source.len(),
                self.position.line,
                self.position.column,
            )));
        };

        let span = self.inner.span();
        // Skipped whitespace and comments still move the position.
        self.position.consume(&self.source[self.offset..span.start]);
        let text = self.inner.slice();

        match result {
            Ok(kind) => {
                let token = Token::new(
                    kind,
                    span.clone(),
                    text,
                    self.position.line,
                    self.position.column,
                );
                trace!("{}:{} {:?} {:?}", token.line, token.column, token.kind, token.text);
                self.position.consume(text);
                self.offset = span.end;
                Some(Ok(token))
            }
            Err(()) => {
                self.finished = true;
                let message = if text.starts_with('"') || text.starts_with('\'') {
                    "unterminated string literal".to_string()
                } else {
                    format!("unrecognized character `{}`", text)
                };
                Some(Err(Diagnostic::new(
                    DiagnosticKind::Syntax,
                    message,
                    self.position.line,
                    self.position.column,
                )))
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, Diagnostic>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Lex source code into tokens, ending with the end-of-input sentinel.
///
/// The first unrecognized character aborts lexing with a diagnostic.
pub fn lex(source: &str) -> Result<Vec<Token>, Diagnostic> {
    Lexer::new(source).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_sentinel_is_appended() {
        let tokens = lex("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
    }

    #[test]
    fn test_declare_line() {
        assert_eq!(
            kinds("DECLARE count : INTEGER\n"),
            vec![
                TokenKind::Declare,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_and_column() {
        let tokens = lex("x <- 1\n  y <- 2").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 3));
        assert_eq!((tokens[2].line, tokens[2].column), (1, 6));
        // after the newline
        assert_eq!((tokens[4].line, tokens[4].column), (2, 3));
        assert_eq!((tokens[5].line, tokens[5].column), (2, 5));
    }

    #[test]
    fn test_semicolon_increments_line_without_resetting_column() {
        let tokens = lex("a; b").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Semicolon);
        assert_eq!((tokens[1].line, tokens[1].column), (1, 2));
        assert_eq!(tokens[2].text, "b");
        assert_eq!((tokens[2].line, tokens[2].column), (2, 4));
    }

    #[test]
    fn test_comment_moves_position() {
        let tokens = lex("// header\nx").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Newline);
        assert_eq!((tokens[1].line, tokens[1].column), (2, 1));
    }

    #[test]
    fn test_columns_count_characters() {
        let tokens = lex("x ← 5").unwrap();
        assert_eq!(tokens[2].text, "5");
        assert_eq!(tokens[2].column, 5);
    }

    #[test]
    fn test_unrecognized_character() {
        let err = lex("x <- 1\ny <- $").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!((err.line, err.column), (2, 6));
        assert!(err.message.contains('$'));
    }

    #[test]
    fn test_unterminated_string() {
        let err = lex("PRINT \"oops").unwrap_err();
        assert!(err.message.contains("unterminated string"));
        assert_eq!(err.column, 7);
    }

    #[test]
    fn test_spans() {
        let tokens = lex("PRINT 42").unwrap();
        assert_eq!(tokens[0].span, 0..5);
        assert_eq!(tokens[1].span, 6..8);
        assert_eq!(tokens[2].span, 8..8);
    }

    #[test]
    fn test_iterator_stops_after_sentinel() {
        let mut lexer = Lexer::new("x");
        assert!(matches!(lexer.next(), Some(Ok(Token { kind: TokenKind::Identifier, .. }))));
        assert!(matches!(lexer.next(), Some(Ok(Token { kind: TokenKind::Eof, .. }))));
        assert!(lexer.next().is_none());
    }
}
