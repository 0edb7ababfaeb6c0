//! Token navigation for the translator.
//!
//! The [`Cursor`] owns the token sequence and a forward-only index into it:
//! - Peeking at tokens without consuming them
//! - Advancing through the token stream
//! - Matching and expecting specific tokens
//!
//! The sequence always ends with exactly one [`TokenKind::Eof`] sentinel and
//! the index never moves past it, so `peek` is always valid.

use crate::error::Diagnostic;
use crate::lexer::{Token, TokenKind};

/// Forward-only position in a token sequence.
#[derive(Debug)]
pub struct Cursor {
    tokens: Vec<Token>,
    current: usize,
}

impl Cursor {
    /// Creates a cursor, appending the sentinel if `tokens` lacks one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let sentinel = match tokens.last() {
                Some(last) => Token::eof(
                    last.span.end,
                    last.line,
                    last.column + last.text.chars().count(),
                ),
                None => Token::eof(0, 1, 1),
            };
            tokens.push(sentinel);
        }
        Self { tokens, current: 0 }
    }

    // ==================== Token Navigation ====================

    /// Returns the current token without consuming it.
    pub fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    /// Returns the kind of the current token.
    pub fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    /// Returns the token `n` positions away from the current one.
    ///
    /// `n` may be negative to look back at consumed tokens. Positions outside
    /// the sequence are an internal error rather than a panic.
    pub fn peek_relative(&self, n: isize) -> Result<&Token, Diagnostic> {
        self.current
            .checked_add_signed(n)
            .and_then(|index| self.tokens.get(index))
            .ok_or_else(|| {
                Diagnostic::internal(
                    format!("token lookahead {} is out of range", n),
                    self.peek(),
                )
            })
    }

    /// Looks ahead `n` tokens (0 = current), stopping at the sentinel.
    pub fn peek_ahead(&self, n: usize) -> &Token {
        let index = (self.current + n).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    /// Consumes and returns the current token.
    ///
    /// At the sentinel this returns the sentinel and does not move.
    pub fn advance(&mut self) -> &Token {
        let index = self.current;
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[index]
    }

    /// Returns true at the end-of-input sentinel.
    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    /// Returns true at a statement boundary (newline or `;`).
    pub fn is_at_line_end(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Newline | TokenKind::Semicolon)
    }

    /// Checks if the current token matches the expected kind.
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Checks if the current token is one of the expected kinds.
    pub fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(self.peek_kind())
    }

    /// Consumes the current token if it matches, returns true if consumed.
    pub fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it matches, or fails with
    /// "expected `what`, found ...".
    pub fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<&Token, Diagnostic> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(Diagnostic::unexpected(what, self.peek()))
        }
    }

    /// Skips newline and `;` tokens.
    pub fn skip_line_ends(&mut self) {
        while self.is_at_line_end() {
            self.advance();
        }
    }

    /// Index of the current token.
    pub fn position(&self) -> usize {
        self.current
    }
}
