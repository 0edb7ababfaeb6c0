//! Translation diagnostics.
//!
//! A [`Diagnostic`] captures what went wrong and where. Diagnostics are plain
//! data: they are built at the point of detection, returned through `?`, and
//! never logged here. The first one aborts the translation; deciding how to
//! report it is up to the caller.

use std::fmt;

use thiserror::Error;

use crate::lexer::Token;

/// The category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Malformed construct or unexpected token.
    Syntax,
    /// Declared type disagrees with an assigned literal.
    TypeMismatch,
    /// Reference to a name that was never declared.
    UndefinedName,
    /// End of input inside an argument list or block.
    UnterminatedConstruct,
    /// Indent bookkeeping or cursor misuse; a translator bug.
    InternalInvariant,
    /// A name declared twice.
    Redeclaration,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticKind::Syntax => "syntax error",
            DiagnosticKind::TypeMismatch => "type mismatch",
            DiagnosticKind::UndefinedName => "undefined name",
            DiagnosticKind::UnterminatedConstruct => "unterminated construct",
            DiagnosticKind::InternalInvariant => "internal error",
            DiagnosticKind::Redeclaration => "redeclaration",
        };
        f.write_str(text)
    }
}

/// A translation error with location and description.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} at line {line}, column {column}: {message}")]
pub struct Diagnostic {
    /// What category of problem this is.
    pub kind: DiagnosticKind,
    /// Description of the problem.
    pub message: String,
    /// 1-based line of the offending token.
    pub line: usize,
    /// 1-based column of the offending token.
    pub column: usize,
}

impl Diagnostic {
    /// Creates a diagnostic at an explicit position.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            column,
        }
    }

    /// Creates a diagnostic located at `token`.
    pub fn at(kind: DiagnosticKind, message: impl Into<String>, token: &Token) -> Self {
        Self::new(kind, message, token.line, token.column)
    }

    /// Creates a syntax error with a message.
    pub fn syntax(message: impl Into<String>, token: &Token) -> Self {
        Self::at(DiagnosticKind::Syntax, message, token)
    }

    /// Creates an "expected X, found Y" syntax error at the found token.
    pub fn unexpected(expected: &str, found: &Token) -> Self {
        Self::syntax(
            format!("expected {}, found {}", expected, found.describe()),
            found,
        )
    }

    /// Creates an undefined-name error for the name carried by `token`.
    pub fn undefined(token: &Token) -> Self {
        Self::at(
            DiagnosticKind::UndefinedName,
            format!("`{}` is not declared", token.text),
            token,
        )
    }

    /// Creates a type mismatch error.
    pub fn type_mismatch(message: impl Into<String>, token: &Token) -> Self {
        Self::at(DiagnosticKind::TypeMismatch, message, token)
    }

    /// Creates an unterminated-construct error, located at the opener.
    pub fn unterminated(message: impl Into<String>, opener: &Token) -> Self {
        Self::at(DiagnosticKind::UnterminatedConstruct, message, opener)
    }

    /// Creates an internal error (translator bug).
    pub fn internal(message: impl Into<String>, token: &Token) -> Self {
        Self::at(DiagnosticKind::InternalInvariant, message, token)
    }

    /// Creates a redeclaration error for the name carried by `token`.
    pub fn redeclared(token: &Token) -> Self {
        Self::at(
            DiagnosticKind::Redeclaration,
            format!("`{}` is already declared", token.text),
            token,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn ident(text: &str, line: usize, column: usize) -> Token {
        Token::new(TokenKind::Identifier, 0..text.len(), text, line, column)
    }

    #[test]
    fn test_display() {
        let err = Diagnostic::undefined(&ident("total", 3, 5));
        assert_eq!(
            err.to_string(),
            "undefined name at line 3, column 5: `total` is not declared"
        );
    }

    #[test]
    fn test_unexpected_names_expected_construct() {
        let token = Token::new(TokenKind::Newline, 4..5, "\n", 1, 5);
        let err = Diagnostic::unexpected("`)`", &token);
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!(err.message, "expected `)`, found end of line");
    }

    #[test]
    fn test_position_comes_from_token() {
        let err = Diagnostic::redeclared(&ident("x", 7, 9));
        assert_eq!(err.kind, DiagnosticKind::Redeclaration);
        assert_eq!((err.line, err.column), (7, 9));
    }
}
