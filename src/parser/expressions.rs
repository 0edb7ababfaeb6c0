//! Expression parsing.
//!
//! Two strategies are used, depending on where the expression appears:
//!
//! - **Folded**: assignment values and PRINT lists are parsed into an
//!   [`Expr`] by left-to-right composition (no precedence table), then
//!   rendered with the parentheses Python needs.
//! - **Raw**: call arguments and block conditions are copied token by token
//!   in their Python spelling, keeping the source spacing. Names are still
//!   checked and array indices still get their bound offsets.

use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp, python_string};
use crate::error::{Diagnostic, DiagnosticKind};
use crate::lexer::{Token, TokenClass, TokenKind};
use crate::semantic::{DataType, Symbol};

use super::Translator;

/// What a parsed reference turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ReferenceKind {
    /// `name(args)` or `a.b(args)`
    Call,
    /// A plain declared name.
    Variable,
    /// `name[i]`
    Element,
    /// `a.b`
    Path,
}

/// A rendered name, element, attribute path or call.
#[derive(Debug, Clone)]
pub(super) struct Reference {
    /// Python text of the reference.
    pub text: String,
    /// The first token of the reference.
    pub token: Token,
    pub kind: ReferenceKind,
    /// Declared type of the referenced value, if known.
    pub data_type: Option<DataType>,
    pub is_constant: bool,
}

/// Where raw tokens are being copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RawContext {
    /// Inside a call's parentheses; `=` stays a keyword-argument marker.
    Arguments,
    /// An IF/WHILE/UNTIL condition; `=` is a comparison.
    Condition,
}

impl Translator {
    // ==================== Folded Expressions ====================

    /// Parses a term followed by any number of `op term` pairs, folding
    /// left to right.
    pub(super) fn parse_expression(&mut self) -> Result<Expr, Diagnostic> {
        let mut left = self.parse_term()?;

        while let Some((op, width)) = self.peek_binary_op() {
            for _ in 0..width {
                self.cursor.advance();
            }
            let right = self.parse_term()?;
            left = left.binary(op, right);
        }

        Ok(left)
    }

    /// Returns the operator at the cursor and how many tokens spell it.
    ///
    /// `NOT` directly followed by `AND`/`OR` is the negated operator.
    fn peek_binary_op(&self) -> Option<(BinaryOp, usize)> {
        if self.cursor.check(&TokenKind::Not) {
            return negated_op(&self.cursor.peek_ahead(1).kind).map(|op| (op, 2));
        }
        binary_op(self.cursor.peek_kind()).map(|op| (op, 1))
    }

    /// Parses a primary term or a unary prefix applied to a term.
    fn parse_term(&mut self) -> Result<Expr, Diagnostic> {
        let token = self.cursor.peek().clone();
        let (line, column) = (token.line, token.column);

        let kind = match token.kind {
            TokenKind::IntegerLiteral => {
                self.cursor.advance();
                ExprKind::IntegerLiteral(strip_leading_zeros(&token.text).to_string())
            }
            TokenKind::RealLiteral => {
                self.cursor.advance();
                ExprKind::RealLiteral(token.text.clone())
            }
            TokenKind::StringLiteral | TokenKind::CharLiteral => {
                self.cursor.advance();
                ExprKind::StringLiteral(unquote(&token.text).to_string())
            }
            TokenKind::True | TokenKind::False => {
                self.cursor.advance();
                ExprKind::BooleanLiteral(token.kind == TokenKind::True)
            }
            TokenKind::LeftParen => {
                self.cursor.advance();
                let inner = self.parse_expression()?;
                if self.cursor.is_at_end() {
                    return Err(Diagnostic::unterminated("missing `)` for this `(`", &token));
                }
                self.cursor.expect(&TokenKind::RightParen, "`)`")?;
                ExprKind::Grouped(Box::new(inner))
            }
            TokenKind::Minus | TokenKind::Not => {
                self.cursor.advance();
                let op = if token.kind == TokenKind::Minus {
                    UnaryOp::Negate
                } else {
                    UnaryOp::Not
                };
                let operand = self.parse_term()?;
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                }
            }
            TokenKind::Identifier => ExprKind::Reference(self.parse_reference()?.text),
            TokenKind::Attribute => {
                ExprKind::Reference(self.parse_attribute_chain(String::new())?.text)
            }
            _ => {
                return Err(Diagnostic::syntax(
                    format!("unexpected {} in expression", token.describe()),
                    &token,
                ));
            }
        };

        Ok(Expr::new(kind, line, column))
    }

    // ==================== References ====================

    /// Parses an identifier with any index, attribute chain or call suffix.
    ///
    /// The identifier must be declared or be a TYPE name, unless the
    /// reference ends in a call: callees may be Python builtins.
    pub(super) fn parse_reference(&mut self) -> Result<Reference, Diagnostic> {
        let token = self.cursor.advance().clone();
        let symbol = self.symbols.lookup(&token.text).cloned();

        let mut reference = Reference {
            text: token.text.clone(),
            token: token.clone(),
            kind: ReferenceKind::Variable,
            data_type: symbol.as_ref().map(|s| s.data_type.clone()),
            is_constant: symbol.as_ref().is_some_and(|s| s.is_constant),
        };

        if self.cursor.check(&TokenKind::LeftBracket) {
            let Some(symbol) = &symbol else {
                return Err(Diagnostic::undefined(&token));
            };
            reference.text = self.parse_index(&token, symbol)?;
            reference.kind = ReferenceKind::Element;
            reference.data_type = symbol.element_type.clone();
        }

        if self.cursor.check(&TokenKind::Attribute) {
            let chained = self.parse_attribute_chain(reference.text.clone())?;
            reference.text = chained.text;
            reference.kind = chained.kind;
            reference.data_type = None;
            reference.is_constant = false;
        } else if self.cursor.check(&TokenKind::LeftParen) {
            let open = self.cursor.advance().clone();
            let args = self.collect_arguments(&open)?;
            reference.text = format!("{}({})", reference.text, args);
            reference.kind = ReferenceKind::Call;
            reference.data_type = None;
        }

        if reference.kind != ReferenceKind::Call
            && symbol.is_none()
            && !self.types.contains(&token.text)
        {
            return Err(Diagnostic::undefined(&token));
        }

        Ok(reference)
    }

    /// Appends attribute segments to `prefix`; a trailing `(` makes the
    /// path a call.
    pub(super) fn parse_attribute_chain(&mut self, prefix: String) -> Result<Reference, Diagnostic> {
        let token = self.cursor.peek().clone();
        let mut text = prefix;
        while self.cursor.check(&TokenKind::Attribute) {
            text.push_str(&self.cursor.advance().text);
        }

        let mut kind = ReferenceKind::Path;
        if self.cursor.check(&TokenKind::LeftParen) {
            let open = self.cursor.advance().clone();
            let args = self.collect_arguments(&open)?;
            text = format!("{}({})", text, args);
            kind = ReferenceKind::Call;
        }

        Ok(Reference {
            text,
            token,
            kind,
            data_type: None,
            is_constant: false,
        })
    }

    /// Parses `[i]` or `[i, j]` after an array name.
    ///
    /// Each index is shifted by its dimension's lower bound. Literal indices
    /// are folded and checked against the bounds.
    pub(super) fn parse_index(&mut self, name: &Token, symbol: &Symbol) -> Result<String, Diagnostic> {
        let open = self.cursor.advance().clone(); // consume [
        if !symbol.is_array() {
            return Err(Diagnostic::type_mismatch(
                format!("`{}` is not an array", name.text),
                name,
            ));
        }

        let mut indices = vec![self.parse_expression()?];
        while self.cursor.match_token(&TokenKind::Comma) {
            indices.push(self.parse_expression()?);
        }
        if self.cursor.is_at_end() {
            return Err(Diagnostic::unterminated("missing `]` for this `[`", &open));
        }
        self.cursor.expect(&TokenKind::RightBracket, "`]`")?;

        // A bare ARRAY has no bounds; its indices are used as written.
        if symbol.dimensions.is_empty() {
            let rendered: Vec<String> = indices.iter().map(|i| format!("[{}]", i.to_python())).collect();
            return Ok(format!("{}{}", name.text, rendered.concat()));
        }

        if indices.len() != symbol.dimensions.len() {
            return Err(Diagnostic::type_mismatch(
                format!(
                    "`{}` has {} dimension(s) but {} index(es) were given",
                    name.text,
                    symbol.dimensions.len(),
                    indices.len()
                ),
                name,
            ));
        }

        let mut text = name.text.clone();
        for (index, dim) in indices.into_iter().zip(&symbol.dimensions) {
            let rendered = match index.integer_value() {
                Some(value) if dim.contains(value) => dim.offset_of(value).to_string(),
                None if !index.is_integer_literal() => offset(index, dim.lower).to_python(),
                _ => {
                    return Err(Diagnostic::new(
                        DiagnosticKind::TypeMismatch,
                        format!(
                            "index {} is outside the bounds {}:{} of `{}`",
                            index.to_python(),
                            dim.lower,
                            dim.upper,
                            name.text
                        ),
                        index.line,
                        index.column,
                    ));
                }
            };
            text.push('[');
            text.push_str(&rendered);
            text.push(']');
        }
        Ok(text)
    }

    // ==================== Raw Token Text ====================

    /// Collects call arguments after the opening `(` up to the matching `)`.
    ///
    /// Nested parentheses are balanced. Line ends inside the parentheses
    /// are kept as `\n`. The closing `)` is consumed but not included.
    pub(super) fn collect_arguments(&mut self, open: &Token) -> Result<String, Diagnostic> {
        let mut text = String::new();
        let mut depth = 1usize;
        let mut previous_end = Some(open.span.end);

        loop {
            if self.cursor.is_at_end() {
                return Err(Diagnostic::unterminated("missing `)` for this `(`", open));
            }
            let token = self.cursor.peek().clone();
            match token.kind {
                TokenKind::Newline | TokenKind::Semicolon => {
                    self.cursor.advance();
                    text.push('\n');
                    previous_end = None;
                    continue;
                }
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.cursor.advance();
                        break;
                    }
                }
                _ => {}
            }

            if previous_end.is_some_and(|end| token.span.start > end) {
                text.push(' ');
            }
            let (rendered, end) = self.raw_token(RawContext::Arguments)?;
            text.push_str(&rendered);
            previous_end = Some(end);
        }

        Ok(text.trim().to_string())
    }

    /// Collects a condition up to the end of the line or one of `stops`.
    pub(super) fn collect_condition(&mut self, stops: &[TokenKind]) -> Result<String, Diagnostic> {
        let mut text = String::new();
        let mut previous_end: Option<usize> = None;

        while !self.cursor.is_at_line_end() && !self.cursor.is_at_end() && !self.cursor.check_any(stops) {
            let start = self.cursor.peek().span.start;
            if previous_end.is_some_and(|end| start > end) {
                text.push(' ');
            }
            let (rendered, end) = self.raw_token(RawContext::Condition)?;
            text.push_str(&rendered);
            previous_end = Some(end);
        }

        Ok(text)
    }

    /// Consumes one raw unit and returns its Python text and end offset.
    ///
    /// A unit is one token, or a whole indexed reference `a[i]` so that the
    /// bound offsets apply.
    fn raw_token(&mut self, context: RawContext) -> Result<(String, usize), Diagnostic> {
        let token = self.cursor.peek().clone();
        let next = self.cursor.peek_ahead(1).kind.clone();

        if token.kind == TokenKind::Identifier {
            // `f(..)` and `math.sqrt(..)` may name Python builtins.
            let mut after = 1;
            while self.cursor.peek_ahead(after).kind == TokenKind::Attribute {
                after += 1;
            }
            let is_call = self.cursor.peek_ahead(after).kind == TokenKind::LeftParen;

            let exempt = is_call
                || (context == RawContext::Arguments && next == TokenKind::Equals)
                || self.types.contains(&token.text);
            let symbol = self.symbols.lookup(&token.text).cloned();
            self.cursor.advance();
            return match symbol {
                Some(symbol) if next == TokenKind::LeftBracket => {
                    let text = self.parse_index(&token, &symbol)?;
                    let end = self.cursor.peek_relative(-1)?.span.end;
                    Ok((text, end))
                }
                None if !exempt => Err(Diagnostic::undefined(&token)),
                _ => Ok((token.text.clone(), token.span.end)),
            };
        }

        let text = match token.kind {
            TokenKind::True => "True".to_string(),
            TokenKind::False => "False".to_string(),
            TokenKind::And => "and".to_string(),
            TokenKind::Or => "or".to_string(),
            TokenKind::Not if negated_op(&next).is_some() => {
                return Err(Diagnostic::syntax(
                    format!(
                        "`NOT {}` is only supported in assignments",
                        self.cursor.peek_ahead(1).text
                    ),
                    &token,
                ));
            }
            TokenKind::Not => "not".to_string(),
            TokenKind::NotEquals => "!=".to_string(),
            TokenKind::Equals if context == RawContext::Condition => "==".to_string(),
            TokenKind::Caret => "**".to_string(),
            TokenKind::Mod => "%".to_string(),
            TokenKind::Div => "//".to_string(),
            TokenKind::Ampersand => "+".to_string(),
            TokenKind::StringLiteral | TokenKind::CharLiteral => python_string(unquote(&token.text)),
            TokenKind::IntegerLiteral => strip_leading_zeros(&token.text).to_string(),
            TokenKind::LeftArrow
            | TokenKind::UnicodeArrow
            | TokenKind::RightArrow
            | TokenKind::Tilde => {
                return Err(Diagnostic::syntax(
                    format!("unexpected {} in expression", token.describe()),
                    &token,
                ));
            }
            _ if token.kind.class() == TokenClass::Keyword => {
                return Err(Diagnostic::syntax(
                    format!("unexpected {} in expression", token.describe()),
                    &token,
                ));
            }
            _ => token.text.clone(),
        };

        self.cursor.advance();
        Ok((text, token.span.end))
    }
}

/// Maps an operator token to the operator it folds with.
fn binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Caret | TokenKind::StarStar => BinaryOp::Power,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Div => BinaryOp::FloorDivide,
        TokenKind::Mod | TokenKind::Percent => BinaryOp::Modulo,
        TokenKind::Plus | TokenKind::Ampersand => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Subtract,
        TokenKind::ShiftLeft => BinaryOp::ShiftLeft,
        TokenKind::ShiftRight => BinaryOp::ShiftRight,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::Equals | TokenKind::EqualEqual => BinaryOp::Equal,
        TokenKind::NotEquals | TokenKind::BangEqual => BinaryOp::NotEqual,
        TokenKind::LessThan => BinaryOp::LessThan,
        TokenKind::LessEquals => BinaryOp::LessEqual,
        TokenKind::GreaterThan => BinaryOp::GreaterThan,
        TokenKind::GreaterEquals => BinaryOp::GreaterEqual,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        _ => return None,
    };
    Some(op)
}

/// The negated operator for the token after a `NOT`.
fn negated_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::And => Some(BinaryOp::Nand),
        TokenKind::Or => Some(BinaryOp::Nor),
        _ => None,
    }
}

/// Shifts a computed index by a dimension's lower bound.
fn offset(index: Expr, lower: i64) -> Expr {
    let (line, column) = (index.line, index.column);
    let shift = Expr::integer(lower.unsigned_abs(), line, column);
    match lower {
        0 => index,
        l if l > 0 => index.binary(BinaryOp::Subtract, shift),
        _ => index.binary(BinaryOp::Add, shift),
    }
}

/// Strips the quotes from a string or char literal.
pub(super) fn unquote(text: &str) -> &str {
    text.get(1..text.len().saturating_sub(1)).unwrap_or("")
}

/// Python rejects integer literals like `007`.
fn strip_leading_zeros(text: &str) -> &str {
    let stripped = text.trim_start_matches('0');
    if stripped.is_empty() { "0" } else { stripped }
}
