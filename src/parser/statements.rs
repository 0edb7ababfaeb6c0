//! Construct routing and simple statements.
//!
//! This module contains the router that picks a grammar rule from the
//! lookahead token, and the rules for single-line statements: PRINT,
//! assignments, CONSTANT, INPUT, CALL, DELETE and LET.
//!
//! Block constructs live in `control_flow`, declarations in `declarations`.

use log::debug;

use crate::ast::python_string;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::lexer::{Token, TokenKind};
use crate::semantic::{DataType, Symbol};

use super::Translator;
use super::expressions::{Reference, ReferenceKind};

impl Translator {
    // ==================== Construct Router ====================

    /// Parses one construct and emits its translation.
    pub(super) fn parse_construct(&mut self) -> Result<(), Diagnostic> {
        let token = self.cursor.peek().clone();
        debug!("{}:{} route {:?}", token.line, token.column, token.kind);

        match token.kind {
            // Statement boundaries produce no output
            TokenKind::Newline | TokenKind::Semicolon => {
                self.cursor.advance();
                Ok(())
            }
            TokenKind::EndIf => {
                debug!("skipping stray ENDIF at line {}", token.line);
                self.cursor.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),

            TokenKind::Print | TokenKind::Output => self.parse_print(),

            // Control flow (delegated to control_flow.rs)
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Repeat => self.parse_repeat(),

            // Declarations (delegated to declarations.rs)
            TokenKind::Declare => self.parse_declare(),
            TokenKind::Type => self.parse_type(),

            TokenKind::Constant => self.parse_constant(),
            TokenKind::Input => self.parse_input(),
            TokenKind::Call => self.parse_call(),
            TokenKind::Delete => self.parse_delete(),
            TokenKind::Let => self.parse_let(),

            TokenKind::Identifier => self.parse_identifier_statement(),
            TokenKind::Attribute => self.parse_attribute_statement(),

            _ => Err(Diagnostic::syntax(
                format!("unexpected {} at start of statement", token.describe()),
                &token,
            )),
        }
    }

    // ==================== PRINT Statement ====================

    /// Parses `PRINT`/`OUTPUT` followed by a parenthesized argument list or
    /// by comma-separated expressions.
    fn parse_print(&mut self) -> Result<(), Diagnostic> {
        let keyword = self.cursor.advance().clone();

        let args = if self.cursor.check(&TokenKind::LeftParen) && self.paren_group_ends_statement() {
            let open = self.cursor.advance().clone();
            self.collect_arguments(&open)?
        } else {
            let mut values = Vec::new();
            while !self.cursor.is_at_line_end() && !self.cursor.is_at_end() {
                values.push(self.parse_expression()?.to_python());
                if !self.cursor.match_token(&TokenKind::Comma) {
                    break;
                }
            }
            values.join(", ")
        };

        if args.trim().is_empty() {
            return Err(Diagnostic::syntax(
                format!("{} needs at least one value", keyword.text),
                &keyword,
            ));
        }

        self.emitter.emit(&format!("print({})", args));
        self.finish_statement()
    }

    /// Returns true if the `(` at the cursor is closed right before the end
    /// of the statement, as in `PRINT("a", b)`. `PRINT (a + b) * 2` is an
    /// expression list instead.
    fn paren_group_ends_statement(&self) -> bool {
        let mut depth = 0usize;
        let mut offset = 0;
        loop {
            let token = self.cursor.peek_ahead(offset);
            match token.kind {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        let next = &self.cursor.peek_ahead(offset + 1).kind;
                        return matches!(
                            next,
                            TokenKind::Newline | TokenKind::Semicolon | TokenKind::Eof
                        );
                    }
                }
                // Unterminated: let argument collection report it
                TokenKind::Eof => return true,
                _ => {}
            }
            offset += 1;
        }
    }

    // ==================== Identifier-led Statements ====================

    /// Parses a statement starting with an identifier: a call, an
    /// assignment, or a bare reference.
    fn parse_identifier_statement(&mut self) -> Result<(), Diagnostic> {
        let reference = self.parse_reference()?;
        if self.cursor.peek().kind.is_assignment() {
            self.parse_assignment(reference)?;
        } else {
            self.emitter.emit(&reference.text);
        }
        self.finish_statement()
    }

    /// Parses a statement starting with an attribute segment.
    fn parse_attribute_statement(&mut self) -> Result<(), Diagnostic> {
        let reference = self.parse_attribute_chain(String::new())?;
        if self.cursor.peek().kind.is_assignment() {
            self.parse_assignment(reference)?;
        } else {
            self.emitter.emit(&reference.text);
        }
        self.finish_statement()
    }

    /// Parses `<- value` after `target` and emits `target = value`.
    ///
    /// A literal value must match the target's declared primitive type.
    fn parse_assignment(&mut self, target: Reference) -> Result<(), Diagnostic> {
        let operator = self.cursor.advance().clone();
        match target.kind {
            ReferenceKind::Call => {
                return Err(Diagnostic::syntax(
                    format!("cannot assign to the call `{}`", target.text),
                    &operator,
                ));
            }
            _ if target.is_constant => {
                return Err(Diagnostic::type_mismatch(
                    format!("cannot assign to constant `{}`", target.token.text),
                    &target.token,
                ));
            }
            _ => {}
        }

        let value = self.parse_expression()?;
        if let (Some(declared), Some(literal)) = (&target.data_type, value.literal_type()) {
            if !declared.accepts_literal(&literal) {
                return Err(Diagnostic::new(
                    DiagnosticKind::TypeMismatch,
                    format!(
                        "cannot assign {} literal to `{}` declared as {}",
                        literal, target.text, declared
                    ),
                    value.line,
                    value.column,
                ));
            }
        }

        self.emitter
            .emit(&format!("{} = {}", target.text, value.to_python()));
        Ok(())
    }

    // ==================== CONSTANT Statement ====================

    /// Parses `CONSTANT NAME = literal`.
    fn parse_constant(&mut self) -> Result<(), Diagnostic> {
        self.cursor.advance(); // consume CONSTANT
        let name = self
            .cursor
            .expect(&TokenKind::Identifier, "a constant name")?
            .clone();
        self.check_new_name(&name)?;

        if !self.cursor.peek().kind.is_assignment() {
            return Err(Diagnostic::unexpected("`=` or `<-`", self.cursor.peek()));
        }
        self.cursor.advance();

        let value = self.parse_expression()?;
        let Some(data_type) = value.literal_type() else {
            return Err(Diagnostic::new(
                DiagnosticKind::Syntax,
                format!("constant `{}` must be given a literal value", name.text),
                value.line,
                value.column,
            ));
        };

        self.emitter
            .emit(&format!("{} = {}", name.text, value.to_python()));
        self.declare_symbol(&name, Symbol::constant(name.text.clone(), data_type))?;
        self.finish_statement()
    }

    // ==================== INPUT Statement ====================

    /// Parses `INPUT target`, converting the input to the declared type.
    fn parse_input(&mut self) -> Result<(), Diagnostic> {
        self.cursor.advance(); // consume INPUT
        if !self.cursor.check_any(&[TokenKind::Identifier, TokenKind::Attribute]) {
            return Err(Diagnostic::unexpected("a variable name", self.cursor.peek()));
        }

        let target = if self.cursor.check(&TokenKind::Identifier) {
            self.parse_reference()?
        } else {
            self.parse_attribute_chain(String::new())?
        };
        if target.kind == ReferenceKind::Call {
            return Err(Diagnostic::syntax(
                format!("cannot read input into the call `{}`", target.text),
                &target.token,
            ));
        }
        if target.is_constant {
            return Err(Diagnostic::type_mismatch(
                format!("cannot assign to constant `{}`", target.token.text),
                &target.token,
            ));
        }

        let value = match target.data_type {
            Some(DataType::Integer) => "int(input())".to_string(),
            Some(DataType::Real) => "float(input())".to_string(),
            Some(DataType::Boolean) => format!("input() == {}", python_string("True")),
            _ => "input()".to_string(),
        };
        self.emitter.emit(&format!("{} = {}", target.text, value));
        self.finish_statement()
    }

    // ==================== CALL Statement ====================

    /// Parses `CALL name` or `CALL name(args)`.
    fn parse_call(&mut self) -> Result<(), Diagnostic> {
        self.cursor.advance(); // consume CALL
        let name = self
            .cursor
            .expect(&TokenKind::Identifier, "a procedure name")?
            .clone();

        let mut callee = name.text.clone();
        while self.cursor.check(&TokenKind::Attribute) {
            callee.push_str(&self.cursor.advance().text);
        }

        let args = if self.cursor.check(&TokenKind::LeftParen) {
            let open = self.cursor.advance().clone();
            self.collect_arguments(&open)?
        } else {
            String::new()
        };

        self.emitter.emit(&format!("{}({})", callee, args));
        self.finish_statement()
    }

    // ==================== DELETE Statement ====================

    /// Parses `DELETE name`, removing the symbol.
    fn parse_delete(&mut self) -> Result<(), Diagnostic> {
        self.cursor.advance(); // consume DELETE
        let name = self
            .cursor
            .expect(&TokenKind::Identifier, "a variable name")?
            .clone();

        if self.symbols.remove(&name.text).is_none() {
            return Err(Diagnostic::undefined(&name));
        }

        self.emitter.emit(&format!("del {}", name.text));
        self.finish_statement()
    }

    // ==================== LET Statement ====================

    /// Parses `LET target <- value`.
    fn parse_let(&mut self) -> Result<(), Diagnostic> {
        self.cursor.advance(); // consume LET
        if !self.cursor.check(&TokenKind::Identifier) {
            return Err(Diagnostic::unexpected("a variable name", self.cursor.peek()));
        }

        let target = self.parse_reference()?;
        if !self.cursor.peek().kind.is_assignment() {
            return Err(Diagnostic::unexpected("`<-`", self.cursor.peek()));
        }
        self.parse_assignment(target)?;
        self.finish_statement()
    }

    // ==================== Symbols ====================

    /// Fails if `name` is already a declared symbol or a registered type.
    pub(super) fn check_new_name(&self, name: &Token) -> Result<(), Diagnostic> {
        if self.symbols.contains(&name.text) || self.types.contains(&name.text) {
            return Err(Diagnostic::redeclared(name));
        }
        super::declarations::validate_identifier(name)
    }

    /// Records `symbol`, reporting a redeclaration at `name`.
    pub(super) fn declare_symbol(&mut self, name: &Token, symbol: Symbol) -> Result<(), Diagnostic> {
        debug!("declare `{}` as {}", symbol.name, symbol.data_type);
        self.symbols
            .declare(symbol)
            .map_err(|_| Diagnostic::redeclared(name))
    }
}
