//! Single-pass translator from pseudocode tokens to Python source.
//!
//! The [`Translator`] walks the token stream with recursive descent and emits
//! Python lines as soon as each construct is recognized. There is no program
//! tree: the only state carried between statements is the indentation level,
//! the symbol table, the type registry and the pending imports.
//!
//! # Example
//!
//! ```
//! use lumin::lexer::lex;
//! use lumin::parser::{Options, Translator};
//!
//! let source = "DECLARE x : INTEGER\nx <- 1 + 2\nPRINT x\n";
//!
//! let tokens = lex(source).unwrap();
//! let output = Translator::new(tokens, &Options::default()).translate().unwrap();
//!
//! assert_eq!(output, "x: int\nx = 1 + 2\nprint(x)\n");
//! ```
//!
//! # Module Structure
//!
//! The translator is split into focused modules, each adding methods to
//! [`Translator`]:
//! - [`cursor`] - Token navigation (peek, advance, match, expect)
//! - `statements` - The construct router and simple statements
//! - `expressions` - Expression folding and raw argument/condition text
//! - `control_flow` - IF/WHILE/FOR/REPEAT blocks
//! - `declarations` - DECLARE and TYPE
//!
//! # Errors
//!
//! There is no recovery. The first [`Diagnostic`] stops the translation and
//! no partial output is returned.

mod control_flow;
pub mod cursor;
mod declarations;
mod expressions;
mod statements;

pub use cursor::Cursor;

use log::debug;

use crate::codegen::Emitter;
use crate::error::Diagnostic;
use crate::lexer::{Token, TokenKind};
use crate::semantic::{SymbolTable, TypeRegistry};

/// Translation settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Spaces per indentation level in the output.
    pub indent_width: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { indent_width: 4 }
    }
}

/// Translates one token stream into Python.
///
/// All state is owned by the translator and dropped with it, so nothing
/// leaks from one run into the next.
pub struct Translator {
    /// Position in the token stream.
    cursor: Cursor,
    /// Output lines, indentation and pending imports.
    emitter: Emitter,
    /// Declared variables and constants.
    symbols: SymbolTable,
    /// Names introduced by TYPE.
    types: TypeRegistry,
}

impl Translator {
    /// Creates a translator for the given tokens.
    pub fn new(tokens: Vec<Token>, options: &Options) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            emitter: Emitter::new(options.indent_width),
            symbols: SymbolTable::new(),
            types: TypeRegistry::new(),
        }
    }

    /// Translates the whole token stream and returns the Python text.
    pub fn translate(mut self) -> Result<String, Diagnostic> {
        while self.step()? {}

        if self.emitter.indent() != 0 {
            return Err(Diagnostic::internal(
                format!(
                    "indentation is {} levels deep at end of input",
                    self.emitter.indent()
                ),
                self.cursor.peek(),
            ));
        }
        debug!("translated {} lines", self.emitter.line_count());
        Ok(self.emitter.finish())
    }

    /// Translates the next top-level construct.
    ///
    /// Returns `Ok(false)` once the end of input is reached.
    pub fn step(&mut self) -> Result<bool, Diagnostic> {
        if self.cursor.is_at_end() {
            return Ok(false);
        }
        self.parse_construct()?;
        Ok(true)
    }

    /// The symbols declared so far.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The types registered so far.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    // ==================== Shared Helpers ====================

    /// Consumes the statement terminator after a construct.
    ///
    /// A construct must be followed by a newline, a `;`, or the end of input.
    pub(super) fn finish_statement(&mut self) -> Result<(), Diagnostic> {
        if self.cursor.is_at_line_end() {
            self.cursor.advance();
            Ok(())
        } else if self.cursor.is_at_end() {
            Ok(())
        } else {
            Err(Diagnostic::unexpected("end of line", self.cursor.peek()))
        }
    }

    /// Leaves a block body, checking the indent is back at `entry`.
    pub(super) fn leave_block(&mut self, entry: usize) -> Result<(), Diagnostic> {
        if !self.emitter.indent_out() || self.emitter.indent() != entry {
            return Err(Diagnostic::internal(
                format!(
                    "indentation is {} after a block entered at {}",
                    self.emitter.indent(),
                    entry
                ),
                self.cursor.peek(),
            ));
        }
        Ok(())
    }

    /// Parses an indented block body up to one of `terminators`.
    ///
    /// The terminator is left for the caller. End of input inside the body
    /// is reported at `opener` with `missing` as the message. A body that
    /// emitted nothing gets a `pass` line.
    pub(super) fn parse_block(
        &mut self,
        opener: &Token,
        terminators: &[TokenKind],
        missing: &str,
    ) -> Result<(), Diagnostic> {
        let entry = self.emitter.indent();
        self.emitter.indent_in();
        debug!("enter block at line {} (indent {})", opener.line, entry + 1);

        let before = self.emitter.line_count();
        self.parse_body(opener, terminators, missing)?;
        if self.emitter.line_count() == before {
            self.emitter.emit("pass");
        }

        self.leave_block(entry)?;
        debug!("leave block at line {}", self.cursor.peek().line);
        Ok(())
    }

    /// Routes constructs until one of `terminators` is the lookahead.
    pub(super) fn parse_body(
        &mut self,
        opener: &Token,
        terminators: &[TokenKind],
        missing: &str,
    ) -> Result<(), Diagnostic> {
        loop {
            self.cursor.skip_line_ends();
            if self.cursor.is_at_end() {
                return Err(Diagnostic::unterminated(missing, opener));
            }
            if self.cursor.check_any(terminators) {
                return Ok(());
            }
            self.parse_construct()?;
        }
    }
}
