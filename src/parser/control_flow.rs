//! Control flow parsing: IF, WHILE, FOR and REPEAT blocks.
//!
//! Every block follows the same shape: emit a header line ending in `:` at
//! the current indent, route the body one level deeper, then restore the
//! indent recorded on entry before looking at the closing keyword.
//!
//! # IF chains
//!
//! ```text
//! IF a THEN          if a:
//!   ...                  ...
//! ELSE IF b THEN     elif b:
//!   ...                  ...
//! ELSE               else:
//!   ...                  ...
//! ENDIF
//! ```
//!
//! `ELSE IF` and `ELSEIF` both continue the chain as `elif`, so the whole
//! chain shares one `ENDIF` and no `else:` is nested.

use crate::ast::{BinaryOp, Expr};
use crate::error::Diagnostic;
use crate::lexer::{Token, TokenKind};

use super::Translator;

impl Translator {
    // ==================== IF Statement ====================

    /// Parses an IF chain up to its ENDIF.
    pub(super) fn parse_if(&mut self) -> Result<(), Diagnostic> {
        let if_token = self.cursor.advance().clone();
        let entry = self.emitter.indent();
        self.parse_condition_head(&if_token, "if")?;

        let mut seen_else = false;
        loop {
            self.parse_block(
                &if_token,
                &[TokenKind::Else, TokenKind::ElseIf, TokenKind::EndIf],
                "missing ENDIF for this IF",
            )?;

            let token = self.cursor.advance().clone();
            match token.kind {
                TokenKind::EndIf => break,
                TokenKind::Else | TokenKind::ElseIf if seen_else => {
                    return Err(Diagnostic::syntax(
                        format!("`{}` after the final ELSE of this IF", token.text),
                        &token,
                    ));
                }
                TokenKind::ElseIf => self.parse_condition_head(&token, "elif")?,
                _ => {
                    if self.cursor.check(&TokenKind::If) {
                        let head = self.cursor.advance().clone();
                        self.parse_condition_head(&head, "elif")?;
                    } else {
                        self.finish_statement()?;
                        self.emitter.emit("else:");
                        seen_else = true;
                    }
                }
            }
        }

        if self.emitter.indent() != entry {
            return Err(Diagnostic::internal(
                format!(
                    "IF ended at indent {} but started at {}",
                    self.emitter.indent(),
                    entry
                ),
                &if_token,
            ));
        }
        self.finish_statement()
    }

    /// Parses `<condition> [THEN]` after IF/ELSEIF and emits the header.
    ///
    /// THEN may also stand alone on the following line.
    fn parse_condition_head(&mut self, keyword: &Token, word: &str) -> Result<(), Diagnostic> {
        let condition = self.collect_condition(&[TokenKind::Then])?;
        if condition.is_empty() {
            return Err(Diagnostic::unexpected(
                &format!("a condition after {}", keyword.text),
                self.cursor.peek(),
            ));
        }

        if !self.cursor.match_token(&TokenKind::Then)
            && self.cursor.is_at_line_end()
            && self.cursor.peek_ahead(1).kind == TokenKind::Then
        {
            self.cursor.advance(); // line end
            self.cursor.advance(); // THEN
        }
        self.finish_statement()?;

        self.emitter.emit(&format!("{} {}:", word, condition));
        Ok(())
    }

    // ==================== WHILE Loop ====================

    /// Parses `WHILE cond [DO]` ... `ENDWHILE`.
    pub(super) fn parse_while(&mut self) -> Result<(), Diagnostic> {
        let while_token = self.cursor.advance().clone();
        let condition = self.collect_condition(&[TokenKind::Do])?;
        if condition.is_empty() {
            return Err(Diagnostic::unexpected("a condition after WHILE", self.cursor.peek()));
        }
        self.cursor.match_token(&TokenKind::Do);
        self.finish_statement()?;

        self.emitter.emit(&format!("while {}:", condition));
        self.parse_block(
            &while_token,
            &[TokenKind::EndWhile],
            "missing ENDWHILE for this WHILE",
        )?;
        self.cursor.advance(); // consume ENDWHILE
        self.finish_statement()
    }

    // ==================== FOR Loop ====================

    /// Parses `FOR i <- a TO b [STEP s]` ... `NEXT [i]`.
    ///
    /// The bounds are inclusive, so the stop value passed to `range` is
    /// `b + 1`, or `b - 1` when the step is written as a negative number.
    pub(super) fn parse_for(&mut self) -> Result<(), Diagnostic> {
        let for_token = self.cursor.advance().clone();
        let counter = self
            .cursor
            .expect(&TokenKind::Identifier, "a loop counter")?
            .clone();

        let Some(symbol) = self.symbols.lookup(&counter.text) else {
            return Err(Diagnostic::undefined(&counter));
        };
        if symbol.is_constant {
            return Err(Diagnostic::type_mismatch(
                format!("cannot assign to constant `{}`", counter.text),
                &counter,
            ));
        }

        if !self.cursor.peek().kind.is_assignment() {
            return Err(Diagnostic::unexpected("`<-`", self.cursor.peek()));
        }
        self.cursor.advance();

        let start = self.parse_expression()?;
        self.cursor.expect(&TokenKind::To, "`TO`")?;
        let end = self.parse_expression()?;
        let step = if self.cursor.match_token(&TokenKind::Step) {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.finish_statement()?;

        let descending = step.as_ref().is_some_and(Expr::is_negative);
        let stop = inclusive_stop(end, descending);
        let header = match step {
            Some(step) => format!(
                "for {} in range({}, {}, {}):",
                counter.text,
                start.to_python(),
                stop,
                step.to_python()
            ),
            None => format!(
                "for {} in range({}, {}):",
                counter.text,
                start.to_python(),
                stop
            ),
        };
        self.emitter.emit(&header);

        self.parse_block(&for_token, &[TokenKind::Next], "missing NEXT for this FOR")?;
        self.cursor.advance(); // consume NEXT

        if self.cursor.check(&TokenKind::Identifier) {
            let name = self.cursor.advance().clone();
            if name.text != counter.text {
                return Err(Diagnostic::syntax(
                    format!(
                        "NEXT `{}` does not match FOR `{}`",
                        name.text, counter.text
                    ),
                    &name,
                ));
            }
        }
        self.finish_statement()
    }

    // ==================== REPEAT Loop ====================

    /// Parses `REPEAT` ... `UNTIL cond` as a loop that tests at the bottom.
    pub(super) fn parse_repeat(&mut self) -> Result<(), Diagnostic> {
        let repeat_token = self.cursor.advance().clone();
        self.finish_statement()?;
        self.emitter.emit("while True:");

        let entry = self.emitter.indent();
        self.emitter.indent_in();
        self.parse_body(
            &repeat_token,
            &[TokenKind::Until],
            "missing UNTIL for this REPEAT",
        )?;
        self.cursor.advance(); // consume UNTIL

        let condition = self.collect_condition(&[])?;
        if condition.is_empty() {
            return Err(Diagnostic::unexpected("a condition after UNTIL", self.cursor.peek()));
        }
        self.emitter.emit(&format!("if {}:", condition));
        self.emitter.indent_in();
        self.emitter.emit("break");
        self.leave_block(entry + 1)?;
        self.leave_block(entry)?;

        self.finish_statement()
    }
}

/// Renders the exclusive `range` stop for an inclusive end value.
fn inclusive_stop(end: Expr, descending: bool) -> String {
    let delta: i64 = if descending { -1 } else { 1 };
    if let Some(value) = end.integer_value().and_then(|v| v.checked_add(delta)) {
        return value.to_string();
    }

    let (line, column) = (end.line, end.column);
    let op = if descending {
        BinaryOp::Subtract
    } else {
        BinaryOp::Add
    };
    end.binary(op, Expr::integer(1, line, column))
        .to_python()
}

#[cfg(test)]
mod tests {
    use crate::error::DiagnosticKind;
    use crate::translate;

    #[test]
    fn test_if_else_indentation() {
        let output = translate(
            r#"DECLARE x : INTEGER
IF x > 0 THEN
    PRINT "pos"
ELSE
    PRINT "other"
ENDIF
PRINT "done"
"#,
        )
        .unwrap();
        assert_eq!(
            output,
            "x: int\nif x > 0:\n    print(\"pos\")\nelse:\n    print(\"other\")\nprint(\"done\")\n"
        );
    }

    #[test]
    fn test_else_if_chain_is_flat() {
        let output = translate(
            r#"DECLARE x : INTEGER
IF x > 0 THEN
    PRINT "pos"
ELSE IF x < 0 THEN
    PRINT "neg"
ELSEIF x = 0
    PRINT "zero"
ELSE
    PRINT "nan"
ENDIF
"#,
        )
        .unwrap();
        assert_eq!(
            output,
            "x: int\nif x > 0:\n    print(\"pos\")\nelif x < 0:\n    print(\"neg\")\nelif x == 0:\n    print(\"zero\")\nelse:\n    print(\"nan\")\n"
        );
    }

    #[test]
    fn test_nested_if() {
        let output = translate(
            "DECLARE a : BOOLEAN\nDECLARE b : BOOLEAN\nIF a THEN\nIF b THEN\nPRINT 1\nENDIF\nPRINT 2\nENDIF\nPRINT 3",
        )
        .unwrap();
        assert_eq!(
            output,
            "a: bool\nb: bool\nif a:\n    if b:\n        print(1)\n    print(2)\nprint(3)\n"
        );
    }

    #[test]
    fn test_then_on_next_line() {
        let output = translate("DECLARE a : BOOLEAN\nIF a\nTHEN\nPRINT 1\nENDIF").unwrap();
        assert_eq!(output, "a: bool\nif a:\n    print(1)\n");
    }

    #[test]
    fn test_empty_body_gets_pass() {
        let output = translate("DECLARE a : BOOLEAN\nIF a THEN\nELSE\nENDIF").unwrap();
        assert_eq!(output, "a: bool\nif a:\n    pass\nelse:\n    pass\n");
    }

    #[test]
    fn test_condition_spelling() {
        let output = translate(
            "DECLARE a : INTEGER\nIF a <> 1 AND NOT (a = 2) OR TRUE THEN\nPRINT a\nENDIF",
        )
        .unwrap();
        assert_eq!(
            output,
            "a: int\nif a != 1 and not (a == 2) or True:\n    print(a)\n"
        );
    }

    #[test]
    fn test_not_condition() {
        let output = translate(
            "DECLARE ready : BOOLEAN\nIF NOT ready THEN\nPRINT 1\nENDIF\nWHILE NOT ready\nready <- TRUE\nENDWHILE",
        )
        .unwrap();
        assert_eq!(
            output,
            "ready: bool\nif not ready:\n    print(1)\nwhile not ready:\n    ready = True\n"
        );
    }

    #[test]
    fn test_missing_endif() {
        let err = translate("DECLARE a : BOOLEAN\n\n  IF a THEN\nPRINT 1\n").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UnterminatedConstruct);
        assert_eq!(err.message, "missing ENDIF for this IF");
        assert_eq!((err.line, err.column), (3, 3));
    }

    #[test]
    fn test_missing_condition() {
        let err = translate("IF THEN\nENDIF").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!(err.message, "expected a condition after IF, found `THEN`");
    }

    #[test]
    fn test_second_else_is_rejected() {
        let err =
            translate("DECLARE a : BOOLEAN\nIF a THEN\nELSE\nELSE\nENDIF").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_undeclared_name_in_condition() {
        let err = translate("IF ready THEN\nENDIF").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UndefinedName);
        assert_eq!((err.line, err.column), (1, 4));
    }

    #[test]
    fn test_while_loop() {
        let output = translate(
            "DECLARE n : INTEGER\nWHILE n < 10 DO\nn <- n + 1\nENDWHILE\nPRINT n",
        )
        .unwrap();
        assert_eq!(
            output,
            "n: int\nwhile n < 10:\n    n = n + 1\nprint(n)\n"
        );
    }

    #[test]
    fn test_missing_endwhile() {
        let err = translate("DECLARE n : INTEGER\nWHILE n < 10\n").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UnterminatedConstruct);
        assert_eq!((err.line, err.column), (2, 1));
    }

    #[test]
    fn test_for_loop() {
        let output = translate("DECLARE i : INTEGER\nFOR i <- 1 TO 10\nPRINT i\nNEXT i").unwrap();
        assert_eq!(output, "i: int\nfor i in range(1, 11):\n    print(i)\n");
    }

    #[test]
    fn test_for_loop_with_steps() {
        let output = translate(
            "DECLARE i : INTEGER\nDECLARE n : INTEGER\nFOR i <- 10 TO 1 STEP -1\nNEXT\nFOR i <- 0 TO n STEP 2\nNEXT",
        )
        .unwrap();
        assert_eq!(
            output,
            "i: int\nn: int\nfor i in range(10, 0, -1):\n    pass\nfor i in range(0, n + 1, 2):\n    pass\n"
        );
    }

    #[test]
    fn test_for_errors() {
        let err = translate("FOR i <- 1 TO 3\nNEXT").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UndefinedName);

        let err = translate("DECLARE i : INTEGER\nDECLARE j : INTEGER\nFOR i <- 1 TO 3\nNEXT j")
            .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!(err.message, "NEXT `j` does not match FOR `i`");
    }

    #[test]
    fn test_repeat_until() {
        let output = translate("DECLARE n : INTEGER\nREPEAT\nn <- n + 1\nUNTIL n >= 3").unwrap();
        assert_eq!(
            output,
            "n: int\nwhile True:\n    n = n + 1\n    if n >= 3:\n        break\n"
        );
    }
}
