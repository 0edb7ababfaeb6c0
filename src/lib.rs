//! # Lumin
//!
//! A translator from a structured teaching pseudocode to Python.
//!
//! ## Architecture
//!
//! Translation is a single pass:
//!
//! ```text
//! Source → Lexer → tokens → Translator (parse + check + emit) → Python
//! ```
//!
//! - [`lexer`] - Tokenizes source code with line/column positions
//! - [`parser`] - The [`Translator`](parser::Translator): recursive descent
//!   that emits Python as it goes
//! - [`ast`] - Expression trees for assigned values
//! - [`semantic`] - Symbol table, TYPE registry and the type conversion table
//! - [`codegen`] - Indented output lines and pending imports
//! - [`error`] - The [`Diagnostic`](error::Diagnostic) returned on failure
//!
//! ## Example
//!
//! ```
//! let source = r#"
//! DECLARE scores : ARRAY[1:3] OF INTEGER
//! scores[1] <- 10
//! IF scores[1] > 5 THEN
//!     PRINT "high"
//! ENDIF
//! "#;
//!
//! let python = lumin::translate(source).unwrap();
//! assert_eq!(
//!     python,
//!     "scores: list = [int() for _ in range(3)]\n\
//!      scores[0] = 10\n\
//!      if scores[0] > 5:\n    print(\"high\")\n"
//! );
//! ```

pub mod ast;
pub mod codegen;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantic;

use log::debug;

use error::Diagnostic;
use parser::{Options, Translator};

/// Translates pseudocode source to Python with default [`Options`].
pub fn translate(source: &str) -> Result<String, Diagnostic> {
    translate_with(source, &Options::default())
}

/// Translates pseudocode source to Python.
///
/// Returns the complete output, or the first diagnostic. No partial output
/// is produced on failure.
pub fn translate_with(source: &str, options: &Options) -> Result<String, Diagnostic> {
    let tokens = lexer::lex(source)?;
    debug!("lexed {} tokens", tokens.len());
    Translator::new(tokens, options).translate()
}

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::ast::{BinaryOp, Expr, ExprKind, UnaryOp};
    pub use crate::codegen::{Emitter, Import};
    pub use crate::error::{Diagnostic, DiagnosticKind};
    pub use crate::lexer::{Lexer, Token, TokenKind};
    pub use crate::parser::{Options, Translator};
    pub use crate::semantic::{DataType, Symbol, SymbolTable, TypeRegistry};
    pub use crate::{translate, translate_with};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticKind;

    #[test]
    fn test_full_program() {
        let source = r#"// grades
TYPE Grade = (PASS_MARK, MERIT, DISTINCTION)
TYPE Student
    DECLARE name : STRING
    DECLARE scores : ARRAY[1:3] OF INTEGER
ENDTYPE

DECLARE s : Student
DECLARE marks : ARRAY[1:3] OF INTEGER
DECLARE total : INTEGER
DECLARE i : INTEGER
CONSTANT LIMIT = 3

s.name <- "Ada"
total <- 0
FOR i <- 1 TO LIMIT
    total <- total + marks[i]
NEXT i
IF total > 200 THEN
    PRINT("Distinction", Grade.DISTINCTION)
ELSE IF total > 150 THEN
    PRINT "Merit"
ELSE
    PRINT "Pass"
ENDIF
"#;
        let expected = "\
from dataclasses import dataclass
from dataclasses import field
from enum import Enum

class Grade(Enum):
    PASS_MARK = 0
    MERIT = 1
    DISTINCTION = 2
@dataclass
class Student:
    name: str
    scores: list = field(default_factory=lambda: [int() for _ in range(3)])
s: Student
marks: list = [int() for _ in range(3)]
total: int
i: int
LIMIT = 3
s.name = \"Ada\"
total = 0
for i in range(1, LIMIT + 1):
    total = total + marks[i - 1]
if total > 200:
    print(\"Distinction\", Grade.DISTINCTION)
elif total > 150:
    print(\"Merit\")
else:
    print(\"Pass\")
";
        assert_eq!(translate(source).unwrap(), expected);
    }

    #[test]
    fn test_lexer_errors_are_diagnostics() {
        let err = translate("DECLARE x : INTEGER\nx <- 1 $").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!((err.line, err.column), (2, 8));
    }

    #[test]
    fn test_diagnostic_display() {
        let err = translate("y <- 1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "undefined name at line 1, column 1: `y` is not declared"
        );
    }

    #[test]
    fn test_translate_with_options() {
        let options = Options { indent_width: 1 };
        let output = translate_with("DECLARE a : BOOLEAN\nWHILE a\nENDWHILE", &options).unwrap();
        assert_eq!(output, "a: bool\nwhile a:\n pass\n");
    }
}
