//! DECLARE and TYPE parsing.
//!
//! ```text
//! DECLARE x : INTEGER                       x: int
//! DECLARE a : ARRAY[1:3] OF REAL            a: list = [float() for _ in range(3)]
//! DECLARE g : ARRAY[1:2,1:3] OF BOOLEAN     g: list = [[bool() for _ in range(3)] for _ in range(2)]
//!
//! TYPE Color = (RED, GREEN)                 class Color(Enum):
//!                                               RED = 0
//!                                               GREEN = 1
//!
//! TYPE Point                                @dataclass
//!     DECLARE x : INTEGER                   class Point:
//! ENDTYPE                                       x: int
//! ```
//!
//! Array rows are built by a comprehension, so no two rows share storage.

use log::warn;

use crate::codegen::Import;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::lexer::{Token, TokenClass, TokenKind};
use crate::semantic::{ARRAY_ELEMENT_TYPES, DataType, Dimension, Field, Symbol, TypeDef};

use super::Translator;
use super::expressions::unquote;

/// Python keywords, which cannot be used as names in the output.
const PYTHON_KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global", "if",
    "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return", "try",
    "while", "with", "yield",
];

/// A parsed `name : TYPE` pair.
#[derive(Debug)]
struct Declaration {
    name: Token,
    data_type: DataType,
    element_type: Option<DataType>,
    dimensions: Vec<Dimension>,
    /// Initial value for arrays.
    initializer: Option<String>,
}

impl Declaration {
    fn symbol(&self) -> Symbol {
        match &self.element_type {
            Some(element) => Symbol::array(
                self.name.text.clone(),
                element.clone(),
                self.dimensions.clone(),
            ),
            None => Symbol::variable(self.name.text.clone(), self.data_type.clone()),
        }
    }
}

impl Translator {
    // ==================== DECLARE Statement ====================

    /// Parses `DECLARE name : TYPE` and records the symbol.
    pub(super) fn parse_declare(&mut self) -> Result<(), Diagnostic> {
        self.cursor.advance(); // consume DECLARE
        let declaration = self.parse_declaration()?;
        self.check_new_name(&declaration.name)?;

        let line = match &declaration.initializer {
            Some(init) => format!(
                "{}: {} = {}",
                declaration.name.text,
                declaration.data_type.python_name(),
                init
            ),
            None => format!(
                "{}: {}",
                declaration.name.text,
                declaration.data_type.python_name()
            ),
        };
        self.emitter.emit(&line);

        self.declare_symbol(&declaration.name, declaration.symbol())?;
        self.finish_statement()
    }

    /// Parses `name : TYPE` with an optional array suffix.
    fn parse_declaration(&mut self) -> Result<Declaration, Diagnostic> {
        let name = self
            .cursor
            .expect(&TokenKind::Identifier, "a variable name")?
            .clone();
        validate_identifier(&name)?;
        self.cursor.expect(&TokenKind::Colon, "`:`")?;

        let type_token = self.cursor.advance().clone();
        match type_token.kind {
            TokenKind::Array => self.parse_array_type(name),
            TokenKind::Identifier => Ok(Declaration {
                name,
                data_type: self.resolve_type(&type_token),
                element_type: None,
                dimensions: Vec::new(),
                initializer: None,
            }),
            _ => Err(Diagnostic::unexpected("a data type", &type_token)),
        }
    }

    /// Converts a type name, preferring registered TYPE names.
    fn resolve_type(&self, token: &Token) -> DataType {
        if self.types.contains(&token.text) {
            return DataType::User(token.text.clone());
        }
        let data_type = DataType::from_pseudocode(&token.text);
        if data_type == DataType::Unknown {
            warn!(
                "{}:{} unknown data type `{}`, emitting {}",
                token.line,
                token.column,
                token.text,
                data_type.python_name()
            );
        }
        data_type
    }

    /// Parses the rest of an ARRAY type: nothing, or `[l:u(, l:u)] OF TYPE`.
    fn parse_array_type(&mut self, name: Token) -> Result<Declaration, Diagnostic> {
        if self.cursor.is_at_line_end() || self.cursor.is_at_end() {
            return Ok(Declaration {
                name,
                data_type: DataType::Array,
                element_type: None,
                dimensions: Vec::new(),
                initializer: Some("[]".to_string()),
            });
        }

        let open = self
            .cursor
            .expect(&TokenKind::LeftBracket, "`[` or end of line")?
            .clone();
        let mut dimensions = vec![self.parse_dimension()?];
        while self.cursor.match_token(&TokenKind::Comma) {
            if dimensions.len() == 2 {
                return Err(Diagnostic::syntax(
                    "arrays have at most two dimensions",
                    self.cursor.peek(),
                ));
            }
            dimensions.push(self.parse_dimension()?);
        }
        if self.cursor.is_at_end() {
            return Err(Diagnostic::unterminated("missing `]` for this `[`", &open));
        }
        self.cursor.expect(&TokenKind::RightBracket, "`]`")?;
        self.cursor.expect(&TokenKind::Of, "`OF`")?;

        let element = self.cursor.advance().clone();
        if element.kind != TokenKind::Identifier || !DataType::is_array_element(&element.text) {
            return Err(Diagnostic::syntax(
                format!(
                    "invalid data type {} for array elements, expected one of {}",
                    element.describe(),
                    ARRAY_ELEMENT_TYPES.join(", ")
                ),
                &element,
            ));
        }
        let element_type = DataType::from_pseudocode(&element.text);
        let initializer = array_initializer(&element_type, &dimensions);

        Ok(Declaration {
            name,
            data_type: DataType::Array,
            element_type: Some(element_type),
            dimensions,
            initializer: Some(initializer),
        })
    }

    /// Parses `lower : upper`.
    fn parse_dimension(&mut self) -> Result<Dimension, Diagnostic> {
        let lower = self.parse_bound()?;
        self.cursor.expect(&TokenKind::Colon, "`:`")?;
        let upper_token = self.cursor.peek().clone();
        let upper = self.parse_bound()?;

        if upper < lower {
            return Err(Diagnostic::syntax(
                format!("upper bound {} is below lower bound {}", upper, lower),
                &upper_token,
            ));
        }
        if upper.checked_sub(lower).and_then(|d| d.checked_add(1)).is_none() {
            return Err(Diagnostic::syntax(
                format!("array dimension {}:{} is too large", lower, upper),
                &upper_token,
            ));
        }
        Ok(Dimension::new(lower, upper))
    }

    /// Parses an optionally signed integer bound.
    fn parse_bound(&mut self) -> Result<i64, Diagnostic> {
        let negative = self.cursor.match_token(&TokenKind::Minus);
        if !negative {
            self.cursor.match_token(&TokenKind::Plus);
        }

        let token = self
            .cursor
            .expect(&TokenKind::IntegerLiteral, "an integer bound")?
            .clone();
        let value = token.text.parse::<i64>().map_err(|_| {
            Diagnostic::syntax(format!("bound `{}` is out of range", token.text), &token)
        })?;
        Ok(if negative { -value } else { value })
    }

    // ==================== TYPE Statement ====================

    /// Parses a TYPE statement, enumerated if the name is followed by `=`.
    pub(super) fn parse_type(&mut self) -> Result<(), Diagnostic> {
        let type_token = self.cursor.advance().clone();
        let name = self
            .cursor
            .expect(&TokenKind::Identifier, "a type name")?
            .clone();
        self.check_new_name(&name)?;

        if self.cursor.match_token(&TokenKind::Equals) {
            self.parse_enumerated_type(&name)
        } else {
            self.finish_statement()?;
            self.parse_record_type(&type_token, &name)
        }
    }

    /// Parses `(m1, m2, ...)` after `TYPE Name =`.
    fn parse_enumerated_type(&mut self, name: &Token) -> Result<(), Diagnostic> {
        let open = self.cursor.expect(&TokenKind::LeftParen, "`(`")?.clone();

        let mut members: Vec<String> = Vec::new();
        loop {
            self.cursor.skip_line_ends();
            let token = self.cursor.peek().clone();
            let member = match token.kind {
                TokenKind::StringLiteral | TokenKind::CharLiteral => unquote(&token.text).to_string(),
                TokenKind::Eof => {
                    return Err(Diagnostic::unterminated("missing `)` for this `(`", &open));
                }
                _ if matches!(
                    token.kind.class(),
                    TokenClass::Identifier | TokenClass::Keyword | TokenClass::Boolean
                ) =>
                {
                    token.text.clone()
                }
                _ => return Err(Diagnostic::unexpected("a member name", &token)),
            };
            self.cursor.advance();

            if !is_valid_identifier(&member) {
                return Err(Diagnostic::syntax(
                    format!("`{}` is not a valid member name", member),
                    &token,
                ));
            }
            if members.contains(&member) {
                return Err(Diagnostic::at(
                    DiagnosticKind::Redeclaration,
                    format!("member `{}` is already declared", member),
                    &token,
                ));
            }
            members.push(member);

            self.cursor.skip_line_ends();
            if self.cursor.match_token(&TokenKind::Comma) {
                continue;
            }
            if self.cursor.match_token(&TokenKind::RightParen) {
                break;
            }
            if self.cursor.is_at_end() {
                return Err(Diagnostic::unterminated("missing `)` for this `(`", &open));
            }
            return Err(Diagnostic::unexpected("`,` or `)`", self.cursor.peek()));
        }

        self.emitter.require(Import::Enum);
        self.emitter.emit(&format!("class {}(Enum):", name.text));
        let entry = self.emitter.indent();
        self.emitter.indent_in();
        for (ordinal, member) in members.iter().enumerate() {
            self.emitter.emit(&format!("{} = {}", member, ordinal));
        }
        self.leave_block(entry)?;

        if !self.types.register(name.text.clone(), TypeDef::Enumerated { members }) {
            return Err(Diagnostic::redeclared(name));
        }
        self.finish_statement()
    }

    /// Parses DECLARE lines up to ENDTYPE as the fields of a record.
    fn parse_record_type(&mut self, type_token: &Token, name: &Token) -> Result<(), Diagnostic> {
        self.emitter.require(Import::Dataclass);
        self.emitter.emit("@dataclass");
        self.emitter.emit(&format!("class {}:", name.text));
        let entry = self.emitter.indent();
        self.emitter.indent_in();

        let mut fields: Vec<Field> = Vec::new();
        loop {
            self.cursor.skip_line_ends();
            if self.cursor.is_at_end() {
                return Err(Diagnostic::unterminated("missing ENDTYPE for this TYPE", type_token));
            }
            if self.cursor.match_token(&TokenKind::EndType) {
                break;
            }
            if !self.cursor.match_token(&TokenKind::Declare) {
                return Err(Diagnostic::unexpected("DECLARE or ENDTYPE", self.cursor.peek()));
            }

            let declaration = self.parse_declaration()?;
            if fields.iter().any(|f| f.name == declaration.name.text) {
                return Err(Diagnostic::redeclared(&declaration.name));
            }

            let line = match &declaration.initializer {
                Some(init) => {
                    self.emitter.require(Import::DataclassField);
                    let factory = if declaration.dimensions.is_empty() {
                        "list".to_string()
                    } else {
                        format!("lambda: {}", init)
                    };
                    format!(
                        "{}: {} = field(default_factory={})",
                        declaration.name.text,
                        declaration.data_type.python_name(),
                        factory
                    )
                }
                None => format!(
                    "{}: {}",
                    declaration.name.text,
                    declaration.data_type.python_name()
                ),
            };
            self.emitter.emit(&line);

            fields.push(Field {
                name: declaration.name.text,
                data_type: declaration.data_type,
            });
            self.finish_statement()?;
        }

        if fields.is_empty() {
            self.emitter.emit("pass");
        }
        self.leave_block(entry)?;

        if !self.types.register(name.text.clone(), TypeDef::Record { fields }) {
            return Err(Diagnostic::redeclared(name));
        }
        self.finish_statement()
    }
}

/// Builds `[t() for _ in range(n)]`, nesting one comprehension per dimension.
fn array_initializer(element: &DataType, dimensions: &[Dimension]) -> String {
    let mut init = format!("{}()", element.python_name());
    for dim in dimensions.iter().rev() {
        init = format!("[{} for _ in range({})]", init, dim.len());
    }
    init
}

/// Returns true if `name` can be used as a Python name.
fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
        && !PYTHON_KEYWORDS.contains(&name)
}

/// Rejects names that would not be valid Python names.
pub(super) fn validate_identifier(token: &Token) -> Result<(), Diagnostic> {
    if is_valid_identifier(&token.text) {
        Ok(())
    } else {
        Err(Diagnostic::syntax(
            format!("`{}` is a reserved word in Python", token.text),
            token,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::parser::{Options, Translator};
    use crate::translate;

    #[test]
    fn test_scalar_declarations() {
        let output = translate(
            "DECLARE a : INTEGER\nDECLARE b : REAL\nDECLARE c : BOOLEAN\nDECLARE d : STRING\nDECLARE e : CHAR\nDECLARE f : OBJECT",
        )
        .unwrap();
        assert_eq!(
            output,
            "a: int\nb: float\nc: bool\nd: str\ne: str\nf: object\n"
        );
    }

    #[test]
    fn test_unknown_type_passes_through() {
        let output = translate("DECLARE d : DATE").unwrap();
        assert_eq!(output, "d: UnknownType\n");
    }

    #[test]
    fn test_declared_type_is_recorded() {
        let tokens = lex("DECLARE arr : ARRAY[1:5] OF INTEGER\nDECLARE r : REAL").unwrap();
        let mut translator = Translator::new(tokens, &Options::default());
        translator.step().unwrap();

        let symbol = translator.symbols().lookup("arr").unwrap();
        assert!(symbol.is_array());
        assert_eq!(symbol.element_type, Some(DataType::Integer));
        assert_eq!(symbol.dimensions, vec![Dimension::new(1, 5)]);
        assert!(translator.symbols().lookup("r").is_none());

        translator.step().unwrap();
        assert_eq!(
            translator.symbols().lookup("r").unwrap().data_type,
            DataType::Real
        );
    }

    #[test]
    fn test_one_dimensional_array() {
        let output = translate("DECLARE arr : ARRAY[1:5] OF INTEGER").unwrap();
        assert_eq!(output, "arr: list = [int() for _ in range(5)]\n");
    }

    #[test]
    fn test_two_dimensional_array() {
        let output = translate("DECLARE grid : ARRAY[1:2,1:3] OF INTEGER").unwrap();
        assert_eq!(
            output,
            "grid: list = [[int() for _ in range(3)] for _ in range(2)]\n"
        );
    }

    #[test]
    fn test_signed_bounds() {
        let output = translate("DECLARE t : ARRAY[-2:+2] OF REAL").unwrap();
        assert_eq!(output, "t: list = [float() for _ in range(5)]\n");
    }

    #[test]
    fn test_bare_array() {
        let output = translate("DECLARE items : ARRAY\nitems.append(1)").unwrap();
        assert_eq!(output, "items: list = []\nitems.append(1)\n");
    }

    #[test]
    fn test_invalid_array_element_type() {
        let err = translate("DECLARE a : ARRAY[1:3] OF OBJECT").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert!(err.message.starts_with("invalid data type `OBJECT`"));
        assert_eq!((err.line, err.column), (1, 27));
    }

    #[test]
    fn test_inverted_bounds() {
        let err = translate("DECLARE a : ARRAY[5:1] OF INTEGER").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!(err.message, "upper bound 1 is below lower bound 5");
    }

    #[test]
    fn test_dimension_length_overflow() {
        let err = translate(
            "DECLARE a : ARRAY[-9223372036854775807:9223372036854775807] OF INTEGER",
        )
        .unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!((err.line, err.column), (1, 40));
        assert_eq!(
            err.message,
            "array dimension -9223372036854775807:9223372036854775807 is too large"
        );
    }

    #[test]
    fn test_widest_dimension_indexes_without_overflow() {
        let output = translate(
            "DECLARE a : ARRAY[0:9223372036854775806] OF INTEGER\na[9223372036854775806] <- 1",
        )
        .unwrap();
        assert!(output.ends_with("a[9223372036854775806] = 1\n"));
    }

    #[test]
    fn test_too_many_dimensions() {
        let err = translate("DECLARE a : ARRAY[1:2,1:2,1:2] OF INTEGER").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
    }

    #[test]
    fn test_missing_separator() {
        let err = translate("DECLARE a INTEGER").unwrap_err();
        assert_eq!(err.message, "expected `:`, found `INTEGER`");
    }

    #[test]
    fn test_redeclaration() {
        let err = translate("DECLARE x : INTEGER\nDECLARE x : REAL").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Redeclaration);
        assert_eq!((err.line, err.column), (2, 9));
    }

    #[test]
    fn test_python_keyword_name() {
        let err = translate("DECLARE class : INTEGER").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!(err.message, "`class` is a reserved word in Python");
    }

    #[test]
    fn test_enumerated_type() {
        let tokens = lex("TYPE Color = (RED, GREEN, BLUE)").unwrap();
        let mut translator = Translator::new(tokens, &Options::default());
        translator.step().unwrap();
        assert_eq!(translator.types().ordinal("Color", "RED"), Some(0));
        assert_eq!(translator.types().ordinal("Color", "GREEN"), Some(1));
        assert_eq!(translator.types().ordinal("Color", "BLUE"), Some(2));

        let output = translator.translate().unwrap();
        assert_eq!(
            output,
            "from enum import Enum\n\nclass Color(Enum):\n    RED = 0\n    GREEN = 1\n    BLUE = 2\n"
        );
    }

    #[test]
    fn test_enum_import_appears_once() {
        let output = translate("TYPE Color = (RED, GREEN)\nTYPE Size = (\"SMALL\", \"LARGE\")").unwrap();
        assert_eq!(output.matches("from enum import Enum").count(), 1);
        assert!(output.ends_with("class Size(Enum):\n    SMALL = 0\n    LARGE = 1\n"));
    }

    #[test]
    fn test_enum_member_errors() {
        let err = translate("TYPE Color = (RED, RED)").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Redeclaration);

        let err = translate("TYPE Color = (\"light blue\")").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);

        let err = translate("TYPE Color = ()").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);

        let err = translate("TYPE Color = (RED, GREEN").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UnterminatedConstruct);
        assert_eq!((err.line, err.column), (1, 14));
    }

    #[test]
    fn test_enum_member_access() {
        let output =
            translate("TYPE Color = (RED, GREEN)\nDECLARE c : Color\nc <- Color.GREEN").unwrap();
        assert!(output.ends_with("c: Color\nc = Color.GREEN\n"));
    }

    #[test]
    fn test_record_type() {
        let output = translate(
            "TYPE Student\n    DECLARE name : STRING\n    DECLARE marks : ARRAY[1:3] OF INTEGER\n    DECLARE tags : ARRAY\nENDTYPE",
        )
        .unwrap();
        assert_eq!(
            output,
            "from dataclasses import dataclass\nfrom dataclasses import field\n\n@dataclass\nclass Student:\n    name: str\n    marks: list = field(default_factory=lambda: [int() for _ in range(3)])\n    tags: list = field(default_factory=list)\n"
        );
    }

    #[test]
    fn test_empty_record() {
        let output = translate("TYPE Empty\nENDTYPE").unwrap();
        assert_eq!(
            output,
            "from dataclasses import dataclass\n\n@dataclass\nclass Empty:\n    pass\n"
        );
    }

    #[test]
    fn test_record_errors() {
        let err = translate("TYPE Point\nDECLARE x : INTEGER\n").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::UnterminatedConstruct);
        assert_eq!((err.line, err.column), (1, 1));

        let err = translate("TYPE Point\nPRINT 1\nENDTYPE").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Syntax);
        assert_eq!(err.message, "expected DECLARE or ENDTYPE, found `PRINT`");

        let err = translate("TYPE Point\nDECLARE x : INTEGER\nDECLARE x : REAL\nENDTYPE").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Redeclaration);
    }

    #[test]
    fn test_type_name_clash() {
        let err = translate("TYPE Point\nENDTYPE\nDECLARE Point : INTEGER").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Redeclaration);

        let err = translate("DECLARE Point : INTEGER\nTYPE Point = (A)").unwrap_err();
        assert_eq!(err.kind, DiagnosticKind::Redeclaration);
    }

    #[test]
    fn test_record_as_declared_type() {
        let output = translate("TYPE Point\nDECLARE x : INTEGER\nENDTYPE\nDECLARE p : Point").unwrap();
        assert!(output.ends_with("p: Point\n"));
    }

    #[test]
    fn test_identifier_validation() {
        assert!(is_valid_identifier("RED"));
        assert!(is_valid_identifier("_x1"));
        assert!(!is_valid_identifier("1x"));
        assert!(!is_valid_identifier("a b"));
        assert!(!is_valid_identifier("lambda"));
        assert!(!is_valid_identifier(""));
    }
}
