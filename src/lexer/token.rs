//! Token definitions for the pseudocode lexer.
//!
//! This module defines every token the dialect recognizes:
//! - Boolean literals and logical operators (TRUE, AND, NOT, ...)
//! - Keywords (IF, DECLARE, TYPE, ...)
//! - Identifiers and attribute segments (`.field`)
//! - Literals (strings, chars, reals, integers)
//! - Operators and delimiters
//!
//! ## Rule order
//!
//! The dialect is defined by an ordered list of lexical rules where the first
//! rule that matches at a position wins, and each rule matches as much as it
//! can. The order is:
//!
//! 1. booleans and logical operators
//! 2. keywords
//! 3. identifiers, then attribute segments
//! 4. char and string literals
//! 5. real literals, then integer literals
//! 6. multi-character operators, then single-character operators
//! 7. delimiters
//!
//! `logos` compiles these into one DFA that prefers the longest match and
//! breaks ties by priority. Literal tokens outrank regexes, so keywords win
//! over identifiers of the same length, while a longer identifier such as
//! `IFFY` still wins over the keyword prefix `IF` (the whole-word rule).
//! Multi-character operators and `.name` attribute segments win over their
//! single-character prefixes for the same reason. Do not lower the explicit
//! priorities below: they keep the regex rules in the order above.
//!
//! `NOT OR` and `NOT AND` are not single tokens. The parser fuses a `NOT`
//! directly followed by `OR`/`AND` into the negated operator, so `NOT ORDERED`
//! stays `NOT` + identifier.
//!
//! Keywords are case-sensitive. Lower-case `print` is an identifier.

use logos::Logos;
use std::fmt;

/// A token with its location in the source code.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Byte offsets of the token in the source
    pub span: std::ops::Range<usize>,
    /// The original text of the token
    pub text: String,
    /// 1-based line
    pub line: usize,
    /// 1-based column, counted in characters
    pub column: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(
        kind: TokenKind,
        span: std::ops::Range<usize>,
        text: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            kind,
            span,
            text: text.into(),
            line,
            column,
        }
    }

    /// Create the end-of-input sentinel at the given byte offset.
    pub fn eof(offset: usize, line: usize, column: usize) -> Self {
        Self::new(TokenKind::Eof, offset..offset, "", line, column)
    }

    /// Human readable description used in diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            TokenKind::Newline => "end of line".to_string(),
            _ => format!("`{}`", self.text),
        }
    }
}

/// Coarse classification of a [`TokenKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    Keyword,
    Boolean,
    Identifier,
    Attribute,
    Text,
    Number,
    Operator,
    Delimiter,
    Newline,
    Eof,
}

/// All token types of the pseudocode dialect.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"([ \t\r\f]+|//[^\n]*)")] // horizontal whitespace and `//` comments
pub enum TokenKind {
    // ==================== Booleans and Logical Operators ====================

    /// TRUE literal
    #[token("TRUE")]
    True,

    /// FALSE literal
    #[token("FALSE")]
    False,

    #[token("OR")]
    Or,

    #[token("AND")]
    And,

    /// Logical not; also the first half of `NOT OR` / `NOT AND`
    #[token("NOT")]
    Not,

    // ==================== Keywords ====================

    #[token("INPUT")]
    Input,

    #[token("OUTPUT")]
    Output,

    #[token("PRINT")]
    Print,

    #[token("IF")]
    If,

    #[token("THEN")]
    Then,

    #[token("ELSE")]
    Else,

    #[token("ELSEIF")]
    ElseIf,

    #[token("ENDIF")]
    EndIf,

    #[token("WHILE")]
    While,

    #[token("ENDWHILE")]
    EndWhile,

    #[token("FOR")]
    For,

    #[token("TO")]
    To,

    #[token("STEP")]
    Step,

    #[token("NEXT")]
    Next,

    /// FUNCTION is reserved; function definitions are not translated.
    #[token("FUNCTION")]
    Function,

    #[token("ENDFUNCTION")]
    EndFunction,

    #[token("RETURN")]
    Return,

    #[token("CALL")]
    Call,

    #[token("DECLARE")]
    Declare,

    #[token("CONSTANT")]
    Constant,

    #[token("LET")]
    Let,

    #[token("DO")]
    Do,

    #[token("REPEAT")]
    Repeat,

    #[token("UNTIL")]
    Until,

    #[token("CASE")]
    Case,

    #[token("ENDCASE")]
    EndCase,

    #[token("SWITCH")]
    Switch,

    #[token("ENDSWITCH")]
    EndSwitch,

    #[token("TYPE")]
    Type,

    #[token("ENDTYPE")]
    EndType,

    #[token("ARRAY")]
    Array,

    #[token("OF")]
    Of,

    #[token("DELETE")]
    Delete,

    #[token("MOD")]
    Mod,

    #[token("DIV")]
    Div,

    // ==================== Identifiers ====================

    /// Variable, type, or function name
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", priority = 3)]
    Identifier,

    /// Attribute segment including its leading dot, e.g. `.name`
    #[regex(r"\.[A-Za-z_][A-Za-z0-9_]*", priority = 3)]
    Attribute,

    // ==================== Literals ====================

    /// Single character in single quotes
    #[regex(r"'[^'\n]'")]
    CharLiteral,

    /// Everything between double quotes
    #[regex(r#""[^"\n]*""#)]
    StringLiteral,

    #[regex(r"[0-9]+\.[0-9]+", priority = 3)]
    RealLiteral,

    #[regex(r"[0-9]+", priority = 2)]
    IntegerLiteral,

    // ==================== Operators ====================

    /// <- assignment
    #[token("<-")]
    LeftArrow,

    /// ← assignment (typeset form)
    #[token("←")]
    UnicodeArrow,

    #[token("->")]
    RightArrow,

    #[token("==")]
    EqualEqual,

    #[token("!=")]
    BangEqual,

    /// <> not equals
    #[token("<>")]
    NotEquals,

    #[token("<=")]
    LessEquals,

    #[token(">=")]
    GreaterEquals,

    #[token("<<")]
    ShiftLeft,

    #[token(">>")]
    ShiftRight,

    #[token("**")]
    StarStar,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("^")]
    Caret,

    /// = equality, or assignment at statement level
    #[token("=")]
    Equals,

    #[token("<")]
    LessThan,

    #[token(">")]
    GreaterThan,

    #[token("%")]
    Percent,

    /// & string concatenation
    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,

    #[token("~")]
    Tilde,

    // ==================== Delimiters ====================

    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token("[")]
    LeftBracket,

    #[token("]")]
    RightBracket,

    #[token("{")]
    LeftBrace,

    #[token("}")]
    RightBrace,

    #[token(",")]
    Comma,

    /// ; alternate statement terminator
    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(".")]
    Dot,

    // ==================== Special Tokens ====================

    /// Newline - ends statements
    #[token("\n")]
    Newline,

    /// End-of-input sentinel, appended by the lexer driver.
    Eof,
}

impl TokenKind {
    /// Returns the coarse class of this token kind.
    pub fn class(&self) -> TokenClass {
        use TokenKind::*;
        match self {
            True | False => TokenClass::Boolean,
            Or | And | Not | Mod | Div => TokenClass::Operator,
            Input | Output | Print | If | Then | Else | ElseIf | EndIf | While | EndWhile | For
            | To | Step | Next | Function | EndFunction | Return | Call | Declare | Constant
            | Let | Do | Repeat | Until | Case | EndCase | Switch | EndSwitch | Type | EndType
            | Array | Of | Delete => TokenClass::Keyword,
            Identifier => TokenClass::Identifier,
            Attribute => TokenClass::Attribute,
            CharLiteral | StringLiteral => TokenClass::Text,
            RealLiteral | IntegerLiteral => TokenClass::Number,
            LeftArrow | UnicodeArrow | RightArrow | EqualEqual | BangEqual | NotEquals
            | LessEquals | GreaterEquals | ShiftLeft | ShiftRight | StarStar | Plus | Minus
            | Star | Slash | Caret | Equals | LessThan | GreaterThan | Percent | Ampersand
            | Pipe | Tilde => TokenClass::Operator,
            LeftParen | RightParen | LeftBracket | RightBracket | LeftBrace | RightBrace
            | Comma | Semicolon | Colon | Dot => TokenClass::Delimiter,
            Newline => TokenClass::Newline,
            Eof => TokenClass::Eof,
        }
    }

    /// True for the assignment operators `<-`, `←` and `=`.
    pub fn is_assignment(&self) -> bool {
        matches!(
            self,
            TokenKind::LeftArrow | TokenKind::UnicodeArrow | TokenKind::Equals
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::If => write!(f, "IF"),
            TokenKind::Else => write!(f, "ELSE"),
            TokenKind::EndIf => write!(f, "ENDIF"),
            TokenKind::EndType => write!(f, "ENDTYPE"),
            TokenKind::EndWhile => write!(f, "ENDWHILE"),
            TokenKind::Next => write!(f, "NEXT"),
            TokenKind::Until => write!(f, "UNTIL"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "{:?}", self),
        }
    }
}
