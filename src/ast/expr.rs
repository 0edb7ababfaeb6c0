//! Expression nodes.
//!
//! An expression tree lives only for the statement being translated: the
//! parser builds it, renders it to Python, and drops it.
//!
//! # Composition
//!
//! The dialect has no operator precedence. Operators fold strictly left to
//! right, so `1 + 2 * 3` means `(1 + 2) * 3`. Rendering inserts exactly the
//! parentheses Python needs to evaluate the same tree; it never reorders.

use crate::semantic::DataType;

/// An expression with the position of its first token.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// The kind of expression.
    pub kind: ExprKind,
    pub line: usize,
    pub column: usize,
}

impl Expr {
    /// Creates a new expression with the given kind and position.
    pub fn new(kind: ExprKind, line: usize, column: usize) -> Self {
        Self { kind, line, column }
    }

    /// Creates a non-negative integer literal.
    pub fn integer(value: u64, line: usize, column: usize) -> Self {
        Expr::new(ExprKind::IntegerLiteral(value.to_string()), line, column)
    }

    /// Folds `right` onto `self` with `op`, keeping `self`'s position.
    pub fn binary(self, op: BinaryOp, right: Expr) -> Self {
        let (line, column) = (self.line, self.column);
        Expr::new(
            ExprKind::Binary {
                left: Box::new(self),
                op,
                right: Box::new(right),
            },
            line,
            column,
        )
    }

    /// Returns the type of a literal, looking through a leading negation.
    pub fn literal_type(&self) -> Option<DataType> {
        match &self.kind {
            ExprKind::IntegerLiteral(_) => Some(DataType::Integer),
            ExprKind::RealLiteral(_) => Some(DataType::Real),
            ExprKind::StringLiteral(_) => Some(DataType::Text),
            ExprKind::BooleanLiteral(_) => Some(DataType::Boolean),
            ExprKind::Unary {
                op: UnaryOp::Negate,
                operand,
            } => match operand.kind {
                ExprKind::IntegerLiteral(_) | ExprKind::RealLiteral(_) => operand.literal_type(),
                _ => None,
            },
            _ => None,
        }
    }

    /// True for an integer literal, optionally negated.
    pub fn is_integer_literal(&self) -> bool {
        match &self.kind {
            ExprKind::IntegerLiteral(_) => true,
            ExprKind::Unary {
                op: UnaryOp::Negate,
                operand,
            } => matches!(operand.kind, ExprKind::IntegerLiteral(_)),
            _ => false,
        }
    }

    /// Returns the value of a (possibly negated) integer literal.
    ///
    /// Literals that do not fit an `i64` have no value here; they still
    /// render as written.
    pub fn integer_value(&self) -> Option<i64> {
        match &self.kind {
            ExprKind::IntegerLiteral(digits) => digits.parse().ok(),
            ExprKind::Unary {
                op: UnaryOp::Negate,
                operand,
            } => match &operand.kind {
                ExprKind::IntegerLiteral(digits) => digits.parse::<i64>().ok()?.checked_neg(),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns true for a negative numeric literal or a negation.
    pub fn is_negative(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Unary {
                op: UnaryOp::Negate,
                ..
            }
        )
    }

    /// Renders the expression as Python source.
    pub fn to_python(&self) -> String {
        match &self.kind {
            ExprKind::IntegerLiteral(digits) => digits.clone(),
            ExprKind::RealLiteral(text) => text.clone(),
            ExprKind::StringLiteral(value) => python_string(value),
            ExprKind::BooleanLiteral(true) => "True".to_string(),
            ExprKind::BooleanLiteral(false) => "False".to_string(),
            ExprKind::Reference(path) => path.clone(),
            ExprKind::Grouped(inner) => format!("({})", inner.to_python()),
            ExprKind::Unary { op, operand } => {
                let inner = operand.operand_text(operand.precedence() < op.precedence());
                match op {
                    UnaryOp::Negate => format!("-{}", inner),
                    UnaryOp::Not => format!("not {}", inner),
                }
            }
            ExprKind::Binary { left, op, right } => {
                let shape = op.shape();
                let prec = shape.precedence();
                let (left_parens, right_parens) = match op {
                    BinaryOp::Power => (left.precedence() <= prec, right.precedence() < prec),
                    _ if op.is_comparison() => {
                        (left.precedence() <= prec, right.precedence() <= prec)
                    }
                    _ => (left.precedence() < prec, right.precedence() <= prec),
                };
                let text = format!(
                    "{} {} {}",
                    left.operand_text(left_parens),
                    shape.as_python(),
                    right.operand_text(right_parens)
                );
                if op.is_negated() {
                    format!("not ({})", text)
                } else {
                    text
                }
            }
        }
    }

    fn operand_text(&self, parens: bool) -> String {
        if parens {
            format!("({})", self.to_python())
        } else {
            self.to_python()
        }
    }

    /// Python binding strength of the rendered expression.
    fn precedence(&self) -> u8 {
        match &self.kind {
            ExprKind::Binary { op, .. } if op.is_negated() => UnaryOp::Not.precedence(),
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Unary { op, .. } => op.precedence(),
            _ => ATOM,
        }
    }
}

const ATOM: u8 = 13;

/// The different kinds of expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal digits without leading zeros: `42`
    IntegerLiteral(String),

    /// Real literal, kept as written: `3.14`
    RealLiteral(String),

    /// String or char literal, quotes removed: `"Hello"`, `'c'`
    StringLiteral(String),

    /// `TRUE` / `FALSE`
    BooleanLiteral(bool),

    /// Already-rendered access: `x`, `p.name`, `arr[i - 1]`, `len(s)`
    Reference(String),

    /// Binary operation folded left to right.
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// Unary operation: `-x`, `NOT flag`
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// Parenthesized expression, kept as written.
    Grouped(Box<Expr>),
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `^`, `**`
    Power,
    Multiply,
    Divide,
    /// `DIV`
    FloorDivide,
    /// `MOD`, `%`
    Modulo,
    /// `+`, and `&` string concatenation
    Add,
    Subtract,
    ShiftLeft,
    ShiftRight,
    BitOr,
    /// `=`, `==`
    Equal,
    /// `<>`, `!=`
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    And,
    Or,
    /// `NOT AND`
    Nand,
    /// `NOT OR`
    Nor,
}

impl BinaryOp {
    /// Python binding strength (higher binds tighter).
    pub fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Nand | BinaryOp::Nor => self.shape().precedence(),
            BinaryOp::Equal
            | BinaryOp::NotEqual
            | BinaryOp::LessThan
            | BinaryOp::LessEqual
            | BinaryOp::GreaterThan
            | BinaryOp::GreaterEqual => 4,
            BinaryOp::BitOr => 5,
            BinaryOp::ShiftLeft | BinaryOp::ShiftRight => 8,
            BinaryOp::Add | BinaryOp::Subtract => 9,
            BinaryOp::Multiply | BinaryOp::Divide | BinaryOp::FloorDivide | BinaryOp::Modulo => 10,
            BinaryOp::Power => 12,
        }
    }

    /// Comparisons chain in Python, so they are parenthesized on both sides.
    pub fn is_comparison(&self) -> bool {
        self.precedence() == 4
    }

    /// True for `NOT AND` / `NOT OR`, rendered as `not (l and r)`.
    pub fn is_negated(&self) -> bool {
        matches!(self, BinaryOp::Nand | BinaryOp::Nor)
    }

    /// The operator actually written between the operands.
    fn shape(&self) -> BinaryOp {
        match self {
            BinaryOp::Nand => BinaryOp::And,
            BinaryOp::Nor => BinaryOp::Or,
            other => *other,
        }
    }

    /// Python spelling of the operator.
    pub fn as_python(&self) -> &'static str {
        match self {
            BinaryOp::Power => "**",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::FloorDivide => "//",
            BinaryOp::Modulo => "%",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::BitOr => "|",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And | BinaryOp::Nand => "and",
            BinaryOp::Or | BinaryOp::Nor => "or",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-` - Numeric negation
    Negate,
    /// `NOT` - Logical negation
    Not,
}

impl UnaryOp {
    pub fn precedence(&self) -> u8 {
        match self {
            UnaryOp::Not => 3,
            UnaryOp::Negate => 11,
        }
    }
}

/// Renders `value` as a double-quoted Python string literal.
///
/// Pseudocode strings have no escape sequences, so backslashes and quotes
/// are escaped for Python.
pub fn python_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(value: u64) -> Expr {
        Expr::integer(value, 1, 1)
    }

    fn name(text: &str) -> Expr {
        Expr::new(ExprKind::Reference(text.to_string()), 1, 1)
    }

    fn negate(expr: Expr) -> Expr {
        Expr::new(
            ExprKind::Unary {
                op: UnaryOp::Negate,
                operand: Box::new(expr),
            },
            1,
            1,
        )
    }

    #[test]
    fn test_left_fold_keeps_order() {
        // 1 + 2 * 3 folds as (1 + 2) * 3
        let expr = int(1).binary(BinaryOp::Add, int(2)).binary(BinaryOp::Multiply, int(3));
        assert_eq!(expr.to_python(), "(1 + 2) * 3");
    }

    #[test]
    fn test_left_fold_without_needless_parens() {
        let expr = int(1).binary(BinaryOp::Add, int(2)).binary(BinaryOp::Subtract, int(3));
        assert_eq!(expr.to_python(), "1 + 2 - 3");

        let expr = int(2).binary(BinaryOp::Multiply, int(3)).binary(BinaryOp::Add, int(4));
        assert_eq!(expr.to_python(), "2 * 3 + 4");
    }

    #[test]
    fn test_comparisons_do_not_chain() {
        let expr = name("a")
            .binary(BinaryOp::LessThan, name("b"))
            .binary(BinaryOp::LessThan, name("c"));
        assert_eq!(expr.to_python(), "(a < b) < c");
    }

    #[test]
    fn test_power_is_parenthesized_on_left() {
        let expr = int(2).binary(BinaryOp::Power, int(3)).binary(BinaryOp::Power, int(2));
        assert_eq!(expr.to_python(), "(2 ** 3) ** 2");

        let expr = negate(int(2)).binary(BinaryOp::Power, int(2));
        assert_eq!(expr.to_python(), "(-2) ** 2");
    }

    #[test]
    fn test_negated_logic() {
        let expr = name("a").binary(BinaryOp::Nand, name("b"));
        assert_eq!(expr.to_python(), "not (a and b)");

        let expr = name("a")
            .binary(BinaryOp::Or, name("b"))
            .binary(BinaryOp::Nor, name("c"));
        assert_eq!(expr.to_python(), "not (a or b or c)");
    }

    #[test]
    fn test_not_of_binary() {
        let expr = Expr::new(
            ExprKind::Unary {
                op: UnaryOp::Not,
                operand: Box::new(name("a").binary(BinaryOp::Or, name("b"))),
            },
            1,
            1,
        );
        assert_eq!(expr.to_python(), "not (a or b)");
    }

    #[test]
    fn test_literal_types() {
        assert_eq!(int(1).literal_type(), Some(DataType::Integer));
        assert_eq!(negate(int(1)).literal_type(), Some(DataType::Integer));
        assert_eq!(negate(int(4)).integer_value(), Some(-4));
        assert_eq!(name("x").literal_type(), None);
        assert_eq!(negate(name("x")).literal_type(), None);
    }

    #[test]
    fn test_integer_beyond_i64() {
        let big = Expr::new(
            ExprKind::IntegerLiteral("99999999999999999999".to_string()),
            1,
            1,
        );
        assert_eq!(big.to_python(), "99999999999999999999");
        assert_eq!(big.literal_type(), Some(DataType::Integer));
        assert!(big.is_integer_literal());
        assert_eq!(big.integer_value(), None);
        assert!(!name("x").is_integer_literal());
    }

    #[test]
    fn test_python_string_escapes() {
        assert_eq!(python_string(r"C:\temp"), r#""C:\\temp""#);
        assert_eq!(python_string("say \"hi\""), r#""say \"hi\"""#);
    }
}
