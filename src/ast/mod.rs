//! Expression trees for assignment values and print arguments.
//!
//! The translator is single pass: statements are emitted as they are parsed
//! and no program tree is kept. Expressions are the exception. An assigned
//! value is folded into an [`Expr`] first, so that the literal type can be
//! checked against the target and the Python rendering can add the
//! parentheses the left-to-right fold needs.
//!
//! # Example
//!
//! ```
//! use lumin::ast::{BinaryOp, Expr, ExprKind};
//!
//! let one = Expr::integer(1, 1, 1);
//! let two = Expr::new(ExprKind::IntegerLiteral("2".to_string()), 1, 5);
//! let three = Expr::integer(3, 1, 9);
//!
//! let expr = one.binary(BinaryOp::Add, two).binary(BinaryOp::Multiply, three);
//! assert_eq!(expr.to_python(), "(1 + 2) * 3");
//! ```

mod expr;

pub use expr::*;
