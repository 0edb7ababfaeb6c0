//! Inline semantic state for a translation run.
//!
//! There is no separate checking pass. The parser consults and updates these
//! tables while it emits code, so semantic checks happen at the point where
//! the offending token is read:
//!
//! - **Declarations**: DECLARE records a [`Symbol`] before the next statement
//!   is parsed; a second declaration of the same name is rejected.
//! - **Resolution**: every referenced name must be a declared symbol or a
//!   registered TYPE.
//! - **Literal checks**: a literal assigned to a primitive-typed name must
//!   match its declared type.

pub mod symbols;
pub mod types;

pub use symbols::{Dimension, Field, Symbol, SymbolTable, TypeDef, TypeRegistry};
pub use types::{ARRAY_ELEMENT_TYPES, DataType};
