//! Symbol table and type registry.
//!
//! Both live for exactly one translation run:
//!
//! - The [`SymbolTable`] maps declared names to their type and array shape.
//!   Entries are added by DECLARE and CONSTANT and removed only by DELETE.
//! - The [`TypeRegistry`] holds the names introduced by TYPE, with the
//!   ordered members of enumerated types or the ordered fields of records.
//!
//! Names are case-sensitive, matching the Python output.

use std::collections::HashMap;

use crate::semantic::types::DataType;

/// Inclusive bounds of one array dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimension {
    pub lower: i64,
    pub upper: i64,
}

impl Dimension {
    pub fn new(lower: i64, upper: i64) -> Self {
        Self { lower, upper }
    }

    /// Number of elements in this dimension.
    pub fn len(&self) -> u64 {
        self.upper.abs_diff(self.lower).saturating_add(1)
    }

    /// Distance of `index` from the lower bound.
    pub fn offset_of(&self, index: i64) -> u64 {
        index.abs_diff(self.lower)
    }

    /// Returns true if `index` lies within the bounds.
    pub fn contains(&self, index: i64) -> bool {
        (self.lower..=self.upper).contains(&index)
    }
}

/// A declared variable or constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    /// The symbol's name.
    pub name: String,
    /// The converted declared type.
    pub data_type: DataType,
    /// Element type, for arrays declared with bounds.
    pub element_type: Option<DataType>,
    /// Array bounds; empty for scalars.
    pub dimensions: Vec<Dimension>,
    /// Whether this symbol came from CONSTANT.
    pub is_constant: bool,
}

impl Symbol {
    /// Creates a scalar variable symbol.
    pub fn variable(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            element_type: None,
            dimensions: Vec::new(),
            is_constant: false,
        }
    }

    /// Creates an array symbol with bounds.
    pub fn array(name: impl Into<String>, element_type: DataType, dimensions: Vec<Dimension>) -> Self {
        Self {
            name: name.into(),
            data_type: DataType::Array,
            element_type: Some(element_type),
            dimensions,
            is_constant: false,
        }
    }

    /// Creates a constant symbol.
    pub fn constant(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            is_constant: true,
            ..Self::variable(name, data_type)
        }
    }

    /// Returns true if this symbol can be indexed.
    pub fn is_array(&self) -> bool {
        self.data_type == DataType::Array
    }
}

/// Run-scoped mapping from declared name to symbol.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a symbol.
    ///
    /// Returns the existing symbol if the name is already declared.
    pub fn declare(&mut self, symbol: Symbol) -> Result<(), &Symbol> {
        if self.symbols.contains_key(&symbol.name) {
            return Err(&self.symbols[&symbol.name]);
        }
        self.symbols.insert(symbol.name.clone(), symbol);
        Ok(())
    }

    /// Looks up a symbol by name.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Removes a symbol; the explicit deletion construct is the only caller.
    pub fn remove(&mut self, name: &str) -> Option<Symbol> {
        self.symbols.remove(name)
    }
}

/// A field of a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

/// A type introduced by a TYPE statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDef {
    /// Ordered constants; a member's ordinal is its position.
    Enumerated { members: Vec<String> },
    /// Ordered named fields.
    Record { fields: Vec<Field> },
}

/// Names introduced by TYPE.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDef>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type. Returns false if the name is taken.
    pub fn register(&mut self, name: impl Into<String>, def: TypeDef) -> bool {
        let name = name.into();
        if self.types.contains_key(&name) {
            return false;
        }
        self.types.insert(name, def);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Returns the ordinal of `member` in enumerated type `name`.
    pub fn ordinal(&self, name: &str, member: &str) -> Option<usize> {
        match self.types.get(name)? {
            TypeDef::Enumerated { members } => members.iter().position(|m| m == member),
            TypeDef::Record { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_and_lookup() {
        let mut table = SymbolTable::new();
        table.declare(Symbol::variable("count", DataType::Integer)).unwrap();

        let symbol = table.lookup("count").unwrap();
        assert_eq!(symbol.data_type, DataType::Integer);
        assert!(!symbol.is_constant);
        assert!(table.lookup("Count").is_none());
    }

    #[test]
    fn test_duplicate_declaration_returns_existing() {
        let mut table = SymbolTable::new();
        table.declare(Symbol::variable("x", DataType::Real)).unwrap();
        let existing = table.declare(Symbol::variable("x", DataType::Text)).unwrap_err();
        assert_eq!(existing.data_type, DataType::Real);
    }

    #[test]
    fn test_remove() {
        let mut table = SymbolTable::new();
        table.declare(Symbol::constant("PI", DataType::Real)).unwrap();
        assert!(table.remove("PI").is_some());
        assert!(!table.contains("PI"));
        assert!(table.remove("PI").is_none());
    }

    #[test]
    fn test_dimension() {
        let dim = Dimension::new(1, 5);
        assert_eq!(dim.len(), 5);
        assert!(dim.contains(1));
        assert!(dim.contains(5));
        assert!(!dim.contains(0));
        assert_eq!(dim.offset_of(4), 3);

        let wide = Dimension::new(-3, 3);
        assert_eq!(wide.len(), 7);
        assert_eq!(wide.offset_of(-3), 0);
    }

    #[test]
    fn test_enum_ordinals() {
        let mut registry = TypeRegistry::new();
        assert!(registry.register(
            "Color",
            TypeDef::Enumerated {
                members: vec!["RED".into(), "GREEN".into(), "BLUE".into()],
            },
        ));
        assert_eq!(registry.ordinal("Color", "RED"), Some(0));
        assert_eq!(registry.ordinal("Color", "BLUE"), Some(2));
        assert_eq!(registry.ordinal("Color", "PINK"), None);
        assert!(!registry.register("Color", TypeDef::Record { fields: vec![] }));
    }
}
