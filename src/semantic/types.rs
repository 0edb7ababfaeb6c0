//! Data types of the pseudocode dialect and their Python spellings.
//!
//! # Conversion table
//!
//! | Pseudocode      | Python        |
//! |-----------------|---------------|
//! | INTEGER         | `int`         |
//! | REAL            | `float`       |
//! | BOOLEAN         | `bool`        |
//! | STRING, CHAR    | `str`         |
//! | ARRAY           | `list`        |
//! | OBJECT          | `object`      |
//! | anything else   | `UnknownType` |
//!
//! Unknown type names are not an error. They pass through as the
//! `UnknownType` marker so that programs using types this translator does not
//! know still translate; the declaration parser logs a warning for them.

use std::fmt;

/// Element types an ARRAY declaration may use.
pub const ARRAY_ELEMENT_TYPES: [&str; 5] = ["INTEGER", "REAL", "BOOLEAN", "STRING", "CHAR"];

/// A declared data type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataType {
    Integer,
    Real,
    Boolean,
    /// STRING and CHAR share the Python `str` type.
    Text,
    Array,
    Object,
    /// A name registered by a TYPE statement.
    User(String),
    /// Any type name outside the conversion table.
    Unknown,
}

impl DataType {
    /// Converts a pseudocode type name using the fixed conversion table.
    pub fn from_pseudocode(name: &str) -> Self {
        match name {
            "INTEGER" => DataType::Integer,
            "REAL" => DataType::Real,
            "BOOLEAN" => DataType::Boolean,
            "STRING" | "CHAR" => DataType::Text,
            "ARRAY" => DataType::Array,
            "OBJECT" => DataType::Object,
            _ => DataType::Unknown,
        }
    }

    /// Returns the Python type name.
    pub fn python_name(&self) -> &str {
        match self {
            DataType::Integer => "int",
            DataType::Real => "float",
            DataType::Boolean => "bool",
            DataType::Text => "str",
            DataType::Array => "list",
            DataType::Object => "object",
            DataType::User(name) => name,
            DataType::Unknown => "UnknownType",
        }
    }

    /// Returns true if `name` may be used as an ARRAY element type.
    pub fn is_array_element(name: &str) -> bool {
        ARRAY_ELEMENT_TYPES.contains(&name)
    }

    /// Returns true for types whose literals can be checked on assignment.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            DataType::Integer | DataType::Real | DataType::Boolean | DataType::Text
        )
    }

    /// Returns true if a literal of type `literal` may be assigned to `self`.
    ///
    /// Only primitive targets are checked; everything else accepts any value.
    /// Integer literals widen to REAL.
    pub fn accepts_literal(&self, literal: &DataType) -> bool {
        if !self.is_primitive() {
            return true;
        }
        self == literal || (*self == DataType::Real && *literal == DataType::Integer)
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Integer => write!(f, "INTEGER"),
            DataType::Real => write!(f, "REAL"),
            DataType::Boolean => write!(f, "BOOLEAN"),
            DataType::Text => write!(f, "STRING"),
            DataType::Array => write!(f, "ARRAY"),
            DataType::Object => write!(f, "OBJECT"),
            DataType::User(name) => write!(f, "{}", name),
            DataType::Unknown => write!(f, "unknown type"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_table() {
        let table = [
            ("INTEGER", "int"),
            ("REAL", "float"),
            ("BOOLEAN", "bool"),
            ("STRING", "str"),
            ("CHAR", "str"),
            ("ARRAY", "list"),
            ("OBJECT", "object"),
            ("DATE", "UnknownType"),
            ("integer", "UnknownType"),
        ];
        for (pseudo, python) in table {
            assert_eq!(DataType::from_pseudocode(pseudo).python_name(), python, "{}", pseudo);
        }
    }

    #[test]
    fn test_array_element_set() {
        assert!(DataType::is_array_element("INTEGER"));
        assert!(DataType::is_array_element("CHAR"));
        assert!(!DataType::is_array_element("ARRAY"));
        assert!(!DataType::is_array_element("OBJECT"));
        assert!(!DataType::is_array_element("Point"));
    }

    #[test]
    fn test_literal_compatibility() {
        assert!(DataType::Integer.accepts_literal(&DataType::Integer));
        assert!(DataType::Real.accepts_literal(&DataType::Integer));
        assert!(!DataType::Integer.accepts_literal(&DataType::Real));
        assert!(!DataType::Integer.accepts_literal(&DataType::Text));
        assert!(!DataType::Boolean.accepts_literal(&DataType::Integer));
        assert!(DataType::Unknown.accepts_literal(&DataType::Text));
        assert!(DataType::User("Point".into()).accepts_literal(&DataType::Integer));
    }
}
