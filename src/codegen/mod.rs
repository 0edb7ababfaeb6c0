//! Python output buffer.
//!
//! The translator emits code directly while parsing; this module owns the
//! pieces of state that shape the output text:
//!
//! - the current indentation level,
//! - the emitted lines, in document order,
//! - the pending imports, flushed once ahead of the statements.
//!
//! # Output layout
//!
//! ```text
//! from dataclasses import dataclass     <- pending imports, fixed order
//! from enum import Enum
//!                                       <- blank separator (only with imports)
//! class Color(Enum):                    <- statements
//!     RED = 0
//! ```

use std::collections::BTreeSet;
use std::fmt;

/// A target-language facility that must be imported once per file.
///
/// Variant order is the order imports are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Import {
    /// Structured aggregate facility for record types.
    Dataclass,
    /// Default factories for array-valued record fields.
    DataclassField,
    /// Enumeration facility for enumerated types.
    Enum,
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Import::Dataclass => write!(f, "from dataclasses import dataclass"),
            Import::DataclassField => write!(f, "from dataclasses import field"),
            Import::Enum => write!(f, "from enum import Enum"),
        }
    }
}

/// Accumulates indented output lines and pending imports.
#[derive(Debug)]
pub struct Emitter {
    lines: Vec<String>,
    imports: BTreeSet<Import>,
    indent: usize,
    unit: String,
}

impl Emitter {
    /// Creates an emitter indenting by `indent_width` spaces per level.
    pub fn new(indent_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            imports: BTreeSet::new(),
            indent: 0,
            unit: " ".repeat(indent_width),
        }
    }

    /// Current indentation level.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Enters a block body.
    pub fn indent_in(&mut self) {
        self.indent += 1;
    }

    /// Leaves a block body. Returns false if already at level 0.
    #[must_use]
    pub fn indent_out(&mut self) -> bool {
        match self.indent.checked_sub(1) {
            Some(level) => {
                self.indent = level;
                true
            }
            None => false,
        }
    }

    /// Emits one statement at the current indentation.
    ///
    /// Text that already starts with the current indentation prefix is kept
    /// as is, so a rule that indented its own output is not indented twice.
    pub fn emit(&mut self, text: &str) {
        let prefix = self.unit.repeat(self.indent);
        if !prefix.is_empty() && text.starts_with(&prefix) {
            self.lines.push(text.to_string());
        } else {
            self.lines.push(format!("{}{}", prefix, text));
        }
    }

    /// Number of lines emitted so far.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Queues an import; repeated requests are no-ops.
    pub fn require(&mut self, import: Import) {
        self.imports.insert(import);
    }

    /// Returns true if `import` has been queued.
    pub fn requires(&self, import: Import) -> bool {
        self.imports.contains(&import)
    }

    /// Joins imports and statements into the final text.
    pub fn finish(self) -> String {
        let mut output = String::new();
        for import in &self.imports {
            output.push_str(&import.to_string());
            output.push('\n');
        }
        if !self.imports.is_empty() && !self.lines.is_empty() {
            output.push('\n');
        }
        for line in &self.lines {
            output.push_str(line);
            output.push('\n');
        }
        output
    }
}
