//! Output writers - emit component packs as target source lines.
//!
//! All writers drive the same [`Emitter`] and share the property
//! expansion helpers: a property never reaches the output directly, it
//! is lowered to a backing field plus accessor methods first.

#[cfg(feature = "write-cpp")]
pub mod cpp;
#[cfg(feature = "write-java")]
pub mod java;
#[cfg(feature = "write-python")]
pub mod python;

#[cfg(feature = "write-cpp")]
pub use cpp::{CPP_WRITER, CppLinker, CppWriter};
#[cfg(feature = "write-java")]
pub use java::{JAVA_WRITER, JavaLinker, JavaWriter};
#[cfg(feature = "write-python")]
pub use python::{PYTHON_WRITER, PythonLinker, PythonWriter};

use crate::ir::{Access, Field, Property};

/// Indentation-tracked line buffer.
///
/// Every pushed line is prefixed with four spaces per depth level,
/// blank lines included.
pub(crate) struct Emitter {
    lines: Vec<String>,
    depth: usize,
}

impl Emitter {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            lines: Vec::with_capacity(capacity),
            depth: 0,
        }
    }

    pub(crate) fn push(&mut self, text: &str) {
        let mut line = String::with_capacity(self.depth * 4 + text.len());
        for _ in 0..self.depth {
            line.push_str("    ");
        }
        line.push_str(text);
        self.lines.push(line);
    }

    pub(crate) fn blank(&mut self) {
        self.push("");
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.depth -= 1;
    }

    /// Dedents back to the file root, emitting a close brace per level.
    pub(crate) fn close_scopes(&mut self) {
        while self.depth != 0 {
            self.dedent();
            self.push("}");
        }
    }

    pub(crate) fn finish(self) -> Vec<String> {
        self.lines
    }
}

/// First character lowered, the rest untouched.
pub(crate) fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_lowercase(), chars.as_str()),
        None => String::new(),
    }
}

/// Name of the field synthesized behind a property.
pub(crate) fn backing_field_name(property: &Property) -> String {
    format!("{}BackingField", lower_first(&property.name))
}

/// The private field a property lowers to. The type stays in source
/// terms; writers map it at format time like any declared field.
pub(crate) fn property_backing_field(property: &Property) -> Field {
    Field {
        access: Some(Access::Private),
        special: property.special,
        ty: property.ty.clone(),
        name: backing_field_name(property),
        value: property.value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Special;

    #[test]
    fn test_emitter_prefixes_every_line_with_indent() {
        let mut out = Emitter::with_capacity(4);
        out.push("namespace Output");
        out.push("{");
        out.indent();
        out.push("class A");
        out.blank();
        out.dedent();
        out.push("}");
        assert_eq!(
            out.finish(),
            vec!["namespace Output", "{", "    class A", "    ", "}"]
        );
    }

    #[test]
    fn test_close_scopes_emits_one_brace_per_level() {
        let mut out = Emitter::with_capacity(4);
        out.indent();
        out.indent();
        out.close_scopes();
        assert_eq!(out.finish(), vec!["    }", "}"]);
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("FromCSharp"), "fromCSharp");
        assert_eq!(lower_first("method"), "method");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn test_backing_field_keeps_property_shape() {
        let property = Property {
            access: Some(Access::Public),
            special: Some(Special::Static),
            ty: "int".to_string(),
            name: "Number".to_string(),
            value: Some("0".to_string()),
            can_read: true,
            can_write: true,
            write_access: Some(Access::Private),
        };
        let field = property_backing_field(&property);
        assert_eq!(field.name, "numberBackingField");
        assert_eq!(field.access, Some(Access::Private));
        assert_eq!(field.special, Some(Special::Static));
        assert_eq!(field.ty, "int");
        assert_eq!(field.value.as_deref(), Some("0"));
    }
}
