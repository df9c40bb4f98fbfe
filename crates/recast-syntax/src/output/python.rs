//! Python writer for component packs.
//!
//! Emits indentation-structured source: no braces, no visibility
//! keywords, classes decorated with `@dataclass` and members in
//! declaration order.

use crate::ir::{
    Access, Class, ClassId, ComponentId, ConsumedSet, Field, FilePack, Method, Parameter,
};
use crate::output::{Emitter, lower_first, property_backing_field};
use crate::traits::{Target, WriteError, Writer};
use std::fmt::Write;

/// Static instance of the Python writer for registry.
pub static PYTHON_WRITER: PythonWriter = PythonWriter;

/// Python writer implementing the Writer trait.
pub struct PythonWriter;

impl Writer for PythonWriter {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extension(&self) -> &'static str {
        "py"
    }

    fn target(&self) -> Target {
        Target::Python
    }

    fn write_lines(&self, pack: &FilePack) -> Result<Vec<String>, WriteError> {
        Ok(PythonLinker::emit(pack))
    }
}

/// Emits a component pack as Python source lines.
pub struct PythonLinker<'a> {
    pack: &'a FilePack,
    out: Emitter,
    consumed: ConsumedSet,
}

impl<'a> PythonLinker<'a> {
    pub fn emit(pack: &'a FilePack) -> Vec<String> {
        let linker = Self {
            pack,
            out: Emitter::with_capacity(pack.total_count()),
            consumed: ConsumedSet::new(),
        };
        linker.build_file_lines()
    }

    fn build_file_lines(mut self) -> Vec<String> {
        let pack = self.pack;

        for (id, container) in pack.containers() {
            self.consumed.mark(ComponentId::Container(id));

            // Python has no container syntax; the slot renders as blank
            // lines.
            self.out.blank();
            self.out.blank();

            for import in pack.imports() {
                if import.builtin {
                    continue;
                }
                self.out.push(&format_import(&import.name));
            }
            self.out.blank();

            for &class_id in &container.classes {
                self.build_class(class_id);
            }
            // Scope closing is mechanical brace emission; a brace-less
            // target has nothing to close.
        }

        let stray: Vec<ClassId> = pack
            .classes()
            .map(|(id, _)| id)
            .filter(|&id| !self.consumed.contains(ComponentId::Class(id)))
            .collect();
        for class_id in stray {
            self.build_class(class_id);
        }

        self.out.finish()
    }

    fn build_class(&mut self, id: ClassId) {
        let pack = self.pack;
        let class = pack.class(id);
        self.consumed.mark(ComponentId::Class(id));

        self.out.push("@dataclass");
        self.out.push(&format_class(class));
        self.out.indent();

        let (backing, accessors) = self.expand_properties(class);

        let mut fields: Vec<&Field> = class.fields.iter().map(|&id| pack.field(id)).collect();
        fields.extend(backing.iter());
        for field in fields {
            self.out.push(&format_field(field));
        }
        self.out.blank();

        let mut methods: Vec<&Method> = class.methods.iter().map(|&id| pack.method(id)).collect();
        methods.extend(accessors.iter());
        for method in methods {
            self.build_method(method);
        }

        self.out.dedent();
        self.out.blank();
    }

    fn expand_properties(&mut self, class: &Class) -> (Vec<Field>, Vec<Method>) {
        let pack = self.pack;
        let mut fields = Vec::with_capacity(class.properties.len());
        let mut methods = Vec::new();

        for &property_id in &class.properties {
            self.consumed.mark(ComponentId::Property(property_id));
            let property = pack.property(property_id);
            let backing = property_backing_field(property);

            if property.can_read {
                let mut getter = Method::new(
                    property.access,
                    property.special,
                    property.ty.clone(),
                    format!("get{}", property.name),
                );
                getter.body.push(format!("return {}", backing.name));
                methods.push(getter);
            }

            if property.can_write {
                let access = property.write_access.unwrap_or(Access::Public);
                let mut setter = Method::new(
                    Some(access),
                    property.special,
                    "void",
                    format!("set{}", property.name),
                );
                setter.params.push(Parameter::new(map_type(&property.ty), "value"));
                setter.body.push(format!("self.{} = value", backing.name));
                methods.push(setter);
            }

            fields.push(backing);
        }
        (fields, methods)
    }

    fn build_method(&mut self, method: &Method) {
        self.out.push(&format_method(method));
        self.out.indent();
        if method.body.is_empty() {
            self.out.push("pass");
        } else {
            for line in &method.body {
                self.out.push(line);
            }
        }
        self.out.dedent();
        self.out.blank();
    }
}

fn format_import(name: &str) -> String {
    format!("from {name} import *")
}

fn format_class(class: &Class) -> String {
    let mut format = format!("class {}", class.name);

    let mut bases: Vec<&str> = Vec::with_capacity(class.interfaces.len() + 1);
    if let Some(parent) = &class.parent {
        bases.push(parent);
    }
    bases.extend(class.interfaces.iter().map(String::as_str));

    if !bases.is_empty() {
        let _ = write!(format, "({})", bases.join(", "));
    }
    format.push(':');
    format
}

/// `self` leads every parameter list, static methods included.
fn format_method(method: &Method) -> String {
    let mut format = format!("def {}(self", lower_first(&method.name));

    for param in &method.params {
        let _ = write!(format, ", {}: {}", param.name, map_type(&param.ty));
    }
    format.push(')');

    if method.is_constructor() {
        format.push_str(" -> None:");
    } else {
        let _ = write!(format, " -> {}:", map_type(&method.return_type));
    }
    format
}

/// Initialized fields render as plain assignment; the rest carry a
/// type annotation.
fn format_field(field: &Field) -> String {
    match &field.value {
        Some(value) => format!("{} = {}", field.name, value),
        None => format!("{}: {}", field.name, map_type(&field.ty)),
    }
}

/// Maps a source type name to its Python spelling. Array types wrap
/// the mapped element in `list[...]`.
fn map_type(ty: &str) -> String {
    let (name, array) = match ty.find('[') {
        Some(bracket) => (&ty[..bracket], true),
        None => (ty, false),
    };
    let mapped = match name {
        "void" => "None",
        "bool" => "bool",
        "byte" => "int",
        "char" => "char",
        "short" => "str",
        "int" => "int",
        "long" => "int",
        "object" => "object",
        "string" => "str",
        other => other,
    };
    if array {
        format!("list[{mapped}]")
    } else {
        mapped.to_string()
    }
}
