//! C++ writer for component packs.
//!
//! Emits one header per source unit: includes, then braced namespace
//! blocks whose classes group members into visibility sections.

use crate::ir::{
    Access, Class, ClassId, ComponentId, ConsumedSet, Container, Field, FilePack, Method,
    Parameter, Special,
};
use crate::output::{Emitter, lower_first, property_backing_field};
use crate::traits::{Target, WriteError, Writer};
use std::fmt::Write;

/// Static instance of the C++ writer for registry.
pub static CPP_WRITER: CppWriter = CppWriter;

/// C++ writer implementing the Writer trait.
pub struct CppWriter;

impl Writer for CppWriter {
    fn language(&self) -> &'static str {
        "cpp"
    }

    fn extension(&self) -> &'static str {
        "hpp"
    }

    fn target(&self) -> Target {
        Target::Cpp
    }

    fn write_lines(&self, pack: &FilePack) -> Result<Vec<String>, WriteError> {
        Ok(CppLinker::emit(pack))
    }
}

/// Emits a component pack as C++ header lines.
pub struct CppLinker<'a> {
    pack: &'a FilePack,
    out: Emitter,
    consumed: ConsumedSet,
}

impl<'a> CppLinker<'a> {
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

        self.out.push("#pragma once");
        self.out.blank();

        for import in pack.imports() {
            if import.builtin {
                continue;
            }
            self.out.push(&format_import(&import.name));
        }
        self.out.blank();

        for (id, container) in pack.containers() {
            self.consumed.mark(ComponentId::Container(id));
            self.build_container(container);
            for &class_id in &container.classes {
                self.build_class(class_id);
            }
            self.out.close_scopes();
        }

        // Classes that no container claimed render as a flat trailing
        // list.
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

    fn build_container(&mut self, container: &Container) {
        self.out.push(&format_container(container));
        self.out.push("{");
        self.out.indent();
    }

    fn build_class(&mut self, id: ClassId) {
        let pack = self.pack;
        let class = pack.class(id);
        self.consumed.mark(ComponentId::Class(id));

        self.out.push(&format_class(class));
        self.out.push("{");
        self.out.indent();

        let (backing, accessors) = self.expand_properties(class);

        let mut fields: Vec<&Field> = class.fields.iter().map(|&id| pack.field(id)).collect();
        fields.extend(backing.iter());
        self.construct_fields(&fields);

        let mut methods: Vec<&Method> = class.methods.iter().map(|&id| pack.method(id)).collect();
        methods.extend(accessors.iter());
        self.construct_methods(&methods);

        self.out.dedent();
        self.out.push("};");
        self.out.blank();
    }

    /// Lowers every property of the class into a backing field plus
    /// accessor methods, marking the property consumed.
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
                    format!("const {}&", map_type(&property.ty)),
                    format!("get{}", property.name),
                );
                getter.body.push(format!("return {};", backing.name));
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
                setter.body.push(format!("{} = value;", backing.name));
                methods.push(setter);
            }

            fields.push(backing);
        }
        (fields, methods)
    }

    fn construct_fields(&mut self, fields: &[&Field]) {
        let publics: Vec<&Field> = fields
            .iter()
            .copied()
            .filter(|f| f.access == Some(Access::Public))
            .collect();
        let protecteds: Vec<&Field> = fields
            .iter()
            .copied()
            .filter(|f| f.access == Some(Access::Protected))
            .collect();
        let privates: Vec<&Field> = fields
            .iter()
            .copied()
            .filter(|f| matches!(f.access, Some(Access::Private) | None))
            .collect();

        self.field_group("public:", &publics);
        self.field_group("protected:", &protecteds);
        self.field_group("private:", &privates);
    }

    fn field_group(&mut self, label: &str, fields: &[&Field]) {
        if fields.is_empty() {
            return;
        }
        self.out.push(label);
        self.out.indent();
        for field in fields {
            self.out.push(&format_field(field));
        }
        self.out.blank();
        self.out.dedent();
    }

    fn construct_methods(&mut self, methods: &[&Method]) {
        let publics: Vec<&Method> = methods
            .iter()
            .copied()
            .filter(|m| m.access == Some(Access::Public))
            .collect();
        let protecteds: Vec<&Method> = methods
            .iter()
            .copied()
            .filter(|m| m.access == Some(Access::Protected))
            .collect();
        let privates: Vec<&Method> = methods
            .iter()
            .copied()
            .filter(|m| matches!(m.access, Some(Access::Private) | None))
            .collect();

        self.method_group("public:", &publics);
        self.method_group("protected:", &protecteds);
        self.method_group("private:", &privates);
    }

    fn method_group(&mut self, label: &str, methods: &[&Method]) {
        if methods.is_empty() {
            return;
        }
        self.out.push(label);
        self.out.indent();
        for method in methods {
            self.build_method(method);
        }
        self.out.dedent();
    }

    fn build_method(&mut self, method: &Method) {
        self.out.push(&format_method(method));
        self.out.push("{");
        self.out.indent();
        for line in &method.body {
            self.out.push(line);
        }
        self.out.dedent();
        self.out.push("}");
        self.out.blank();
    }
}

fn format_import(name: &str) -> String {
    format!("#include \"Example/{name}.hpp\"")
}

fn format_container(container: &Container) -> String {
    format!("namespace {}", container.name.replace('.', "::"))
}

fn format_class(class: &Class) -> String {
    let mut format = format!("class {}", class.name);

    let mut bases: Vec<&str> = Vec::with_capacity(class.interfaces.len() + 1);
    if let Some(parent) = &class.parent {
        bases.push(parent);
    }
    bases.extend(class.interfaces.iter().map(String::as_str));

    if !bases.is_empty() {
        let _ = write!(format, " : public {}", bases.join(", public "));
    }
    format
}

fn format_method(method: &Method) -> String {
    let mut format = String::new();

    // `override` trails the signature; every other special leads it.
    if let Some(special) = method.special {
        if special != Special::Override {
            let _ = write!(format, "{} ", special.keyword());
        }
    }

    if !method.is_constructor() {
        let _ = write!(format, "{} ", map_type(&method.return_type));
    }

    if method.is_constructor() {
        format.push_str(&method.name);
    } else {
        format.push_str(&lower_first(&method.name));
    }

    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| format!("const {}& {}", map_type(&p.ty), p.name))
        .collect();
    let _ = write!(format, "({})", params.join(", "));

    if method.special == Some(Special::Override) {
        format.push_str(" override");
    }
    format
}

fn format_field(field: &Field) -> String {
    let mut format = String::new();

    if let Some(special) = field.special {
        let _ = write!(format, "{} ", special.keyword());
    }
    let _ = write!(format, "{} {}", map_type(&field.ty), field.name);
    if let Some(value) = &field.value {
        let _ = write!(format, " = {value}");
    }
    format.push(';');
    format
}

/// Maps a source type name to its C++ spelling. Array types lose the
/// bracket suffix and gain a pointer.
fn map_type(ty: &str) -> String {
    let (name, suffix) = match ty.find('[') {
        Some(bracket) => (&ty[..bracket], "*"),
        None => (ty, ""),
    };
    let mapped = match name {
        "bool" => "bool",
        "sbyte" | "char" => "int8_t",
        "short" => "int16_t",
        "int" => "int32_t",
        "long" => "int64_t",
        "byte" => "uint8_t",
        "ushort" => "uint16_t",
        "uint" => "uint32_t",
        "ulong" => "uint64_t",
        "object" => "uint32_t",
        "string" => "std::string",
        other => other,
    };
    format!("{mapped}{suffix}")
}
