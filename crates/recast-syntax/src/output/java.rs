//! Java writer for component packs.
//!
//! Emits one compilation unit per source unit: package and imports,
//! then classes in declaration order with per-member visibility
//! keywords instead of sections.

use crate::ir::{
    Access, Class, ClassId, ComponentId, ConsumedSet, Container, Field, FilePack, Method,
    Parameter, Special,
};
use crate::output::{Emitter, lower_first, property_backing_field};
use crate::traits::{Target, WriteError, Writer};
use std::fmt::Write;

/// Static instance of the Java writer for registry.
pub static JAVA_WRITER: JavaWriter = JavaWriter;

/// Java writer implementing the Writer trait.
pub struct JavaWriter;

impl Writer for JavaWriter {
    fn language(&self) -> &'static str {
        "java"
    }

    fn extension(&self) -> &'static str {
        "java"
    }

    fn target(&self) -> Target {
        Target::Java
    }

    fn write_lines(&self, pack: &FilePack) -> Result<Vec<String>, WriteError> {
        Ok(JavaLinker::emit(pack))
    }
}

/// Emits a component pack as Java source lines.
pub struct JavaLinker<'a> {
    pack: &'a FilePack,
    out: Emitter,
    consumed: ConsumedSet,
}

impl<'a> JavaLinker<'a> {
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
            self.out.push(&format_container(container));
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
            self.out.close_scopes();
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

        self.out.push(&format_class(class));
        self.out.push("{");
        self.out.indent();

        let (backing, accessors) = self.expand_properties(class);

        let mut fields: Vec<&Field> = class.fields.iter().map(|&id| pack.field(id)).collect();
        fields.extend(backing.iter());
        self.construct_fields(&fields);

        let mut methods: Vec<&Method> = class.methods.iter().map(|&id| pack.method(id)).collect();
        methods.extend(accessors.iter());
        for method in methods {
            self.build_method(method);
        }

        self.out.dedent();
        self.out.push("}");
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
        for field in fields {
            self.out.push(&format_field(field));
        }
        self.out.blank();
    }

    fn build_method(&mut self, method: &Method) {
        if method.special == Some(Special::Override) {
            self.out.push("@Override");
        }
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
    format!("import {name}.Java.Example.*;")
}

fn format_container(container: &Container) -> String {
    format!("package {}.Java;", container.name)
}

fn format_class(class: &Class) -> String {
    let mut format = String::new();

    if let Some(access) = class.access {
        let _ = write!(format, "{} ", access.keyword());
    }
    if let Some(special) = class.special {
        let _ = write!(format, "{} ", special.keyword());
    }
    let _ = write!(format, "class {}", class.name);

    if let Some(parent) = &class.parent {
        let _ = write!(format, " extends {parent}");
    }
    if !class.interfaces.is_empty() {
        let _ = write!(format, " implements {}", class.interfaces.join(", "));
    }
    format
}

fn format_method(method: &Method) -> String {
    let mut format = String::new();

    if let Some(access) = method.access {
        let _ = write!(format, "{} ", access.keyword());
    }
    // `override` renders as the annotation line, not a keyword.
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
        .map(|p| format!("{} {}", map_type(&p.ty), p.name))
        .collect();
    let _ = write!(format, "({})", params.join(", "));
    format
}

fn format_field(field: &Field) -> String {
    let mut format = String::new();

    if let Some(access) = field.access {
        let _ = write!(format, "{} ", access.keyword());
    }
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

/// Maps a source type name to its Java spelling. Array types pass
/// through untouched.
fn map_type(ty: &str) -> String {
    let mapped = match ty {
        "bool" => "boolean",
        "byte" => "byte",
        "char" => "char",
        "short" => "short",
        "int" => "int",
        "long" => "long",
        "object" => "Object",
        "string" => "String",
        other => other,
    };
    mapped.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ClassKind;

    #[test]
    fn test_map_type_primitives() {
        assert_eq!(map_type("bool"), "boolean");
        assert_eq!(map_type("string"), "String");
        assert_eq!(map_type("object"), "Object");
        assert_eq!(map_type("int[]"), "int[]");
        assert_eq!(map_type("float"), "float");
    }

    #[test]
    fn test_format_class_extends_and_implements() {
        let mut class = Class::new(Some(Access::Public), None, ClassKind::Class, "FromCSharp");
        class.parent = Some("Base".to_string());
        class.interfaces.push("IInterface".to_string());
        assert_eq!(
            format_class(&class),
            "public class FromCSharp extends Base implements IInterface"
        );
    }

    #[test]
    fn test_format_field_round_trips_declaration() {
        let field = Field {
            access: Some(Access::Public),
            special: Some(Special::Static),
            ty: "int".to_string(),
            name: "Number".to_string(),
            value: Some("0".to_string()),
        };
        assert_eq!(format_field(&field), "public static int Number = 0;");
    }

    #[test]
    fn test_format_field_without_access() {
        let field = Field {
            access: None,
            special: None,
            ty: "bool".to_string(),
            name: "flag".to_string(),
            value: None,
        };
        assert_eq!(format_field(&field), "boolean flag;");
    }

    #[test]
    fn test_format_method_keeps_constructor_name() {
        let mut ctor = Method::new(Some(Access::Public), None, "", "FromCSharp");
        ctor.params.push(Parameter::new("string", "str"));
        ctor.params.push(Parameter::new("int", "integer"));
        assert_eq!(format_method(&ctor), "public FromCSharp(String str, int integer)");
    }

    #[test]
    fn test_build_method_emits_override_annotation_line() {
        let mut pack = FilePack::new();
        let class_id = pack.add_class(Class::new(
            Some(Access::Public),
            None,
            ClassKind::Class,
            "Sample",
        ));
        let method = pack.add_method(Method::new(
            Some(Access::Protected),
            Some(Special::Override),
            "void",
            "Func1",
        ));
        pack.attach(ComponentId::Class(class_id), ComponentId::Method(method))
            .unwrap();

        let lines = JavaLinker::emit(&pack);
        let annotation = lines.iter().position(|l| l.trim() == "@Override").unwrap();
        assert_eq!(lines[annotation + 1].trim(), "protected void func1()");
    }

    #[test]
    fn test_emit_keeps_declaration_order() {
        let mut pack = FilePack::new();
        let container = pack.add_container(Container::new("Output", false));
        let class_id = pack.add_class(Class::new(
            Some(Access::Public),
            None,
            ClassKind::Class,
            "Sample",
        ));
        pack.attach(
            ComponentId::Container(container),
            ComponentId::Class(class_id),
        )
        .unwrap();
        for (access, name) in [
            (Access::Private, "First"),
            (Access::Public, "Second"),
            (Access::Protected, "Third"),
        ] {
            let id = pack.add_method(Method::new(Some(access), None, "void", name));
            pack.attach(ComponentId::Class(class_id), ComponentId::Method(id))
                .unwrap();
        }

        let lines = JavaLinker::emit(&pack);
        let text = lines.join("\n");
        let first = text.find("void first()").unwrap();
        let second = text.find("void second()").unwrap();
        let third = text.find("void third()").unwrap();
        assert!(first < second && second < third);
    }
}
