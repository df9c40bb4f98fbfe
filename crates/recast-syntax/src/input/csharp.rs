//! Line-structured C# reader.
//!
//! Recognizes a restricted subset of C#: one declaration per physical
//! line, braces on their own lines. Each line is classified in a fixed
//! priority order and reduced to a component by positional extraction;
//! an explicit scope stack threads components into the ownership tree.

use crate::ir::{
    Access, Class, ClassKind, ComponentId, Container, Field, FilePack, Import, Method, Parameter,
    Property, Special,
};
use crate::traits::{ReadError, Reader};

/// Static instance of the C# reader for registry.
pub static CSHARP_READER: CSharpReader = CSharpReader;

/// C# reader over the line-structured subset.
pub struct CSharpReader;

impl Reader for CSharpReader {
    fn language(&self) -> &'static str {
        "csharp"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["cs"]
    }

    fn read(&self, source: &str) -> Result<FilePack, ReadError> {
        read_csharp(source)
    }
}

/// Parse one line-structured C# source unit into a component pack.
pub fn read_csharp(source: &str) -> Result<FilePack, ReadError> {
    let lines: Vec<&str> = source.lines().collect();
    Parser::new(&lines).run()
}

const CLASS_SPECIALS: &[Special] = &[
    Special::Static,
    Special::Sealed,
    Special::Virtual,
    Special::Abstract,
];
const MEMBER_SPECIALS: &[Special] = &[Special::Static, Special::Const];
const METHOD_SPECIALS: &[Special] = &[
    Special::Static,
    Special::Override,
    Special::Virtual,
    Special::Abstract,
];

struct Parser<'a> {
    lines: &'a [&'a str],
    pack: FilePack,
    scopes: Vec<ComponentId>,
}

impl<'a> Parser<'a> {
    fn new(lines: &'a [&'a str]) -> Self {
        Self {
            lines,
            pack: FilePack::new(),
            scopes: Vec::new(),
        }
    }

    fn run(mut self) -> Result<FilePack, ReadError> {
        let mut index = 0;
        while index < self.lines.len() {
            let line = self.lines[index].trim();
            index += 1;
            let lineno = index;

            if line.is_empty() {
                continue;
            }
            // Scope-begin markers are inert: the push happened when the
            // owning declaration was classified.
            if line.starts_with('{') {
                continue;
            }
            if line.starts_with('}') {
                self.pop_scope(lineno)?;
                continue;
            }
            if first_token(line) == Some("using") {
                let import = parse_import(line, lineno)?;
                log::trace!("line {lineno}: import {}", import.name);
                self.pack.add_import(import);
                continue;
            }
            if first_token(line) == Some("namespace") {
                let container = parse_container(line, lineno)?;
                log::trace!("line {lineno}: container {}", container.name);
                let id = self.pack.add_container(container);
                self.feed(ComponentId::Container(id))?;
                continue;
            }
            if let Some(kind) = class_kind_token(line) {
                let class = parse_class(line, kind, lineno)?;
                log::trace!("line {lineno}: class {}", class.name);
                let id = self.pack.add_class(class);
                self.feed(ComponentId::Class(id))?;
                continue;
            }
            if line.contains('(') && !line.contains('{') {
                let mut method = parse_method(line, lineno)?;
                log::trace!("line {lineno}: method {}", method.name);
                if line.ends_with(';') {
                    // Statement-terminated declaration: no block follows,
                    // so no scope to balance.
                    let id = self.pack.add_method(method);
                    self.attach(ComponentId::Method(id))?;
                    continue;
                }
                if method.special != Some(Special::Abstract) {
                    let (body, consumed) = capture_body(&self.lines[index..]);
                    method.body = body;
                    index += consumed;
                }
                let id = self.pack.add_method(method);
                self.feed(ComponentId::Method(id))?;
                continue;
            }
            if line.contains("{ get;") || line.contains("set; }") {
                let property = parse_property(line, lineno)?;
                log::trace!("line {lineno}: property {}", property.name);
                let id = self.pack.add_property(property);
                self.attach(ComponentId::Property(id))?;
                continue;
            }
            let field = parse_field(line, lineno)?;
            log::trace!("line {lineno}: field {}", field.name);
            let id = self.pack.add_field(field);
            self.attach(ComponentId::Field(id))?;
        }
        self.finish()
    }

    /// Attaches a component to the open scope (if any) and pushes it
    /// when it owns a scope of its own.
    fn feed(&mut self, id: ComponentId) -> Result<(), ReadError> {
        self.attach(id)?;
        if id.is_scope() {
            self.scopes.push(id);
        }
        Ok(())
    }

    fn attach(&mut self, id: ComponentId) -> Result<(), ReadError> {
        if let Some(&parent) = self.scopes.last() {
            self.pack.attach(parent, id)?;
        }
        Ok(())
    }

    fn pop_scope(&mut self, line: usize) -> Result<(), ReadError> {
        match self.scopes.pop() {
            Some(_) => Ok(()),
            None => Err(ReadError::UnbalancedScope { line }),
        }
    }

    /// File-scoped containers have no end-of-scope line and close here;
    /// anything else still open is a fault.
    fn finish(mut self) -> Result<FilePack, ReadError> {
        while let Some(&top) = self.scopes.last() {
            match top {
                ComponentId::Container(id) if self.pack.container(id).file_scoped => {
                    self.scopes.pop();
                }
                other => return Err(ReadError::UnclosedScope(self.describe(other))),
            }
        }
        log::debug!("parsed {} components", self.pack.total_count());
        Ok(self.pack)
    }

    fn describe(&self, id: ComponentId) -> String {
        let name = match id {
            ComponentId::Import(id) => &self.pack.import(id).name,
            ComponentId::Container(id) => &self.pack.container(id).name,
            ComponentId::Class(id) => &self.pack.class(id).name,
            ComponentId::Field(id) => &self.pack.field(id).name,
            ComponentId::Property(id) => &self.pack.property(id).name,
            ComponentId::Method(id) => &self.pack.method(id).name,
        };
        format!("{} {}", id.kind(), name)
    }
}

/// Captures a method body from the lines following its declaration.
///
/// Returns the re-indented body lines and the number of input lines
/// consumed. Capture stops when brace depth returns to zero, leaving the
/// method's own closing brace unconsumed so the main scan pops the
/// method scope through the ordinary end-of-scope rule.
fn capture_body(rest: &[&str]) -> (Vec<String>, usize) {
    match rest.first() {
        Some(first) if first.trim() == "{" => {}
        _ => return (Vec::new(), 0),
    }

    let mut body = Vec::new();
    let mut depth = 1usize;
    let mut consumed = 1usize;
    for raw in &rest[1..] {
        let line = raw.trim();
        if line.contains('{') {
            body.push(reindent(line, depth - 1));
            depth += 1;
        } else if line.contains('}') {
            depth -= 1;
            if depth == 0 {
                break;
            }
            body.push(reindent(line, depth - 1));
        } else {
            body.push(reindent(line, depth - 1));
        }
        consumed += 1;
    }
    (body, consumed)
}

fn reindent(line: &str, depth: usize) -> String {
    format!("{}{}", "    ".repeat(depth), line)
}

fn first_token(line: &str) -> Option<&str> {
    line.split_whitespace().next()
}

fn class_kind_token(line: &str) -> Option<ClassKind> {
    line.split_whitespace().find_map(ClassKind::from_keyword)
}

fn parse_err(line: usize, message: impl Into<String>) -> ReadError {
    ReadError::Parse {
        line,
        message: message.into(),
    }
}

/// Splits at the first space, yielding the head word and the rest.
fn split_at_space(s: &str) -> Option<(&str, &str)> {
    let i = s.find(' ')?;
    Some((&s[..i], &s[i + 1..]))
}

fn strip_access(s: &str) -> (Option<Access>, &str) {
    for access in Access::ALL {
        if let Some(rest) = s
            .strip_prefix(access.keyword())
            .and_then(|r| r.strip_prefix(' '))
        {
            return (Some(access), rest);
        }
    }
    (None, s)
}

fn strip_special<'s>(s: &'s str, allowed: &[Special]) -> (Option<Special>, &'s str) {
    for &special in allowed {
        if let Some(rest) = s
            .strip_prefix(special.keyword())
            .and_then(|r| r.strip_prefix(' '))
        {
            return (Some(special), rest);
        }
    }
    (None, s)
}

/// Initializer text: from two past `=` to the last character exclusive,
/// with any trailing semicolons trimmed. Empty initializers count as
/// absent.
fn parse_value(rest: &str, lineno: usize) -> Result<Option<String>, ReadError> {
    let Some(eq) = rest.find('=') else {
        return Ok(None);
    };
    let value = rest
        .get(eq + 2..rest.len() - 1)
        .ok_or_else(|| parse_err(lineno, "malformed initializer"))?
        .trim_end_matches(';');
    Ok((!value.is_empty()).then(|| value.to_string()))
}

fn parse_import(line: &str, lineno: usize) -> Result<Import, ReadError> {
    let (_, rest) =
        split_at_space(line).ok_or_else(|| parse_err(lineno, "import missing module name"))?;
    let name = rest.trim().trim_end_matches(';');
    if name.is_empty() {
        return Err(parse_err(lineno, "import missing module name"));
    }
    let builtin = name.starts_with("System");
    Ok(Import {
        name: name.to_string(),
        builtin,
    })
}

fn parse_container(line: &str, lineno: usize) -> Result<Container, ReadError> {
    let (_, rest) =
        split_at_space(line).ok_or_else(|| parse_err(lineno, "namespace missing name"))?;
    let file_scoped = rest.ends_with(';');
    let name = rest.trim_end_matches(';');
    Ok(Container::new(name, file_scoped))
}

fn parse_class(line: &str, kind: ClassKind, lineno: usize) -> Result<Class, ReadError> {
    let (access, rest) = strip_access(line);
    let (special, rest) = strip_special(rest, CLASS_SPECIALS);

    // The declaration keyword itself.
    let (_, rest) =
        split_at_space(rest).ok_or_else(|| parse_err(lineno, "class declaration missing name"))?;

    let (name, bases) = match split_at_space(rest) {
        Some((name, rest)) => (name, Some(rest)),
        None => (rest, None),
    };

    let mut class = Class::new(access, special, kind, name);
    if let Some(bases) = bases {
        if let Some(colon) = bases.find(':') {
            let list = bases
                .get(colon + 2..)
                .ok_or_else(|| parse_err(lineno, "malformed inheritance list"))?
                .trim();
            for entry in list.split(',') {
                let entry = entry.trim();
                if entry.starts_with('I') {
                    class.interfaces.push(entry.to_string());
                } else if class.parent.is_none() {
                    class.parent = Some(entry.to_string());
                } else {
                    return Err(parse_err(
                        lineno,
                        format!("more than one base class: {entry}"),
                    ));
                }
            }
        }
    }
    Ok(class)
}

fn parse_field(line: &str, lineno: usize) -> Result<Field, ReadError> {
    let (access, rest) = strip_access(line);
    let (special, rest) = strip_special(rest, MEMBER_SPECIALS);
    let (ty, rest) = split_at_space(rest).ok_or_else(|| parse_err(lineno, "field missing type"))?;
    let (name, rest) = split_member_name(rest, lineno)?;
    let value = parse_value(rest, lineno)?;
    Ok(Field {
        access,
        special,
        ty: ty.to_string(),
        name: name.to_string(),
        value,
    })
}

/// Member name: up to the first space, else up to the terminator.
fn split_member_name(rest: &str, lineno: usize) -> Result<(&str, &str), ReadError> {
    match rest.find(' ') {
        Some(i) => Ok((&rest[..i], &rest[i + 1..])),
        None => {
            let i = rest
                .find(';')
                .ok_or_else(|| parse_err(lineno, "member missing terminator"))?;
            Ok((&rest[..i], &rest[i + 1..]))
        }
    }
}

fn parse_property(line: &str, lineno: usize) -> Result<Property, ReadError> {
    let (access, rest) = strip_access(line);
    let (special, rest) = strip_special(rest, MEMBER_SPECIALS);
    let (ty, rest) =
        split_at_space(rest).ok_or_else(|| parse_err(lineno, "property missing type"))?;
    let (name, mut rest) = split_member_name(rest, lineno)?;

    let mut can_read = false;
    if let Some(g) = rest.find('g') {
        can_read = true;
        rest = rest
            .get(g + 5..)
            .ok_or_else(|| parse_err(lineno, "malformed accessor block"))?;
    }

    let (write_access, rest) = strip_access(rest);
    let can_write = rest.contains('s');
    let value = parse_value(rest, lineno)?;

    Ok(Property {
        access,
        special,
        ty: ty.to_string(),
        name: name.to_string(),
        value,
        can_read,
        can_write,
        write_access,
    })
}

fn parse_method(line: &str, lineno: usize) -> Result<Method, ReadError> {
    let (access, rest) = strip_access(line);
    let (special, rest) = strip_special(rest, METHOD_SPECIALS);

    let paren = rest
        .find('(')
        .ok_or_else(|| parse_err(lineno, "method missing parameter list"))?;
    let mut head = rest[..paren].split_whitespace();
    let (return_type, name) = match (head.next(), head.next(), head.next()) {
        // A lone token before the parameter list is a constructor name.
        (Some(name), None, _) => ("", name),
        (Some(ty), Some(name), None) => (ty, name),
        _ => return Err(parse_err(lineno, "malformed method declaration")),
    };

    let close = rest
        .find(')')
        .ok_or_else(|| parse_err(lineno, "method missing closing parenthesis"))?;
    let inner = rest
        .get(paren + 1..close)
        .ok_or_else(|| parse_err(lineno, "malformed parameter list"))?;

    let mut method = Method::new(access, special, return_type, name);
    if !inner.is_empty() {
        for segment in inner.split(',') {
            let segment = segment.trim();
            let tokens: Vec<&str> = segment.split_whitespace().collect();
            let param = match tokens.as_slice() {
                [ty, name] => Parameter::new(*ty, *name),
                [modifier, ty, name] => Parameter {
                    modifier: Some((*modifier).to_string()),
                    ty: (*ty).to_string(),
                    name: (*name).to_string(),
                },
                _ => {
                    return Err(parse_err(lineno, format!("malformed parameter: {segment}")));
                }
            };
            method.params.push(param);
        }
    }
    Ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_round_trips_tuple() {
        let field = parse_field("public static int Number = 0;", 1).unwrap();
        assert_eq!(field.access, Some(Access::Public));
        assert_eq!(field.special, Some(Special::Static));
        assert_eq!(field.ty, "int");
        assert_eq!(field.name, "Number");
        assert_eq!(field.value.as_deref(), Some("0"));
    }

    #[test]
    fn test_parse_field_without_value() {
        let field = parse_field("public float weight;", 1).unwrap();
        assert_eq!(field.access, Some(Access::Public));
        assert_eq!(field.special, None);
        assert_eq!(field.ty, "float");
        assert_eq!(field.name, "weight");
        assert_eq!(field.value, None);
    }

    #[test]
    fn test_parse_field_without_access() {
        let field = parse_field("const string Tag = \"x\";", 1).unwrap();
        assert_eq!(field.access, None);
        assert_eq!(field.special, Some(Special::Const));
        assert_eq!(field.value.as_deref(), Some("\"x\""));
    }

    #[test]
    fn test_parse_property_with_write_access_and_value() {
        let p = parse_property("public static int Number { get; private set; } = 0;", 1).unwrap();
        assert_eq!(p.access, Some(Access::Public));
        assert_eq!(p.special, Some(Special::Static));
        assert_eq!(p.ty, "int");
        assert_eq!(p.name, "Number");
        assert!(p.can_read);
        assert!(p.can_write);
        assert_eq!(p.write_access, Some(Access::Private));
        assert_eq!(p.value.as_deref(), Some("0"));
    }

    #[test]
    fn test_parse_property_getter_only() {
        let p = parse_property("public int IntProperty { get; }", 1).unwrap();
        assert!(p.can_read);
        assert!(!p.can_write);
        assert_eq!(p.write_access, None);
        assert_eq!(p.value, None);
    }

    #[test]
    fn test_parse_property_setter_only() {
        let p = parse_property("public int Slot { set; }", 1).unwrap();
        assert!(!p.can_read);
        assert!(p.can_write);
    }

    #[test]
    fn test_parse_method_header() {
        let m = parse_method("public virtual float Deg2Rad(float deg)", 1).unwrap();
        assert_eq!(m.access, Some(Access::Public));
        assert_eq!(m.special, Some(Special::Virtual));
        assert_eq!(m.return_type, "float");
        assert_eq!(m.name, "Deg2Rad");
        assert!(!m.is_constructor());
        assert_eq!(m.params, vec![Parameter::new("float", "deg")]);
    }

    #[test]
    fn test_parse_constructor_has_empty_return_type() {
        let m = parse_method("public FromCSharp(string str, int integer)", 1).unwrap();
        assert!(m.is_constructor());
        assert_eq!(m.name, "FromCSharp");
        assert_eq!(
            m.params,
            vec![
                Parameter::new("string", "str"),
                Parameter::new("int", "integer"),
            ]
        );
    }

    #[test]
    fn test_parse_parameter_modifier() {
        let m = parse_method("public void Store(ref int slot)", 1).unwrap();
        assert_eq!(m.params.len(), 1);
        assert_eq!(m.params[0].modifier.as_deref(), Some("ref"));
        assert_eq!(m.params[0].ty, "int");
        assert_eq!(m.params[0].name, "slot");
    }

    #[test]
    fn test_parse_class_splits_parent_and_interfaces() {
        let class = parse_class(
            "public abstract class Test1 : BaseClass, ISample",
            ClassKind::Class,
            1,
        )
        .unwrap();
        assert_eq!(class.access, Some(Access::Public));
        assert_eq!(class.special, Some(Special::Abstract));
        assert_eq!(class.name, "Test1");
        assert_eq!(class.parent.as_deref(), Some("BaseClass"));
        assert_eq!(class.interfaces, vec!["ISample".to_string()]);
    }

    #[test]
    fn test_parse_class_rejects_second_base_class() {
        let err = parse_class("public class A : First, Second", ClassKind::Class, 1).unwrap_err();
        assert!(matches!(err, ReadError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_class_keyword_is_token_not_substring() {
        assert_eq!(class_kind_token("public class Foo"), Some(ClassKind::Class));
        assert_eq!(
            class_kind_token("public interface IFoo"),
            Some(ClassKind::Interface)
        );
        // A type merely containing the word must not classify as a class.
        assert_eq!(class_kind_token("public Classifier rank;"), None);
    }

    #[test]
    fn test_import_builtin_flag() {
        let builtin = parse_import("using System.Collections.Generic;", 1).unwrap();
        assert!(builtin.builtin);
        let plain = parse_import("using Output;", 1).unwrap();
        assert!(!plain.builtin);
        assert_eq!(plain.name, "Output");
    }

    #[test]
    fn test_capture_body_counts_and_reindents() {
        let lines = [
            "        {",
            "            var sum = 0;",
            "            for (var i = 0; i < count; i++)",
            "            {",
            "                sum += numbers[i];",
            "            }",
            "            return sum;",
            "        }",
            "    }",
        ];
        let (body, consumed) = capture_body(&lines);
        assert_eq!(
            body,
            vec![
                "var sum = 0;",
                "for (var i = 0; i < count; i++)",
                "{",
                "    sum += numbers[i];",
                "}",
                "return sum;",
            ]
        );
        // The opening brace plus every interior line; the closing brace
        // stays for the scan.
        assert_eq!(consumed, 7);
    }

    #[test]
    fn test_capture_body_without_block() {
        let lines = ["}", "void Next()"];
        let (body, consumed) = capture_body(&lines);
        assert!(body.is_empty());
        assert_eq!(consumed, 0);
    }

    #[test]
    fn test_read_attaches_members_to_scopes() {
        let source = "\
using Output;

namespace Output
{
    public class Base
    {
        public int number = 0;
        public string Title { get; set; }

        public void Run()
        {
            number = 1;
        }
    }
}
";
        let pack = read_csharp(source).unwrap();
        assert_eq!(pack.imports().len(), 1);
        let (_, container) = pack.containers().next().unwrap();
        assert_eq!(container.name, "Output");
        assert!(!container.file_scoped);
        assert_eq!(container.classes.len(), 1);

        let class = pack.class(container.classes[0]);
        assert_eq!(class.name, "Base");
        assert_eq!(class.fields.len(), 1);
        assert_eq!(class.properties.len(), 1);
        assert_eq!(class.methods.len(), 1);

        let method = pack.method(class.methods[0]);
        assert_eq!(method.body, vec!["number = 1;"]);
    }

    #[test]
    fn test_read_file_scoped_container_closes_at_end_of_input() {
        let source = "\
namespace Output;

public class Base
{
}
";
        let pack = read_csharp(source).unwrap();
        let (_, container) = pack.containers().next().unwrap();
        assert!(container.file_scoped);
        assert_eq!(container.classes.len(), 1);
    }

    #[test]
    fn test_read_statement_terminated_method_keeps_balance() {
        let source = "\
namespace Output;

public interface IInterface
{
    public void Func3(object obj);
}
";
        let pack = read_csharp(source).unwrap();
        let (_, container) = pack.containers().next().unwrap();
        let class = pack.class(container.classes[0]);
        assert_eq!(class.kind, ClassKind::Interface);
        assert_eq!(class.methods.len(), 1);
        let method = pack.method(class.methods[0]);
        assert_eq!(method.name, "Func3");
        assert!(method.body.is_empty());
    }

    #[test]
    fn test_read_nested_class_attaches_to_class() {
        let source = "\
namespace Output
{
    public class Outer
    {
        public class Inner
        {
        }
    }
}
";
        let pack = read_csharp(source).unwrap();
        let (_, container) = pack.containers().next().unwrap();
        assert_eq!(container.classes.len(), 1);
        let outer = pack.class(container.classes[0]);
        assert_eq!(outer.classes.len(), 1);
        assert_eq!(pack.class(outer.classes[0]).name, "Inner");
    }

    #[test]
    fn test_read_faults_on_close_with_empty_stack() {
        let err = read_csharp("}\n").unwrap_err();
        assert!(matches!(err, ReadError::UnbalancedScope { line: 1 }));
    }

    #[test]
    fn test_read_faults_on_unclosed_scope() {
        let source = "\
namespace Output
{
    public class Base
    {
";
        let err = read_csharp(source).unwrap_err();
        match err {
            ReadError::UnclosedScope(what) => assert_eq!(what, "class Base"),
            other => panic!("expected UnclosedScope, got {other:?}"),
        }
    }

    #[test]
    fn test_read_faults_on_field_inside_container() {
        let source = "\
namespace Output
{
    public int stray = 1;
}
";
        let err = read_csharp(source).unwrap_err();
        assert!(matches!(err, ReadError::Attach(_)));
    }

    #[test]
    fn test_abstract_method_body_is_skipped() {
        let source = "\
namespace Output;

public abstract class Shape
{
    public abstract float Area()
    {
    }
}
";
        let pack = read_csharp(source).unwrap();
        let (_, container) = pack.containers().next().unwrap();
        let class = pack.class(container.classes[0]);
        let method = pack.method(class.methods[0]);
        assert_eq!(method.special, Some(Special::Abstract));
        assert!(method.body.is_empty());
    }
}
