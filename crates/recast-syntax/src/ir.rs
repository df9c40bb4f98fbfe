//! Component model for line-structured source units.
//!
//! A parsed source unit becomes a [`FilePack`]: per-kind arenas of
//! components addressed by typed ids, plus the ownership tree threaded
//! through [`FilePack::attach`]. Writers walk the pack without mutating
//! it, tracking progress in a [`ConsumedSet`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Access modifier on a declaration. Absent means the source omitted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Private,
    Protected,
}

impl Access {
    pub const ALL: [Access; 3] = [Access::Public, Access::Private, Access::Protected];

    pub fn keyword(self) -> &'static str {
        match self {
            Access::Public => "public",
            Access::Private => "private",
            Access::Protected => "protected",
        }
    }
}

/// Special modifier on a declaration. Which values a declaration kind
/// accepts is enforced by the reader, not the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Special {
    Static,
    Sealed,
    Abstract,
    Virtual,
    Override,
    Const,
}

impl Special {
    pub fn keyword(self) -> &'static str {
        match self {
            Special::Static => "static",
            Special::Sealed => "sealed",
            Special::Abstract => "abstract",
            Special::Virtual => "virtual",
            Special::Override => "override",
            Special::Const => "const",
        }
    }
}

/// Declaration keyword a class-like component was introduced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
    Struct,
    Enum,
}

impl ClassKind {
    pub fn from_keyword(word: &str) -> Option<ClassKind> {
        match word {
            "class" => Some(ClassKind::Class),
            "interface" => Some(ClassKind::Interface),
            "struct" => Some(ClassKind::Struct),
            "enum" => Some(ClassKind::Enum),
            _ => None,
        }
    }
}

/// One `using`-like line. Built-in imports (paths under the source
/// language's standard library) are skipped at emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub name: String,
    pub builtin: bool,
}

/// A namespacing unit. File-scoped containers have no end-of-scope line
/// and close implicitly at end of input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    pub name: String,
    pub file_scoped: bool,
    pub containers: Vec<ContainerId>,
    pub classes: Vec<ClassId>,
}

impl Container {
    pub fn new(name: impl Into<String>, file_scoped: bool) -> Self {
        Self {
            name: name.into(),
            file_scoped,
            containers: Vec::new(),
            classes: Vec::new(),
        }
    }
}

/// A class-like declaration with its owned members.
///
/// At most one parent class; entries of the inheritance list whose name
/// starts with `I` are interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Class {
    pub access: Option<Access>,
    pub special: Option<Special>,
    pub kind: ClassKind,
    pub name: String,
    pub parent: Option<String>,
    pub interfaces: Vec<String>,
    pub classes: Vec<ClassId>,
    pub fields: Vec<FieldId>,
    pub properties: Vec<PropertyId>,
    pub methods: Vec<MethodId>,
}

impl Class {
    pub fn new(
        access: Option<Access>,
        special: Option<Special>,
        kind: ClassKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            access,
            special,
            kind,
            name: name.into(),
            parent: None,
            interfaces: Vec::new(),
            classes: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }
}

/// A member variable. `value` holds the raw initializer text when the
/// declaration carried one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub access: Option<Access>,
    pub special: Option<Special>,
    pub ty: String,
    pub name: String,
    pub value: Option<String>,
}

/// An accessor-block member. Properties never reach emission directly;
/// writers expand each one into a backing field plus conditional
/// getter/setter methods first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub access: Option<Access>,
    pub special: Option<Special>,
    pub ty: String,
    pub name: String,
    pub value: Option<String>,
    pub can_read: bool,
    pub can_write: bool,
    /// Setter visibility when it differs from the property's own.
    pub write_access: Option<Access>,
}

/// One parameter of a method, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub modifier: Option<String>,
    pub ty: String,
    pub name: String,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            modifier: None,
            ty: ty.into(),
            name: name.into(),
        }
    }
}

/// A callable member. The body holds raw statement lines, trimmed and
/// re-indented relative to the body root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    pub access: Option<Access>,
    pub special: Option<Special>,
    /// Empty for constructors.
    pub return_type: String,
    pub name: String,
    pub params: Vec<Parameter>,
    pub body: Vec<String>,
}

impl Method {
    pub fn new(
        access: Option<Access>,
        special: Option<Special>,
        return_type: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            access,
            special,
            return_type: return_type.into(),
            name: name.into(),
            params: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.return_type.is_empty()
    }
}

macro_rules! component_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(usize);
    };
}

component_id!(
    /// Index of an [`Import`] in its pack.
    ImportId
);
component_id!(
    /// Index of a [`Container`] in its pack.
    ContainerId
);
component_id!(
    /// Index of a [`Class`] in its pack.
    ClassId
);
component_id!(
    /// Index of a [`Field`] in its pack.
    FieldId
);
component_id!(
    /// Index of a [`Property`] in its pack.
    PropertyId
);
component_id!(
    /// Index of a [`Method`] in its pack.
    MethodId
);

/// Identity of any stored component. The closed set of component kinds:
/// scope rules and tree composition are total matches over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentId {
    Import(ImportId),
    Container(ContainerId),
    Class(ClassId),
    Field(FieldId),
    Property(PropertyId),
    Method(MethodId),
}

impl ComponentId {
    /// Whether this component kind may own nested children.
    pub fn is_scope(self) -> bool {
        match self {
            ComponentId::Container(_) | ComponentId::Class(_) | ComponentId::Method(_) => true,
            ComponentId::Import(_) | ComponentId::Field(_) | ComponentId::Property(_) => false,
        }
    }

    pub fn kind(self) -> &'static str {
        match self {
            ComponentId::Import(_) => "import",
            ComponentId::Container(_) => "container",
            ComponentId::Class(_) => "class",
            ComponentId::Field(_) => "field",
            ComponentId::Property(_) => "property",
            ComponentId::Method(_) => "method",
        }
    }
}

/// Returned by [`FilePack::attach`] for a parent/child pairing the
/// ownership tree does not allow.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{child} cannot be owned by {parent}")]
pub struct InvalidAttach {
    pub parent: &'static str,
    pub child: &'static str,
}

/// The parse result: every recognized component in per-kind arenas, in
/// encounter order, plus the ownership tree. Top-level containers are
/// the tree roots; classes owned by no container stay reachable through
/// the flat class list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilePack {
    imports: Vec<Import>,
    containers: Vec<Container>,
    classes: Vec<Class>,
    fields: Vec<Field>,
    properties: Vec<Property>,
    methods: Vec<Method>,
}

impl FilePack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_import(&mut self, import: Import) -> ImportId {
        self.imports.push(import);
        ImportId(self.imports.len() - 1)
    }

    pub fn add_container(&mut self, container: Container) -> ContainerId {
        self.containers.push(container);
        ContainerId(self.containers.len() - 1)
    }

    pub fn add_class(&mut self, class: Class) -> ClassId {
        self.classes.push(class);
        ClassId(self.classes.len() - 1)
    }

    pub fn add_field(&mut self, field: Field) -> FieldId {
        self.fields.push(field);
        FieldId(self.fields.len() - 1)
    }

    pub fn add_property(&mut self, property: Property) -> PropertyId {
        self.properties.push(property);
        PropertyId(self.properties.len() - 1)
    }

    pub fn add_method(&mut self, method: Method) -> MethodId {
        self.methods.push(method);
        MethodId(self.methods.len() - 1)
    }

    /// Records `child` in `parent`'s member list.
    pub fn attach(&mut self, parent: ComponentId, child: ComponentId) -> Result<(), InvalidAttach> {
        match (parent, child) {
            (ComponentId::Container(p), ComponentId::Container(c)) => {
                self.containers[p.0].containers.push(c);
                Ok(())
            }
            (ComponentId::Container(p), ComponentId::Class(c)) => {
                self.containers[p.0].classes.push(c);
                Ok(())
            }
            (ComponentId::Class(p), ComponentId::Class(c)) => {
                self.classes[p.0].classes.push(c);
                Ok(())
            }
            (ComponentId::Class(p), ComponentId::Field(c)) => {
                self.classes[p.0].fields.push(c);
                Ok(())
            }
            (ComponentId::Class(p), ComponentId::Property(c)) => {
                self.classes[p.0].properties.push(c);
                Ok(())
            }
            (ComponentId::Class(p), ComponentId::Method(c)) => {
                self.classes[p.0].methods.push(c);
                Ok(())
            }
            (parent, child) => Err(InvalidAttach {
                parent: parent.kind(),
                child: child.kind(),
            }),
        }
    }

    pub fn import(&self, id: ImportId) -> &Import {
        &self.imports[id.0]
    }

    pub fn container(&self, id: ContainerId) -> &Container {
        &self.containers[id.0]
    }

    pub fn class(&self, id: ClassId) -> &Class {
        &self.classes[id.0]
    }

    pub fn field(&self, id: FieldId) -> &Field {
        &self.fields[id.0]
    }

    pub fn property(&self, id: PropertyId) -> &Property {
        &self.properties[id.0]
    }

    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.0]
    }

    pub fn imports(&self) -> &[Import] {
        &self.imports
    }

    /// Containers in encounter order, with their ids.
    pub fn containers(&self) -> impl Iterator<Item = (ContainerId, &Container)> {
        self.containers
            .iter()
            .enumerate()
            .map(|(index, container)| (ContainerId(index), container))
    }

    /// Classes in encounter order, with their ids.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, &Class)> {
        self.classes
            .iter()
            .enumerate()
            .map(|(index, class)| (ClassId(index), class))
    }

    /// Number of stored components of every kind. Sizes emission buffers.
    pub fn total_count(&self) -> usize {
        self.imports.len()
            + self.containers.len()
            + self.classes.len()
            + self.fields.len()
            + self.properties.len()
            + self.methods.len()
    }
}

/// Components a generation pass has already handled. Kept beside the
/// pack so the pack itself stays immutable while writers walk it.
#[derive(Debug, Default)]
pub struct ConsumedSet {
    seen: HashSet<ComponentId>,
}

impl ConsumedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a component consumed. Returns false when it already was.
    pub fn mark(&mut self, id: ComponentId) -> bool {
        self.seen.insert(id)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.seen.contains(&id)
    }
}
