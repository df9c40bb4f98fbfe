//! Programmatic construction of component packs.
//!
//! [`FilePackBuilder`] offers the attachment discipline of the reader
//! as a call-based surface: scope-owning components open with `start_*`
//! and close with `end_*`, leaf components feed into whichever scope is
//! open. A [`BuildProfile`] supplies the target-flavored text fragments
//! for synthesized constructor bodies. The resulting pack is
//! indistinguishable to a writer from a parsed one.

use crate::ir::{
    Access, Class, ClassId, ClassKind, ComponentId, Container, Field, FilePack, Import,
    InvalidAttach, Method, Parameter, Special,
};
use crate::traits::Target;

/// Error raised by builder operations.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("operation requires an open class scope")]
    NoOpenClass,

    #[error(transparent)]
    Attach(#[from] InvalidAttach),
}

/// Target-specific text fragments used when the builder synthesizes
/// code, such as constructor bodies.
#[derive(Clone, Copy)]
pub struct BuildProfile {
    /// Suffix that value-constructs a type, appended to an allocation.
    pub default_value: fn() -> String,
    /// Expression allocating a type on the stack.
    pub stack_allocation: fn(&str) -> String,
    /// Expression allocating a type on the heap.
    pub heap_allocation: fn(&str) -> String,
    /// Maps a class name to its constructor name.
    pub constructor_name: fn(&str) -> String,
    /// Statement assigning `arg` to member `member`.
    pub member_init: fn(member: &str, arg: &str) -> String,
    /// Derives a parameter name from a member name.
    pub parameter_name: fn(&str) -> String,
}

impl BuildProfile {
    pub fn cpp() -> Self {
        Self {
            default_value: || "()".to_string(),
            stack_allocation: |ty| ty.to_string(),
            heap_allocation: |ty| format!("new {}", ty.trim_matches('*')),
            constructor_name: |name| name.to_string(),
            parameter_name: |name| name.replace("m_", "").to_lowercase(),
            member_init: |member, arg| format!("{member} = {arg};"),
        }
    }

    pub fn java() -> Self {
        Self {
            default_value: || "()".to_string(),
            stack_allocation: |ty| format!("new {}", ty.trim_matches('*')),
            heap_allocation: |ty| format!("new {}", ty.trim_matches('*')),
            constructor_name: |name| name.to_string(),
            parameter_name: |name| name.to_lowercase(),
            member_init: |member, arg| format!("this.{member} = {arg};"),
        }
    }

    pub fn python() -> Self {
        Self {
            default_value: || "()".to_string(),
            stack_allocation: |ty| ty.to_string(),
            heap_allocation: |ty| ty.to_string(),
            constructor_name: |_| "__init__".to_string(),
            parameter_name: |name| name.to_lowercase(),
            member_init: |member, arg| format!("self.{member} = {arg}"),
        }
    }

    pub fn for_target(target: Target) -> Self {
        match target {
            Target::Cpp => Self::cpp(),
            Target::Java => Self::java(),
            Target::Python => Self::python(),
        }
    }
}

/// Builds a component pack through explicit scope management.
pub struct FilePackBuilder {
    pack: FilePack,
    scopes: Vec<ComponentId>,
    profile: BuildProfile,
}

impl FilePackBuilder {
    pub fn new(profile: BuildProfile) -> Self {
        Self {
            pack: FilePack::new(),
            scopes: Vec::new(),
            profile,
        }
    }

    /// Consumes the builder, yielding the constructed pack.
    pub fn finish(self) -> FilePack {
        self.pack
    }

    pub fn create_import(&mut self, name: &str, builtin: bool) {
        self.pack.add_import(Import {
            name: name.to_string(),
            builtin,
        });
    }

    pub fn start_container(&mut self, name: &str, file_scoped: bool) -> Result<(), BuildError> {
        let id = self.pack.add_container(Container::new(name, file_scoped));
        self.feed(ComponentId::Container(id))
    }

    /// Closes the innermost scope. No effect when none is open.
    pub fn end_container(&mut self) {
        self.scopes.pop();
    }

    pub fn start_class(
        &mut self,
        name: &str,
        access: Option<Access>,
        special: Option<Special>,
        parent: Option<&str>,
        interfaces: &[&str],
    ) -> Result<(), BuildError> {
        let mut class = Class::new(access, special, ClassKind::Class, name);
        class.parent = parent.map(str::to_string);
        class.interfaces = interfaces.iter().map(|i| i.to_string()).collect();
        let id = self.pack.add_class(class);
        self.feed(ComponentId::Class(id))
    }

    /// Closes the innermost scope. No effect when none is open.
    pub fn end_class(&mut self) {
        self.scopes.pop();
    }

    pub fn create_field(
        &mut self,
        name: &str,
        ty: &str,
        value: Option<&str>,
        access: Option<Access>,
        special: Option<Special>,
    ) -> Result<(), BuildError> {
        let id = self.pack.add_field(Field {
            access,
            special,
            ty: ty.to_string(),
            name: name.to_string(),
            value: value.map(str::to_string),
        });
        self.attach(ComponentId::Field(id))
    }

    /// Creates a method with a pre-built body. The method scope opens
    /// and closes in this one step, so nothing is left on the stack.
    pub fn create_method(
        &mut self,
        name: &str,
        return_type: &str,
        access: Option<Access>,
        special: Option<Special>,
        body: &[&str],
        params: &[(&str, &str)],
    ) -> Result<(), BuildError> {
        let method = Method {
            access,
            special,
            return_type: return_type.to_string(),
            name: name.to_string(),
            params: params
                .iter()
                .map(|&(name, ty)| Parameter::new(ty, name))
                .collect(),
            body: body.iter().map(|l| l.to_string()).collect(),
        };
        let id = self.pack.add_method(method);
        self.attach(ComponentId::Method(id))
    }

    pub fn create_constructor(
        &mut self,
        name: &str,
        access: Access,
        params: &[(&str, &str)],
    ) -> Result<(), BuildError> {
        let name = (self.profile.constructor_name)(name);
        self.create_method(&name, "", Some(access), None, &[], params)
    }

    /// Constructor assigning each field of the open class a
    /// default-constructed value.
    pub fn create_default_constructor(&mut self, access: Access) -> Result<(), BuildError> {
        let class_id = self.open_class()?;
        let class = self.pack.class(class_id);
        let name = (self.profile.constructor_name)(&class.name);

        let mut body = Vec::with_capacity(class.fields.len());
        for &field_id in &class.fields {
            let field = self.pack.field(field_id);
            let allocation = (self.profile.stack_allocation)(&field.ty);
            let value = format!("{}{}", allocation, (self.profile.default_value)());
            body.push((self.profile.member_init)(&field.name, &value));
        }

        let method = Method {
            access: Some(access),
            special: None,
            return_type: String::new(),
            name,
            params: Vec::new(),
            body,
        };
        let id = self.pack.add_method(method);
        self.attach(ComponentId::Method(id))
    }

    /// Constructor taking one parameter per field of the open class and
    /// assigning each field from its parameter.
    pub fn create_initializer_constructor(&mut self, access: Access) -> Result<(), BuildError> {
        let class_id = self.open_class()?;
        let class = self.pack.class(class_id);
        let name = (self.profile.constructor_name)(&class.name);

        let mut params = Vec::with_capacity(class.fields.len());
        let mut body = Vec::with_capacity(class.fields.len());
        for &field_id in &class.fields {
            let field = self.pack.field(field_id);
            let parameter = (self.profile.parameter_name)(&field.name);
            body.push((self.profile.member_init)(&field.name, &parameter));
            params.push(Parameter::new(field.ty.clone(), parameter));
        }

        let method = Method {
            access: Some(access),
            special: None,
            return_type: String::new(),
            name,
            params,
            body,
        };
        let id = self.pack.add_method(method);
        self.attach(ComponentId::Method(id))
    }

    fn open_class(&self) -> Result<ClassId, BuildError> {
        match self.scopes.last() {
            Some(&ComponentId::Class(id)) => Ok(id),
            _ => Err(BuildError::NoOpenClass),
        }
    }

    fn feed(&mut self, id: ComponentId) -> Result<(), BuildError> {
        self.attach(id)?;
        if id.is_scope() {
            self.scopes.push(id);
        }
        Ok(())
    }

    fn attach(&mut self, id: ComponentId) -> Result<(), BuildError> {
        if let Some(&parent) = self.scopes.last() {
            self.pack.attach(parent, id)?;
        }
        Ok(())
    }
}
