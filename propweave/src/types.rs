//! Shared vocabulary between the engine and its hosts.

use serde::{Deserialize, Serialize};

/// Visibility requested for synthesized accessors.
///
/// `None` disables synthesis for the field altogether.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    #[default]
    Public,
    Protected,
    Package,
    Private,
    None,
}

impl AccessLevel {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "public" => Some(Self::Public),
            "protected" => Some(Self::Protected),
            "package" => Some(Self::Package),
            "private" => Some(Self::Private),
            "none" => Some(Self::None),
            _ => None,
        }
    }
}

/// Nullability derived from a field's annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    NonNull,
    Nullable,
    #[default]
    None,
}

/// Naming conventions of the host language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStyle {
    /// `setName` / `getName` / `isActive`, synthetic fields prefixed with `$$`.
    Java,
    /// `set_name` / `name` / `is_active`, synthetic fields prefixed with `__`.
    Rust,
}

/// Declared type of a field as the host spells it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    /// Primitive (value) types never receive a null check.
    #[serde(default)]
    pub primitive: bool,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitive: false,
        }
    }

    pub fn primitive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primitive: true,
        }
    }

    /// Only the primitive boolean gets the `is` getter convention; boxed `Boolean` does not.
    pub fn is_boolean(&self) -> bool {
        self.primitive && matches!(self.name.as_str(), "boolean" | "bool")
    }
}

/// Kind of a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    Class,
    Enum,
    Interface,
    Annotation,
}

impl ClassKind {
    /// Interfaces and annotation types cannot hold observable state.
    pub fn accepts_properties(self) -> bool {
        matches!(self, Self::Class | Self::Enum)
    }
}

/// Kind of a host node, as far as the engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Class(ClassKind),
    Field,
    Method,
    Other,
}

/// Who wrote a member that already exists in a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    #[default]
    UserWritten,
    FrameworkGenerated,
}

/// Result of a member lookup in the owning class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberExists {
    NotExists,
    ExistsByFramework,
    ExistsByUser,
}

impl MemberExists {
    pub fn from_provenance(provenance: Option<Provenance>) -> Self {
        match provenance {
            None => Self::NotExists,
            Some(Provenance::FrameworkGenerated) => Self::ExistsByFramework,
            Some(Provenance::UserWritten) => Self::ExistsByUser,
        }
    }

    pub fn exists(self) -> bool {
        !matches!(self, Self::NotExists)
    }
}

/// Accessor conventions in force for one class (the `@Accessors` equivalent).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccessorStyle {
    /// Setters return the owning instance.
    #[serde(default)]
    pub chain: bool,
    /// Accessors are named after the bare property; implies `chain`.
    #[serde(default)]
    pub fluent: bool,
    /// Field-name prefixes to strip; when non-empty a field must match one of them.
    #[serde(default)]
    pub prefixes: Vec<String>,
}

impl AccessorStyle {
    pub fn returns_self(&self) -> bool {
        self.chain || self.fluent
    }
}

/// Raw facts a host reports for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFacts {
    pub name: String,
    pub ty: TypeRef,
    pub is_static: bool,
    pub is_final: bool,
    /// Simple names of the annotations on the field.
    pub annotations: Vec<String>,
    pub deprecated: bool,
    /// Field-level access override (e.g. `access = none` to exclude a field).
    pub access: Option<AccessLevel>,
}

impl FieldFacts {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            is_final: false,
            annotations: Vec::new(),
            deprecated: false,
            access: None,
        }
    }
}

/// Everything the engine needs to know about a field, derived once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: TypeRef,
    pub is_static: bool,
    pub is_final: bool,
    pub is_boolean: bool,
    pub nullability: Nullability,
    pub access_level: AccessLevel,
    pub deprecated: bool,
    /// Nullability annotations found on the field, copied onto the setter parameter.
    pub nullability_annotations: Vec<String>,
}

/// Method- and parameter-level annotations unboxed from the triggering annotation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PropagatedAnnotations {
    #[serde(default)]
    pub on_method: Vec<String>,
    #[serde(default)]
    pub on_param: Vec<String>,
}

impl PropagatedAnnotations {
    pub fn is_empty(&self) -> bool {
        self.on_method.is_empty() && self.on_param.is_empty()
    }
}
