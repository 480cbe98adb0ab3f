use serde::{Deserialize, Serialize};

use crate::diagnostics::Diagnostic;
use crate::errors::ConfigError;
use crate::types::{AccessLevel, AccessorStyle, ClassKind, PropagatedAnnotations, Provenance};

const PRIMITIVES: &[&str] = &["boolean", "byte", "char", "short", "int", "long", "float", "double"];

pub fn is_primitive(ty: &str) -> bool {
    PRIMITIVES.contains(&ty.trim())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Static,
    Final,
    Transient,
    Volatile,
    Abstract,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Protected => "protected",
            Modifier::Private => "private",
            Modifier::Static => "static",
            Modifier::Final => "final",
            Modifier::Transient => "transient",
            Modifier::Volatile => "volatile",
            Modifier::Abstract => "abstract",
        }
    }

    /// Modifiers for an access level; package-private and `none` have no keyword.
    pub fn for_access(level: AccessLevel) -> Option<Self> {
        match level {
            AccessLevel::Public => Some(Modifier::Public),
            AccessLevel::Protected => Some(Modifier::Protected),
            AccessLevel::Private => Some(Modifier::Private),
            AccessLevel::Package | AccessLevel::None => None,
        }
    }
}

/// One Java source file worth of declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaUnit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub imports: Vec<String>,
    pub classes: Vec<JavaClass>,
    /// Diagnostics the engine reported against this unit.
    #[serde(skip)]
    pub diagnostics: Vec<Diagnostic>,
}

impl JavaUnit {
    pub fn new(classes: Vec<JavaClass>) -> Self {
        Self {
            classes,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn class(&self, name: &str) -> Option<&JavaClass> {
        self.classes.iter().find(|class| class.name == name)
    }
}

fn default_kind() -> ClassKind {
    ClassKind::Class
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaClass {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: ClassKind,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub implements: Vec<String>,
    #[serde(default)]
    pub annotations: Vec<String>,
    /// Class-level accessor conventions (`@Accessors`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessors: Option<AccessorStyle>,
    /// Present when the class itself carries the observable marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observable: Option<PropagatedAnnotations>,
    #[serde(default)]
    pub fields: Vec<JavaField>,
    #[serde(default)]
    pub methods: Vec<JavaMethod>,
}

impl JavaClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ClassKind::Class,
            modifiers: vec![Modifier::Public],
            implements: Vec::new(),
            annotations: Vec::new(),
            accessors: None,
            observable: None,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&JavaField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&JavaMethod> {
        self.methods.iter().find(|method| method.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observable: Option<PropagatedAnnotations>,
    /// Per-field override of the accessor access level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<AccessLevel>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl JavaField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            modifiers: vec![Modifier::Private],
            annotations: Vec::new(),
            initializer: None,
            observable: None,
            access: None,
            provenance: Provenance::UserWritten,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotations.push(annotation.into());
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaParam {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub annotations: Vec<String>,
    #[serde(default)]
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JavaMethod {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub annotations: Vec<String>,
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<JavaParam>,
    #[serde(default)]
    pub body: Vec<JavaStmt>,
    #[serde(default)]
    pub provenance: Provenance,
}

impl JavaMethod {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: vec![Modifier::Public],
            annotations: Vec::new(),
            return_type: return_type.into(),
            params: Vec::new(),
            body: Vec::new(),
            provenance: Provenance::UserWritten,
        }
    }

    pub fn with_param(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.params.push(JavaParam {
            name: name.into(),
            ty: ty.into(),
            annotations: Vec::new(),
            is_final: false,
        });
        self
    }

    pub fn with_body(mut self, body: Vec<JavaStmt>) -> Self {
        self.body = body;
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JavaStmt {
    If { condition: JavaExpr, then: Vec<JavaStmt> },
    Expr(JavaExpr),
    Return(Option<JavaExpr>),
    Throw(JavaExpr),
    /// Verbatim statement text, as loaded from a hand-written model.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JavaExpr {
    Name(String),
    This,
    Null,
    /// Literal exactly as it appears in source, quotes included.
    Literal(String),
    Field {
        target: Box<JavaExpr>,
        name: String,
    },
    Assign {
        target: Box<JavaExpr>,
        value: Box<JavaExpr>,
    },
    Call {
        target: Option<Box<JavaExpr>>,
        method: String,
        args: Vec<JavaExpr>,
    },
    New {
        ty: String,
        args: Vec<JavaExpr>,
    },
    Binary {
        op: String,
        left: Box<JavaExpr>,
        right: Box<JavaExpr>,
    },
}

impl JavaExpr {
    pub fn field(target: JavaExpr, name: impl Into<String>) -> Self {
        JavaExpr::Field {
            target: Box::new(target),
            name: name.into(),
        }
    }

    pub fn binary(op: &str, left: JavaExpr, right: JavaExpr) -> Self {
        JavaExpr::Binary {
            op: op.to_string(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}
