//! Host-neutral description of what gets injected.
//!
//! Planning is a pure function from a field (plus the class context the
//! conflict resolver already consulted) to a list of [`SynthesizedMember`]
//! values. Each backend translates these values into its own tree; neither
//! backend re-derives any of the decisions taken here.

mod notify;
mod setter;

use serde::Serialize;

use crate::types::{AccessLevel, FieldDescriptor};

pub use notify::{bean_notification, field_notification};
pub use setter::{PlanContext, plan_bean_registry, plan_descriptor_accessor, plan_field_registry, plan_getter, plan_setter};

/// Who owns a field access: the instance or the class itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Receiver {
    Instance,
    Static { class: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Expr {
    /// The value just written by the setter (the parameter, or the field after the move).
    NewValue { param: String, field: String },
    /// The owning instance.
    SelfRef,
    FieldRead { receiver: Receiver, field: String },
    /// `Owner.member` on a generated companion type.
    StaticRef { owner: String, member: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Stmt {
    /// Reject a null argument before anything is written.
    NullCheck { param: String },
    Assign { receiver: Receiver, field: String, param: String },
    /// `if (registry != null) registry.method(args)`.
    FireIfPresent {
        receiver: Receiver,
        registry: String,
        method: String,
        args: Vec<Expr>,
    },
    ReturnSelf,
    Return(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SetterPlan {
    pub field: FieldDescriptor,
    pub name: String,
    pub access: AccessLevel,
    pub is_static: bool,
    pub returns_self: bool,
    pub fires_field_listener: bool,
    pub fires_bean_listener: bool,
    pub deprecated: bool,
    pub method_annotations: Vec<String>,
    /// Propagated parameter annotations followed by the field's nullability annotations.
    pub param_annotations: Vec<String>,
    pub body: Vec<Stmt>,
}

/// Getters carry no propagated annotations; those belong to the setter only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetterPlan {
    pub field: FieldDescriptor,
    pub name: String,
    pub access: AccessLevel,
    pub is_static: bool,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptorAccessorPlan {
    pub name: String,
    pub return_type: String,
    pub return_expression: Expr,
}

/// One member to inject. Registry fields are declared without initializer;
/// the external registry type allocates itself on first listener registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SynthesizedMember {
    Getter(GetterPlan),
    Setter(SetterPlan),
    FieldListenerRegistry {
        field: FieldDescriptor,
        backing_field_name: String,
        registry_type: String,
    },
    BeanListenerRegistry {
        backing_field_name: String,
        registry_type: String,
    },
    DescriptorAccessor(DescriptorAccessorPlan),
}

/// Discriminant of [`SynthesizedMember`], used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Getter,
    Setter,
    FieldListenerRegistry,
    BeanListenerRegistry,
    DescriptorAccessor,
}

impl SynthesizedMember {
    pub fn name(&self) -> &str {
        match self {
            SynthesizedMember::Getter(plan) => &plan.name,
            SynthesizedMember::Setter(plan) => &plan.name,
            SynthesizedMember::FieldListenerRegistry { backing_field_name, .. }
            | SynthesizedMember::BeanListenerRegistry { backing_field_name, .. } => backing_field_name,
            SynthesizedMember::DescriptorAccessor(plan) => &plan.name,
        }
    }

    pub fn kind(&self) -> MemberKind {
        match self {
            SynthesizedMember::Getter(_) => MemberKind::Getter,
            SynthesizedMember::Setter(_) => MemberKind::Setter,
            SynthesizedMember::FieldListenerRegistry { .. } => MemberKind::FieldListenerRegistry,
            SynthesizedMember::BeanListenerRegistry { .. } => MemberKind::BeanListenerRegistry,
            SynthesizedMember::DescriptorAccessor(_) => MemberKind::DescriptorAccessor,
        }
    }

    /// Parameter count for methods, `None` for fields.
    pub fn arity(&self) -> Option<usize> {
        match self {
            SynthesizedMember::Setter(_) => Some(1),
            SynthesizedMember::Getter(_) | SynthesizedMember::DescriptorAccessor(_) => Some(0),
            SynthesizedMember::FieldListenerRegistry { .. } | SynthesizedMember::BeanListenerRegistry { .. } => None,
        }
    }

    pub fn is_field(&self) -> bool {
        self.arity().is_none()
    }
}
