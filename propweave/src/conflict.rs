//! Decides, per candidate member, whether synthesis may proceed.

use crate::host::HostAst;
use crate::naming::{self, AccessorNames};
use crate::types::{FieldDescriptor, MemberExists};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetterDecision {
    Proceed,
    /// This engine already made the field observable on an earlier pass.
    AlreadySynthesized,
    /// Some method already answers to one of the setter names; writes through it
    /// would bypass notification.
    Conflict { alias: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GetterDecision {
    Proceed,
    AlreadySynthesized,
    UserWritten { alias: String },
}

/// Setter names compare case-insensitively and only against one-argument methods.
///
/// A framework setter counts as ours only when the field's deterministic
/// registry field is present too; any other existing alias is a conflict.
pub fn resolve_setter<H: HostAst>(
    host: &H,
    class: &H::Node,
    field: &FieldDescriptor,
    names: &AccessorNames,
) -> SetterDecision {
    let registry = naming::field_listeners_name(&field.name, host.naming_style());
    if host.method_exists(class, &names.setter, 1, false) == MemberExists::ExistsByFramework
        && host.field_exists(class, &registry) == MemberExists::ExistsByFramework
    {
        return SetterDecision::AlreadySynthesized;
    }

    for alias in &names.setter_aliases {
        if host.method_exists(class, alias, 1, false).exists() {
            return SetterDecision::Conflict { alias: alias.clone() };
        }
    }
    SetterDecision::Proceed
}

pub fn resolve_getter<H: HostAst>(host: &H, class: &H::Node, names: &AccessorNames) -> GetterDecision {
    for alias in &names.getter_aliases {
        match host.method_exists(class, alias, 0, false) {
            MemberExists::ExistsByFramework => return GetterDecision::AlreadySynthesized,
            MemberExists::ExistsByUser => return GetterDecision::UserWritten { alias: alias.clone() },
            MemberExists::NotExists => {}
        }
    }
    GetterDecision::Proceed
}

/// A registry field with the deterministic name, whoever wrote it, means "already there".
pub fn needs_field<H: HostAst>(host: &H, class: &H::Node, name: &str) -> bool {
    host.field_exists(class, name) == MemberExists::NotExists
}

pub fn needs_descriptor_accessor<H: HostAst>(host: &H, class: &H::Node, name: &str) -> bool {
    host.method_exists(class, name, 0, true) == MemberExists::NotExists
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::{JavaClass, JavaField, JavaMethod, JavaNode, JavaUnit};
    use crate::naming::{accessor_names, describe_field};
    use crate::types::{AccessLevel, AccessorStyle, FieldFacts, NamingStyle, Provenance, TypeRef};

    fn person(methods: Vec<JavaMethod>, fields: Vec<JavaField>) -> JavaUnit {
        let mut class = JavaClass::new("Person");
        class.fields.push(JavaField::new("foo", "String"));
        class.fields.extend(fields);
        class.methods = methods;
        JavaUnit::new(vec![class])
    }

    fn foo_names() -> (FieldDescriptor, AccessorNames) {
        let field = describe_field(&FieldFacts::new("foo", TypeRef::new("String")), AccessLevel::Public);
        let names = accessor_names(&field, &AccessorStyle::default(), NamingStyle::Java).unwrap();
        (field, names)
    }

    #[test]
    fn user_setter_is_a_conflict_even_with_different_case() {
        let unit = person(vec![JavaMethod::new("setfoo", "void").with_param("value", "String")], vec![]);
        let (field, names) = foo_names();
        assert_eq!(
            resolve_setter(&unit, &JavaNode::Class(0), &field, &names),
            SetterDecision::Conflict {
                alias: "setFoo".to_string()
            }
        );
    }

    #[test]
    fn setter_with_other_arity_does_not_conflict() {
        let unit = person(vec![JavaMethod::new("setFoo", "void")], vec![]);
        let (field, names) = foo_names();
        assert_eq!(resolve_setter(&unit, &JavaNode::Class(0), &field, &names), SetterDecision::Proceed);
    }

    #[test]
    fn framework_setter_without_registry_is_still_a_conflict() {
        let mut setter = JavaMethod::new("setFoo", "void").with_param("foo", "String");
        setter.provenance = Provenance::FrameworkGenerated;
        let unit = person(vec![setter.clone()], vec![]);
        let (field, names) = foo_names();
        assert!(matches!(
            resolve_setter(&unit, &JavaNode::Class(0), &field, &names),
            SetterDecision::Conflict { .. }
        ));

        let mut registry = JavaField::new("$$foo$listeners", "PropertyListeners");
        registry.provenance = Provenance::FrameworkGenerated;
        let unit = person(vec![setter], vec![registry]);
        assert_eq!(
            resolve_setter(&unit, &JavaNode::Class(0), &field, &names),
            SetterDecision::AlreadySynthesized
        );
    }

    #[test]
    fn user_getter_is_reported_framework_getter_is_silent() {
        let (_, names) = foo_names();
        let unit = person(vec![JavaMethod::new("getFoo", "String")], vec![]);
        assert_eq!(
            resolve_getter(&unit, &JavaNode::Class(0), &names),
            GetterDecision::UserWritten {
                alias: "getFoo".to_string()
            }
        );

        let mut getter = JavaMethod::new("getFoo", "String");
        getter.provenance = Provenance::FrameworkGenerated;
        let unit = person(vec![getter], vec![]);
        assert_eq!(
            resolve_getter(&unit, &JavaNode::Class(0), &names),
            GetterDecision::AlreadySynthesized
        );
    }
}
