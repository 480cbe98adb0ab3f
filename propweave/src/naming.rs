//! Field descriptor extraction and deterministic name derivation.
//!
//! Every function here is a pure function of its inputs. Synthetic member names
//! (listener fields, companion references) are derived, never registered, so a
//! second synthesis pass computes exactly the names the first pass injected.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::DescriptorNaming;
use crate::types::{AccessLevel, AccessorStyle, FieldDescriptor, FieldFacts, NamingStyle, Nullability};

static NON_NULL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:nonnull)$").expect("non-null pattern is valid"));
static NULLABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:nullable|checkfornull)$").expect("nullable pattern is valid"));

/// Names computed for one field under one accessor style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorNames {
    pub setter: String,
    /// Every setter name that would collide with this property, canonical name included.
    pub setter_aliases: Vec<String>,
    pub getter: String,
    pub getter_aliases: Vec<String>,
    pub returns_self: bool,
}

/// Derive the descriptor for a field. `default_access` applies unless the field overrides it.
pub fn describe_field(facts: &FieldFacts, default_access: AccessLevel) -> FieldDescriptor {
    let (nullability, nullability_annotations) = nullability_of(&facts.annotations);
    FieldDescriptor {
        name: facts.name.clone(),
        declared_type: facts.ty.clone(),
        is_static: facts.is_static,
        is_final: facts.is_final,
        is_boolean: facts.ty.is_boolean(),
        nullability,
        access_level: facts.access.unwrap_or(default_access),
        deprecated: facts.deprecated,
        nullability_annotations,
    }
}

/// Classify annotations by simple name. Non-null wins when both kinds are present.
pub fn nullability_of(annotations: &[String]) -> (Nullability, Vec<String>) {
    let mut non_null = false;
    let mut nullable = false;
    let mut matched = Vec::new();

    for annotation in annotations {
        let simple = simple_name(annotation);
        if NON_NULL_PATTERN.is_match(simple) {
            non_null = true;
            matched.push(annotation.clone());
        } else if NULLABLE_PATTERN.is_match(simple) {
            nullable = true;
            matched.push(annotation.clone());
        }
    }

    let nullability = if non_null {
        Nullability::NonNull
    } else if nullable {
        Nullability::Nullable
    } else {
        Nullability::None
    };
    (nullability, matched)
}

fn simple_name(annotation: &str) -> &str {
    let trimmed = annotation.trim().trim_start_matches('@');
    let without_args = trimmed.split('(').next().unwrap_or(trimmed);
    without_args.rsplit(['.', ':']).next().unwrap_or(without_args)
}

/// Compute accessor names, or `None` when the field does not fit the prefix list.
pub fn accessor_names(field: &FieldDescriptor, style: &AccessorStyle, naming: NamingStyle) -> Option<AccessorNames> {
    let stripped = strip_prefix(&field.name, &style.prefixes)?;
    let property = match naming {
        NamingStyle::Java => decapitalize(stripped),
        NamingStyle::Rust => stripped.to_string(),
    };
    let bases = base_names(&property, field.is_boolean, naming);
    let canonical = bases.last().cloned().unwrap_or_else(|| property.clone());
    // Rust has no overloading, so a fluent setter would shadow the getter.
    let fluent = style.fluent && naming == NamingStyle::Java;

    let setter = setter_name(&canonical, fluent, naming);
    let setter_aliases = bases.iter().map(|base| setter_name(base, fluent, naming)).collect();
    let getter = getter_name(&canonical, field.is_boolean, fluent, naming);
    let mut getter_aliases = Vec::new();
    for base in &bases {
        for alias in getter_candidates(base, field.is_boolean, fluent, naming) {
            if !getter_aliases.contains(&alias) {
                getter_aliases.push(alias);
            }
        }
    }

    Some(AccessorNames {
        setter,
        setter_aliases,
        getter,
        getter_aliases,
        returns_self: style.returns_self() && !field.is_static,
    })
}

/// Strip the first matching prefix. An empty list accepts every name unchanged.
pub fn strip_prefix<'a>(name: &'a str, prefixes: &[String]) -> Option<&'a str> {
    if prefixes.is_empty() {
        return Some(name);
    }

    for prefix in prefixes {
        if prefix.is_empty() {
            return Some(name);
        }
        if name.len() <= prefix.len() || !name.starts_with(prefix.as_str()) {
            continue;
        }
        let rest = &name[prefix.len()..];
        let prefix_is_word = prefix.chars().last().is_some_and(|c| c.is_alphanumeric());
        let next_is_lower = rest.chars().next().is_some_and(|c| c.is_lowercase());
        if prefix_is_word && next_is_lower {
            continue;
        }
        return Some(rest);
    }
    None
}

/// Base property names; the last entry is the canonical one.
fn base_names(property: &str, is_boolean: bool, naming: NamingStyle) -> Vec<String> {
    let mut bases = vec![property.to_string()];
    if !is_boolean {
        return bases;
    }

    let stripped = match naming {
        NamingStyle::Java => property
            .strip_prefix("is")
            .filter(|rest| rest.chars().next().is_some_and(|c| c.is_uppercase()))
            .map(decapitalize),
        NamingStyle::Rust => property
            .strip_prefix("is_")
            .filter(|rest| !rest.is_empty())
            .map(str::to_string),
    };
    if let Some(stripped) = stripped {
        bases.push(stripped);
    }
    bases
}

fn setter_name(base: &str, fluent: bool, naming: NamingStyle) -> String {
    match naming {
        NamingStyle::Java if fluent => base.to_string(),
        NamingStyle::Java => format!("set{}", capitalize(base)),
        NamingStyle::Rust => format!("set_{base}"),
    }
}

fn getter_name(base: &str, is_boolean: bool, fluent: bool, naming: NamingStyle) -> String {
    match naming {
        NamingStyle::Java if fluent => base.to_string(),
        NamingStyle::Java if is_boolean => format!("is{}", capitalize(base)),
        NamingStyle::Java => format!("get{}", capitalize(base)),
        NamingStyle::Rust if is_boolean => format!("is_{base}"),
        NamingStyle::Rust => base.to_string(),
    }
}

fn getter_candidates(base: &str, is_boolean: bool, fluent: bool, naming: NamingStyle) -> Vec<String> {
    if fluent {
        return vec![base.to_string()];
    }
    match naming {
        NamingStyle::Java if is_boolean => vec![format!("is{}", capitalize(base)), format!("get{}", capitalize(base))],
        NamingStyle::Java => vec![format!("get{}", capitalize(base))],
        NamingStyle::Rust if is_boolean => vec![format!("is_{base}"), base.to_string()],
        NamingStyle::Rust => vec![base.to_string(), format!("get_{base}")],
    }
}

/// Backing field of the per-property listener registry.
pub fn field_listeners_name(field: &str, naming: NamingStyle) -> String {
    match naming {
        NamingStyle::Java => format!("$${field}$listeners"),
        NamingStyle::Rust => format!("__{field}_listeners"),
    }
}

/// Backing field of the class-wide listener registry.
pub fn bean_listeners_name(naming: NamingStyle) -> &'static str {
    match naming {
        NamingStyle::Java => "$$listeners",
        NamingStyle::Rust => "__listeners",
    }
}

/// Synthetic members are never themselves turned into properties.
pub fn is_synthetic(name: &str, naming: NamingStyle) -> bool {
    match naming {
        NamingStyle::Java => name.starts_with("$$"),
        NamingStyle::Rust => name.starts_with("__"),
    }
}

pub fn descriptor_accessor_name(naming: NamingStyle) -> &'static str {
    match naming {
        NamingStyle::Java => "getModelObjectDescriptor",
        NamingStyle::Rust => "model_object_descriptor",
    }
}

/// Generated metadata type holding the descriptors of `class`.
pub fn companion_type(class: &str, naming: &DescriptorNaming) -> String {
    format!("{class}{}", naming.companion_suffix)
}

/// Static member of the companion type describing `field`.
pub fn property_member(field: &str, descriptor: &DescriptorNaming, naming: NamingStyle) -> String {
    match naming {
        NamingStyle::Java => format!("{}{field}", descriptor.property_prefix),
        NamingStyle::Rust => field.trim_start_matches('_').to_uppercase(),
    }
}

/// Static member of the companion type holding the class descriptor.
pub fn descriptor_member(descriptor: &DescriptorNaming, naming: NamingStyle) -> String {
    match naming {
        NamingStyle::Java => descriptor.descriptor_field.clone(),
        NamingStyle::Rust => descriptor.descriptor_field.trim_start_matches('_').to_uppercase(),
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn decapitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeRef;

    fn field(name: &str, ty: TypeRef) -> FieldDescriptor {
        describe_field(&FieldFacts::new(name, ty), AccessLevel::Public)
    }

    fn java(field: &FieldDescriptor, style: &AccessorStyle) -> Option<AccessorNames> {
        accessor_names(field, style, NamingStyle::Java)
    }

    #[test]
    fn java_boolean_field_uses_is_getter() {
        let names = java(&field("active", TypeRef::primitive("boolean")), &AccessorStyle::default()).unwrap();
        assert_eq!(names.getter, "isActive");
        assert_eq!(names.setter, "setActive");
        assert_eq!(names.setter_aliases, vec!["setActive"]);
        assert_eq!(names.getter_aliases, vec!["isActive", "getActive"]);
    }

    #[test]
    fn java_is_prefixed_boolean_strips_is_for_canonical_names() {
        let names = java(&field("isActive", TypeRef::primitive("boolean")), &AccessorStyle::default()).unwrap();
        assert_eq!(names.setter, "setActive");
        assert_eq!(names.getter, "isActive");
        assert_eq!(names.setter_aliases, vec!["setIsActive", "setActive"]);
    }

    #[test]
    fn boxed_boolean_is_not_boolean() {
        let names = java(&field("active", TypeRef::new("Boolean")), &AccessorStyle::default()).unwrap();
        assert_eq!(names.getter, "getActive");
    }

    #[test]
    fn rust_boolean_field_names() {
        let names = accessor_names(
            &field("active", TypeRef::primitive("bool")),
            &AccessorStyle::default(),
            NamingStyle::Rust,
        )
        .unwrap();
        assert_eq!(names.getter, "is_active");
        assert_eq!(names.setter, "set_active");

        let names = accessor_names(
            &field("is_active", TypeRef::primitive("bool")),
            &AccessorStyle::default(),
            NamingStyle::Rust,
        )
        .unwrap();
        assert_eq!(names.setter, "set_active");
        assert_eq!(names.setter_aliases, vec!["set_is_active", "set_active"]);
    }

    #[test]
    fn prefixes_are_stripped_or_reject_the_field() {
        let style = AccessorStyle {
            prefixes: vec!["f".to_string(), "m_".to_string()],
            ..AccessorStyle::default()
        };
        let names = java(&field("fName", TypeRef::new("String")), &style).unwrap();
        assert_eq!(names.setter, "setName");

        let names = java(&field("m_count", TypeRef::primitive("int")), &style).unwrap();
        assert_eq!(names.getter, "getCount");

        // `f` followed by a lower-case letter is part of the word, not a prefix.
        assert!(java(&field("foo", TypeRef::new("String")), &style).is_none());
        assert!(java(&field("name", TypeRef::new("String")), &style).is_none());
    }

    #[test]
    fn fluent_java_names_and_static_fields_never_chain() {
        let style = AccessorStyle {
            fluent: true,
            ..AccessorStyle::default()
        };
        let names = java(&field("count", TypeRef::primitive("int")), &style).unwrap();
        assert_eq!(names.setter, "count");
        assert_eq!(names.getter, "count");
        assert!(names.returns_self);

        let mut statik = field("count", TypeRef::primitive("int"));
        statik.is_static = true;
        assert!(!java(&statik, &style).unwrap().returns_self);
    }

    #[test]
    fn fluent_rust_keeps_prefixed_setter() {
        let style = AccessorStyle {
            fluent: true,
            ..AccessorStyle::default()
        };
        let names =
            accessor_names(&field("count", TypeRef::primitive("u32")), &style, NamingStyle::Rust).unwrap();
        assert_eq!(names.setter, "set_count");
        assert_eq!(names.getter, "count");
        assert!(names.returns_self);
    }

    #[test]
    fn nullability_patterns_match_simple_names() {
        let annotations = vec!["javax.annotation.Nullable".to_string(), "@lombok.NonNull".to_string()];
        let (nullability, matched) = nullability_of(&annotations);
        assert_eq!(nullability, Nullability::NonNull);
        assert_eq!(matched.len(), 2);

        let (nullability, _) = nullability_of(&["CheckForNull".to_string()]);
        assert_eq!(nullability, Nullability::Nullable);

        let (nullability, matched) = nullability_of(&["Deprecated".to_string()]);
        assert_eq!(nullability, Nullability::None);
        assert!(matched.is_empty());
    }

    #[test]
    fn synthetic_names_are_deterministic() {
        assert_eq!(field_listeners_name("name", NamingStyle::Java), "$$name$listeners");
        assert_eq!(field_listeners_name("name", NamingStyle::Rust), "__name_listeners");
        assert!(is_synthetic(bean_listeners_name(NamingStyle::Java), NamingStyle::Java));
        assert!(is_synthetic(&field_listeners_name("x", NamingStyle::Rust), NamingStyle::Rust));
        assert!(!is_synthetic("name", NamingStyle::Rust));
    }

    #[test]
    fn companion_references_follow_the_naming_strategy() {
        let naming = DescriptorNaming::default();
        assert_eq!(companion_type("Person", &naming), "Person_");
        assert_eq!(property_member("name", &naming, NamingStyle::Java), "_name");
        assert_eq!(property_member("name", &naming, NamingStyle::Rust), "NAME");
        assert_eq!(descriptor_member(&naming, NamingStyle::Java), "descriptor");

        let later = DescriptorNaming {
            descriptor_field: "_descriptor".to_string(),
            ..DescriptorNaming::default()
        };
        assert_eq!(descriptor_member(&later, NamingStyle::Java), "_descriptor");
        assert_eq!(descriptor_member(&later, NamingStyle::Rust), "DESCRIPTOR");
    }
}
