use super::ast::{JavaClass, JavaUnit, Modifier, is_primitive};
use super::emit::{self, JavaMember};
use crate::diagnostics::Diagnostic;
use crate::errors::HostError;
use crate::host::HostAst;
use crate::plan::SynthesizedMember;
use crate::types::{
    AccessorStyle, FieldFacts, MemberExists, NamingStyle, NodeKind, PropagatedAnnotations, Provenance, TypeRef,
};

/// Index-based handle into a [`JavaUnit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaNode {
    Class(usize),
    Field(usize, usize),
    Method(usize, usize),
}

impl JavaUnit {
    fn class_at(&self, node: &JavaNode) -> Option<&JavaClass> {
        let index = match *node {
            JavaNode::Class(class) | JavaNode::Field(class, _) | JavaNode::Method(class, _) => class,
        };
        self.classes.get(index)
    }

    fn class_mut(&mut self, node: &JavaNode) -> Result<&mut JavaClass, HostError> {
        match *node {
            JavaNode::Class(index) => self.classes.get_mut(index).ok_or_else(|| HostError::unknown(node)),
            _ => Err(HostError::unknown(node)),
        }
    }
}

fn simple_name(annotation: &str) -> &str {
    let trimmed = annotation.trim_start_matches('@');
    let base = trimmed.split('(').next().unwrap_or(trimmed);
    base.rsplit('.').next().unwrap_or(base)
}

impl HostAst for JavaUnit {
    type Node = JavaNode;

    fn naming_style(&self) -> NamingStyle {
        NamingStyle::Java
    }

    fn kind(&self, node: &JavaNode) -> NodeKind {
        let Some(class) = self.class_at(node) else {
            return NodeKind::Other;
        };
        match *node {
            JavaNode::Class(_) => NodeKind::Class(class.kind),
            JavaNode::Field(_, field) if field < class.fields.len() => NodeKind::Field,
            JavaNode::Method(_, method) if method < class.methods.len() => NodeKind::Method,
            _ => NodeKind::Other,
        }
    }

    fn parent(&self, node: &JavaNode) -> Option<JavaNode> {
        match *node {
            JavaNode::Class(_) => None,
            JavaNode::Field(class, _) | JavaNode::Method(class, _) => Some(JavaNode::Class(class)),
        }
    }

    fn children(&self, node: &JavaNode) -> Vec<JavaNode> {
        let JavaNode::Class(index) = *node else {
            return Vec::new();
        };
        let Some(class) = self.classes.get(index) else {
            return Vec::new();
        };
        (0..class.fields.len())
            .map(|field| JavaNode::Field(index, field))
            .chain((0..class.methods.len()).map(|method| JavaNode::Method(index, method)))
            .collect()
    }

    fn describe(&self, node: &JavaNode) -> String {
        let Some(class) = self.class_at(node) else {
            return format!("{node:?}");
        };
        match *node {
            JavaNode::Class(_) => class.name.clone(),
            JavaNode::Field(_, field) => match class.fields.get(field) {
                Some(field) => format!("{}.{}", class.name, field.name),
                None => class.name.clone(),
            },
            JavaNode::Method(_, method) => match class.methods.get(method) {
                Some(method) => format!("{}.{}()", class.name, method.name),
                None => class.name.clone(),
            },
        }
    }

    fn field_facts(&self, node: &JavaNode) -> Option<FieldFacts> {
        let JavaNode::Field(_, index) = *node else {
            return None;
        };
        let field = self.class_at(node)?.fields.get(index)?;
        let ty = if is_primitive(&field.ty) {
            TypeRef::primitive(field.ty.clone())
        } else {
            TypeRef::new(field.ty.clone())
        };
        Some(FieldFacts {
            name: field.name.clone(),
            ty,
            is_static: field.has_modifier(Modifier::Static),
            is_final: field.has_modifier(Modifier::Final),
            annotations: field.annotations.clone(),
            deprecated: field
                .annotations
                .iter()
                .any(|annotation| simple_name(annotation) == "Deprecated"),
            access: field.access,
        })
    }

    fn class_name(&self, class: &JavaNode) -> String {
        self.class_at(class).map(|class| class.name.clone()).unwrap_or_default()
    }

    fn accessor_style(&self, class: &JavaNode) -> Option<AccessorStyle> {
        self.class_at(class)?.accessors.clone()
    }

    fn implemented_contracts(&self, class: &JavaNode) -> Vec<String> {
        self.class_at(class)
            .map(|class| class.implements.clone())
            .unwrap_or_default()
    }

    fn method_exists(&self, class: &JavaNode, name: &str, arity: usize, case_sensitive: bool) -> MemberExists {
        let provenance = self.class_at(class).and_then(|class| {
            class
                .methods
                .iter()
                .filter(|method| method.arity() == arity)
                .find(|method| {
                    if case_sensitive {
                        method.name == name
                    } else {
                        method.name.eq_ignore_ascii_case(name)
                    }
                })
                .map(|method| method.provenance)
        });
        MemberExists::from_provenance(provenance)
    }

    fn field_exists(&self, class: &JavaNode, name: &str) -> MemberExists {
        let provenance = self
            .class_at(class)
            .and_then(|class| class.field(name))
            .map(|field| field.provenance);
        MemberExists::from_provenance(provenance)
    }

    fn inject_method(&mut self, class: &JavaNode, member: &SynthesizedMember) -> Result<bool, HostError> {
        let target = self.class_mut(class)?;
        let JavaMember::Method(method) = emit::member(&target.name, member) else {
            return Err(HostError::Rejected {
                class: target.name.clone(),
                member: member.name().to_string(),
                reason: "not a method".to_string(),
            });
        };
        let duplicate = target.methods.iter().any(|existing| {
            existing.provenance == Provenance::FrameworkGenerated
                && existing.name == method.name
                && existing.arity() == method.arity()
        });
        if duplicate {
            return Ok(false);
        }
        target.methods.push(method);
        Ok(true)
    }

    fn inject_field(&mut self, class: &JavaNode, member: &SynthesizedMember) -> Result<bool, HostError> {
        let target = self.class_mut(class)?;
        let JavaMember::Field(field) = emit::member(&target.name, member) else {
            return Err(HostError::Rejected {
                class: target.name.clone(),
                member: member.name().to_string(),
                reason: "not a field".to_string(),
            });
        };
        if let Some(existing) = target.field(&field.name) {
            if existing.provenance == Provenance::FrameworkGenerated {
                return Ok(false);
            }
            return Err(HostError::Rejected {
                class: target.name.clone(),
                member: field.name,
                reason: "a user-written field with that name exists".to_string(),
            });
        }
        target.fields.push(field);
        Ok(true)
    }

    fn report(&mut self, _node: &JavaNode, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }

    fn annotated_targets(&self) -> Vec<(JavaNode, PropagatedAnnotations)> {
        let mut targets = Vec::new();
        for (class_index, class) in self.classes.iter().enumerate() {
            for (field_index, field) in class.fields.iter().enumerate() {
                if let Some(propagated) = &field.observable {
                    targets.push((JavaNode::Field(class_index, field_index), propagated.clone()));
                }
            }
        }
        for (class_index, class) in self.classes.iter().enumerate() {
            if let Some(propagated) = &class.observable {
                targets.push((JavaNode::Class(class_index), propagated.clone()));
            }
        }
        targets
    }
}
