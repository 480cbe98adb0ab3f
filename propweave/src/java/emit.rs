//! Translation of planned members into Java declarations.

use super::ast::{JavaExpr, JavaField, JavaMethod, JavaParam, JavaStmt, Modifier};
use crate::plan::{Expr, Receiver, Stmt, SynthesizedMember};
use crate::types::{AccessLevel, Provenance};

pub enum JavaMember {
    Field(JavaField),
    Method(JavaMethod),
}

pub fn member(class_name: &str, member: &SynthesizedMember) -> JavaMember {
    match member {
        SynthesizedMember::Setter(plan) => {
            let mut annotations = Vec::new();
            if plan.deprecated {
                annotations.push("Deprecated".to_string());
            }
            annotations.extend(plan.method_annotations.iter().cloned());

            JavaMember::Method(JavaMethod {
                name: plan.name.clone(),
                modifiers: modifiers(plan.access, plan.is_static),
                annotations,
                return_type: if plan.returns_self {
                    class_name.to_string()
                } else {
                    "void".to_string()
                },
                params: vec![JavaParam {
                    name: plan.field.name.clone(),
                    ty: plan.field.declared_type.name.clone(),
                    annotations: plan.param_annotations.clone(),
                    is_final: true,
                }],
                body: plan.body.iter().map(stmt).collect(),
                provenance: Provenance::FrameworkGenerated,
            })
        }
        SynthesizedMember::Getter(plan) => JavaMember::Method(JavaMethod {
            name: plan.name.clone(),
            modifiers: modifiers(plan.access, plan.is_static),
            annotations: Vec::new(),
            return_type: plan.field.declared_type.name.clone(),
            params: Vec::new(),
            body: plan.body.iter().map(stmt).collect(),
            provenance: Provenance::FrameworkGenerated,
        }),
        SynthesizedMember::FieldListenerRegistry {
            field,
            backing_field_name,
            registry_type,
        } => JavaMember::Field(registry_field(backing_field_name, registry_type, field.is_static)),
        SynthesizedMember::BeanListenerRegistry {
            backing_field_name,
            registry_type,
        } => JavaMember::Field(registry_field(backing_field_name, registry_type, false)),
        SynthesizedMember::DescriptorAccessor(plan) => JavaMember::Method(JavaMethod {
            name: plan.name.clone(),
            modifiers: vec![Modifier::Public],
            annotations: Vec::new(),
            return_type: plan.return_type.clone(),
            params: Vec::new(),
            body: vec![JavaStmt::Return(Some(expr(&plan.return_expression)))],
            provenance: Provenance::FrameworkGenerated,
        }),
    }
}

fn modifiers(access: AccessLevel, is_static: bool) -> Vec<Modifier> {
    let mut modifiers: Vec<Modifier> = Modifier::for_access(access).into_iter().collect();
    if is_static {
        modifiers.push(Modifier::Static);
    }
    modifiers
}

/// Registry fields start out null; the runtime allocates on first registration.
fn registry_field(name: &str, ty: &str, is_static: bool) -> JavaField {
    let mut modifiers = vec![Modifier::Public];
    if is_static {
        modifiers.push(Modifier::Static);
    }
    JavaField {
        name: name.to_string(),
        ty: ty.to_string(),
        modifiers,
        annotations: Vec::new(),
        initializer: None,
        observable: None,
        access: None,
        provenance: Provenance::FrameworkGenerated,
    }
}

fn receiver(receiver: &Receiver) -> JavaExpr {
    match receiver {
        Receiver::Instance => JavaExpr::This,
        Receiver::Static { class } => JavaExpr::Name(class.clone()),
    }
}

fn stmt(stmt: &Stmt) -> JavaStmt {
    match stmt {
        Stmt::NullCheck { param } => JavaStmt::If {
            condition: JavaExpr::binary("==", JavaExpr::Name(param.clone()), JavaExpr::Null),
            then: vec![JavaStmt::Throw(JavaExpr::New {
                ty: "java.lang.NullPointerException".to_string(),
                args: vec![JavaExpr::Literal(format!("\"{param}\""))],
            })],
        },
        Stmt::Assign {
            receiver: owner,
            field,
            param,
        } => JavaStmt::Expr(JavaExpr::Assign {
            target: Box::new(JavaExpr::field(receiver(owner), field)),
            value: Box::new(JavaExpr::Name(param.clone())),
        }),
        Stmt::FireIfPresent {
            receiver: owner,
            registry,
            method,
            args,
        } => {
            let registry = JavaExpr::field(receiver(owner), registry);
            JavaStmt::If {
                condition: JavaExpr::binary("!=", registry.clone(), JavaExpr::Null),
                then: vec![JavaStmt::Expr(JavaExpr::Call {
                    target: Some(Box::new(registry)),
                    method: method.clone(),
                    args: args.iter().map(expr).collect(),
                })],
            }
        }
        Stmt::ReturnSelf => JavaStmt::Return(Some(JavaExpr::This)),
        Stmt::Return(value) => JavaStmt::Return(Some(expr(value))),
    }
}

fn expr(expr: &Expr) -> JavaExpr {
    match expr {
        Expr::NewValue { param, .. } => JavaExpr::Name(param.clone()),
        Expr::SelfRef => JavaExpr::This,
        Expr::FieldRead { receiver: owner, field } => JavaExpr::field(receiver(owner), field),
        Expr::StaticRef { owner, member } => JavaExpr::field(JavaExpr::Name(owner.clone()), member),
    }
}
