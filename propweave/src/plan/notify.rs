use super::{Expr, PlanContext, Receiver, Stmt};
use crate::naming;
use crate::types::FieldDescriptor;

/// Guarded fire of the field's own registry, passing the new value.
///
/// The registry is allocated lazily by the runtime, so the guard is what keeps
/// an unobserved property from dereferencing an unset registry.
pub fn field_notification(ctx: &PlanContext<'_>, field: &FieldDescriptor, receiver: &Receiver) -> Stmt {
    Stmt::FireIfPresent {
        receiver: receiver.clone(),
        registry: naming::field_listeners_name(&field.name, ctx.naming),
        method: ctx.runtime.fire_method.clone(),
        args: vec![new_value(field)],
    }
}

/// Guarded fire of the class-wide registry with `(instance, property descriptor, new value)`.
pub fn bean_notification(ctx: &PlanContext<'_>, field: &FieldDescriptor) -> Stmt {
    Stmt::FireIfPresent {
        receiver: Receiver::Instance,
        registry: naming::bean_listeners_name(ctx.naming).to_string(),
        method: ctx.runtime.fire_method.clone(),
        args: vec![
            Expr::SelfRef,
            Expr::StaticRef {
                owner: naming::companion_type(ctx.class_name, ctx.descriptor),
                member: naming::property_member(&field.name, ctx.descriptor, ctx.naming),
            },
            new_value(field),
        ],
    }
}

fn new_value(field: &FieldDescriptor) -> Expr {
    Expr::NewValue {
        param: field.name.clone(),
        field: field.name.clone(),
    }
}
