use super::{
    DescriptorAccessorPlan, Expr, GetterPlan, Receiver, SetterPlan, Stmt, SynthesizedMember, bean_notification,
    field_notification,
};
use crate::config::{DescriptorNaming, RuntimeTypes};
use crate::naming::{self, AccessorNames};
use crate::types::{FieldDescriptor, NamingStyle, Nullability, PropagatedAnnotations};

/// Inputs shared by every plan built for one class.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext<'a> {
    pub class_name: &'a str,
    pub naming: NamingStyle,
    pub runtime: &'a RuntimeTypes,
    pub descriptor: &'a DescriptorNaming,
    pub propagated: &'a PropagatedAnnotations,
}

fn receiver_for(ctx: &PlanContext<'_>, field: &FieldDescriptor) -> Receiver {
    if field.is_static {
        Receiver::Static {
            class: ctx.class_name.to_string(),
        }
    } else {
        Receiver::Instance
    }
}

/// Build the setter. The body order is fixed: null check, assignment,
/// field-registry fire, class-registry fire, `return this`.
pub fn plan_setter(ctx: &PlanContext<'_>, field: &FieldDescriptor, names: &AccessorNames) -> SetterPlan {
    let receiver = receiver_for(ctx, field);
    // A static property has no owning instance to hand to class-wide listeners.
    let fires_bean_listener = !field.is_static;
    let mut body = Vec::with_capacity(5);

    if field.nullability == Nullability::NonNull && !field.declared_type.primitive {
        body.push(Stmt::NullCheck {
            param: field.name.clone(),
        });
    }
    body.push(Stmt::Assign {
        receiver: receiver.clone(),
        field: field.name.clone(),
        param: field.name.clone(),
    });
    body.push(field_notification(ctx, field, &receiver));
    if fires_bean_listener {
        body.push(bean_notification(ctx, field));
    }
    if names.returns_self {
        body.push(Stmt::ReturnSelf);
    }

    let mut param_annotations = ctx.propagated.on_param.clone();
    param_annotations.extend(field.nullability_annotations.iter().cloned());

    SetterPlan {
        field: field.clone(),
        name: names.setter.clone(),
        access: field.access_level,
        is_static: field.is_static,
        returns_self: names.returns_self,
        fires_field_listener: true,
        fires_bean_listener,
        deprecated: field.deprecated,
        method_annotations: ctx.propagated.on_method.clone(),
        param_annotations,
        body,
    }
}

pub fn plan_getter(ctx: &PlanContext<'_>, field: &FieldDescriptor, names: &AccessorNames) -> GetterPlan {
    GetterPlan {
        field: field.clone(),
        name: names.getter.clone(),
        access: field.access_level,
        is_static: field.is_static,
        body: vec![Stmt::Return(Expr::FieldRead {
            receiver: receiver_for(ctx, field),
            field: field.name.clone(),
        })],
    }
}

pub fn plan_field_registry(ctx: &PlanContext<'_>, field: &FieldDescriptor) -> SynthesizedMember {
    SynthesizedMember::FieldListenerRegistry {
        field: field.clone(),
        backing_field_name: naming::field_listeners_name(&field.name, ctx.naming),
        registry_type: ctx.runtime.property_listeners.clone(),
    }
}

pub fn plan_bean_registry(ctx: &PlanContext<'_>) -> SynthesizedMember {
    SynthesizedMember::BeanListenerRegistry {
        backing_field_name: naming::bean_listeners_name(ctx.naming).to_string(),
        registry_type: ctx.runtime.bean_listeners.clone(),
    }
}

pub fn plan_descriptor_accessor(ctx: &PlanContext<'_>) -> SynthesizedMember {
    SynthesizedMember::DescriptorAccessor(DescriptorAccessorPlan {
        name: naming::descriptor_accessor_name(ctx.naming).to_string(),
        return_type: ctx.runtime.descriptor_type.clone(),
        return_expression: Expr::StaticRef {
            owner: naming::companion_type(ctx.class_name, ctx.descriptor),
            member: naming::descriptor_member(ctx.descriptor, ctx.naming),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::{accessor_names, describe_field};
    use crate::types::{AccessLevel, AccessorStyle, FieldFacts, TypeRef};

    struct Fixture {
        runtime: RuntimeTypes,
        descriptor: DescriptorNaming,
        propagated: PropagatedAnnotations,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                runtime: RuntimeTypes::java(),
                descriptor: DescriptorNaming::default(),
                propagated: PropagatedAnnotations::default(),
            }
        }

        fn ctx(&self) -> PlanContext<'_> {
            PlanContext {
                class_name: "Person",
                naming: NamingStyle::Java,
                runtime: &self.runtime,
                descriptor: &self.descriptor,
                propagated: &self.propagated,
            }
        }
    }

    fn descriptor(facts: FieldFacts) -> FieldDescriptor {
        describe_field(&facts, AccessLevel::Public)
    }

    #[test]
    fn setter_body_follows_fixed_order() {
        let fixture = Fixture::new();
        let mut facts = FieldFacts::new("name", TypeRef::new("String"));
        facts.annotations.push("NonNull".to_string());
        let field = descriptor(facts);
        let style = AccessorStyle {
            chain: true,
            ..AccessorStyle::default()
        };
        let names = accessor_names(&field, &style, NamingStyle::Java).unwrap();

        let plan = plan_setter(&fixture.ctx(), &field, &names);

        assert_eq!(plan.name, "setName");
        assert!(plan.returns_self);
        assert_eq!(plan.param_annotations, vec!["NonNull".to_string()]);
        assert!(matches!(plan.body[0], Stmt::NullCheck { .. }));
        assert!(matches!(plan.body[1], Stmt::Assign { .. }));
        match &plan.body[2] {
            Stmt::FireIfPresent { registry, args, .. } => {
                assert_eq!(registry, "$$name$listeners");
                assert_eq!(args.len(), 1);
            }
            other => panic!("unexpected statement {other:?}"),
        }
        match &plan.body[3] {
            Stmt::FireIfPresent { registry, args, .. } => {
                assert_eq!(registry, "$$listeners");
                assert_eq!(args[0], Expr::SelfRef);
                assert_eq!(
                    args[1],
                    Expr::StaticRef {
                        owner: "Person_".to_string(),
                        member: "_name".to_string()
                    }
                );
            }
            other => panic!("unexpected statement {other:?}"),
        }
        assert_eq!(plan.body[4], Stmt::ReturnSelf);
        assert_eq!(plan.body.len(), 5);
    }

    #[test]
    fn primitive_non_null_field_gets_no_null_check() {
        let fixture = Fixture::new();
        let mut facts = FieldFacts::new("count", TypeRef::primitive("int"));
        facts.annotations.push("NonNull".to_string());
        let field = descriptor(facts);
        let names = accessor_names(&field, &AccessorStyle::default(), NamingStyle::Java).unwrap();

        let plan = plan_setter(&fixture.ctx(), &field, &names);

        assert!(matches!(plan.body[0], Stmt::Assign { .. }));
        assert!(!plan.returns_self);
        assert!(!plan.body.contains(&Stmt::ReturnSelf));
    }

    #[test]
    fn static_setter_skips_class_registry() {
        let fixture = Fixture::new();
        let mut facts = FieldFacts::new("counter", TypeRef::primitive("long"));
        facts.is_static = true;
        let field = descriptor(facts);
        let names = accessor_names(&field, &AccessorStyle::default(), NamingStyle::Java).unwrap();

        let plan = plan_setter(&fixture.ctx(), &field, &names);

        assert!(!plan.fires_bean_listener);
        assert_eq!(plan.body.len(), 2);
        assert!(matches!(
            &plan.body[0],
            Stmt::Assign {
                receiver: Receiver::Static { .. },
                ..
            }
        ));
    }

    #[test]
    fn descriptor_accessor_returns_companion_descriptor() {
        let fixture = Fixture::new();
        let member = plan_descriptor_accessor(&fixture.ctx());
        let SynthesizedMember::DescriptorAccessor(plan) = member else {
            panic!("expected a descriptor accessor");
        };
        assert_eq!(plan.name, "getModelObjectDescriptor");
        assert_eq!(plan.return_type, "propweave.runtime.ModelObjectDescriptor");
        assert_eq!(
            plan.return_expression,
            Expr::StaticRef {
                owner: "Person_".to_string(),
                member: "descriptor".to_string()
            }
        );
    }
}
