//! End-to-end behavior of the engine against the Java class model.

use propweave::java::{JavaClass, JavaField, JavaMethod, JavaUnit, Modifier, render_unit};
use propweave::{
    AccessorStyle, DiagnosticKind, MemberKind, PropagatedAnnotations, Severity, SynthesisConfig, SynthesisReport,
    Synthesizer,
};

fn observable_class(name: &str, fields: Vec<JavaField>) -> JavaClass {
    let mut class = JavaClass::new(name);
    class.observable = Some(PropagatedAnnotations::default());
    class.fields = fields;
    class
}

fn synthesize(unit: &mut JavaUnit) -> SynthesisReport {
    Synthesizer::default().apply_all(unit).unwrap()
}

fn method_names(class: &JavaClass) -> Vec<&str> {
    class.methods.iter().map(|method| method.name.as_str()).collect()
}

#[test]
fn class_marker_generates_accessors_and_registries() {
    let mut unit = JavaUnit::new(vec![observable_class(
        "Person",
        vec![JavaField::new("name", "String"), JavaField::new("age", "int")],
    )]);

    let report = synthesize(&mut unit);

    assert!(report.diagnostics.is_empty());
    let person = unit.class("Person").unwrap();
    assert_eq!(method_names(person), vec!["setName", "getName", "setAge", "getAge"]);
    assert!(person.field("$$name$listeners").is_some());
    assert!(person.field("$$age$listeners").is_some());
    assert!(person.field("$$listeners").is_some());
    assert_eq!(person.fields.iter().filter(|field| field.name == "$$listeners").count(), 1);
}

#[test]
fn second_pass_changes_nothing() {
    let mut unit = JavaUnit::new(vec![observable_class(
        "Person",
        vec![JavaField::new("name", "String"), JavaField::new("active", "boolean")],
    )]);
    synthesize(&mut unit);
    let after_first = unit.classes.clone();

    let report = synthesize(&mut unit);

    assert!(report.injected.is_empty());
    assert!(report.diagnostics.is_empty());
    assert_eq!(unit.classes, after_first);
}

#[test]
fn final_fields_get_a_getter_and_a_warning() {
    let mut unit = JavaUnit::new(vec![observable_class(
        "Invoice",
        vec![JavaField::new("number", "long").with_modifier(Modifier::Final)],
    )]);

    let report = synthesize(&mut unit);

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::FinalFieldSkip);
    assert_eq!(report.diagnostics[0].severity, Severity::Warning);
    let invoice = unit.class("Invoice").unwrap();
    assert_eq!(method_names(invoice), vec!["getNumber"]);
    assert!(invoice.field("$$number$listeners").is_none());
    assert!(invoice.field("$$listeners").is_none());
}

#[test]
fn boolean_fields_use_is_getters_and_drop_the_is_prefix() {
    let mut unit = JavaUnit::new(vec![observable_class(
        "Task",
        vec![
            JavaField::new("active", "boolean"),
            JavaField::new("isDone", "boolean"),
            JavaField::new("flag", "Boolean"),
        ],
    )]);

    synthesize(&mut unit);

    let task = unit.class("Task").unwrap();
    assert_eq!(
        method_names(task),
        vec!["setActive", "isActive", "setDone", "isDone", "setFlag", "getFlag"]
    );
}

#[test]
fn existing_setter_blocks_generation_and_notification() {
    let mut class = observable_class("Account", vec![JavaField::new("balance", "long")]);
    class.methods.push(JavaMethod::new("setbalance", "void").with_param("value", "long"));
    let mut unit = JavaUnit::new(vec![class]);

    let report = synthesize(&mut unit);

    assert!(report.has_errors());
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::NamingConflict);
    assert!(report.diagnostics[0].message.starts_with("not generating setBalance()"));
    let account = unit.class("Account").unwrap();
    assert_eq!(method_names(account), vec!["setbalance", "getBalance"]);
    assert!(account.field("$$balance$listeners").is_none());
    assert_eq!(unit.diagnostics.len(), 1);
}

#[test]
fn boolean_setter_alias_is_named_in_the_conflict() {
    let mut class = observable_class("Flag", vec![JavaField::new("isActive", "boolean")]);
    class.methods.push(JavaMethod::new("setIsActive", "void").with_param("value", "boolean"));
    let mut unit = JavaUnit::new(vec![class]);

    let report = synthesize(&mut unit);

    assert_eq!(report.diagnostics.len(), 1);
    assert!(report.diagnostics[0].message.contains("setActive()"));
    assert!(report.diagnostics[0].message.contains("(setIsActive)"));
    assert_eq!(report.injected_names(MemberKind::Getter), vec!["isActive"]);
}

#[test]
fn setter_conflict_severity_is_configurable() {
    let mut class = observable_class("Account", vec![JavaField::new("balance", "long")]);
    class.methods.push(JavaMethod::new("setBalance", "void").with_param("balance", "long"));
    let mut unit = JavaUnit::new(vec![class]);
    let config = SynthesisConfig::from_toml_str("[conflicts]\nsetter = \"warning\"\n").unwrap();

    let report = Synthesizer::new(config).apply_all(&mut unit).unwrap();

    assert!(!report.has_errors());
    assert_eq!(report.diagnostics[0].severity, Severity::Warning);
}

#[test]
fn user_getter_is_kept_with_a_warning() {
    let mut class = observable_class("Person", vec![JavaField::new("name", "String")]);
    class.methods.push(JavaMethod::new("getName", "String"));
    let mut unit = JavaUnit::new(vec![class]);

    let report = synthesize(&mut unit);

    assert!(!report.has_errors());
    assert_eq!(report.injected_names(MemberKind::Setter), vec!["setName"]);
    assert!(report.injected_names(MemberKind::Getter).is_empty());
    assert_eq!(unit.class("Person").unwrap().methods.iter().filter(|m| m.name == "getName").count(), 1);
}

#[test]
fn model_objects_get_exactly_one_descriptor_accessor() {
    let mut class = observable_class(
        "Order",
        vec![
            JavaField::new("id", "long"),
            JavaField::new("customer", "String"),
            JavaField::new("total", "java.math.BigDecimal"),
        ],
    );
    class.implements.push("com.acme.model.ModelObject".to_string());
    let mut unit = JavaUnit::new(vec![class]);

    let report = synthesize(&mut unit);

    assert_eq!(report.injected_names(MemberKind::DescriptorAccessor), vec!["getModelObjectDescriptor"]);
    let order = unit.class("Order").unwrap();
    let accessor = order.method("getModelObjectDescriptor").unwrap();
    assert_eq!(accessor.return_type, "propweave.runtime.ModelObjectDescriptor");
    assert_eq!(order.methods.iter().filter(|m| m.name == "getModelObjectDescriptor").count(), 1);
}

#[test]
fn fluent_classes_return_this_and_plain_classes_return_void() {
    let mut fluent = observable_class("Builder", vec![JavaField::new("size", "int")]);
    fluent.accessors = Some(AccessorStyle {
        chain: false,
        fluent: true,
        prefixes: Vec::new(),
    });
    let plain = observable_class("Plain", vec![JavaField::new("size", "int")]);
    let mut unit = JavaUnit::new(vec![fluent, plain]);

    synthesize(&mut unit);

    let builder = unit.class("Builder").unwrap();
    let setter = builder.methods.iter().find(|m| m.arity() == 1).unwrap();
    assert_eq!(setter.name, "size");
    assert_eq!(setter.return_type, "Builder");
    assert_eq!(unit.class("Plain").unwrap().method("setSize").unwrap().return_type, "void");
}

#[test]
fn field_marker_only_touches_that_field() {
    let mut class = JavaClass::new("Settings");
    class.fields.push(JavaField::new("theme", "String"));
    class.fields.push(JavaField::new("width", "int").with_annotation("Deprecated"));
    class.fields[1].observable = Some(PropagatedAnnotations {
        on_method: vec!["Override".to_string()],
        on_param: Vec::new(),
    });
    let mut unit = JavaUnit::new(vec![class]);

    let report = synthesize(&mut unit);

    assert_eq!(report.injected_names(MemberKind::Setter), vec!["setWidth"]);
    let settings = unit.class("Settings").unwrap();
    let setter = settings.method("setWidth").unwrap();
    assert_eq!(setter.annotations, vec!["Deprecated".to_string(), "Override".to_string()]);
    assert!(settings.method("getWidth").unwrap().annotations.is_empty());
}

#[test]
fn non_null_fields_render_a_null_check_before_notification() {
    let mut unit = JavaUnit::new(vec![observable_class(
        "Person",
        vec![JavaField::new("name", "String").with_annotation("lombok.NonNull")],
    )]);
    unit.package = Some("com.acme".to_string());

    synthesize(&mut unit);
    let source = render_unit(&unit);

    assert!(source.starts_with("package com.acme;\n"));
    assert!(source.contains("public void setName(final @lombok.NonNull String name) {"));
    assert!(source.contains("throw new java.lang.NullPointerException(\"name\");"));
    assert!(source.contains("this.name = name;"));
    assert!(source.contains("if (this.$$name$listeners != null) {"));
    assert!(source.contains("this.$$name$listeners.fireListeners(name);"));
    assert!(source.contains("this.$$listeners.fireListeners(this, Person_._name, name);"));

    let null_check = source.find("NullPointerException").unwrap();
    let assignment = source.find("this.name = name;").unwrap();
    let field_fire = source.find("this.$$name$listeners.fireListeners").unwrap();
    let bean_fire = source.find("this.$$listeners.fireListeners").unwrap();
    assert!(null_check < assignment && assignment < field_fire && field_fire < bean_fire);
}

#[test]
fn json_models_round_trip_through_the_engine() {
    let json = r#"{
        "package": "com.acme",
        "classes": [{
            "name": "Person",
            "observable": {},
            "fields": [{ "name": "name", "type": "String", "modifiers": ["private"] }]
        }]
    }"#;
    let mut unit = JavaUnit::from_json(json).unwrap();

    synthesize(&mut unit);

    let person = unit.class("Person").unwrap();
    assert!(person.method("setName").is_some());
    assert!(person.method("getName").is_some());
}

#[test]
fn static_fields_are_left_alone_on_class_markers() {
    let mut unit = JavaUnit::new(vec![observable_class(
        "Counter",
        vec![
            JavaField::new("instances", "int").with_modifier(Modifier::Static),
            JavaField::new("value", "int"),
        ],
    )]);

    let report = synthesize(&mut unit);

    assert!(report.diagnostics.is_empty());
    assert_eq!(report.injected_names(MemberKind::Setter), vec!["setValue"]);
    assert!(unit.class("Counter").unwrap().field("$$instances$listeners").is_none());
}

#[test]
fn marked_field_in_marked_class_is_processed_once() {
    let mut class = observable_class("Invoice", vec![JavaField::new("number", "long").with_modifier(Modifier::Final)]);
    class.fields[0].observable = Some(PropagatedAnnotations {
        on_method: vec!["Override".to_string()],
        on_param: Vec::new(),
    });
    let mut unit = JavaUnit::new(vec![class]);

    let report = synthesize(&mut unit);

    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].kind, DiagnosticKind::FinalFieldSkip);
    assert_eq!(unit.diagnostics.len(), 1);
}
