//! Java source printing for [`JavaUnit`] models.

use super::ast::{JavaClass, JavaExpr, JavaField, JavaMethod, JavaParam, JavaStmt, JavaUnit, Modifier};
use crate::types::ClassKind;

/// Incrementally builds Java source with indentation handling.
#[derive(Debug, Default, Clone)]
pub struct JavaSourceBuilder {
    content: String,
    indent_level: usize,
    indent: String,
}

impl JavaSourceBuilder {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            content: String::new(),
            indent_level: 0,
            indent: indent.into(),
        }
    }

    pub fn push_line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.indent_level {
                self.content.push_str(&self.indent);
            }
            self.content.push_str(line);
        }
        self.content.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    pub fn dedent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn build(self) -> String {
        self.content
    }
}

pub fn render_unit(unit: &JavaUnit) -> String {
    let mut builder = JavaSourceBuilder::new("    ");

    if let Some(package) = &unit.package {
        builder.push_line(&format!("package {package};"));
        builder.push_line("");
    }
    if !unit.imports.is_empty() {
        for import in &unit.imports {
            builder.push_line(&format!("import {import};"));
        }
        builder.push_line("");
    }

    for (index, class) in unit.classes.iter().enumerate() {
        if index > 0 {
            builder.push_line("");
        }
        render_class(&mut builder, class);
    }
    builder.build()
}

fn render_class(builder: &mut JavaSourceBuilder, class: &JavaClass) {
    for annotation in &class.annotations {
        builder.push_line(&annotation_text(annotation));
    }
    let keyword = match class.kind {
        ClassKind::Class => "class",
        ClassKind::Enum => "enum",
        ClassKind::Interface => "interface",
        ClassKind::Annotation => "@interface",
    };
    let mut header = format!("{}{keyword} {}", modifiers_text(&class.modifiers), class.name);
    if !class.implements.is_empty() {
        let clause = if class.kind == ClassKind::Interface {
            "extends"
        } else {
            "implements"
        };
        header.push_str(&format!(" {clause} {}", class.implements.join(", ")));
    }
    builder.push_line(&format!("{header} {{"));
    builder.indent();

    for field in &class.fields {
        render_field(builder, field);
    }
    for method in &class.methods {
        builder.push_line("");
        render_method(builder, method);
    }

    builder.dedent();
    builder.push_line("}");
}

fn render_field(builder: &mut JavaSourceBuilder, field: &JavaField) {
    let annotations: String = field
        .annotations
        .iter()
        .map(|annotation| format!("{} ", annotation_text(annotation)))
        .collect();
    let initializer = field
        .initializer
        .as_ref()
        .map(|value| format!(" = {value}"))
        .unwrap_or_default();
    builder.push_line(&format!(
        "{annotations}{}{} {}{initializer};",
        modifiers_text(&field.modifiers),
        field.ty,
        field.name
    ));
}

fn render_method(builder: &mut JavaSourceBuilder, method: &JavaMethod) {
    for annotation in &method.annotations {
        builder.push_line(&annotation_text(annotation));
    }
    let params: Vec<String> = method.params.iter().map(param_text).collect();
    builder.push_line(&format!(
        "{}{} {}({}) {{",
        modifiers_text(&method.modifiers),
        method.return_type,
        method.name,
        params.join(", ")
    ));
    builder.indent();
    for stmt in &method.body {
        render_stmt(builder, stmt);
    }
    builder.dedent();
    builder.push_line("}");
}

fn render_stmt(builder: &mut JavaSourceBuilder, stmt: &JavaStmt) {
    match stmt {
        JavaStmt::If { condition, then } => {
            builder.push_line(&format!("if ({}) {{", expr_text(condition)));
            builder.indent();
            for inner in then {
                render_stmt(builder, inner);
            }
            builder.dedent();
            builder.push_line("}");
        }
        JavaStmt::Expr(expr) => builder.push_line(&format!("{};", expr_text(expr))),
        JavaStmt::Return(Some(expr)) => builder.push_line(&format!("return {};", expr_text(expr))),
        JavaStmt::Return(None) => builder.push_line("return;"),
        JavaStmt::Throw(expr) => builder.push_line(&format!("throw {};", expr_text(expr))),
        JavaStmt::Raw(text) => builder.push_line(text),
    }
}

pub fn expr_text(expr: &JavaExpr) -> String {
    match expr {
        JavaExpr::Name(name) => name.clone(),
        JavaExpr::This => "this".to_string(),
        JavaExpr::Null => "null".to_string(),
        JavaExpr::Literal(text) => text.clone(),
        JavaExpr::Field { target, name } => format!("{}.{name}", expr_text(target)),
        JavaExpr::Assign { target, value } => format!("{} = {}", expr_text(target), expr_text(value)),
        JavaExpr::Call { target, method, args } => {
            let args: Vec<String> = args.iter().map(expr_text).collect();
            match target {
                Some(target) => format!("{}.{method}({})", expr_text(target), args.join(", ")),
                None => format!("{method}({})", args.join(", ")),
            }
        }
        JavaExpr::New { ty, args } => {
            let args: Vec<String> = args.iter().map(expr_text).collect();
            format!("new {ty}({})", args.join(", "))
        }
        JavaExpr::Binary { op, left, right } => format!("{} {op} {}", expr_text(left), expr_text(right)),
    }
}

fn param_text(param: &JavaParam) -> String {
    let mut text = String::new();
    if param.is_final {
        text.push_str("final ");
    }
    for annotation in &param.annotations {
        text.push_str(&annotation_text(annotation));
        text.push(' ');
    }
    text.push_str(&format!("{} {}", param.ty, param.name));
    text
}

fn modifiers_text(modifiers: &[Modifier]) -> String {
    modifiers.iter().map(|modifier| format!("{} ", modifier.keyword())).collect()
}

fn annotation_text(annotation: &str) -> String {
    if annotation.starts_with('@') {
        annotation.to_string()
    } else {
        format!("@{annotation}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_guarded_fire_and_null_check() {
        let mut class = JavaClass::new("Person");
        class.fields.push(JavaField::new("name", "String"));
        class.methods.push(
            JavaMethod::new("setName", "void")
                .with_param("name", "String")
                .with_body(vec![
                    JavaStmt::If {
                        condition: JavaExpr::binary("==", JavaExpr::Name("name".into()), JavaExpr::Null),
                        then: vec![JavaStmt::Throw(JavaExpr::New {
                            ty: "java.lang.NullPointerException".into(),
                            args: vec![JavaExpr::Literal("\"name\"".into())],
                        })],
                    },
                    JavaStmt::Expr(JavaExpr::Assign {
                        target: Box::new(JavaExpr::field(JavaExpr::This, "name")),
                        value: Box::new(JavaExpr::Name("name".into())),
                    }),
                ]),
        );
        let mut unit = JavaUnit::new(vec![class]);
        unit.package = Some("com.acme".to_string());

        let source = render_unit(&unit);

        assert!(source.starts_with("package com.acme;\n\npublic class Person {\n"));
        assert!(source.contains("    private String name;\n"));
        assert!(source.contains("    public void setName(String name) {\n"));
        assert!(source.contains("        if (name == null) {\n"));
        assert!(source.contains("            throw new java.lang.NullPointerException(\"name\");\n"));
        assert!(source.contains("        this.name = name;\n"));
        assert!(source.ends_with("}\n"));
    }

    #[test]
    fn final_params_print_annotations_after_the_modifier() {
        let param = JavaParam {
            name: "name".into(),
            ty: "String".into(),
            annotations: vec!["NonNull".into()],
            is_final: true,
        };
        assert_eq!(param_text(&param), "final @NonNull String name");
    }
}
