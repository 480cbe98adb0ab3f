//! Rust backend: a `syn::File` host used by the attribute macro and the CLI.

pub mod attrs;
mod emit;
mod host;

pub use attrs::{FieldArgs, ObservableArgs};
pub use host::{RustFileHost, RustNode};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;
    use crate::engine::Synthesizer;
    use crate::host::HostAst;
    use crate::plan::MemberKind;
    use crate::types::MemberExists;

    fn expand(source: &str) -> (RustFileHost, crate::engine::SynthesisReport) {
        let mut host = RustFileHost::parse(source).unwrap();
        let report = Synthesizer::default().apply_all(&mut host).unwrap();
        (host, report)
    }

    #[test]
    fn struct_gets_accessors_and_registries() {
        let (host, report) = expand(
            r#"
            #[observable]
            pub struct Person {
                name: String,
                age: u32,
            }
            "#,
        );
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.injected_names(MemberKind::Setter), vec!["set_name", "set_age"]);
        assert_eq!(report.injected_names(MemberKind::Getter), vec!["name", "age"]);
        assert_eq!(
            report.injected_names(MemberKind::FieldListenerRegistry),
            vec!["__name_listeners", "__age_listeners"]
        );
        assert_eq!(report.injected_names(MemberKind::BeanListenerRegistry), vec!["__listeners"]);

        let source = host.render();
        assert!(source.contains("#[automatically_derived]"));
        assert!(source.contains("pub fn set_name(&mut self, name: String)"));
        assert!(source.contains("pub fn age(&self) -> u32"));
        assert!(source.contains("pub fn name(&self) -> &String"));
        assert!(source.contains("pub __name_listeners: ::core::option::Option<"));
        assert!(source.contains("listeners.fire_listeners(&*self, &Person_::NAME, &self.name)"));
    }

    #[test]
    fn user_method_blocks_the_setter() {
        let (host, report) = expand(
            r#"
            #[observable]
            struct Account {
                balance: i64,
            }

            impl Account {
                fn set_balance(&mut self, balance: i64) {
                    self.balance = balance;
                }
            }
            "#,
        );
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::NamingConflict);
        assert!(report.has_errors());
        assert!(report.injected_names(MemberKind::Setter).is_empty());
        assert_eq!(report.injected_names(MemberKind::Getter), vec!["balance"]);

        let class = host.find_struct("Account").unwrap();
        assert_eq!(host.field_exists(&class, "__balance_listeners"), MemberExists::NotExists);
        assert_eq!(host.reported().len(), 1);
    }

    #[test]
    fn enums_and_traits_are_structural_errors() {
        let (_, report) = expand(
            r#"
            #[observable]
            enum Color { Red }

            #[observable]
            trait Shape {}
            "#,
        );
        assert_eq!(report.diagnostics.len(), 2);
        assert!(report.diagnostics.iter().all(|d| d.kind == DiagnosticKind::Structural));
    }

    #[test]
    fn field_marker_without_struct_marker_targets_that_field() {
        let (host, report) = expand(
            r#"
            struct Settings {
                #[observable(on_method(must_use))]
                theme: String,
                width: u16,
            }
            "#,
        );
        assert_eq!(report.injected_names(MemberKind::Setter), vec!["set_theme"]);
        let source = host.render();
        assert_eq!(source.matches("#[must_use]").count(), 1);
        assert!(source.find("#[must_use]").unwrap() < source.find("pub fn set_theme").unwrap());
    }

    #[test]
    fn stripping_removes_helper_attributes() {
        let (mut host, _) = expand(
            r#"
            #[observable(chain)]
            struct Point {
                #[observable(readonly)]
                x: i32,
            }
            "#,
        );
        host.strip_helper_attrs();
        assert!(!host.render().contains("observable"));
    }
}
