//! Entry point: drives extraction, conflict resolution, planning and injection.

use log::{debug, trace};
use serde::Serialize;

use crate::bridge;
use crate::config::SynthesisConfig;
use crate::conflict::{self, GetterDecision, SetterDecision};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::errors::HostError;
use crate::host::HostAst;
use crate::naming::{self, AccessorNames};
use crate::plan::{
    MemberKind, PlanContext, SynthesizedMember, plan_bean_registry, plan_field_registry, plan_getter, plan_setter,
};
use crate::types::{AccessLevel, FieldDescriptor, NodeKind, PropagatedAnnotations};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InjectedMember {
    pub class: String,
    pub kind: MemberKind,
    pub name: String,
}

/// What one or more synthesis requests did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynthesisReport {
    pub injected: Vec<InjectedMember>,
    pub diagnostics: Vec<Diagnostic>,
}

impl SynthesisReport {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn merge(&mut self, other: SynthesisReport) {
        self.injected.extend(other.injected);
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn injected_names(&self, kind: MemberKind) -> Vec<&str> {
        self.injected
            .iter()
            .filter(|member| member.kind == kind)
            .map(|member| member.name.as_str())
            .collect()
    }
}

/// Applies the observable-property transformation to host trees.
#[derive(Debug, Clone, Default)]
pub struct Synthesizer {
    config: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(config: SynthesisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// Process every annotated node the host knows about.
    ///
    /// A field carrying its own marker is handled by its own request, so the
    /// request of its class passes over it.
    pub fn apply_all<H: HostAst>(&self, host: &mut H) -> Result<SynthesisReport, HostError> {
        let targets = host.annotated_targets();
        let marked_fields: Vec<H::Node> = targets
            .iter()
            .filter(|(target, _)| host.kind(target) == NodeKind::Field)
            .map(|(target, _)| target.clone())
            .collect();

        let mut report = SynthesisReport::default();
        for (target, propagated) in &targets {
            report.merge(self.apply_marked(host, target, propagated, &marked_fields)?);
        }
        Ok(report)
    }

    /// Process one annotated field or class.
    ///
    /// Problems with the user's code end up as diagnostics in the report (and
    /// are reported to the host); only host failures return `Err`.
    pub fn apply<H: HostAst>(
        &self,
        host: &mut H,
        target: &H::Node,
        propagated: &PropagatedAnnotations,
    ) -> Result<SynthesisReport, HostError> {
        self.apply_marked(host, target, propagated, &[])
    }

    fn apply_marked<H: HostAst>(
        &self,
        host: &mut H,
        target: &H::Node,
        propagated: &PropagatedAnnotations,
        marked_fields: &[H::Node],
    ) -> Result<SynthesisReport, HostError> {
        let mut report = SynthesisReport::default();

        match host.kind(target) {
            NodeKind::Field => {
                let class = host
                    .parent(target)
                    .filter(|parent| matches!(host.kind(parent), NodeKind::Class(kind) if kind.accepts_properties()));
                let Some(class) = class else {
                    self.structural(host, target, &mut report);
                    return Ok(report);
                };
                self.process_field(host, &class, target, propagated, &mut report)?;
                self.process_bridge(host, &class, propagated, &mut report)?;
            }
            NodeKind::Class(kind) if kind.accepts_properties() => {
                let naming = host.naming_style();
                // Snapshot first: registry fields injected below must not be visited.
                let fields: Vec<H::Node> = host
                    .children(target)
                    .into_iter()
                    .filter(|child| host.kind(child) == NodeKind::Field)
                    .collect();
                for field in fields.iter().filter(|field| !marked_fields.contains(field)) {
                    let Some(facts) = host.field_facts(field) else {
                        continue;
                    };
                    if naming::is_synthetic(&facts.name, naming) {
                        continue;
                    }
                    // Static fields need their own marker.
                    if facts.is_static {
                        debug!("{}: static field `{}` left alone", host.describe(target), facts.name);
                        continue;
                    }
                    self.process_field(host, target, field, propagated, &mut report)?;
                }
                self.process_bridge(host, target, propagated, &mut report)?;
            }
            _ => self.structural(host, target, &mut report),
        }

        Ok(report)
    }

    fn structural<H: HostAst>(&self, host: &mut H, target: &H::Node, report: &mut SynthesisReport) {
        let diagnostic = Diagnostic::error(
            DiagnosticKind::Structural,
            host.describe(target),
            "observable properties are only supported on a class, an enum, or a field",
        );
        self.diagnose(host, target, diagnostic, report);
    }

    fn process_field<H: HostAst>(
        &self,
        host: &mut H,
        class: &H::Node,
        field_node: &H::Node,
        propagated: &PropagatedAnnotations,
        report: &mut SynthesisReport,
    ) -> Result<(), HostError> {
        let Some(facts) = host.field_facts(field_node) else {
            self.structural(host, field_node, report);
            return Ok(());
        };
        let field = naming::describe_field(&facts, self.config.accessors.access);
        if field.access_level == AccessLevel::None {
            trace!("field `{}` opted out with access level none", field.name);
            return Ok(());
        }

        let naming = host.naming_style();
        let class_name = host.class_name(class);
        let style = host
            .accessor_style(class)
            .unwrap_or_else(|| self.config.accessors.style());
        let ctx = PlanContext {
            class_name: &class_name,
            naming,
            runtime: self.config.runtime_for(naming),
            descriptor: &self.config.descriptor,
            propagated,
        };

        let Some(names) = naming::accessor_names(&field, &style, naming) else {
            let diagnostic = Diagnostic::warning(
                DiagnosticKind::UnusableName,
                host.describe(field_node),
                "not generating accessors for this field: it does not fit the configured prefix list",
            );
            self.diagnose(host, field_node, diagnostic, report);
            return Ok(());
        };

        self.setter_step(host, class, field_node, &ctx, &field, &names, report)?;
        self.getter_step(host, class, field_node, &ctx, &field, &names, report)
    }

    #[allow(clippy::too_many_arguments)]
    fn setter_step<H: HostAst>(
        &self,
        host: &mut H,
        class: &H::Node,
        field_node: &H::Node,
        ctx: &PlanContext<'_>,
        field: &FieldDescriptor,
        names: &AccessorNames,
        report: &mut SynthesisReport,
    ) -> Result<(), HostError> {
        if field.is_final {
            let diagnostic = Diagnostic::warning(
                DiagnosticKind::FinalFieldSkip,
                host.describe(field_node),
                "not generating setter for this field: setters cannot be generated for final fields",
            );
            self.diagnose(host, field_node, diagnostic, report);
            return Ok(());
        }

        match conflict::resolve_setter(host, class, field, names) {
            SetterDecision::Proceed => {
                let setter = SynthesizedMember::Setter(plan_setter(ctx, field, names));
                self.inject(host, class, ctx, setter, report)?;
                self.ensure_registries(host, class, ctx, field, report)
            }
            SetterDecision::AlreadySynthesized => {
                trace!("{}: setter `{}` already synthesized", ctx.class_name, names.setter);
                self.ensure_registries(host, class, ctx, field, report)
            }
            SetterDecision::Conflict { alias } => {
                let explanation = if alias == names.setter {
                    String::new()
                } else {
                    format!(" ({alias})")
                };
                let diagnostic = Diagnostic {
                    kind: DiagnosticKind::NamingConflict,
                    severity: self.config.conflicts.setter,
                    message: format!(
                        "not generating {}(): a method with that name already exists{explanation}; \
                         automatic change propagation won't work",
                        names.setter
                    ),
                    location: host.describe(field_node),
                };
                self.diagnose(host, field_node, diagnostic, report);
                Ok(())
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn getter_step<H: HostAst>(
        &self,
        host: &mut H,
        class: &H::Node,
        field_node: &H::Node,
        ctx: &PlanContext<'_>,
        field: &FieldDescriptor,
        names: &AccessorNames,
        report: &mut SynthesisReport,
    ) -> Result<(), HostError> {
        match conflict::resolve_getter(host, class, names) {
            GetterDecision::Proceed => {
                let getter = SynthesizedMember::Getter(plan_getter(ctx, field, names));
                self.inject(host, class, ctx, getter, report)
            }
            GetterDecision::AlreadySynthesized => {
                trace!("{}: getter `{}` already synthesized", ctx.class_name, names.getter);
                Ok(())
            }
            GetterDecision::UserWritten { alias } => {
                let diagnostic = Diagnostic::warning(
                    DiagnosticKind::NamingConflict,
                    host.describe(field_node),
                    format!("not generating {alias}(): a method with that name already exists"),
                );
                self.diagnose(host, field_node, diagnostic, report);
                Ok(())
            }
        }
    }

    /// Field registry always; class registry once per class, on first need.
    fn ensure_registries<H: HostAst>(
        &self,
        host: &mut H,
        class: &H::Node,
        ctx: &PlanContext<'_>,
        field: &FieldDescriptor,
        report: &mut SynthesisReport,
    ) -> Result<(), HostError> {
        let field_registry = plan_field_registry(ctx, field);
        if conflict::needs_field(host, class, field_registry.name()) {
            self.inject(host, class, ctx, field_registry, report)?;
        }

        if !field.is_static {
            let bean_registry = plan_bean_registry(ctx);
            if conflict::needs_field(host, class, bean_registry.name()) {
                self.inject(host, class, ctx, bean_registry, report)?;
            }
        }
        Ok(())
    }

    fn process_bridge<H: HostAst>(
        &self,
        host: &mut H,
        class: &H::Node,
        propagated: &PropagatedAnnotations,
        report: &mut SynthesisReport,
    ) -> Result<(), HostError> {
        let naming = host.naming_style();
        let class_name = host.class_name(class);
        let ctx = PlanContext {
            class_name: &class_name,
            naming,
            runtime: self.config.runtime_for(naming),
            descriptor: &self.config.descriptor,
            propagated,
        };
        if let Some(member) = bridge::ensure_descriptor_accessor(host, class, &ctx)? {
            report.injected.push(InjectedMember {
                class: class_name.clone(),
                kind: member.kind(),
                name: member.name().to_string(),
            });
        }
        Ok(())
    }

    fn inject<H: HostAst>(
        &self,
        host: &mut H,
        class: &H::Node,
        ctx: &PlanContext<'_>,
        member: SynthesizedMember,
        report: &mut SynthesisReport,
    ) -> Result<(), HostError> {
        let injected = if member.is_field() {
            host.inject_field(class, &member)?
        } else {
            host.inject_method(class, &member)?
        };
        if injected {
            debug!("{}: injected {:?} `{}`", ctx.class_name, member.kind(), member.name());
            report.injected.push(InjectedMember {
                class: ctx.class_name.to_string(),
                kind: member.kind(),
                name: member.name().to_string(),
            });
        }
        Ok(())
    }

    fn diagnose<H: HostAst>(&self, host: &mut H, node: &H::Node, diagnostic: Diagnostic, report: &mut SynthesisReport) {
        debug!("{diagnostic}");
        host.report(node, &diagnostic);
        report.diagnostics.push(diagnostic);
    }
}
