//! The contract between the engine and a host compiler tree.

use std::fmt;

use crate::diagnostics::Diagnostic;
use crate::errors::HostError;
use crate::plan::SynthesizedMember;
use crate::types::{AccessorStyle, FieldFacts, MemberExists, NamingStyle, NodeKind, PropagatedAnnotations};

/// A live view onto a host AST.
///
/// The engine never owns host state: it queries through this trait, decides,
/// and asks the host to inject. Class handles are the nodes for which
/// [`HostAst::kind`] reports [`NodeKind::Class`].
pub trait HostAst {
    type Node: Clone + PartialEq + fmt::Debug;

    fn naming_style(&self) -> NamingStyle;

    fn kind(&self, node: &Self::Node) -> NodeKind;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Direct children in declaration order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Human-readable location used in diagnostics.
    fn describe(&self, node: &Self::Node) -> String;

    fn field_facts(&self, field: &Self::Node) -> Option<FieldFacts>;

    fn class_name(&self, class: &Self::Node) -> String;

    /// Accessor conventions declared on the class itself, if any.
    fn accessor_style(&self, class: &Self::Node) -> Option<AccessorStyle>;

    /// Textual names of the contracts the class declares it implements.
    fn implemented_contracts(&self, class: &Self::Node) -> Vec<String>;

    fn method_exists(&self, class: &Self::Node, name: &str, arity: usize, case_sensitive: bool) -> MemberExists;

    fn field_exists(&self, class: &Self::Node, name: &str) -> MemberExists;

    /// Inject a method. Returns `Ok(false)` when an identical framework member is already present.
    fn inject_method(&mut self, class: &Self::Node, member: &SynthesizedMember) -> Result<bool, HostError>;

    /// Inject a field. Returns `Ok(false)` when an identical framework member is already present.
    fn inject_field(&mut self, class: &Self::Node, member: &SynthesizedMember) -> Result<bool, HostError>;

    fn report(&mut self, node: &Self::Node, diagnostic: &Diagnostic);

    /// Nodes carrying the observable marker, with the annotations unboxed from it.
    ///
    /// Field-level occurrences come before class-level ones so that a field's
    /// own propagated annotations win when both are present.
    fn annotated_targets(&self) -> Vec<(Self::Node, PropagatedAnnotations)>;
}
