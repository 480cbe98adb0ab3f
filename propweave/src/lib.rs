//! propweave core library.
//!
//! Synthesizes observable properties at compile time: for each annotated field
//! a getter, a notifying setter, a lazily allocated per-field listener registry
//! and a class-wide registry, plus a descriptor accessor for classes that
//! implement the model-object contract.
//!
//! The engine ([`Synthesizer`]) only talks to a [`HostAst`]. Two hosts ship
//! with the crate: [`java::JavaUnit`], an in-memory Java class model, and
//! [`rust::RustFileHost`], a view over a parsed Rust file used by the
//! `#[observable]` attribute macro and the `propweave` CLI.

pub mod bridge;
pub mod config;
pub mod conflict;
pub mod diagnostics;
pub mod engine;
pub mod errors;
pub mod host;
pub mod java;
pub mod naming;
pub mod plan;
pub mod rust;
pub mod types;

pub use config::{RuntimeTypes, SynthesisConfig};
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use engine::{InjectedMember, SynthesisReport, Synthesizer};
pub use errors::{ConfigError, HostError};
pub use host::HostAst;
pub use plan::{MemberKind, SynthesizedMember};
pub use types::{AccessLevel, AccessorStyle, NamingStyle, PropagatedAnnotations};
