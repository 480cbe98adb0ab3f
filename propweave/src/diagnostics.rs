use std::fmt;

use serde::{Deserialize, Serialize};

/// How loudly a diagnostic is reported. Errors block a successful compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The annotation sits on something that is neither a class nor a field.
    Structural,
    /// A method with a colliding name already exists.
    NamingConflict,
    /// No accessor name fits the configured prefix list.
    UnusableName,
    /// A setter was requested for a final field.
    FinalFieldSkip,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DiagnosticKind::Structural => "structural",
            DiagnosticKind::NamingConflict => "naming-conflict",
            DiagnosticKind::UnusableName => "unusable-name",
            DiagnosticKind::FinalFieldSkip => "final-field",
        };
        f.write_str(label)
    }
}

/// One finding, local to a single field or class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    /// Human-readable location supplied by the host (e.g. `Person.name`).
    pub location: String,
}

impl Diagnostic {
    pub fn error(kind: DiagnosticKind, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            location: location.into(),
        }
    }

    pub fn warning(kind: DiagnosticKind, location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Warning,
            message: message.into(),
            location: location.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}] {}: {}", self.severity, self.kind, self.location, self.message)
    }
}
