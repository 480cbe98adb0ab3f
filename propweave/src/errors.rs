use std::path::PathBuf;

use thiserror::Error;

/// Failure raised by a host while mutating its tree.
///
/// Diagnostics about the user's code never travel through this type; they are
/// reported to the host and collected in the synthesis report. A `HostError`
/// means the host itself could not honor a request.
#[derive(Debug, Error)]
pub enum HostError {
    /// The node handle does not point at anything in the host tree.
    #[error("unknown node: {node}")]
    UnknownNode { node: String },

    /// The host refused to inject a member.
    #[error("cannot inject `{member}` into `{class}`: {reason}")]
    Rejected {
        class: String,
        member: String,
        reason: String,
    },

    /// A configured type path or propagated annotation does not parse in the host language.
    #[error("invalid {what} `{text}`: {message}")]
    InvalidSyntax {
        what: &'static str,
        text: String,
        message: String,
    },
}

impl HostError {
    pub fn unknown(node: impl std::fmt::Debug) -> Self {
        Self::UnknownNode {
            node: format!("{node:?}"),
        }
    }

    pub fn invalid_syntax(what: &'static str, text: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::InvalidSyntax {
            what,
            text: text.into(),
            message: err.to_string(),
        }
    }
}

/// Errors raised while loading configuration or host models from disk.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid model: {0}")]
    Json(#[from] serde_json::Error),
}
