//! Engine configuration, loadable from `propweave.toml`.
//!
//! Every key has a default, so an empty file (or no file at all) yields the
//! behavior described in the crate docs: public accessors, void setters, setter
//! conflicts reported as errors, and the `<Class>_.descriptor` naming strategy.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::diagnostics::Severity;
use crate::errors::ConfigError;
use crate::types::{AccessLevel, AccessorStyle, NamingStyle};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    #[serde(default)]
    pub accessors: AccessorConfig,
    #[serde(default)]
    pub conflicts: ConflictConfig,
    #[serde(default)]
    pub descriptor: DescriptorNaming,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Defaults applied to classes that carry no accessor style of their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessorConfig {
    #[serde(default)]
    pub access: AccessLevel,
    #[serde(default)]
    pub chain: bool,
    #[serde(default)]
    pub fluent: bool,
    #[serde(default)]
    pub prefixes: Vec<String>,
}

impl AccessorConfig {
    pub fn style(&self) -> AccessorStyle {
        AccessorStyle {
            chain: self.chain,
            fluent: self.fluent,
            prefixes: self.prefixes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictConfig {
    /// Severity of a setter naming conflict. The setter is skipped either way.
    #[serde(default = "default_setter_conflict")]
    pub setter: Severity,
}

impl Default for ConflictConfig {
    fn default() -> Self {
        Self {
            setter: default_setter_conflict(),
        }
    }
}

fn default_setter_conflict() -> Severity {
    Severity::Error
}

/// Naming strategy for the generated companion metadata type.
///
/// The setter references `<Class><companion_suffix>.<property_prefix><field>`
/// and the descriptor accessor returns `<Class><companion_suffix>.<descriptor_field>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorNaming {
    /// Substring identifying the model-object contract among implemented contracts.
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_companion_suffix")]
    pub companion_suffix: String,
    #[serde(default = "default_descriptor_field")]
    pub descriptor_field: String,
    #[serde(default = "default_property_prefix")]
    pub property_prefix: String,
}

impl Default for DescriptorNaming {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            companion_suffix: default_companion_suffix(),
            descriptor_field: default_descriptor_field(),
            property_prefix: default_property_prefix(),
        }
    }
}

fn default_marker() -> String {
    "ModelObject".to_string()
}

fn default_companion_suffix() -> String {
    "_".to_string()
}

fn default_descriptor_field() -> String {
    "descriptor".to_string()
}

fn default_property_prefix() -> String {
    "_".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "RuntimeTypes::java")]
    pub java: RuntimeTypes,
    #[serde(default = "RuntimeTypes::rust")]
    pub rust: RuntimeTypes,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            java: RuntimeTypes::java(),
            rust: RuntimeTypes::rust(),
        }
    }
}

/// Paths of the external listener-registry runtime the emitted code calls into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeTypes {
    pub property_listeners: String,
    pub bean_listeners: String,
    pub descriptor_type: String,
    pub fire_method: String,
}

impl RuntimeTypes {
    pub fn java() -> Self {
        Self {
            property_listeners: "propweave.runtime.PropertyListeners".to_string(),
            bean_listeners: "propweave.runtime.BeanPropertyListeners".to_string(),
            descriptor_type: "propweave.runtime.ModelObjectDescriptor".to_string(),
            fire_method: "fireListeners".to_string(),
        }
    }

    pub fn rust() -> Self {
        Self::rust_rooted_at("::propweave_runtime")
    }

    /// Rust runtime types living under an arbitrary module path.
    pub fn rust_rooted_at(root: &str) -> Self {
        let root = root.trim_end_matches("::");
        Self {
            property_listeners: format!("{root}::PropertyListeners"),
            bean_listeners: format!("{root}::BeanPropertyListeners"),
            descriptor_type: format!("{root}::ModelObjectDescriptor"),
            fire_method: "fire_listeners".to_string(),
        }
    }
}

impl SynthesisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn runtime_for(&self, style: NamingStyle) -> &RuntimeTypes {
        match style {
            NamingStyle::Java => &self.runtime.java,
            NamingStyle::Rust => &self.runtime.rust,
        }
    }
}
