use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use propweave::SynthesisConfig;

pub const CONFIG_FILE: &str = "propweave.toml";

/// Configuration in force for one CLI invocation
pub struct ProjectContext {
    /// Directory holding the config file, or the start directory when there is none
    pub project_root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub config: SynthesisConfig,
}

impl ProjectContext {
    /// Use `explicit` when given, otherwise search from the current directory
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_config_file(path),
            None => {
                let current_dir = std::env::current_dir().context("Failed to get current directory")?;
                Self::find_from(&current_dir)
            }
        }
    }

    /// Find `propweave.toml` in `start` or any parent; defaults apply when none exists
    pub fn find_from(start: &Path) -> Result<Self> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILE);
            if candidate.is_file() {
                return Self::from_config_file(&candidate);
            }
            if !current.pop() {
                return Ok(Self {
                    project_root: start.to_path_buf(),
                    config_path: None,
                    config: SynthesisConfig::default(),
                });
            }
        }
    }

    pub fn from_config_file(path: &Path) -> Result<Self> {
        let config = SynthesisConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))?;
        let project_root = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self {
            project_root,
            config_path: Some(path.to_path_buf()),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propweave::Severity;

    #[test]
    fn config_is_found_in_a_parent_directory() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join(CONFIG_FILE), "[conflicts]\nsetter = \"warning\"\n").unwrap();
        let nested = root.path().join("src").join("model");
        std::fs::create_dir_all(&nested).unwrap();

        let context = ProjectContext::find_from(&nested).unwrap();

        assert_eq!(context.project_root, root.path());
        assert_eq!(context.config.conflicts.setter, Severity::Warning);
    }

    #[test]
    fn missing_config_uses_defaults() {
        let root = tempfile::tempdir().unwrap();
        let context = ProjectContext::find_from(root.path()).unwrap();
        assert!(context.config_path.is_none());
        assert_eq!(context.config, SynthesisConfig::default());
    }

    #[test]
    fn invalid_config_is_reported() {
        let root = tempfile::tempdir().unwrap();
        let path = root.path().join(CONFIG_FILE);
        std::fs::write(&path, "[conflicts]\nsetter = \"fatal\"\n").unwrap();
        assert!(ProjectContext::from_config_file(&path).is_err());
    }
}
