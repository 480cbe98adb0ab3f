pub mod check;
pub mod expand;
pub mod java;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use propweave::rust::RustFileHost;
use propweave::{Diagnostic, SynthesisReport, Synthesizer};

use crate::output::OutputManager;

/// One Rust source file after synthesis
pub struct ExpandedFile {
    pub path: PathBuf,
    pub host: RustFileHost,
    pub report: SynthesisReport,
}

/// Rust files under `path` that mention the observable attribute.
///
/// A file path is returned as-is. Hidden entries and `target` directories are skipped.
pub fn discover_sources(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut discovered = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            entry.depth() == 0 || !(name.starts_with('.') || name == "target")
        })
        .filter_map(|entry| entry.ok())
    {
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != "rs") {
            continue;
        }
        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
        if content.contains("observable") {
            discovered.push(path.to_path_buf());
        }
    }

    discovered.sort();
    Ok(discovered)
}

pub fn expand_file(path: &Path, synthesizer: &Synthesizer) -> Result<ExpandedFile> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    let mut host =
        RustFileHost::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    let report = synthesizer
        .apply_all(&mut host)
        .with_context(|| format!("Failed to expand {}", path.display()))?;
    Ok(ExpandedFile {
        path: path.to_path_buf(),
        host,
        report,
    })
}

pub fn print_diagnostics(output: &OutputManager, diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        if diagnostic.is_error() {
            output.error(&diagnostic.to_string());
        } else {
            output.warning(&diagnostic.to_string());
        }
    }
}
