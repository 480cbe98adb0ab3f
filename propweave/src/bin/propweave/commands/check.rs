use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Table};
use serde::Serialize;
use std::path::PathBuf;

use propweave::{Diagnostic, Synthesizer};

use super::{discover_sources, expand_file};
use crate::context::ProjectContext;
use crate::output::{GlobalOptions, OutputManager, TableDisplay};
use crate::theme::{PALETTE, table_color};

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Rust file or directory to check
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct FileDiagnostic {
    pub file: String,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

#[derive(Debug, Serialize)]
pub struct CheckSummary {
    pub files: usize,
    pub injected: usize,
    pub diagnostics: Vec<FileDiagnostic>,
}

impl CheckSummary {
    fn errors(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.diagnostic.is_error()).count()
    }
}

impl TableDisplay for CheckSummary {
    fn to_table(&self, options: &GlobalOptions) -> Table {
        let mut table = OutputManager::create_table(options);
        OutputManager::add_table_header(options, &mut table, &["File", "Location", "Severity", "Kind", "Message"]);
        if self.diagnostics.is_empty() {
            table.add_row(vec![Cell::new("No diagnostics")]);
        }
        for entry in &self.diagnostics {
            let mut severity = Cell::new(entry.diagnostic.severity.to_string());
            if !options.no_color {
                severity = severity.fg(table_color(PALETTE.severity(entry.diagnostic.severity)));
            }
            table.add_row(vec![
                Cell::new(&entry.file),
                Cell::new(&entry.diagnostic.location),
                severity,
                Cell::new(entry.diagnostic.kind.to_string()),
                Cell::new(&entry.diagnostic.message),
            ]);
        }
        table
    }

    fn to_compact(&self) -> String {
        let mut lines: Vec<String> = self
            .diagnostics
            .iter()
            .map(|entry| format!("{}: {}", entry.file, entry.diagnostic))
            .collect();
        lines.push(format!(
            "files={} injected={} errors={} warnings={}",
            self.files,
            self.injected,
            self.errors(),
            self.diagnostics.len() - self.errors()
        ));
        lines.join("\n")
    }
}

pub fn handle_check(args: CheckArgs, context: &ProjectContext, output: &OutputManager) -> Result<()> {
    let synthesizer = Synthesizer::new(context.config.clone());
    let sources = discover_sources(&args.path)?;

    let mut summary = CheckSummary {
        files: sources.len(),
        injected: 0,
        diagnostics: Vec::new(),
    };
    for path in &sources {
        let expanded = expand_file(path, &synthesizer)?;
        summary.injected += expanded.report.injected.len();
        summary
            .diagnostics
            .extend(expanded.report.diagnostics.into_iter().map(|diagnostic| FileDiagnostic {
                file: path.display().to_string(),
                diagnostic,
            }));
    }

    output.display(&summary)?;

    let errors = summary.errors();
    if errors > 0 {
        anyhow::bail!("{errors} error(s) found");
    }
    output.success(&format!("{} file(s) checked", summary.files));
    Ok(())
}
