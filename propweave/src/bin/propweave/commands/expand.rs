use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use propweave::Synthesizer;

use super::{discover_sources, expand_file, print_diagnostics};
use crate::context::ProjectContext;
use crate::output::OutputManager;

#[derive(Args, Debug)]
pub struct ExpandArgs {
    /// Rust file or directory to expand
    pub path: PathBuf,

    /// Keep the `#[observable]` attributes in the output
    #[arg(long)]
    pub keep_attrs: bool,

    /// Overwrite each file with its expansion instead of printing it
    #[arg(long)]
    pub write: bool,
}

pub fn handle_expand(args: ExpandArgs, context: &ProjectContext, output: &OutputManager) -> Result<()> {
    let synthesizer = Synthesizer::new(context.config.clone());
    let sources = discover_sources(&args.path)?;
    if sources.is_empty() {
        output.info(&format!("No observable structs found under {}", args.path.display()));
        return Ok(());
    }

    let mut errors = 0;
    for path in sources {
        let mut expanded = expand_file(&path, &synthesizer)?;
        print_diagnostics(output, &expanded.report.diagnostics);
        errors += expanded.report.diagnostics.iter().filter(|d| d.is_error()).count();

        if !args.keep_attrs {
            expanded.host.strip_helper_attrs();
        }
        let source = expanded.host.render();

        if args.write {
            std::fs::write(&expanded.path, source)
                .with_context(|| format!("Failed to write {}", expanded.path.display()))?;
            output.heading(&expanded.path.display().to_string());
            for member in &expanded.report.injected {
                output.member(member);
            }
            output.success(&format!("{} member(s) injected", expanded.report.injected.len()));
        } else {
            println!("// {}", expanded.path.display());
            println!("{source}");
        }
    }

    if errors > 0 {
        anyhow::bail!("expansion finished with {errors} error(s)");
    }
    Ok(())
}
