use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use propweave::Synthesizer;
use propweave::java::{JavaUnit, render_unit};

use super::print_diagnostics;
use crate::context::ProjectContext;
use crate::output::OutputManager;

#[derive(Args, Debug)]
pub struct JavaArgs {
    /// JSON model of the Java compilation unit
    pub model: PathBuf,

    /// Print the transformed model as JSON instead of Java source
    #[arg(long)]
    pub json: bool,
}

pub fn handle_java(args: JavaArgs, context: &ProjectContext, output: &OutputManager) -> Result<()> {
    let content = std::fs::read_to_string(&args.model)
        .with_context(|| format!("Failed to read model: {}", args.model.display()))?;
    let mut unit =
        JavaUnit::from_json(&content).with_context(|| format!("Failed to parse model: {}", args.model.display()))?;

    let report = Synthesizer::new(context.config.clone())
        .apply_all(&mut unit)
        .context("Failed to apply observable properties")?;
    print_diagnostics(output, &report.diagnostics);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&unit)?);
    } else {
        print!("{}", render_unit(&unit));
    }

    if report.has_errors() {
        anyhow::bail!("model has errors");
    }
    Ok(())
}
