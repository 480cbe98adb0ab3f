mod commands;
mod context;
mod output;
mod theme;

use anyhow::Result;
use clap::{
    ColorChoice, CommandFactory, FromArgMatches, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color as ClapColor, RgbColor, Style},
    },
};
use colored::{Color as ThemeColor, control::ShouldColorize};
use std::path::PathBuf;

use commands::{
    check::{CheckArgs, handle_check},
    expand::{ExpandArgs, handle_expand},
    java::{JavaArgs, handle_java},
};
use context::ProjectContext;
use output::{GlobalOptions, OutputFormat, OutputManager};
use theme::PALETTE;

#[derive(Parser)]
#[command(name = "propweave")]
#[command(version)]
#[command(
    about = "Synthesize observable property accessors and change notification",
    long_about = r#"Expands `#[observable]` structs into accessors, listener registries
and change notification, and applies the same transformation to Java models.

Commands:
  expand    Print or write the expanded Rust source
  check     Report diagnostics without writing anything
  java      Transform a JSON model of a Java compilation unit
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Path to propweave.toml (searched upwards from the current directory by default)
    #[arg(long, global = true, env = "PROPWEAVE_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "table", global = true)]
    output: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand observable structs in a Rust file or directory
    Expand(ExpandArgs),

    /// Report diagnostics for a Rust file or directory
    Check(CheckArgs),

    /// Apply observable properties to a JSON Java model
    Java(JavaArgs),
}

impl Cli {
    fn parse_with_styles() -> Self {
        let use_color = ShouldColorize::from_env().should_colorize();
        let command = Cli::command()
            .styles(help_styles())
            .color(if use_color { ColorChoice::Auto } else { ColorChoice::Never });
        let matches = command.get_matches();
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

fn help_styles() -> Styles {
    let palette = &PALETTE;
    Styles::styled()
        .usage(style_from_color(palette.heading).bold())
        .header(style_from_color(palette.heading).bold())
        .literal(style_from_color(palette.literal))
        .placeholder(style_from_color(palette.muted))
        .valid(style_from_color(palette.ok))
        .invalid(style_from_color(palette.warning))
        .error(style_from_color(palette.error).bold())
}

fn style_from_color(color: ThemeColor) -> Style {
    Style::new().fg_color(Some(color_to_clap_color(color)))
}

fn color_to_clap_color(color: ThemeColor) -> ClapColor {
    match color {
        ThemeColor::Black => ClapColor::Ansi(AnsiColor::Black),
        ThemeColor::Red => ClapColor::Ansi(AnsiColor::Red),
        ThemeColor::Green => ClapColor::Ansi(AnsiColor::Green),
        ThemeColor::Yellow => ClapColor::Ansi(AnsiColor::Yellow),
        ThemeColor::Blue => ClapColor::Ansi(AnsiColor::Blue),
        ThemeColor::Magenta => ClapColor::Ansi(AnsiColor::Magenta),
        ThemeColor::Cyan => ClapColor::Ansi(AnsiColor::Cyan),
        ThemeColor::White => ClapColor::Ansi(AnsiColor::White),
        ThemeColor::BrightBlack => ClapColor::Ansi(AnsiColor::BrightBlack),
        ThemeColor::BrightRed => ClapColor::Ansi(AnsiColor::BrightRed),
        ThemeColor::BrightGreen => ClapColor::Ansi(AnsiColor::BrightGreen),
        ThemeColor::BrightYellow => ClapColor::Ansi(AnsiColor::BrightYellow),
        ThemeColor::BrightBlue => ClapColor::Ansi(AnsiColor::BrightBlue),
        ThemeColor::BrightMagenta => ClapColor::Ansi(AnsiColor::BrightMagenta),
        ThemeColor::BrightCyan => ClapColor::Ansi(AnsiColor::BrightCyan),
        ThemeColor::BrightWhite => ClapColor::Ansi(AnsiColor::BrightWhite),
        ThemeColor::TrueColor { r, g, b } => ClapColor::Rgb(RgbColor(r, g, b)),
    }
}

fn main() {
    let cli = Cli::parse_with_styles();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if let Err(err) = execute(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn execute(cli: Cli) -> Result<()> {
    let output = OutputManager::new(GlobalOptions {
        output_format: cli.output,
        quiet: cli.quiet,
        no_color: cli.no_color,
    });
    let context = ProjectContext::load(cli.config.as_deref())?;
    if let Some(path) = &context.config_path {
        log::debug!(
            "using configuration from {} (project root {})",
            path.display(),
            context.project_root.display()
        );
    }

    match cli.command {
        Commands::Expand(args) => handle_expand(args, &context, &output),
        Commands::Check(args) => handle_check(args, &context, &output),
        Commands::Java(args) => handle_java(args, &context, &output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from(["propweave", "check", "src", "--output", "json", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.output, OutputFormat::Json));
        assert!(matches!(cli.command, Commands::Check(_)));
    }
}
