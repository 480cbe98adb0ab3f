use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Table};
use serde::Serialize;

use propweave::InjectedMember;

use crate::theme::{GLYPHS, PALETTE, table_color};

/// Output format options for CLI commands
#[derive(Clone, Debug, ValueEnum, Default, PartialEq)]
pub enum OutputFormat {
    /// Formatted table output (default)
    #[default]
    Table,
    /// JSON output for scripting
    Json,
    /// Compact single-line output
    Compact,
}

/// Global CLI options that affect output and behavior
#[derive(Clone, Debug, Default)]
pub struct GlobalOptions {
    pub output_format: OutputFormat,
    pub quiet: bool,
    pub no_color: bool,
}

/// Data that can be displayed as a table
pub trait TableDisplay {
    fn to_table(&self, options: &GlobalOptions) -> Table;
    fn to_compact(&self) -> String;
}

/// Output manager handles formatting and display
pub struct OutputManager {
    pub options: GlobalOptions,
}

impl OutputManager {
    pub fn new(options: GlobalOptions) -> Self {
        Self { options }
    }

    /// Display data according to the configured output format
    pub fn display<T>(&self, data: &T) -> Result<()>
    where
        T: Serialize + TableDisplay,
    {
        if self.options.quiet {
            return Ok(());
        }

        match self.options.output_format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                println!("{json}");
            }
            OutputFormat::Table => {
                let table = data.to_table(&self.options);
                println!("{table}");
            }
            OutputFormat::Compact => {
                println!("{}", data.to_compact());
            }
        }
        Ok(())
    }

    pub fn success(&self, message: &str) {
        if !self.options.quiet {
            println!("{}", self.paint(GLYPHS.ok, message, PALETTE.ok));
        }
    }

    /// Errors go to stderr and are shown even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.paint(GLYPHS.error, message, PALETTE.error));
    }

    /// Warnings go to stderr so they never mix with generated source on stdout.
    pub fn warning(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", self.paint(GLYPHS.warning, message, PALETTE.warning));
        }
    }

    pub fn info(&self, message: &str) {
        if !self.options.quiet {
            eprintln!("{}", self.paint(GLYPHS.info, message, PALETTE.info));
        }
    }

    pub fn heading(&self, text: &str) {
        if !self.options.quiet {
            let output = if self.options.no_color {
                format!("\n{text}\n{}", "=".repeat(text.len()))
            } else {
                format!("\n{}", text.color(PALETTE.heading).bold())
            };
            eprintln!("{output}");
        }
    }

    /// One injected member, coloured by what kind of member it is.
    pub fn member(&self, member: &InjectedMember) {
        if !self.options.quiet {
            eprintln!("{}", self.member_line(member));
        }
    }

    fn member_line(&self, member: &InjectedMember) -> String {
        let name = format!("{}::{}", member.class, member.name);
        let kind = format!("({:?})", member.kind);
        if self.options.no_color {
            format!("  {} {name} {kind}", GLYPHS.member)
        } else {
            format!(
                "  {} {} {}",
                GLYPHS.member.color(PALETTE.muted),
                name.color(PALETTE.member(member.kind)),
                kind.color(PALETTE.muted)
            )
        }
    }

    /// Create a themed table
    pub fn create_table(options: &GlobalOptions) -> Table {
        let mut table = Table::new();
        if !options.no_color {
            table.load_preset(comfy_table::presets::UTF8_FULL_CONDENSED);
        } else {
            table.load_preset(comfy_table::presets::ASCII_FULL);
        }
        table
    }

    /// Add themed header to table
    pub fn add_table_header(options: &GlobalOptions, table: &mut Table, headers: &[&str]) {
        let header_cells: Vec<Cell> = headers
            .iter()
            .map(|h| {
                let cell = Cell::new(h).add_attribute(Attribute::Bold);
                if options.no_color { cell } else { cell.fg(table_color(PALETTE.heading)) }
            })
            .collect();
        table.set_header(header_cells);
    }

    fn paint(&self, icon: &str, message: &str, color: colored::Color) -> String {
        if self.options.no_color {
            format!("{icon} {message}")
        } else {
            format!("{} {}", icon.color(color), message.color(color))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct TestData {
        name: String,
        value: i32,
    }

    impl TableDisplay for TestData {
        fn to_table(&self, options: &GlobalOptions) -> Table {
            let mut table = OutputManager::create_table(options);
            table.add_row(vec![Cell::new("Name"), Cell::new(&self.name)]);
            table.add_row(vec![Cell::new("Value"), Cell::new(self.value.to_string())]);
            table
        }

        fn to_compact(&self) -> String {
            format!("{}={}", self.name, self.value)
        }
    }

    #[test]
    fn json_output_serializes() {
        let manager = OutputManager::new(GlobalOptions {
            output_format: OutputFormat::Json,
            ..Default::default()
        });
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };
        assert!(manager.display(&data).is_ok());
        assert_eq!(data.to_compact(), "test=42");
    }

    #[test]
    fn quiet_output_is_silent() {
        let manager = OutputManager::new(GlobalOptions {
            quiet: true,
            ..Default::default()
        });
        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };
        assert!(manager.display(&data).is_ok());
    }

    #[test]
    fn member_lines_name_the_class_and_kind() {
        let manager = OutputManager::new(GlobalOptions {
            no_color: true,
            ..Default::default()
        });
        let member = InjectedMember {
            class: "Person".to_string(),
            kind: propweave::MemberKind::Setter,
            name: "set_name".to_string(),
        };
        assert_eq!(manager.member_line(&member), "  + Person::set_name (Setter)");
    }
}
