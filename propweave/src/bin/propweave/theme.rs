//! Colours and glyphs for CLI output, keyed by what is being shown.

use colored::Color;
use comfy_table::Color as TableColor;
use once_cell::sync::Lazy;

use propweave::{MemberKind, Severity};

pub struct Palette {
    pub heading: Color,
    pub literal: Color,
    pub muted: Color,
    pub ok: Color,
    pub info: Color,
    pub warning: Color,
    pub error: Color,
    /// Getters and setters, the members users call.
    pub accessor: Color,
    /// Listener registries and the descriptor accessor.
    pub plumbing: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            heading: Color::BrightBlue,
            literal: Color::Magenta,
            muted: Color::BrightBlack,
            ok: Color::Green,
            info: Color::Blue,
            warning: Color::Yellow,
            error: Color::Red,
            accessor: Color::Cyan,
            plumbing: Color::BrightBlack,
        }
    }
}

impl Palette {
    pub fn severity(&self, severity: Severity) -> Color {
        match severity {
            Severity::Error => self.error,
            Severity::Warning => self.warning,
        }
    }

    pub fn member(&self, kind: MemberKind) -> Color {
        match kind {
            MemberKind::Getter | MemberKind::Setter => self.accessor,
            MemberKind::FieldListenerRegistry | MemberKind::BeanListenerRegistry | MemberKind::DescriptorAccessor => {
                self.plumbing
            }
        }
    }
}

/// comfy-table only knows the basic ANSI colours.
pub fn table_color(color: Color) -> TableColor {
    match color {
        Color::Red | Color::BrightRed => TableColor::Red,
        Color::Yellow | Color::BrightYellow => TableColor::Yellow,
        Color::Green | Color::BrightGreen => TableColor::Green,
        Color::Blue | Color::BrightBlue => TableColor::Blue,
        Color::Magenta | Color::BrightMagenta => TableColor::Magenta,
        Color::Cyan | Color::BrightCyan => TableColor::Cyan,
        Color::White | Color::BrightWhite => TableColor::White,
        _ => TableColor::Grey,
    }
}

pub static PALETTE: Lazy<Palette> = Lazy::new(Palette::default);

pub struct Glyphs {
    pub ok: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub info: &'static str,
    pub member: &'static str,
}

pub const GLYPHS: Glyphs = Glyphs {
    ok: "✓",
    error: "✗",
    warning: "⚠",
    info: "ℹ",
    member: "+",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registries_are_muted_next_to_accessors() {
        let palette = Palette::default();
        assert_eq!(palette.member(MemberKind::Setter), palette.member(MemberKind::Getter));
        assert_eq!(palette.member(MemberKind::BeanListenerRegistry), palette.muted);
        assert_ne!(palette.member(MemberKind::Setter), palette.member(MemberKind::FieldListenerRegistry));
    }

    #[test]
    fn severities_map_to_table_colours() {
        let palette = Palette::default();
        assert_eq!(table_color(palette.severity(Severity::Error)), TableColor::Red);
        assert_eq!(table_color(palette.severity(Severity::Warning)), TableColor::Yellow);
        assert_eq!(table_color(palette.heading), TableColor::Blue);
    }
}
