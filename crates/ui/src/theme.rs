use ratatui::style::{Color, Modifier, Style};

/// Color theme for the palaver TUI
///
/// Warm dark palette loosely based on gruvbox.
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    /// Background
    pub const BG: Color = Color::Rgb(29, 32, 33);

    /// Primary text
    pub const FG: Color = Color::Rgb(235, 219, 178);

    /// Input line and selected rows
    pub const PANEL_BG: Color = Color::Rgb(50, 48, 47);

    /// User turns
    pub const BLUE: Color = Color::Rgb(131, 165, 152);

    /// Assistant turns
    pub const GREEN: Color = Color::Rgb(184, 187, 38);

    /// System turns
    pub const PURPLE: Color = Color::Rgb(211, 134, 155);

    /// Notices
    pub const YELLOW: Color = Color::Rgb(250, 189, 47);

    /// Errors
    pub const RED: Color = Color::Rgb(251, 73, 52);

    /// Help text and timestamps
    pub const MUTED: Color = Color::Rgb(146, 131, 116);

    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED)
    }

    pub fn error() -> Style {
        Style::default().fg(Self::RED)
    }

    pub fn warning() -> Style {
        Style::default().fg(Self::YELLOW)
    }

    pub fn panel() -> Style {
        Style::default().fg(Self::FG).bg(Self::PANEL_BG)
    }

    /// Highlighted browser row
    pub fn active() -> Style {
        Style::default().fg(Self::FG).bg(Self::PANEL_BG).add_modifier(Modifier::BOLD)
    }

    /// Color for a speaker role; unknown roles use the plain foreground
    pub fn role_color(role: &str) -> Color {
        match role {
            "user" => Self::BLUE,
            "assistant" => Self::GREEN,
            "system" => Self::PURPLE,
            _ => Self::FG,
        }
    }

    /// Bold role label
    pub fn role_style(role: &str) -> Style {
        Style::default().fg(Self::role_color(role)).add_modifier(Modifier::BOLD)
    }
}
