use ratatui::style::{Color, Modifier, Style};

/// Iceberg-based color theme for the InShort TUI
///
/// Bluish dark palette, after iceberg.vim (https://github.com/cocopon/iceberg.vim).
#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    /// Primary background: deep blue-black (fills terminal)
    pub const BG: Color = Color::Rgb(22, 24, 33);

    /// Foreground: light blue-gray (primary text)
    pub const FG: Color = Color::Rgb(198, 200, 209);

    /// Secondary background: lighter blue-black (composer, prompt banner)
    pub const PANEL_BG: Color = Color::Rgb(30, 33, 50);

    /// Primary accent: blue
    pub const BLUE: Color = Color::Rgb(132, 160, 198);

    /// Secondary accent: cyan
    pub const CYAN: Color = Color::Rgb(137, 184, 194);

    /// Tertiary accent: purple
    pub const PURPLE: Color = Color::Rgb(160, 147, 199);

    /// Muted text: dimmed foreground
    pub const MUTED: Color = Color::Rgb(107, 112, 137);

    /// Fully faded text, barely distinguishable from the panel
    pub const FADED: Color = Color::Rgb(60, 65, 90);

    /// Border color
    pub const BORDER: Color = Color::Rgb(60, 65, 90);

    /// Base style for all text
    pub fn base() -> Style {
        Style::default().fg(Self::FG).bg(Self::BG)
    }

    /// Application title
    pub fn title() -> Style {
        Style::default().fg(Self::BLUE).bg(Self::BG).add_modifier(Modifier::BOLD)
    }

    /// Muted style (for secondary text)
    pub fn muted() -> Style {
        Style::default().fg(Self::MUTED).bg(Self::BG)
    }

    /// Panel style
    pub fn panel() -> Style {
        Style::default().fg(Self::FG).bg(Self::PANEL_BG)
    }

    /// Border style
    pub fn border() -> Style {
        Style::default().fg(Self::BORDER)
    }

    /// Key names in the footer hints
    pub fn key_hint() -> Style {
        Style::default().fg(Self::BLUE)
    }

    /// Label above the user's text in a turn
    pub fn user_label() -> Style {
        Style::default().fg(Self::CYAN).add_modifier(Modifier::BOLD)
    }

    /// Label above the service's answer in a turn
    pub fn assistant_label() -> Style {
        Style::default().fg(Self::PURPLE).add_modifier(Modifier::BOLD)
    }

    /// Rotating prompt: normal while shown, faded while transitioning
    pub fn prompt(visible: bool) -> Style {
        if visible {
            Style::default().fg(Self::FG).bg(Self::PANEL_BG).add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(Self::FADED).bg(Self::PANEL_BG).add_modifier(Modifier::DIM)
        }
    }

    /// Composer placeholder text
    pub fn placeholder() -> Style {
        Style::default().fg(Self::MUTED).bg(Self::PANEL_BG)
    }
}
