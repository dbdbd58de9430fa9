use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Header rows: title and tagline
pub const HEADER_HEIGHT: u16 = 2;
/// Prompt banner row
pub const BANNER_HEIGHT: u16 = 1;
/// Footer rows: key hints and copyright
pub const FOOTER_HEIGHT: u16 = 2;
/// Borders around the composer text
const COMPOSER_CHROME: u16 = 2;

/// Calculated layout for the chat screen, top to bottom
#[derive(Debug, Clone)]
pub struct ChatLayout {
    pub header: Rect,
    pub banner: Rect,
    /// Transcript viewport
    pub transcript: Rect,
    /// Composer including its border
    pub composer: Rect,
    pub footer: Rect,
}

impl ChatLayout {
    /// Split `area` given the number of text rows the composer needs
    pub fn calculate(area: Rect, composer_rows: u16) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(BANNER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(composer_rows.saturating_add(COMPOSER_CHROME)),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        Self { header: chunks[0], banner: chunks[1], transcript: chunks[2], composer: chunks[3], footer: chunks[4] }
    }

    /// Text width inside the composer border for a given screen width
    pub fn composer_text_width(screen_width: u16) -> u16 {
        screen_width.saturating_sub(COMPOSER_CHROME).max(1)
    }
}
