use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

pub const TITLE: &str = "InShort";
pub const TAGLINE: &str = "Your personalized news and insights";

/// Title block at the top of the screen
pub struct Header;

impl Header {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(TITLE, Theme::title())),
            Line::from(Span::styled(TAGLINE, Theme::muted())),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).style(Theme::base()), area);
    }
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}
