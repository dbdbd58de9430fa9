use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

pub const COPYRIGHT: &str = "© 2024 InShort. All rights reserved.";

/// Key hints and copyright line
pub struct Footer;

impl Footer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let hints = Line::from(vec![
            Span::styled("[Enter]", Theme::key_hint()),
            Span::styled(" send  ", Theme::muted()),
            Span::styled("[Shift/Alt+Enter]", Theme::key_hint()),
            Span::styled(" newline  ", Theme::muted()),
            Span::styled("[PgUp/PgDn]", Theme::key_hint()),
            Span::styled(" scroll  ", Theme::muted()),
            Span::styled("[Esc]", Theme::key_hint()),
            Span::styled(" exit", Theme::muted()),
        ]);
        let copyright = Line::from(Span::styled(COPYRIGHT, Theme::muted()));

        frame.render_widget(
            Paragraph::new(vec![hints.alignment(Alignment::Right), copyright.alignment(Alignment::Center)])
                .style(Theme::base()),
            area,
        );
    }
}

impl Default for Footer {
    fn default() -> Self {
        Self::new()
    }
}
