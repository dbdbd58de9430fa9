use crate::input::InputState;
use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::{Position, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

pub const PLACEHOLDER: &str = "What's on your mind?";

/// Bordered multi-line input box
///
/// Its height comes from [`InputState::height`]; when the draft has more rows than that,
/// the rows around the cursor are shown.
pub struct Composer<'a> {
    input: &'a InputState,
}

impl<'a> Composer<'a> {
    pub fn new(input: &'a InputState) -> Self {
        Self { input }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL).border_style(Theme::border()).style(Theme::panel());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        if self.input.is_empty() {
            let placeholder = Paragraph::new(Line::from(Span::styled(PLACEHOLDER, Theme::placeholder())));
            frame.render_widget(placeholder, inner);
            frame.set_cursor_position(Position::new(inner.x, inner.y));
            return;
        }

        let (row, col) = self.input.cursor_position();
        let first_row = row.saturating_sub(inner.height.saturating_sub(1));
        let lines: Vec<Line<'_>> = self.input.wrapped_lines().into_iter().map(Line::from).collect();

        frame.render_widget(Paragraph::new(lines).style(Theme::panel()).scroll((first_row, 0)), inner);

        let x = inner.x.saturating_add(col.min(inner.width.saturating_sub(1)));
        let y = inner.y.saturating_add(row - first_row);
        frame.set_cursor_position(Position::new(x, y));
    }
}
