use crate::input::wrap_lines;
use crate::theme::Theme;
use crate::transcript::Turn;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

pub const USER_LABEL: &str = "You";
pub const ASSISTANT_LABEL: &str = "InShort";
/// Shown in place of an answer while its request is in flight
pub const PENDING_MARKER: &str = "…";

/// Transcript component: every turn as a labelled question and answer
///
/// Lines are laid out once at construction, so the scroll state and the renderer see the
/// same content height.
pub struct Transcript {
    lines: Vec<Line<'static>>,
}

impl Transcript {
    /// Lay out `turns` at the given width
    pub fn new(turns: &[Turn], width: u16) -> Self {
        let mut lines = Vec::new();

        for (i, turn) in turns.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }

            lines.push(Line::from(Span::styled(USER_LABEL, Theme::user_label())));
            lines.extend(wrap_lines(turn.user_text(), width).into_iter().map(Line::from));

            lines.push(Line::from(Span::styled(ASSISTANT_LABEL, Theme::assistant_label())));
            if turn.is_pending() {
                lines.push(Line::from(Span::styled(PENDING_MARKER, Theme::muted())));
            } else if !turn.ai_text().is_empty() {
                lines.extend(wrap_lines(turn.ai_text(), width).into_iter().map(Line::from));
            }
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    /// Scrollable content height
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Render starting `offset` lines from the top
    pub fn render(self, frame: &mut Frame<'_>, area: Rect, offset: usize) {
        let offset = u16::try_from(offset).unwrap_or(u16::MAX);
        let paragraph = Paragraph::new(self.lines).style(Theme::base()).scroll((offset, 0));
        frame.render_widget(paragraph, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChatError;
    use crate::transcript::Transcript as TranscriptState;

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn test_empty_transcript_has_no_lines() {
        assert!(Transcript::new(&[], 40).lines().is_empty());
    }

    #[test]
    fn test_pending_turn_shows_marker() {
        let mut state = TranscriptState::new();
        state.append_turn("hello").unwrap();

        let component = Transcript::new(state.turns(), 40);
        assert_eq!(texts(component.lines()), vec![USER_LABEL, "hello", ASSISTANT_LABEL, PENDING_MARKER]);
    }

    #[test]
    fn test_answered_and_failed_turns() {
        let mut state = TranscriptState::new();
        state.append_turn("first").unwrap();
        state.append_turn("second").unwrap();
        state.set_answer(0, "an answer").unwrap();
        state.mark_failed(1, ChatError::Transport("down".to_string())).unwrap();

        let component = Transcript::new(state.turns(), 40);
        assert_eq!(
            texts(component.lines()),
            vec![USER_LABEL, "first", ASSISTANT_LABEL, "an answer", "", USER_LABEL, "second", ASSISTANT_LABEL]
        );
    }

    #[test]
    fn test_render_matches_line_count() {
        use ratatui::{Terminal, backend::TestBackend};

        let mut state = TranscriptState::new();
        state.append_turn("hello").unwrap();
        state.set_answer(0, "world").unwrap();

        let component = Transcript::new(state.turns(), 20);
        assert_eq!(component.line_count(), 4);

        let mut terminal = Terminal::new(TestBackend::new(20, 4)).unwrap();
        terminal.draw(|frame| component.render(frame, frame.area(), 3)).unwrap();
        let first_row: String = (0..20).map(|x| terminal.backend().buffer()[(x, 0)].symbol().to_string()).collect();
        assert_eq!(first_row.trim_end(), "world");
    }

    #[test]
    fn test_long_answer_wraps() {
        let mut state = TranscriptState::new();
        state.append_turn("q").unwrap();
        state.set_answer(0, "one two three four five six").unwrap();

        let narrow = Transcript::new(state.turns(), 10).line_count();
        let wide = Transcript::new(state.turns(), 80).line_count();
        assert!(narrow > wide);
    }
}
