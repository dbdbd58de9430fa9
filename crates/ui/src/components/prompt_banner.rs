use crate::controller::ChatView;
use crate::theme::Theme;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

/// The rotating suggestion above the transcript
///
/// While the prompt is fading out it is drawn in the faded style instead of being hidden,
/// so the row never collapses.
pub struct PromptBanner<'a> {
    prompt: &'a str,
    visible: bool,
}

impl<'a> PromptBanner<'a> {
    pub fn new(view: &ChatView<'a>) -> Self {
        Self { prompt: view.prompt, visible: view.prompt_visible }
    }

    pub fn render(&self, frame: &mut Frame<'_>, area: Rect) {
        let line = Line::from(Span::styled(self.prompt, Theme::prompt(self.visible)));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center).style(Theme::panel()), area);
    }
}
