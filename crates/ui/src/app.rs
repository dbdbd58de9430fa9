pub mod event_loop;

use crate::components::{Composer, Footer, Header, PromptBanner, Transcript};
use crate::controller::{ChatController, KeyOutcome};
use crate::layout::ChatLayout;
use crossterm::event::{Event, KeyEvent};
use ratatui::Frame;

/// Main TUI application
///
/// Wraps the [`ChatController`] with exit handling and rendering.
pub struct App {
    controller: ChatController,
    pub should_exit: bool,
}

impl App {
    pub fn new(controller: ChatController) -> Self {
        Self { controller, should_exit: false }
    }

    pub fn controller(&self) -> &ChatController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut ChatController {
        &mut self.controller
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        let outcome = self.controller.handle_key(key);
        if outcome == KeyOutcome::Quit {
            self.should_exit = true;
        }
        outcome
    }

    pub fn handle_paste(&mut self, text: &str) {
        self.controller.handle_paste(text);
    }

    /// Route one terminal event; returns whether the screen needs a redraw
    pub fn handle_terminal_event(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) => {
                self.handle_key(key);
                true
            }
            Event::Paste(text) => {
                self.handle_paste(&text);
                true
            }
            Event::Resize(..) => true,
            _ => false,
        }
    }

    /// Draw one frame
    ///
    /// Layout feeds back into the controller: the composer width decides the draft height,
    /// and the transcript viewport size is mounted on the scroll state before drawing.
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        self.controller.input_mut().set_width(ChatLayout::composer_text_width(area.width));
        let layout = ChatLayout::calculate(area, self.controller.input().height());

        let transcript = Transcript::new(self.controller.transcript().turns(), layout.transcript.width);
        self.controller.scroll_mut().mount(transcript.line_count(), layout.transcript.height);
        let offset = self.controller.scroll().offset();

        let view = self.controller.view();
        Header::new().render(frame, layout.header);
        PromptBanner::new(&view).render(frame, layout.banner);
        transcript.render(frame, layout.transcript, offset);
        Composer::new(self.controller.input()).render(frame, layout.composer);
        Footer::new().render(frame, layout.footer);
    }
}
