use crate::dispatch::{DispatchOutcome, ResponseDispatcher};
use crate::error::ChatError;
use crate::input::{InputAction, InputState};
use crate::rotator::{PromptCycle, RotationTimers};
use crate::scroll::ScrollSync;
use crate::transcript::{Transcript, Turn};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use inshort_core::{ChatConfig, Result};
use inshort_providers::SummaryProvider;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Messages posted back to the controller by timers and in-flight requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// Cadence tick: start fading out the current prompt
    FadeOut,
    /// Fade finished: show the next prompt
    Rotate,
    /// A request settled
    Dispatched(DispatchOutcome),
}

/// Result of handling a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Key was handled (or ignored); keep running
    Continue,
    /// A turn was appended at this index
    Submitted(usize),
    Quit,
}

/// Read-only snapshot of everything the view renders
#[derive(Debug, Clone, Copy)]
pub struct ChatView<'a> {
    pub turns: &'a [Turn],
    pub prompt: &'a str,
    pub prompt_visible: bool,
    pub draft: &'a str,
    pub draft_height: u16,
}

/// Owns the chat state and is the only place it is mutated
///
/// Timers and requests run on their own tasks and report back through
/// [`ControllerEvent`]s, which the owner feeds to [`ChatController::handle_event`].
pub struct ChatController {
    cycle: PromptCycle,
    rotation: RotationTimers,
    transcript: Transcript,
    input: InputState,
    scroll: ScrollSync,
    dispatcher: ResponseDispatcher,
    events_tx: UnboundedSender<ControllerEvent>,
    events_rx: UnboundedReceiver<ControllerEvent>,
    shut_down: bool,
}

impl ChatController {
    pub fn new(config: ChatConfig, provider: Arc<dyn SummaryProvider>) -> Result<Self> {
        config.validate()?;
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        Ok(Self {
            cycle: PromptCycle::new(config.prompts)?,
            rotation: RotationTimers::new(config.rotation)?,
            transcript: Transcript::new(),
            input: InputState::new(config.composer),
            scroll: ScrollSync::new(),
            dispatcher: ResponseDispatcher::new(provider, events_tx.clone(), config.max_body_chars),
            events_tx,
            events_rx,
            shut_down: false,
        })
    }

    /// Start the prompt rotation; must run inside a tokio runtime
    pub fn start(&mut self) {
        if !self.shut_down {
            self.rotation.start(self.events_tx.clone());
        }
    }

    /// Cancel timers and ignore any responses still in flight
    pub fn shutdown(&mut self) {
        self.rotation.cancel();
        self.scroll.unmount();
        self.shut_down = true;
        tracing::debug!(turns = self.transcript.len(), pending = self.transcript.pending_count(), "chat controller shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.kind != KeyEventKind::Press {
            return KeyOutcome::Continue;
        }

        match key.code {
            KeyCode::Esc => return KeyOutcome::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return KeyOutcome::Quit,
            KeyCode::PageUp => {
                let page = self.scroll.page();
                self.scroll.scroll_up(page);
                return KeyOutcome::Continue;
            }
            KeyCode::PageDown => {
                let page = self.scroll.page();
                self.scroll.scroll_down(page);
                return KeyOutcome::Continue;
            }
            _ => {}
        }

        match self.input.on_key_down(key) {
            InputAction::Submit => self.try_submit().map_or(KeyOutcome::Continue, KeyOutcome::Submitted),
            _ => KeyOutcome::Continue,
        }
    }

    /// Insert pasted text at the cursor without submitting
    ///
    /// Carriage returns from the terminal are normalised to `\n`.
    pub fn handle_paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        self.input.insert_str(&text);
    }

    /// Replace the draft wholesale
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.input.on_change(text);
    }

    /// Submit the current draft
    ///
    /// Returns the new turn's index, or `None` if the draft was blank (nothing changes then).
    pub fn try_submit(&mut self) -> Option<usize> {
        let user_text = self.input.try_submit()?;

        match self.transcript.append_turn(user_text.clone()) {
            Ok(index) => {
                tracing::debug!(turn_index = index, chars = user_text.chars().count(), "turn submitted");
                self.dispatcher.send(user_text, index);
                self.scroll.observe(self.transcript.revision());
                Some(index)
            }
            Err(err) => {
                tracing::debug!(error = %err, "submission rejected");
                None
            }
        }
    }

    pub fn handle_event(&mut self, event: ControllerEvent) {
        match event {
            ControllerEvent::FadeOut => {
                if self.shut_down {
                    return;
                }
                self.cycle.begin_fade();
                self.rotation.schedule_rotate(self.events_tx.clone());
            }
            ControllerEvent::Rotate => {
                if !self.shut_down {
                    self.cycle.complete_rotation();
                }
            }
            ControllerEvent::Dispatched(outcome) => self.apply_outcome(outcome),
        }
    }

    fn apply_outcome(&mut self, outcome: DispatchOutcome) {
        if self.shut_down {
            tracing::debug!(turn_index = outcome.turn_index, "response after shutdown ignored");
            return;
        }

        let index = outcome.turn_index;
        let written = match outcome.result {
            Ok(answer) => self.transcript.set_answer(index, answer),
            Err(err) => self.transcript.mark_failed(index, err),
        };

        match written {
            Ok(()) => self.scroll.observe(self.transcript.revision()),
            Err(ChatError::StaleAnswer { index }) => tracing::debug!(turn_index = index, "stale answer dropped"),
            Err(err) => tracing::debug!(error = %err, "answer not applied"),
        }
    }

    /// Wait for the next timer or response message
    pub async fn next_event(&mut self) -> Option<ControllerEvent> {
        self.events_rx.recv().await
    }

    /// Wait for one message and apply it
    pub async fn pump(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.handle_event(event);
                true
            }
            None => false,
        }
    }

    /// Apply every message already queued, without waiting
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
            applied += 1;
        }
        applied
    }

    /// Pump messages until the given turn is no longer pending
    pub async fn settle(&mut self, index: usize) -> Option<&Turn> {
        while self.transcript.get(index).is_some_and(Turn::is_pending) {
            if !self.pump().await {
                break;
            }
        }
        self.transcript.get(index)
    }

    /// One animation frame; returns true if anything visible moved
    pub fn tick(&mut self) -> bool {
        self.scroll.step()
    }

    pub fn view(&self) -> ChatView<'_> {
        ChatView {
            turns: self.transcript.turns(),
            prompt: self.cycle.current(),
            prompt_visible: self.cycle.is_visible(),
            draft: self.input.text(),
            draft_height: self.input.height(),
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn prompt_cycle(&self) -> &PromptCycle {
        &self.cycle
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn scroll(&self) -> &ScrollSync {
        &self.scroll
    }

    pub fn scroll_mut(&mut self) -> &mut ScrollSync {
        &mut self.scroll
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.rotation.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TurnStatus;
    use inshort_core::RotationConfig;
    use inshort_providers::{MockProvider, MockReply};
    use std::time::Duration;

    fn config(prompts: &[&str]) -> ChatConfig {
        ChatConfig { prompts: prompts.iter().map(|p| p.to_string()).collect(), ..ChatConfig::default() }
    }

    fn controller(provider: MockProvider) -> ChatController {
        ChatController::new(ChatConfig::default(), Arc::new(provider)).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let provider: Arc<dyn SummaryProvider> = Arc::new(MockProvider::new());
        assert!(ChatController::new(config(&[]), provider.clone()).is_err());

        let bad_timing = ChatConfig { rotation: RotationConfig { interval_ms: 100, fade_ms: 200 }, ..ChatConfig::default() };
        assert!(ChatController::new(bad_timing, provider).is_err());
    }

    #[tokio::test]
    async fn test_initial_view() {
        let controller = ChatController::new(config(&["A", "B"]), Arc::new(MockProvider::new())).unwrap();
        let view = controller.view();
        assert!(view.turns.is_empty());
        assert_eq!(view.prompt, "A");
        assert!(view.prompt_visible);
        assert_eq!(view.draft, "");
        assert_eq!(view.draft_height, 1);
    }

    #[tokio::test]
    async fn test_submit_hello_then_answer() {
        let provider = MockProvider::new().push(MockReply::answer("hi"));
        let mut controller = controller(provider);

        controller.set_draft("  hello  ");
        let index = controller.try_submit().unwrap();

        assert_eq!(index, 0);
        assert_eq!(controller.transcript().len(), 1);
        assert_eq!(controller.transcript().get(0).unwrap().user_text(), "hello");
        assert_eq!(controller.transcript().get(0).unwrap().ai_text(), "");
        assert_eq!(controller.view().draft, "");

        let turn = controller.settle(index).await.unwrap();
        assert_eq!(turn.user_text(), "hello");
        assert_eq!(turn.ai_text(), "hi");
    }

    #[tokio::test]
    async fn test_submit_grows_transcript_by_one() {
        let mut controller = controller(MockProvider::always("ok"));
        for (n, draft) in ["a", " b ", "multi\nline", "\ttabbed\t"].iter().enumerate() {
            controller.set_draft(*draft);
            assert_eq!(controller.try_submit(), Some(n));
            assert_eq!(controller.transcript().len(), n + 1);

            let turn = controller.transcript().last().unwrap();
            assert_eq!(turn.user_text(), draft.trim());
            assert_eq!(turn.ai_text(), "");
        }
    }

    #[tokio::test]
    async fn test_blank_submission_is_noop() {
        let provider = Arc::new(MockProvider::always("ok"));
        let mut controller = ChatController::new(ChatConfig::default(), provider.clone()).unwrap();

        for blank in ["", "   ", "\n", " \t\n "] {
            controller.set_draft(blank);
            assert_eq!(controller.try_submit(), None);
            assert!(controller.transcript().is_empty());
        }

        tokio::task::yield_now().await;
        assert!(provider.received().is_empty());
    }

    #[tokio::test]
    async fn test_failures_leave_answer_empty() {
        let provider = MockProvider::new()
            .push(MockReply::Status(503, r#"{"response":"nope"}"#.to_string()))
            .push(MockReply::Raw("definitely not json".to_string()))
            .push(MockReply::TransportError("connection refused".to_string()));
        let mut controller = controller(provider);

        for draft in ["status", "decode", "transport"] {
            controller.set_draft(draft);
            let index = controller.try_submit().unwrap();
            let turn = controller.settle(index).await.unwrap();
            assert_eq!(turn.ai_text(), "");
            assert!(matches!(turn.status(), TurnStatus::Failed(_)));
        }

        let statuses: Vec<_> = controller.transcript().turns().iter().map(|t| t.status().clone()).collect();
        assert!(matches!(statuses[0], TurnStatus::Failed(ChatError::Transport(_))));
        assert!(matches!(statuses[1], TurnStatus::Failed(ChatError::Decode(_))));
        assert!(matches!(statuses[2], TurnStatus::Failed(ChatError::Transport(_))));
    }

    #[tokio::test]
    async fn test_success_touches_only_target_turn() {
        let provider = MockProvider::new().push(MockReply::answer("one")).push(MockReply::answer("X"));
        let mut controller = controller(provider);

        controller.set_draft("first");
        let first = controller.try_submit().unwrap();
        controller.settle(first).await;

        controller.set_draft("second");
        let second = controller.try_submit().unwrap();
        controller.settle(second).await;

        assert_eq!(controller.transcript().get(first).unwrap().ai_text(), "one");
        assert_eq!(controller.transcript().get(second).unwrap().ai_text(), "X");
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_order_completion() {
        let provider = MockProvider::new()
            .on_query("first", MockReply::answer("answer to first"), Duration::from_secs(3))
            .on_query("second", MockReply::answer("answer to second"), Duration::from_millis(100));
        let mut controller = controller(provider);

        controller.set_draft("first");
        let first = controller.try_submit().unwrap();
        controller.set_draft("second");
        let second = controller.try_submit().unwrap();

        controller.settle(second).await;
        assert_eq!(controller.transcript().get(second).unwrap().ai_text(), "answer to second");
        assert!(controller.transcript().get(first).unwrap().is_pending());

        controller.settle(first).await;
        assert_eq!(controller.transcript().get(first).unwrap().ai_text(), "answer to first");
        assert_eq!(controller.transcript().get(second).unwrap().ai_text(), "answer to second");
    }

    #[tokio::test]
    async fn test_stale_outcome_is_dropped() {
        let mut controller = controller(MockProvider::new());
        controller.handle_event(ControllerEvent::Dispatched(DispatchOutcome {
            turn_index: 9,
            result: Ok("ghost".to_string()),
        }));
        assert!(controller.transcript().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_sequence_a_b_a() {
        let mut controller = ChatController::new(config(&["A", "B"]), Arc::new(MockProvider::new())).unwrap();
        controller.start();

        let mut shown = vec![controller.view().prompt.to_string()];
        while shown.len() < 3 {
            let event = controller.next_event().await.unwrap();
            let is_rotate = event == ControllerEvent::Rotate;
            controller.handle_event(event);
            if is_rotate {
                assert!(controller.view().prompt_visible);
                shown.push(controller.view().prompt.to_string());
            } else {
                assert!(!controller.view().prompt_visible);
            }
        }

        assert_eq!(shown, vec!["A", "B", "A"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_rotation_timing() {
        let mut controller = ChatController::new(config(&["A", "B", "C"]), Arc::new(MockProvider::new())).unwrap();
        let start = tokio::time::Instant::now();
        controller.start();

        assert!(controller.pump().await);
        assert_eq!(start.elapsed(), Duration::from_millis(4000));
        assert!(!controller.prompt_cycle().is_visible());
        assert_eq!(controller.prompt_cycle().current(), "A");

        assert!(controller.pump().await);
        assert_eq!(start.elapsed(), Duration::from_millis(4500));
        assert!(controller.prompt_cycle().is_visible());
        assert_eq!(controller.prompt_cycle().current(), "B");
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_rotation_and_ignores_late_answers() {
        let provider = MockProvider::new().push_delayed(MockReply::answer("late"), Duration::from_secs(1));
        let mut controller = controller(provider);
        controller.start();

        controller.set_draft("hello");
        let index = controller.try_submit().unwrap();
        controller.shutdown();
        assert!(controller.is_shut_down());

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(controller.drain(), 1);

        assert_eq!(controller.transcript().get(index).unwrap().ai_text(), "");
        assert_eq!(controller.prompt_cycle().current_index(), 0);
        assert!(controller.prompt_cycle().is_visible());
    }

    #[tokio::test]
    async fn test_handle_key_flow() {
        let mut controller = controller(MockProvider::always("pong"));

        for c in "ping".chars() {
            assert_eq!(controller.handle_key(key(KeyCode::Char(c))), KeyOutcome::Continue);
        }
        controller.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::SHIFT));
        assert_eq!(controller.view().draft, "ping\n");
        assert_eq!(controller.view().draft_height, 2);

        assert_eq!(controller.handle_key(key(KeyCode::Enter)), KeyOutcome::Submitted(0));
        assert_eq!(controller.view().draft_height, 1);
        assert_eq!(controller.settle(0).await.unwrap().ai_text(), "pong");

        assert_eq!(controller.handle_key(key(KeyCode::Enter)), KeyOutcome::Continue);
        assert_eq!(controller.transcript().len(), 1);

        assert_eq!(controller.handle_key(key(KeyCode::Esc)), KeyOutcome::Quit);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(controller.handle_key(ctrl_c), KeyOutcome::Quit);
    }

    #[tokio::test]
    async fn test_paste_inserts_multiline_without_submitting() {
        let mut controller = controller(MockProvider::always("ok"));
        controller.handle_key(key(KeyCode::Char('>')));

        controller.handle_paste("line1\r\nline2\rline3");
        assert_eq!(controller.view().draft, ">line1\nline2\nline3");
        assert_eq!(controller.view().draft_height, 3);
        assert!(controller.transcript().is_empty());

        assert_eq!(controller.handle_key(key(KeyCode::Enter)), KeyOutcome::Submitted(0));
        assert_eq!(controller.transcript().get(0).unwrap().user_text(), ">line1\nline2\nline3");
    }

    #[tokio::test]
    async fn test_key_release_ignored() {
        let mut controller = controller(MockProvider::new());
        let mut release = key(KeyCode::Char('x'));
        release.kind = KeyEventKind::Release;
        controller.handle_key(release);
        assert_eq!(controller.view().draft, "");
    }

    #[tokio::test]
    async fn test_transcript_change_pins_scroll() {
        let mut controller = controller(MockProvider::always("ok"));
        controller.scroll_mut().mount(100, 10);
        controller.scroll_mut().scroll_up(5);
        assert!(!controller.scroll().is_pinned());

        controller.set_draft("hello");
        controller.try_submit();
        assert!(controller.scroll().is_pinned());

        let mut frames = 0;
        while controller.tick() {
            frames += 1;
        }
        assert!(frames > 0);
        assert!(controller.scroll().is_at_bottom());
    }

    #[tokio::test]
    async fn test_page_keys_scroll_manually() {
        let mut controller = controller(MockProvider::new());
        controller.scroll_mut().mount(100, 10);
        controller.scroll_mut().scroll_to_end();

        controller.handle_key(key(KeyCode::PageUp));
        assert_eq!(controller.scroll().offset(), 81);
        assert!(!controller.scroll().is_pinned());

        controller.handle_key(key(KeyCode::PageDown));
        assert_eq!(controller.scroll().offset(), 90);
        assert!(controller.scroll().is_pinned());
    }
}
