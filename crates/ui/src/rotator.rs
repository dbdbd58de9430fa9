use crate::controller::ControllerEvent;
use crate::timer::{self, TimerHandle};
use inshort_core::{ConfigError, RotationConfig};
use tokio::sync::mpsc::UnboundedSender;

/// Rotating placeholder prompt shown above the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptCycle {
    prompts: Vec<String>,
    current_index: usize,
    visible: bool,
}

impl PromptCycle {
    pub fn new(prompts: Vec<String>) -> Result<Self, ConfigError> {
        if prompts.is_empty() {
            return Err(ConfigError::EmptyPrompts);
        }
        Ok(Self { prompts, current_index: 0, visible: true })
    }

    pub fn current(&self) -> &str {
        &self.prompts[self.current_index]
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    /// Index the next rotation will land on
    pub fn next_index(&self) -> usize {
        (self.current_index + 1) % self.prompts.len()
    }

    /// Start fading out the current prompt
    pub fn begin_fade(&mut self) {
        self.visible = false;
    }

    /// Show the next prompt
    pub fn complete_rotation(&mut self) {
        self.current_index = self.next_index();
        self.visible = true;
    }

    /// Both halves of a rotation at once
    pub fn advance(&mut self) {
        self.begin_fade();
        self.complete_rotation();
    }
}

/// The two scheduled callbacks driving a [`PromptCycle`]
///
/// The repeating timer posts [`ControllerEvent::FadeOut`] every interval; each fade-out
/// schedules a one-shot [`ControllerEvent::Rotate`] after the fade delay.
#[derive(Debug)]
pub struct RotationTimers {
    timing: RotationConfig,
    cadence: Option<TimerHandle>,
    fade: Option<TimerHandle>,
}

impl RotationTimers {
    pub fn new(timing: RotationConfig) -> Result<Self, ConfigError> {
        if timing.fade_ms >= timing.interval_ms {
            return Err(ConfigError::FadeNotShorterThanInterval {
                fade_ms: timing.fade_ms,
                interval_ms: timing.interval_ms,
            });
        }
        Ok(Self { timing, cadence: None, fade: None })
    }

    /// Start the cadence timer (restarts it if already running)
    pub fn start(&mut self, events: UnboundedSender<ControllerEvent>) {
        self.cadence = Some(timer::schedule_repeating(self.timing.interval(), move || {
            let _ = events.send(ControllerEvent::FadeOut);
        }));
    }

    /// Schedule the second half of a rotation
    pub fn schedule_rotate(&mut self, events: UnboundedSender<ControllerEvent>) {
        self.fade = Some(timer::schedule_once(self.timing.fade(), move || {
            let _ = events.send(ControllerEvent::Rotate);
        }));
    }

    pub fn is_running(&self) -> bool {
        self.cadence.as_ref().is_some_and(|handle| !handle.is_cancelled())
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.cadence.take() {
            handle.cancel();
        }
        if let Some(handle) = self.fade.take() {
            handle.cancel();
        }
    }
}
