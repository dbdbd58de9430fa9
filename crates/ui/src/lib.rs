pub mod app;
pub mod components;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod layout;
pub mod rotator;
pub mod scroll;
pub mod theme;
pub mod timer;
pub mod transcript;

pub use app::App;
pub use controller::{ChatController, ChatView, ControllerEvent, KeyOutcome};
pub use dispatch::{DispatchOutcome, ResponseDispatcher};
pub use error::ChatError;
pub use input::{InputAction, InputState};
pub use rotator::{PromptCycle, RotationTimers};
pub use scroll::ScrollSync;
pub use theme::Theme;
pub use transcript::{Transcript, Turn, TurnStatus};
