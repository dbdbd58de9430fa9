use super::App;
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
    PushKeyboardEnhancementFlags,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::Result;
use std::{panic, time::Duration};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

/// Animation frame period for scroll smoothing
const FRAME_INTERVAL: Duration = Duration::from_millis(33);
/// How long the reader thread blocks in `poll` before checking for shutdown
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Read terminal events on a blocking thread and forward them
///
/// The thread exits once the receiving side is dropped.
fn spawn_event_reader(tx: mpsc::Sender<Event>) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "terminal read failed");
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "terminal poll failed");
                    break;
                }
            }
        }
    })
}

/// Enter raw mode and the alternate screen with bracketed paste
///
/// Returns whether keyboard enhancement flags were pushed. Without them Shift+Enter arrives as a
/// plain Enter, and Alt+Enter is the only newline key.
fn setup_terminal() -> Result<bool> {
    crossterm::terminal::enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen, EnableBracketedPaste)?;

    let enhanced = crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        crossterm::execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
    }
    tracing::debug!(keyboard_enhancement = enhanced, "terminal initialized");
    Ok(enhanced)
}

fn restore_terminal(enhanced: bool) -> Result<()> {
    let mut stdout = std::io::stdout();
    if enhanced {
        crossterm::execute!(stdout, PopKeyboardEnhancementFlags)?;
    }
    crossterm::terminal::disable_raw_mode()?;
    crossterm::execute!(stdout, DisableBracketedPaste, crossterm::terminal::LeaveAlternateScreen)?;
    Ok(())
}

pub async fn run(app: &mut App) -> Result<()> {
    let enhanced = setup_terminal()?;

    let backend = CrosstermBackend::new(std::io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let backend = CrosstermBackend::new(std::io::stdout());
        if let Ok(mut terminal) = Terminal::new(backend) {
            let _ = terminal.show_cursor();
        }
        let _ = restore_terminal(enhanced);
        original_hook(panic_info);
    }));

    let (event_tx, mut event_rx) = mpsc::channel::<Event>(64);
    let reader = spawn_event_reader(event_tx);

    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    app.controller_mut().start();
    terminal.clear()?;
    terminal.draw(|frame| app.render(frame))?;

    while !app.should_exit {
        let mut dirty = false;

        tokio::select! {
            maybe_event = event_rx.recv() => match maybe_event {
                Some(event) => dirty = app.handle_terminal_event(event),
                None => {
                    tracing::warn!("terminal event reader stopped");
                    app.should_exit = true;
                }
            },
            maybe_controller_event = app.controller_mut().next_event() => {
                if let Some(event) = maybe_controller_event {
                    app.controller_mut().handle_event(event);
                    dirty = true;
                }
            }
            _ = frames.tick() => {
                dirty = app.controller_mut().tick();
            }
        }

        if dirty && !app.should_exit {
            terminal.draw(|frame| app.render(frame))?;
        }
    }

    app.controller_mut().shutdown();
    drop(event_rx);
    if let Err(e) = reader.await {
        tracing::debug!(error = %e, "event reader task ended abnormally");
    }

    terminal.show_cursor()?;
    restore_terminal(enhanced)?;

    Ok(())
}
