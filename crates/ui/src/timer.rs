//! Cancellable scheduled callbacks on the tokio runtime.
//!
//! Callbacks run on a spawned task, so they should only post messages back to the owner
//! (e.g. over an mpsc channel) rather than touch shared state.

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to a scheduled callback; cancels it when dropped
#[derive(Debug)]
pub struct TimerHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Stop the timer; a callback that has not started yet will not run
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// True once the backing task has exited (fired-once, cancelled, or aborted)
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Run `callback` every `period`, starting one period from now
pub fn schedule_repeating<F>(period: Duration, mut callback: F) -> TimerHandle
where
    F: FnMut() + Send + 'static,
{
    let token = CancellationToken::new();
    let cancelled = token.clone();

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = cancelled.cancelled() => break,
                _ = ticker.tick() => callback(),
            }
        }
    });

    TimerHandle { token, task }
}

/// Run `callback` once after `delay`
pub fn schedule_once<F>(delay: Duration, callback: F) -> TimerHandle
where
    F: FnOnce() + Send + 'static,
{
    let token = CancellationToken::new();
    let cancelled = token.clone();

    let task = tokio::spawn(async move {
        tokio::select! {
            biased;
            _ = cancelled.cancelled() => {}
            _ = tokio::time::sleep(delay) => callback(),
        }
    });

    TimerHandle { token, task }
}
