//! Wall-clock driver for the session machine.
//!
//! The ticker never touches the machine itself. It schedules a single
//! one-shot timer on the tokio runtime that posts a [`Tick`] into a
//! channel; the owner feeds accepted ticks to `SessionMachine::tick()` and
//! calls [`ClockTicker::sync`] again to arm the next one.
//!
//! Every tick carries the generation it was armed under. Cancelling bumps
//! the generation, so a tick that was already sitting in the channel when
//! the countdown paused is rejected by [`ClockTicker::accept`].

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::events::Event;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    generation: u64,
}

pub struct ClockTicker {
    interval: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    sink: UnboundedSender<Tick>,
}

impl ClockTicker {
    pub fn new(interval: Duration, sink: UnboundedSender<Tick>) -> Self {
        Self {
            interval,
            generation: 0,
            pending: None,
            sink,
        }
    }

    /// Ticker plus the receiving end of its tick channel.
    pub fn channel(interval: Duration) -> (Self, UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(interval, tx), rx)
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Arm or cancel according to the machine's state.
    ///
    /// Arms only when running with time left and nothing is pending, so
    /// repeated calls never stack callbacks.
    pub fn sync(&mut self, running: bool, remaining_secs: u32) {
        if running && remaining_secs > 0 {
            if self.pending.is_none() {
                self.arm();
            }
        } else {
            self.cancel();
        }
    }

    /// Re-sync after a command or tick. An event that starts a new
    /// countdown revokes the tick armed for the previous one first.
    pub fn follow(&mut self, event: Option<&Event>, running: bool, remaining_secs: u32) {
        if event.is_some_and(Event::restarts_countdown) {
            self.cancel();
        }
        self.sync(running, remaining_secs);
    }

    /// Revoke the pending tick, if any. Ticks already delivered to the
    /// channel become stale.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns true if `tick` belongs to the current generation. Consumes
    /// the pending slot so the next `sync` can re-arm.
    pub fn accept(&mut self, tick: Tick) -> bool {
        if tick.generation != self.generation || self.pending.is_none() {
            tracing::trace!(
                stale = tick.generation,
                current = self.generation,
                "dropping stale tick"
            );
            return false;
        }
        self.pending = None;
        true
    }

    fn arm(&mut self) {
        let tick = Tick {
            generation: self.generation,
        };
        let sink = self.sink.clone();
        let interval = self.interval;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            // Receiver gone means the owner shut down.
            let _ = sink.send(tick);
        }));
    }
}

impl Drop for ClockTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn delivers_tick_after_interval() {
        let (mut ticker, mut rx) = ClockTicker::channel(DEFAULT_TICK_INTERVAL);
        ticker.sync(true, 10);
        assert!(ticker.is_armed());

        let tick = rx.recv().await.unwrap();
        assert!(ticker.accept(tick));
        assert!(!ticker.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_arm_without_time_left() {
        let (mut ticker, _rx) = ClockTicker::channel(DEFAULT_TICK_INTERVAL);
        ticker.sync(true, 0);
        assert!(!ticker.is_armed());
        ticker.sync(false, 10);
        assert!(!ticker.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_toggling_keeps_one_pending_tick() {
        let (mut ticker, mut rx) = ClockTicker::channel(DEFAULT_TICK_INTERVAL);
        ticker.sync(true, 10);
        ticker.sync(false, 10);
        ticker.sync(true, 10);
        ticker.sync(true, 10);
        ticker.sync(true, 10);

        tokio::time::sleep(Duration::from_secs(5)).await;

        let tick = rx.recv().await.unwrap();
        assert!(ticker.accept(tick));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn tick_delivered_before_pause_is_stale() {
        let (mut ticker, mut rx) = ClockTicker::channel(DEFAULT_TICK_INTERVAL);
        ticker.sync(true, 10);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Pause after the tick fired but before it was handled.
        ticker.sync(false, 10);
        let tick = rx.recv().await.unwrap();
        assert!(!ticker.accept(tick));

        // Resuming arms a fresh generation.
        ticker.sync(true, 10);
        let tick = rx.recv().await.unwrap();
        assert!(ticker.accept(tick));
    }

    #[tokio::test(start_paused = true)]
    async fn new_countdown_rearms_from_scratch() {
        let (mut ticker, mut rx) = ClockTicker::channel(DEFAULT_TICK_INTERVAL);
        ticker.sync(true, 10);
        tokio::time::sleep(Duration::from_millis(900)).await;

        let switched = Event::ModeChanged {
            from: crate::timer::Mode::Pomodoro,
            to: crate::timer::Mode::LongBreak,
            remaining_secs: 900,
            at: chrono::Utc::now(),
        };
        ticker.follow(Some(&switched), true, 900);
        assert!(ticker.is_armed());

        let armed_at = tokio::time::Instant::now();
        let tick = rx.recv().await.unwrap();
        assert!(ticker.accept(tick));
        assert!(armed_at.elapsed() >= DEFAULT_TICK_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn plain_sync_keeps_pending_tick() {
        let (mut ticker, mut rx) = ClockTicker::channel(DEFAULT_TICK_INTERVAL);
        ticker.sync(true, 10);
        tokio::time::sleep(Duration::from_millis(900)).await;

        let armed_at = tokio::time::Instant::now();
        ticker.follow(None, true, 10);
        let tick = rx.recv().await.unwrap();
        assert!(ticker.accept(tick));
        assert!(armed_at.elapsed() < DEFAULT_TICK_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_revokes_pending_tick() {
        let (mut ticker, mut rx) = ClockTicker::channel(DEFAULT_TICK_INTERVAL);
        ticker.sync(true, 10);
        drop(ticker);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.recv().await.is_none());
    }
}
