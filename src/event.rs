use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};

use crate::generator::fetch::StoryReply;

pub enum AppEvent {
    Key(KeyEvent),
    Tick,
    Resize(#[allow(dead_code)] u16, #[allow(dead_code)] u16),
    Story(StoryReply),
}

/// Fixed-rate tick schedule for the input thread. Ticks stay due on time
/// even while key events keep the poll from timing out.
#[derive(Clone, Copy, Debug)]
pub struct TickClock {
    tick_rate: Duration,
    last_tick: Instant,
}

impl TickClock {
    pub fn new(tick_rate: Duration, now: Instant) -> Self {
        Self {
            tick_rate,
            last_tick: now,
        }
    }

    /// How long the input thread may block before the next tick is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.tick_rate
            .saturating_sub(now.saturating_duration_since(self.last_tick))
    }

    /// True once per elapsed period. Starts the next period when it fires.
    pub fn poll_due(&mut self, now: Instant) -> bool {
        if now.saturating_duration_since(self.last_tick) >= self.tick_rate {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}

pub struct EventHandler {
    rx: mpsc::Receiver<AppEvent>,
    tx: mpsc::Sender<AppEvent>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::channel();
        let input_tx = tx.clone();

        thread::spawn(move || {
            let mut clock = TickClock::new(tick_rate, Instant::now());
            loop {
                if event::poll(clock.timeout(Instant::now())).unwrap_or(false) {
                    let sent = match event::read() {
                        Ok(Event::Key(key)) => input_tx.send(AppEvent::Key(key)),
                        Ok(Event::Resize(w, h)) => input_tx.send(AppEvent::Resize(w, h)),
                        _ => Ok(()),
                    };
                    if sent.is_err() {
                        return;
                    }
                }
                if clock.poll_due(Instant::now()) && input_tx.send(AppEvent::Tick).is_err() {
                    return;
                }
            }
        });

        Self { rx, tx }
    }

    /// Sender for background workers that report back into the event loop.
    pub fn sender(&self) -> mpsc::Sender<AppEvent> {
        self.tx.clone()
    }

    pub fn next(&self) -> anyhow::Result<AppEvent> {
        Ok(self.rx.recv()?)
    }
}
