use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app loop
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    /// Wall time elapsed since the previous tick
    Tick(Duration),
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source reading crossterm events on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let forwarded = match event::read() {
                // windows reports both press and release
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                    tx.send(GameEvent::Key(key))
                }
                Ok(CtEvent::Resize(_, _)) => tx.send(GameEvent::Resize),
                Ok(_) => Ok(()),
                Err(e) => {
                    tracing::warn!("terminal event stream closed: {e}");
                    break;
                }
            };
            if forwarded.is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source fed from a channel
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Time source for measuring tick lengths
pub trait Clock {
    fn now(&mut self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&mut self) -> Instant {
        Instant::now()
    }
}

/// Clock that moves forward a fixed step every time it is read
#[derive(Debug, Clone, Copy)]
pub struct SteppingClock {
    now: Instant,
    step: Duration,
}

impl SteppingClock {
    pub fn new(step: Duration) -> Self {
        Self {
            now: Instant::now(),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&mut self) -> Instant {
        self.now += self.step;
        self.now
    }
}

/// Advances the application one event or tick at a time
pub struct Runner<E: GameEventSource, C: Clock> {
    event_source: E,
    clock: C,
    tick_interval: Duration,
    last_tick: Instant,
}

impl<E: GameEventSource, C: Clock> Runner<E, C> {
    pub fn new(event_source: E, mut clock: C, tick_interval: Duration) -> Self {
        let last_tick = clock.now();
        Self {
            event_source,
            clock,
            tick_interval,
            last_tick,
        }
    }

    /// Blocks up to the tick interval and returns the next event, or a Tick
    /// carrying the time since the previous one
    pub fn step(&mut self) -> GameEvent {
        match self.event_source.recv_timeout(self.tick_interval) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                let now = self.clock.now();
                let elapsed = now.saturating_duration_since(self.last_tick);
                self.last_tick = now;
                GameEvent::Tick(elapsed)
            }
        }
    }
}
