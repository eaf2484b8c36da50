use crate::bank::QuestionBank;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::results::SessionStats;
use crate::session::{SessionController, SessionState};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// What the event loop should do after a key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

/// Cursor over the timeline list; a grabbed event travels with the cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineCursor {
    pub position: usize,
    pub grabbed: bool,
}

#[derive(Debug)]
pub struct App {
    pub config: GameConfig,
    pub bank: QuestionBank,
    pub controller: SessionController,
    pub cursor: TimelineCursor,
    pub review_scroll: usize,
    /// One-line feedback shown under the board
    pub status: Option<String>,
    pub best_score: Option<u32>,
    recorded_generation: Option<u64>,
}

impl App {
    pub fn new(
        bank: QuestionBank,
        config: GameConfig,
        controller: SessionController,
    ) -> Result<Self, ConfigError> {
        let mut app = Self {
            config,
            bank,
            controller,
            cursor: TimelineCursor::default(),
            review_scroll: 0,
            status: None,
            best_score: None,
            recorded_generation: None,
        };
        app.restart()?;
        Ok(app)
    }

    /// Throw away the live session and start a fresh one with the same
    /// configuration
    pub fn restart(&mut self) -> Result<(), ConfigError> {
        self.controller.reset();
        self.cursor = TimelineCursor::default();
        self.review_scroll = 0;
        self.status = None;
        self.controller.start(&self.bank, &self.config)
    }

    pub fn on_tick(&mut self, elapsed: Duration) {
        self.controller.advance_clock(elapsed);
    }

    pub fn is_completed(&self) -> bool {
        self.controller.session().state == SessionState::Completed
    }

    /// Statistics of a freshly completed session, handed out once per
    /// session so it is recorded a single time
    pub fn take_completed(&mut self) -> Option<SessionStats> {
        let generation = self.controller.session().generation;
        if self.recorded_generation == Some(generation) {
            return None;
        }
        let stats = self.controller.statistics()?;
        self.recorded_generation = Some(generation);
        Some(stats)
    }

    pub fn on_key(&mut self, key: KeyEvent) -> KeyOutcome {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return KeyOutcome::Quit;
        }

        if key.code == KeyCode::Char('r') {
            if let Err(e) = self.restart() {
                tracing::warn!("restart failed: {e}");
                self.status = Some(e.to_string());
            }
            return KeyOutcome::Continue;
        }

        match self.controller.session().state {
            SessionState::Playing if self.controller.session().timeline().is_some() => {
                self.on_timeline_key(key)
            }
            SessionState::Playing => self.on_question_key(key),
            SessionState::Paused => {
                if key.code == KeyCode::Char('p') {
                    self.controller.resume();
                }
            }
            SessionState::Completed => self.on_results_key(key),
            SessionState::Setup => {}
        }
        KeyOutcome::Continue
    }

    fn on_question_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char(c @ '1'..='9') => {
                let option = c as usize - '1' as usize;
                if self.controller.submit_answer(option) {
                    self.status = None;
                }
            }
            KeyCode::Char('h') => {
                self.status = Some(match self.controller.use_hint() {
                    Some(elimination) => format!("Eliminated \"{}\"", elimination.option),
                    None => "No hint available".to_string(),
                });
            }
            KeyCode::Char('s') => {
                self.controller.skip();
            }
            KeyCode::Char('p') => {
                self.controller.pause();
            }
            KeyCode::Char('f') => {
                self.controller.finish();
            }
            _ => {}
        }
    }

    fn on_timeline_key(&mut self, key: KeyEvent) {
        let len = self.controller.session().pool_len();
        if len == 0 {
            return;
        }
        let cursor = self.cursor.position.min(len - 1);
        match key.code {
            KeyCode::Up | KeyCode::Char('k') if cursor > 0 => {
                if self.cursor.grabbed {
                    self.controller.move_event(cursor, cursor - 1);
                }
                self.cursor.position = cursor - 1;
            }
            KeyCode::Down | KeyCode::Char('j') if cursor + 1 < len => {
                if self.cursor.grabbed {
                    self.controller.move_event(cursor, cursor + 1);
                }
                self.cursor.position = cursor + 1;
            }
            KeyCode::Char(' ') => {
                self.cursor.grabbed = !self.cursor.grabbed;
            }
            KeyCode::Enter => {
                self.cursor.grabbed = false;
                if let Some(attempt) = self.controller.verify_order() {
                    let v = &attempt.verification;
                    self.status = Some(if v.is_perfect {
                        format!("Perfect order! +{}", attempt.score)
                    } else {
                        format!(
                            "{}/{} in place on attempt {}",
                            v.correct_count,
                            v.per_item.len(),
                            attempt.attempt
                        )
                    });
                }
            }
            KeyCode::Char('f') => {
                self.controller.finish();
            }
            _ => {}
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.review_scroll = self.review_scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let max = self.controller.results().len().saturating_sub(1);
                self.review_scroll = (self.review_scroll + 1).min(max);
            }
            KeyCode::Home => self.review_scroll = 0,
            _ => {}
        }
    }
}
