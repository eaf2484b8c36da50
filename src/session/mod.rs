//! Game-session engine: an immutable [`Session`] value, the pure
//! [`reduce`] function that moves it from one state to the next, and the
//! [`SessionController`] that owns the scheduler and RNG around it.

mod controller;
mod reducer;

pub use controller::{Elimination, SessionController};
pub use reducer::{reduce, Action};

use crate::config::{GameConfig, GameMode};
use crate::generator::{ChoiceQuestion, QuestionSet};
use crate::hint::HintPool;
use crate::ordering::{OrderingAttempt, OrderingRules, TimelineEvent};
use crate::results::{percentage, QuestionResult, ResultLog, SessionStats};
use crate::scoring::{ScoreBoard, ScoringRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum SessionState {
    Setup,
    Playing,
    Paused,
    Completed,
}

/// Transient state of the question currently on screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionProgress {
    pub resolved: bool,
    pub selected: Option<usize>,
    pub hints_used: u32,
    pub eliminated: Vec<usize>,
}

/// The ordering game's board: the player's current arrangement plus every
/// verified attempt so far
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBoard {
    pub events: Vec<TimelineEvent>,
    pub attempts: Vec<OrderingAttempt>,
    pub rules: OrderingRules,
}

impl TimelineBoard {
    pub fn attempts_left(&self) -> u32 {
        self.rules
            .max_attempts
            .saturating_sub(self.attempts.len() as u32)
    }

    pub fn last_attempt(&self) -> Option<&OrderingAttempt> {
        self.attempts.last()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Pool {
    Choice(Vec<ChoiceQuestion>),
    Timeline(TimelineBoard),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub state: SessionState,
    pub mode: GameMode,
    /// Bumped for every new or reset session; scheduled callbacks carry it
    pub generation: u64,
    pub pool: Pool,
    pub current_index: usize,
    pub board: ScoreBoard,
    pub hints: HintPool,
    pub time_limit: u32,
    pub time_remaining: u32,
    pub progress: QuestionProgress,
    pub results: ResultLog,
    pub rules: ScoringRules,
}

impl Session {
    /// A session in `setup`, ready to be started
    pub fn new(set: QuestionSet, config: &GameConfig, generation: u64) -> Self {
        let pool = match set {
            QuestionSet::Choice(questions) => Pool::Choice(questions),
            QuestionSet::Timeline(events) => Pool::Timeline(TimelineBoard {
                events,
                attempts: Vec::new(),
                rules: OrderingRules {
                    max_attempts: config.max_attempts,
                    ..OrderingRules::default()
                },
            }),
        };
        Self {
            state: SessionState::Setup,
            mode: config.mode,
            generation,
            pool,
            current_index: 0,
            board: ScoreBoard::default(),
            hints: HintPool::new(config.hints),
            time_limit: config.time_limit_secs,
            time_remaining: config.time_limit_secs,
            progress: QuestionProgress::default(),
            results: ResultLog::new(),
            rules: ScoringRules::for_mode(config.mode),
        }
    }

    /// An empty session with nothing to play
    pub fn blank(mode: GameMode, generation: u64) -> Self {
        let config = GameConfig::for_mode(mode);
        let set = match mode {
            GameMode::Timeline => QuestionSet::Timeline(Vec::new()),
            _ => QuestionSet::Choice(Vec::new()),
        };
        Self::new(set, &config, generation)
    }

    pub fn pool_len(&self) -> usize {
        match &self.pool {
            Pool::Choice(questions) => questions.len(),
            Pool::Timeline(board) => board.events.len(),
        }
    }

    pub fn questions(&self) -> &[ChoiceQuestion] {
        match &self.pool {
            Pool::Choice(questions) => questions,
            Pool::Timeline(_) => &[],
        }
    }

    pub fn timeline(&self) -> Option<&TimelineBoard> {
        match &self.pool {
            Pool::Timeline(board) => Some(board),
            Pool::Choice(_) => None,
        }
    }

    pub fn current_question(&self) -> Option<&ChoiceQuestion> {
        self.questions().get(self.current_index)
    }

    pub fn is_resolved(&self) -> bool {
        self.progress.resolved
    }

    /// Answer shown, waiting for the automatic advance
    pub fn awaiting_advance(&self) -> bool {
        self.state == SessionState::Playing && self.progress.resolved
    }

    pub fn score(&self) -> u32 {
        self.board.score
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: self.state,
            mode: self.mode,
            question: self.current_question(),
            question_number: (self.current_index + 1).min(self.pool_len()),
            total: self.pool_len(),
            time_remaining: self.time_remaining,
            time_limit: self.time_limit,
            score: self.board.score,
            streak: self.board.streak,
            hints_remaining: self.hints.remaining(),
            revealed: if self.progress.resolved {
                self.results.last()
            } else {
                None
            },
            selected: self.progress.selected,
            eliminated: &self.progress.eliminated,
        }
    }

    /// Aggregates, available once the session has completed
    pub fn stats(&self) -> Option<SessionStats> {
        if self.state != SessionState::Completed {
            return None;
        }
        match &self.pool {
            Pool::Choice(questions) => Some(SessionStats::from_log(
                &self.results,
                self.board.score,
                questions.len(),
                self.board.max_streak,
                self.hints.used(),
            )),
            Pool::Timeline(board) => {
                let total = board.events.len();
                let correct = board
                    .last_attempt()
                    .map_or(0, |a| a.verification.correct_count);
                Some(SessionStats {
                    score: self.board.score,
                    correct_answers: correct,
                    wrong_answers: total - correct,
                    skipped: 0,
                    timed_out: 0,
                    total_questions: total,
                    accuracy: percentage(correct, total),
                    max_streak: 0,
                    hints_used: 0,
                    average_time_per_question: 0.0,
                })
            }
        }
    }
}

/// Read-only view of a session for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub state: SessionState,
    pub mode: GameMode,
    pub question: Option<&'a ChoiceQuestion>,
    /// 1-based
    pub question_number: usize,
    pub total: usize,
    pub time_remaining: u32,
    pub time_limit: u32,
    pub score: u32,
    pub streak: u32,
    pub hints_remaining: u32,
    /// Result of the current question once it has been answered
    pub revealed: Option<&'a QuestionResult>,
    pub selected: Option<usize>,
    pub eliminated: &'a [usize],
}
