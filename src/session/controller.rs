use super::{reduce, Action, Session, SessionState, Snapshot};
use crate::bank::QuestionBank;
use crate::config::{GameConfig, GameMode};
use crate::error::ConfigError;
use crate::generator::{QuestionGenerator, QuestionSet};
use crate::hint::choose_elimination;
use crate::ordering::OrderingAttempt;
use crate::results::{QuestionResult, SessionStats};
use crate::timer::{Fired, Scheduler};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

/// The wrong option a hint removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elimination {
    pub option_index: usize,
    pub option: String,
}

/// Owns the live session together with its scheduler and RNG. Every
/// mutation goes through one of the action methods, which feed the pure
/// reducer and then bring the scheduler in line with the new state.
#[derive(Debug)]
pub struct SessionController<R: Rng = StdRng> {
    session: Session,
    scheduler: Scheduler,
    rng: R,
}

impl SessionController<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SessionController<R> {
    pub fn new(rng: R) -> Self {
        let defaults = GameConfig::default();
        Self {
            session: Session::blank(defaults.mode, 0),
            scheduler: Scheduler::new(Duration::from_millis(defaults.advance_delay_ms)),
            rng,
        }
    }

    /// Generate a question set from `bank` and start playing it
    pub fn start(&mut self, bank: &QuestionBank, config: &GameConfig) -> Result<(), ConfigError> {
        let set = QuestionGenerator::new(bank).generate(config, &mut self.rng)?;
        self.begin(set, config)
    }

    /// Replace whatever session is live with a new one over `set`.
    /// Empty sets never reach `playing`.
    pub fn begin(&mut self, set: QuestionSet, config: &GameConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if set.is_empty() {
            return Err(ConfigError::EmptyPool {
                mode: config.mode.to_string(),
                category: config.category.clone(),
                difficulty: config.difficulty.map(|d| d.to_string()),
            });
        }

        self.scheduler.cancel_all();
        self.scheduler
            .set_advance_delay(Duration::from_millis(config.advance_delay_ms));
        self.session = Session::new(set, config, self.session.generation + 1);
        self.dispatch(Action::Start);
        tracing::info!(
            "started {} session {} with {} items",
            self.session.mode,
            self.session.generation,
            self.session.pool_len()
        );
        Ok(())
    }

    pub fn submit_answer(&mut self, option: usize) -> bool {
        self.dispatch(Action::SubmitAnswer { option })
    }

    pub fn skip(&mut self) -> bool {
        self.dispatch(Action::Skip)
    }

    /// Eliminate one wrong option of the current question. `None` when no
    /// hint can be given right now.
    pub fn use_hint(&mut self) -> Option<Elimination> {
        let session = &self.session;
        if session.state != SessionState::Playing
            || session.is_resolved()
            || session.hints.remaining() == 0
        {
            return None;
        }
        let question = session.current_question()?;
        let eliminate = choose_elimination(
            question.options.len(),
            question.correct_index,
            &session.progress.eliminated,
            &mut self.rng,
        )?;
        let option = question.options[eliminate].clone();

        self.dispatch(Action::UseHint { eliminate })
            .then_some(Elimination {
                option_index: eliminate,
                option,
            })
    }

    pub fn pause(&mut self) -> bool {
        self.dispatch(Action::Pause)
    }

    pub fn resume(&mut self) -> bool {
        self.dispatch(Action::Resume)
    }

    /// Force completion with whatever has been answered so far
    pub fn finish(&mut self) -> bool {
        self.dispatch(Action::Finish)
    }

    /// Discard the live session. Pending callbacks are cancelled before
    /// this returns.
    pub fn reset(&mut self) {
        self.dispatch(Action::Reset);
    }

    pub fn move_event(&mut self, from: usize, to: usize) -> bool {
        self.dispatch(Action::MoveEvent { from, to })
    }

    /// Check the current timeline arrangement; returns the attempt when one
    /// was recorded
    pub fn verify_order(&mut self) -> Option<OrderingAttempt> {
        if !self.dispatch(Action::VerifyOrder) {
            return None;
        }
        self.session.timeline()?.last_attempt().cloned()
    }

    /// Let `elapsed` time pass, delivering every tick and advance that falls
    /// due in order
    pub fn advance_clock(&mut self, elapsed: Duration) {
        let mut budget = elapsed;
        while let Some(fired) = self.scheduler.poll(&mut budget) {
            let action = match fired {
                Fired::Tick { generation } => Action::Tick { generation },
                Fired::Advance { generation, index } => Action::Advance { generation, index },
            };
            self.dispatch(action);
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.session.snapshot()
    }

    pub fn results(&self) -> &[QuestionResult] {
        self.session.results.entries()
    }

    pub fn statistics(&self) -> Option<SessionStats> {
        self.session.stats()
    }

    pub fn mode(&self) -> GameMode {
        self.session.mode
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn dispatch(&mut self, action: Action) -> bool {
        let next = reduce(&self.session, action);
        if next == self.session {
            tracing::trace!("ignored {:?} in {}", action, self.session.state);
            return false;
        }
        if next.state != self.session.state {
            tracing::debug!(
                "session {}: {} -> {} on {:?}",
                self.session.generation,
                self.session.state,
                next.state,
                action
            );
        }
        if next.state == SessionState::Completed && self.session.state != SessionState::Completed {
            tracing::info!(
                "session {} completed with score {}",
                next.generation,
                next.board.score
            );
        }
        self.session = next;
        self.sync_scheduler();
        true
    }

    /// Run the countdown only while an unanswered timed question is on
    /// screen, and keep an advance armed only while an answer is revealed.
    /// A pause suspends both with their remaining time.
    fn sync_scheduler(&mut self) {
        let session = &self.session;
        match session.state {
            SessionState::Playing => self.scheduler.resume(session.generation),
            SessionState::Paused => {
                self.scheduler.suspend();
                return;
            }
            _ => {
                self.scheduler.cancel_all();
                return;
            }
        }
        if session.mode.is_timed() && !session.is_resolved() {
            self.scheduler.start(session.generation);
        } else {
            self.scheduler.stop();
        }
        if session.awaiting_advance() {
            self.scheduler
                .schedule_advance(session.generation, session.current_index);
        } else {
            self.scheduler.cancel_pending();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Outcome;

    fn bank() -> QuestionBank {
        QuestionBank::bundled().unwrap()
    }

    fn started(mode: GameMode) -> SessionController {
        let mut c = SessionController::seeded(3);
        c.start(&bank(), &GameConfig::for_mode(mode)).unwrap();
        c
    }

    #[test]
    fn test_start_enters_playing_and_ticks() {
        let c = started(GameMode::Trivia);
        assert_eq!(c.session().state, SessionState::Playing);
        assert_eq!(c.session().generation, 1);
        assert!(c.scheduler().is_running());
    }

    #[test]
    fn test_timeline_start_does_not_tick() {
        let c = started(GameMode::Timeline);
        assert_eq!(c.session().state, SessionState::Playing);
        assert!(!c.scheduler().is_running());
    }

    #[test]
    fn test_empty_pool_never_plays() {
        let mut c = SessionController::seeded(1);
        let mut config = GameConfig::for_mode(GameMode::Quotes);
        config.category = Some("atlantis".into());
        assert!(c.start(&bank(), &config).is_err());
        assert_eq!(c.session().state, SessionState::Setup);

        let err = c
            .begin(QuestionSet::Choice(Vec::new()), &GameConfig::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPool { .. }));
        assert_eq!(c.session().state, SessionState::Setup);
    }

    #[test]
    fn test_answer_then_auto_advance() {
        let mut c = started(GameMode::Trivia);
        let correct = c.session().current_question().unwrap().correct_index;
        assert!(c.submit_answer(correct));
        assert!(!c.submit_answer(correct));
        assert!(!c.scheduler().is_running());
        assert!(c.scheduler().has_pending());

        c.advance_clock(Duration::from_millis(1499));
        assert_eq!(c.session().current_index, 0);
        c.advance_clock(Duration::from_millis(1));
        assert_eq!(c.session().current_index, 1);
        assert!(c.scheduler().is_running());
        assert_eq!(c.session().time_remaining, c.session().time_limit);
    }

    #[test]
    fn test_timeout_resolves_question() {
        let mut c = started(GameMode::Trivia);
        c.advance_clock(Duration::from_secs(15));
        let last = c.results().last().unwrap();
        assert_eq!(last.outcome, Outcome::TimedOut);
        assert_eq!(c.session().current_index, 0);
        c.advance_clock(Duration::from_millis(1500));
        assert_eq!(c.session().current_index, 1);
    }

    #[test]
    fn test_pause_preserves_time_remaining() {
        let mut c = started(GameMode::Trivia);
        c.advance_clock(Duration::from_millis(4500));
        assert_eq!(c.session().time_remaining, 11);

        assert!(c.pause());
        c.advance_clock(Duration::from_secs(60));
        assert_eq!(c.session().time_remaining, 11);
        assert!(!c.scheduler().is_running());

        assert!(c.resume());
        assert_eq!(c.session().time_remaining, 11);
        c.advance_clock(Duration::from_millis(1000));
        assert_eq!(c.session().time_remaining, 10);
    }

    #[test]
    fn test_finishing_early_scores_accuracy_over_whole_pool() {
        let mut c = started(GameMode::Trivia);
        let correct = c.session().current_question().unwrap().correct_index;
        assert!(c.submit_answer(correct));
        assert!(c.finish());
        let stats = c.statistics().unwrap();
        assert_eq!(stats.correct_answers, 1);
        assert_eq!(stats.total_questions, 10);
        assert_eq!(stats.accuracy, 10.0);
    }

    #[test]
    fn test_pause_keeps_partial_second() {
        let mut c = started(GameMode::Trivia);
        c.advance_clock(Duration::from_millis(900));
        assert!(c.pause());
        assert!(c.scheduler().is_suspended());
        assert!(c.resume());
        c.advance_clock(Duration::from_millis(100));
        assert_eq!(c.session().time_remaining, 14);
    }

    #[test]
    fn test_frequent_pausing_still_runs_the_clock() {
        let mut c = started(GameMode::Trivia);
        for _ in 0..30 {
            c.advance_clock(Duration::from_millis(900));
            c.pause();
            c.resume();
        }
        // 27s of play against a 15s limit
        assert_eq!(c.results().len(), 1);
        assert_eq!(c.results()[0].outcome, Outcome::TimedOut);
    }

    #[test]
    fn test_pause_holds_pending_advance() {
        let mut c = started(GameMode::Quotes);
        c.skip();
        c.advance_clock(Duration::from_millis(1000));
        c.pause();
        assert!(!c.scheduler().has_pending());
        c.advance_clock(Duration::from_secs(10));
        assert_eq!(c.session().current_index, 0);
        c.resume();
        c.advance_clock(Duration::from_millis(499));
        assert_eq!(c.session().current_index, 0);
        c.advance_clock(Duration::from_millis(1));
        assert_eq!(c.session().current_index, 1);
    }

    #[test]
    fn test_reset_cancels_callbacks() {
        let mut c = started(GameMode::Trivia);
        c.skip();
        c.reset();
        assert_eq!(c.session().state, SessionState::Setup);
        assert_eq!(c.scheduler().time_until_next(), None);
        c.advance_clock(Duration::from_secs(5));
        assert_eq!(c.session().state, SessionState::Setup);
        assert!(c.results().is_empty());
    }

    #[test]
    fn test_new_session_gets_new_generation() {
        let mut c = started(GameMode::Trivia);
        let first = c.session().generation;
        c.start(&bank(), &GameConfig::for_mode(GameMode::Quotes))
            .unwrap();
        assert!(c.session().generation > first);
        assert_eq!(c.mode(), GameMode::Quotes);
    }

    #[test]
    fn test_hint_flow() {
        let mut c = started(GameMode::Trivia);
        let correct = c.session().current_question().unwrap().correct_index;
        let e = c.use_hint().unwrap();
        assert_ne!(e.option_index, correct);
        assert_eq!(c.snapshot().eliminated, &[e.option_index]);
        c.submit_answer(correct);
        assert_eq!(c.use_hint(), None);
        assert_eq!(c.session().hints.used(), 1);
    }

    #[test]
    fn test_verify_order_returns_attempt() {
        let mut c = started(GameMode::Timeline);
        let attempt = c.verify_order().unwrap();
        assert_eq!(attempt.attempt, 1);
        assert_eq!(attempt.submitted.len(), 5);

        let mut trivia = started(GameMode::Trivia);
        assert_eq!(trivia.verify_order(), None);
    }

    #[test]
    fn test_statistics_only_when_completed() {
        let mut c = started(GameMode::Trivia);
        assert_eq!(c.statistics(), None);
        c.finish();
        let stats = c.statistics().unwrap();
        assert_eq!(stats.total_questions, 10);
        assert_eq!(stats.resolved(), 0);
        assert_eq!(c.scheduler().time_until_next(), None);
    }
}
