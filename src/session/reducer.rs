use super::{Pool, QuestionProgress, Session, SessionState};
use crate::hint::eliminable;
use crate::ordering::{score_attempt, verify, OrderingAttempt};
use crate::results::{Outcome, QuestionResult};
use crate::util::move_item;

/// Everything that can happen to a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    SubmitAnswer { option: usize },
    Skip,
    /// Remove a wrong option; the controller picks which one
    UseHint { eliminate: usize },
    Tick { generation: u64 },
    Advance { generation: u64, index: usize },
    Pause,
    Resume,
    Finish,
    Reset,
    MoveEvent { from: usize, to: usize },
    VerifyOrder,
}

/// Compute the session that follows `action`. Actions that are not valid
/// in the current state return an unchanged copy.
pub fn reduce(session: &Session, action: Action) -> Session {
    let mut next = session.clone();
    match action {
        Action::Start => {
            if next.state == SessionState::Setup && next.pool_len() > 0 {
                next.state = SessionState::Playing;
                next.time_remaining = next.time_limit;
            }
        }
        Action::SubmitAnswer { option } => {
            if !accepts_answer(&next) {
                return next;
            }
            let Some(question) = next.current_question() else {
                return next;
            };
            if option >= question.options.len() {
                return next;
            }
            let outcome = if question.is_correct(option) {
                Outcome::Correct
            } else {
                Outcome::Wrong
            };
            let time_used = next.time_limit.saturating_sub(next.time_remaining);
            resolve(&mut next, outcome, Some(option), time_used);
        }
        Action::Skip => {
            if accepts_answer(&next) && next.current_question().is_some() {
                let time_used = next.time_limit.saturating_sub(next.time_remaining);
                resolve(&mut next, Outcome::Skipped, None, time_used);
            }
        }
        Action::UseHint { eliminate } => {
            if !accepts_answer(&next) || next.hints.remaining() == 0 {
                return next;
            }
            let Some(question) = next.current_question() else {
                return next;
            };
            let allowed = eliminable(
                question.options.len(),
                question.correct_index,
                &next.progress.eliminated,
            );
            if allowed.contains(&eliminate) && next.hints.take() {
                next.progress.hints_used += 1;
                next.progress.eliminated.push(eliminate);
            }
        }
        Action::Tick { generation } => {
            if generation != next.generation
                || !next.mode.is_timed()
                || !accepts_answer(&next)
                || next.current_question().is_none()
            {
                return next;
            }
            next.time_remaining = next.time_remaining.saturating_sub(1);
            if next.time_remaining == 0 {
                let time_used = next.time_limit;
                resolve(&mut next, Outcome::TimedOut, None, time_used);
            }
        }
        Action::Advance { generation, index } => {
            if generation != next.generation
                || !next.awaiting_advance()
                || index != next.current_index
            {
                return next;
            }
            next.current_index += 1;
            next.progress = QuestionProgress::default();
            next.time_remaining = next.time_limit;
            if next.current_index >= next.pool_len() {
                next.current_index = next.pool_len();
                next.state = SessionState::Completed;
            }
        }
        Action::Pause => {
            if next.state == SessionState::Playing {
                next.state = SessionState::Paused;
            }
        }
        Action::Resume => {
            if next.state == SessionState::Paused {
                next.state = SessionState::Playing;
            }
        }
        Action::Finish => {
            if matches!(next.state, SessionState::Playing | SessionState::Paused) {
                if next.progress.resolved && matches!(next.pool, Pool::Choice(_)) {
                    next.current_index += 1;
                    next.progress = QuestionProgress::default();
                }
                next.state = SessionState::Completed;
            }
        }
        Action::Reset => {
            return Session::blank(session.mode, session.generation + 1);
        }
        Action::MoveEvent { from, to } => {
            if next.state != SessionState::Playing {
                return next;
            }
            if let Pool::Timeline(board) = &mut next.pool {
                if board.attempts_left() > 0 {
                    move_item(&mut board.events, from, to);
                }
            }
        }
        Action::VerifyOrder => {
            if next.state != SessionState::Playing {
                return next;
            }
            let Pool::Timeline(board) = &mut next.pool else {
                return next;
            };
            if board.attempts_left() == 0 {
                return next;
            }
            let attempt = board.attempts.len() as u32 + 1;
            let verification = verify(&board.events);
            let score = score_attempt(&board.rules, &verification, attempt);
            let done = verification.is_perfect || attempt >= board.rules.max_attempts;
            board.attempts.push(OrderingAttempt {
                submitted: board.events.iter().map(|e| e.id.clone()).collect(),
                verification,
                attempt,
                score,
            });
            next.board.score = score;
            if done {
                next.state = SessionState::Completed;
            }
        }
    }
    next
}

fn accepts_answer(session: &Session) -> bool {
    session.state == SessionState::Playing && !session.progress.resolved
}

/// Score the current question, record its result and mark it revealed
fn resolve(session: &mut Session, outcome: Outcome, selected: Option<usize>, time_used: u32) {
    let Some(question) = session.current_question().cloned() else {
        return;
    };
    let points = match outcome {
        Outcome::Correct => session.board.record_correct(
            &session.rules,
            session.time_remaining,
            session.time_limit,
            session.progress.hints_used,
        ),
        Outcome::Wrong | Outcome::Skipped | Outcome::TimedOut => {
            session.board.record_miss(&session.rules)
        }
    };

    session.results.push(QuestionResult {
        question_id: question.question.id.clone(),
        prompt: question.question.prompt().to_string(),
        correct_answer: question.correct_answer().to_string(),
        selected_answer: selected.and_then(|i| question.options.get(i).cloned()),
        outcome,
        time_used,
        hints_used: session.progress.hints_used,
        points,
        explanation: question.question.explanation.clone(),
    });
    session.progress.resolved = true;
    session.progress.selected = selected;
}
