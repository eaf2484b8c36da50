use crate::question::Question;
use serde::Serialize;

/// A dated event on the timeline board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelineEvent {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub period: String,
    pub explanation: String,
}

impl TimelineEvent {
    pub fn from_question(question: &Question) -> Option<Self> {
        Some(Self {
            id: question.id.clone(),
            title: question.prompt().to_string(),
            year: question.year()?,
            period: question.period.clone(),
            explanation: question.explanation.clone(),
        })
    }
}

/// Scoring constants for the ordering game
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderingRules {
    pub points_per_position: u32,
    pub perfect_bonus: u32,
    pub penalty_per_attempt: u32,
    pub max_attempts: u32,
}

impl Default for OrderingRules {
    fn default() -> Self {
        Self {
            points_per_position: 100,
            perfect_bonus: 500,
            penalty_per_attempt: 50,
            max_attempts: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemVerdict {
    pub event_id: String,
    pub user_position: usize,
    pub correct_position: usize,
    pub is_correct: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verification {
    pub per_item: Vec<ItemVerdict>,
    pub correct_count: usize,
    pub accuracy: f64,
    pub is_perfect: bool,
}

/// One press of "verify order"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderingAttempt {
    pub submitted: Vec<String>,
    pub verification: Verification,
    pub attempt: u32,
    pub score: u32,
}

/// Events sorted ascending by year. The sort is stable, so events sharing a
/// year keep their relative order.
pub fn canonical_order(events: &[TimelineEvent]) -> Vec<TimelineEvent> {
    let mut sorted = events.to_vec();
    sorted.sort_by_key(|e| e.year);
    sorted
}

pub fn is_canonical(events: &[TimelineEvent]) -> bool {
    events.windows(2).all(|w| w[0].year <= w[1].year)
}

/// Compare a submitted arrangement against the canonical order, position by
/// position. An item is correct only when it sits exactly where the
/// canonical order puts it; events sharing a year may swap places.
pub fn verify(submitted: &[TimelineEvent]) -> Verification {
    let canonical = canonical_order(submitted);

    let per_item: Vec<ItemVerdict> = submitted
        .iter()
        .enumerate()
        .map(|(user_position, event)| {
            let correct_position = canonical
                .iter()
                .position(|c| c.id == event.id)
                .unwrap_or(user_position);
            let is_correct = canonical
                .get(user_position)
                .is_some_and(|c| c.year == event.year);
            ItemVerdict {
                event_id: event.id.clone(),
                user_position,
                correct_position,
                is_correct,
            }
        })
        .collect();

    let total = per_item.len();
    let correct_count = per_item.iter().filter(|v| v.is_correct).count();
    let accuracy = if total == 0 {
        0.0
    } else {
        correct_count as f64 / total as f64 * 100.0
    };

    Verification {
        per_item,
        correct_count,
        accuracy,
        is_perfect: total > 0 && correct_count == total,
    }
}

/// Score for the given attempt number (1-based)
pub fn score_attempt(rules: &OrderingRules, verification: &Verification, attempt: u32) -> u32 {
    let earned = verification.correct_count as i64 * rules.points_per_position as i64
        + if verification.is_perfect {
            rules.perfect_bonus as i64
        } else {
            0
        };
    let penalty = attempt.saturating_sub(1) as i64 * rules.penalty_per_attempt as i64;
    (earned - penalty).max(0) as u32
}
