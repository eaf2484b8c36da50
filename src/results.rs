use crate::util::mean;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum_macros::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Outcome {
    Correct,
    Wrong,
    Skipped,
    TimedOut,
}

/// Immutable record of one resolved question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub prompt: String,
    pub correct_answer: String,
    /// `None` when skipped or timed out
    pub selected_answer: Option<String>,
    pub outcome: Outcome,
    pub time_used: u32,
    pub hints_used: u32,
    pub points: i64,
    pub explanation: String,
}

impl QuestionResult {
    pub fn is_correct(&self) -> bool {
        self.outcome == Outcome::Correct
    }

    pub fn hint_used(&self) -> bool {
        self.hints_used > 0
    }
}

/// Append-only log of question results
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultLog {
    entries: Vec<QuestionResult>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, result: QuestionResult) {
        self.entries.push(result);
    }

    pub fn entries(&self) -> &[QuestionResult] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.entries.iter().filter(|r| r.outcome == outcome).count()
    }

    pub fn last(&self) -> Option<&QuestionResult> {
        self.entries.last()
    }
}

/// End-of-session aggregates
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    pub score: u32,
    pub correct_answers: usize,
    pub wrong_answers: usize,
    /// skipped plus timed out
    pub skipped: usize,
    pub timed_out: usize,
    pub total_questions: usize,
    pub accuracy: f64,
    pub max_streak: u32,
    pub hints_used: u32,
    pub average_time_per_question: f64,
}

impl SessionStats {
    pub fn from_log(
        log: &ResultLog,
        score: u32,
        total_questions: usize,
        max_streak: u32,
        hints_used: u32,
    ) -> Self {
        let correct_answers = log.count(Outcome::Correct);
        let timed_out = log.count(Outcome::TimedOut);
        let times: Vec<f64> = log.entries().iter().map(|r| r.time_used as f64).collect();

        Self {
            score,
            correct_answers,
            wrong_answers: log.count(Outcome::Wrong),
            skipped: log.count(Outcome::Skipped) + timed_out,
            timed_out,
            total_questions,
            accuracy: percentage(correct_answers, total_questions),
            max_streak,
            hints_used,
            average_time_per_question: mean(&times).unwrap_or(0.0),
        }
    }

    pub fn resolved(&self) -> usize {
        self.correct_answers + self.wrong_answers + self.skipped
    }
}

/// Rounded percentage, 0 when there is nothing to divide by
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        ((part as f64 / whole as f64) * 100.0).round()
    }
}
