use crate::bank::QuestionBank;
use crate::config::{GameConfig, GameMode};
use crate::error::ConfigError;
use crate::ordering::{is_canonical, TimelineEvent};
use crate::question::{Question, QuestionBody};
use crate::shuffle::{build_options, pick_distractors, shuffle_in_place, shuffled};
use rand::Rng;

pub const OPTIONS_PER_QUESTION: usize = 4;
const DISTRACTORS: usize = OPTIONS_PER_QUESTION - 1;
const MAX_RESHUFFLES: usize = 8;

/// A multiple-choice question ready to be played
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceQuestion {
    pub question: Question,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl ChoiceQuestion {
    pub fn correct_answer(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}

/// Playable content for one session
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionSet {
    Choice(Vec<ChoiceQuestion>),
    /// Events in presentation order
    Timeline(Vec<TimelineEvent>),
}

impl QuestionSet {
    pub fn len(&self) -> usize {
        match self {
            QuestionSet::Choice(questions) => questions.len(),
            QuestionSet::Timeline(events) => events.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Builds question sets from a bank according to a game configuration
pub struct QuestionGenerator<'a> {
    bank: &'a QuestionBank,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(bank: &'a QuestionBank) -> Self {
        Self { bank }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        config: &GameConfig,
        rng: &mut R,
    ) -> Result<QuestionSet, ConfigError> {
        config.validate()?;

        let pool = self.bank.filter(
            config.mode.kind(),
            config.category.as_deref(),
            config.difficulty,
        );
        if pool.is_empty() {
            return Err(ConfigError::EmptyPool {
                mode: config.mode.to_string(),
                category: config.category.clone(),
                difficulty: config.difficulty.map(|d| d.to_string()),
            });
        }

        let set = match config.mode {
            GameMode::Quotes | GameMode::Trivia => {
                QuestionSet::Choice(self.generate_choices(config, &pool, rng))
            }
            GameMode::Timeline => {
                QuestionSet::Timeline(self.generate_timeline(config, &pool, rng)?)
            }
        };

        if set.is_empty() {
            return Err(ConfigError::EmptyPool {
                mode: config.mode.to_string(),
                category: config.category.clone(),
                difficulty: config.difficulty.map(|d| d.to_string()),
            });
        }
        tracing::debug!("generated {} {} items", set.len(), config.mode);
        Ok(set)
    }

    fn generate_choices<R: Rng + ?Sized>(
        &self,
        config: &GameConfig,
        pool: &[&Question],
        rng: &mut R,
    ) -> Vec<ChoiceQuestion> {
        // Distractors come from the filtered pool first, then from every
        // question of the same kind so narrow filters still get 4 options.
        let filtered_values: Vec<String> = pool
            .iter()
            .filter_map(|q| q.correct_value().map(str::to_string))
            .collect();
        let kind_values: Vec<String> = self
            .bank
            .filter(config.mode.kind(), None, None)
            .iter()
            .filter_map(|q| q.correct_value().map(str::to_string))
            .collect();

        shuffled(pool.to_vec(), rng)
            .into_iter()
            .filter_map(|q| {
                let correct = q.correct_value()?;
                let own_wrong = match &q.body {
                    QuestionBody::Trivia { wrong_options, .. } => wrong_options.clone(),
                    _ => Vec::new(),
                };
                let distractors = collect_distractors(
                    correct,
                    &[&own_wrong, &filtered_values, &kind_values],
                    rng,
                );
                if distractors.is_empty() {
                    tracing::debug!("skipping {}: no distractors available", q.id);
                    return None;
                }
                let (options, correct_index) = build_options(correct, distractors, rng);
                Some(ChoiceQuestion {
                    question: q.clone(),
                    options,
                    correct_index,
                })
            })
            .take(config.question_count)
            .collect()
    }

    fn generate_timeline<R: Rng + ?Sized>(
        &self,
        config: &GameConfig,
        pool: &[&Question],
        rng: &mut R,
    ) -> Result<Vec<TimelineEvent>, ConfigError> {
        if pool.len() < 2 || config.question_count < 2 {
            return Err(ConfigError::TooFewEvents(pool.len().min(config.question_count)));
        }

        let mut events: Vec<TimelineEvent> = shuffled(pool.to_vec(), rng)
            .into_iter()
            .filter_map(TimelineEvent::from_question)
            .take(config.question_count)
            .collect();

        // Only the presentation order is shuffled; years stay attached to
        // their events. Avoid handing out an already solved board.
        for _ in 0..MAX_RESHUFFLES {
            shuffle_in_place(&mut events, rng);
            if !is_canonical(&events) {
                break;
            }
        }
        Ok(events)
    }
}

/// Fill up to three distractors, taking from each tier in order
fn collect_distractors<R: Rng + ?Sized>(
    correct: &str,
    tiers: &[&Vec<String>],
    rng: &mut R,
) -> Vec<String> {
    let mut picked: Vec<String> = Vec::with_capacity(DISTRACTORS);
    for tier in tiers {
        let missing = DISTRACTORS - picked.len();
        if missing == 0 {
            break;
        }
        let remaining: Vec<String> = tier
            .iter()
            .filter(|c| !picked.iter().any(|p| p.eq_ignore_ascii_case(c)))
            .cloned()
            .collect();
        picked.extend(pick_distractors(correct, &remaining, missing, rng));
    }
    picked
}
