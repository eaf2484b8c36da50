use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// Discriminant of a question body, used for filtering the bank per game mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum QuestionKind {
    Quote,
    Trivia,
    Event,
}

/// Kind-specific payload of a question, validated once at ingestion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum QuestionBody {
    Quote {
        text: String,
        author: String,
    },
    Trivia {
        prompt: String,
        answer: String,
        wrong_options: Vec<String>,
    },
    Event {
        title: String,
        year: i32,
    },
}

/// A well-formed entry of the question bank
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub id: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub explanation: String,
    pub period: String,
    pub body: QuestionBody,
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self.body {
            QuestionBody::Quote { .. } => QuestionKind::Quote,
            QuestionBody::Trivia { .. } => QuestionKind::Trivia,
            QuestionBody::Event { .. } => QuestionKind::Event,
        }
    }

    /// Quote text, trivia prompt or event title
    pub fn prompt(&self) -> &str {
        match &self.body {
            QuestionBody::Quote { text, .. } => text,
            QuestionBody::Trivia { prompt, .. } => prompt,
            QuestionBody::Event { title, .. } => title,
        }
    }

    /// The value a multiple-choice answer is compared against.
    /// Events have no textual answer; their year is the ground truth.
    pub fn correct_value(&self) -> Option<&str> {
        match &self.body {
            QuestionBody::Quote { author, .. } => Some(author),
            QuestionBody::Trivia { answer, .. } => Some(answer),
            QuestionBody::Event { .. } => None,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self.body {
            QuestionBody::Event { year, .. } => Some(year),
            _ => None,
        }
    }
}

/// Render a signed year the way the timeline shows it (negative years are BC)
pub fn format_year(year: i32) -> String {
    if year < 0 {
        format!("{} BC", -(year as i64))
    } else {
        format!("AD {year}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trivia() -> Question {
        Question {
            id: "t1".into(),
            category: "rome".into(),
            difficulty: Difficulty::Easy,
            explanation: "".into(),
            period: "Republic".into(),
            body: QuestionBody::Trivia {
                prompt: "Who crossed the Rubicon?".into(),
                answer: "Julius Caesar".into(),
                wrong_options: vec![],
            },
        }
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::parse("Easy"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::parse(" hard "), Some(Difficulty::Hard));
        assert_eq!(Difficulty::parse("extreme"), None);
    }

    #[test]
    fn test_difficulty_display() {
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }

    #[test]
    fn test_trivia_accessors() {
        let q = trivia();
        assert_eq!(q.kind(), QuestionKind::Trivia);
        assert_eq!(q.prompt(), "Who crossed the Rubicon?");
        assert_eq!(q.correct_value(), Some("Julius Caesar"));
        assert_eq!(q.year(), None);
    }

    #[test]
    fn test_event_has_no_textual_answer() {
        let mut q = trivia();
        q.body = QuestionBody::Event {
            title: "Founding of Rome".into(),
            year: -753,
        };
        assert_eq!(q.kind(), QuestionKind::Event);
        assert_eq!(q.correct_value(), None);
        assert_eq!(q.year(), Some(-753));
    }

    #[test]
    fn test_format_year() {
        assert_eq!(format_year(-753), "753 BC");
        assert_eq!(format_year(800), "AD 800");
    }
}
