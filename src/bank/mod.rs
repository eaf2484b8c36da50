use crate::error::BankError;
use crate::question::{Difficulty, Question, QuestionBody, QuestionKind};
use include_dir::{include_dir, Dir};
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

static BANK_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/bank/data");

/// On-disk shape of a bank file. Records stay untyped until ingestion so a
/// single bad record cannot reject the whole file.
#[derive(Deserialize, Debug)]
struct BankFile {
    name: String,
    records: Vec<Value>,
}

/// Loosely typed record as authored by the content module
#[derive(Deserialize, Debug, Default)]
struct RawRecord {
    id: Option<String>,
    kind: Option<String>,
    category: Option<String>,
    difficulty: Option<String>,
    explanation: Option<String>,
    period: Option<String>,
    text: Option<String>,
    author: Option<String>,
    prompt: Option<String>,
    answer: Option<String>,
    options: Option<Vec<String>>,
    title: Option<String>,
    year: Option<i64>,
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

impl RawRecord {
    fn into_question(self) -> Option<Question> {
        let id = non_empty(self.id)?;
        let category = non_empty(self.category)?.to_lowercase();
        let difficulty = Difficulty::parse(self.difficulty.as_deref()?)?;
        let explanation = non_empty(self.explanation)?;
        let period = non_empty(self.period)?;

        let body = match self.kind?.trim().to_ascii_lowercase().as_str() {
            "quote" => QuestionBody::Quote {
                text: non_empty(self.text)?,
                author: non_empty(self.author)?,
            },
            "trivia" => {
                let answer = non_empty(self.answer)?;
                let wrong_options = self
                    .options
                    .unwrap_or_default()
                    .into_iter()
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty() && *o != answer)
                    .unique()
                    .collect();
                QuestionBody::Trivia {
                    prompt: non_empty(self.prompt)?,
                    answer,
                    wrong_options,
                }
            }
            "event" => QuestionBody::Event {
                title: non_empty(self.title)?,
                year: i32::try_from(self.year?).ok()?,
            },
            _ => return None,
        };

        Some(Question {
            id,
            category,
            difficulty,
            explanation,
            period,
            body,
        })
    }
}

/// The set of well-formed questions available to the generator
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
    rejected: usize,
    sources: Vec<String>,
}

impl QuestionBank {
    /// Ingest raw records, keeping only complete ones with a unique id
    pub fn from_records<I: IntoIterator<Item = Value>>(records: I) -> Self {
        let mut bank = QuestionBank::default();
        bank.ingest(records);
        bank
    }

    /// Load every bank file compiled into the binary
    pub fn bundled() -> Result<Self, BankError> {
        let mut bank = QuestionBank::default();
        for file in BANK_DIR
            .files()
            .sorted_by_key(|f| f.path().to_path_buf())
        {
            let name = file.path().display().to_string();
            let contents = file
                .contents_utf8()
                .ok_or_else(|| BankError::NotFound(name.clone()))?;
            bank.ingest_str(&name, contents)?;
        }
        Ok(bank)
    }

    /// Load a user supplied bank file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, BankError> {
        let path = path.as_ref();
        let name = path.display().to_string();
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                BankError::NotFound(name.clone())
            } else {
                BankError::Io {
                    path: name.clone(),
                    source,
                }
            }
        })?;
        let mut bank = QuestionBank::default();
        bank.ingest_str(&name, &contents)?;
        Ok(bank)
    }

    fn ingest_str(&mut self, path: &str, contents: &str) -> Result<(), BankError> {
        let file: BankFile = serde_json::from_str(contents).map_err(|source| BankError::Json {
            path: path.to_string(),
            source,
        })?;
        let before = self.questions.len();
        self.ingest(file.records);
        tracing::debug!(
            "loaded {} questions from bank {} at {} ({} rejected so far)",
            self.questions.len() - before,
            file.name,
            path,
            self.rejected
        );
        self.sources.push(file.name);
        Ok(())
    }

    fn ingest<I: IntoIterator<Item = Value>>(&mut self, records: I) {
        let mut seen: HashSet<String> = self.questions.iter().map(|q| q.id.clone()).collect();
        for value in records {
            let question = serde_json::from_value::<RawRecord>(value)
                .ok()
                .and_then(RawRecord::into_question);
            match question {
                Some(q) if seen.insert(q.id.clone()) => self.questions.push(q),
                Some(q) => {
                    tracing::debug!("dropping duplicate question id {}", q.id);
                    self.rejected += 1;
                }
                None => self.rejected += 1,
            }
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Number of records dropped at ingestion
    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Names of the bank files loaded, in load order
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    pub fn count(&self, kind: QuestionKind) -> usize {
        self.questions.iter().filter(|q| q.kind() == kind).count()
    }

    /// Questions of one kind, optionally narrowed by category and difficulty
    pub fn filter(
        &self,
        kind: QuestionKind,
        category: Option<&str>,
        difficulty: Option<Difficulty>,
    ) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.kind() == kind)
            .filter(|q| category.map_or(true, |c| q.category.eq_ignore_ascii_case(c)))
            .filter(|q| difficulty.map_or(true, |d| q.difficulty == d))
            .collect()
    }

    /// Sorted, de-duplicated categories available for one kind
    pub fn categories(&self, kind: QuestionKind) -> Vec<String> {
        self.questions
            .iter()
            .filter(|q| q.kind() == kind)
            .map(|q| q.category.clone())
            .sorted()
            .dedup()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn quote(id: &str) -> Value {
        json!({
            "id": id,
            "kind": "quote",
            "category": "Rome",
            "difficulty": "easy",
            "explanation": "Said on the Ides of March.",
            "period": "Late Republic",
            "text": "Et tu, Brute?",
            "author": "Julius Caesar"
        })
    }

    #[test]
    fn test_well_formed_records_are_kept() {
        let bank = QuestionBank::from_records(vec![quote("q1"), quote("q2")]);
        assert_eq!(bank.len(), 2);
        assert_eq!(bank.rejected(), 0);
        assert_eq!(bank.questions()[0].category, "rome");
    }

    #[test]
    fn test_missing_fields_are_filtered() {
        let mut no_author = quote("q1");
        no_author.as_object_mut().unwrap().remove("author");
        let mut no_explanation = quote("q2");
        no_explanation["explanation"] = json!("   ");
        let mut bad_difficulty = quote("q3");
        bad_difficulty["difficulty"] = json!("legendary");
        let mut unknown_kind = quote("q4");
        unknown_kind["kind"] = json!("poem");

        let bank = QuestionBank::from_records(vec![
            no_author,
            no_explanation,
            bad_difficulty,
            unknown_kind,
            quote("q5"),
        ]);
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.rejected(), 4);
    }

    #[test]
    fn test_wrongly_typed_record_does_not_poison_file() {
        let bank = QuestionBank::from_records(vec![
            json!({"id": "e1", "kind": "event", "title": "x", "year": "long ago"}),
            json!(42),
            quote("q1"),
        ]);
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.rejected(), 2);
    }

    #[test]
    fn test_duplicate_ids_are_dropped() {
        let bank = QuestionBank::from_records(vec![quote("q1"), quote("q1")]);
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.rejected(), 1);
    }

    #[test]
    fn test_trivia_options_exclude_answer() {
        let bank = QuestionBank::from_records(vec![json!({
            "id": "t1",
            "kind": "trivia",
            "category": "greece",
            "difficulty": "medium",
            "explanation": "Marathon was fought in 490 BC.",
            "period": "Classical",
            "prompt": "Where did the Athenians defeat the Persians in 490 BC?",
            "answer": "Marathon",
            "options": ["Marathon", "Thermopylae", "Salamis", "Salamis", ""]
        })]);
        match &bank.questions()[0].body {
            QuestionBody::Trivia { wrong_options, .. } => {
                assert_eq!(wrong_options, &vec!["Thermopylae".to_string(), "Salamis".to_string()]);
            }
            other => panic!("expected trivia, got {other:?}"),
        }
    }

    #[test]
    fn test_filter_and_categories() {
        let mut greek = quote("q2");
        greek["category"] = json!("greece");
        greek["difficulty"] = json!("hard");
        let bank = QuestionBank::from_records(vec![quote("q1"), greek]);

        assert_eq!(bank.filter(QuestionKind::Quote, None, None).len(), 2);
        assert_eq!(bank.filter(QuestionKind::Quote, Some("ROME"), None).len(), 1);
        assert_eq!(
            bank.filter(QuestionKind::Quote, None, Some(Difficulty::Hard)).len(),
            1
        );
        assert!(bank.filter(QuestionKind::Event, None, None).is_empty());
        assert_eq!(bank.categories(QuestionKind::Quote), vec!["greece", "rome"]);
    }

    #[test]
    fn test_bundled_bank_has_every_kind() {
        let bank = QuestionBank::bundled().expect("bundled bank should parse");
        assert!(bank.count(QuestionKind::Quote) >= 4);
        assert!(bank.count(QuestionKind::Trivia) >= 4);
        assert!(bank.count(QuestionKind::Event) >= 5);
        assert_eq!(bank.rejected(), 0);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = QuestionBank::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, BankError::NotFound(_)));
    }

    #[test]
    fn test_bank_names_are_recorded() {
        let bank = QuestionBank::bundled().unwrap();
        assert_eq!(bank.sources(), ["events", "quotes", "trivia"]);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mine.json");
        std::fs::write(
            &path,
            r#"{"name": "my quotes", "records": [{"id": "x", "kind": "quote"}]}"#,
        )
        .unwrap();
        let bank = QuestionBank::from_path(&path).unwrap();
        assert_eq!(bank.sources(), ["my quotes"]);
        assert_eq!(bank.rejected(), 1);
        assert!(bank.is_empty());
    }

    #[test]
    fn test_bank_file_needs_a_name() {
        let mut bank = QuestionBank::default();
        let err = bank.ingest_str("inline", r#"{"records": []}"#).unwrap_err();
        assert!(matches!(err, BankError::Json { .. }));
        assert!(bank.sources().is_empty());
    }
}
