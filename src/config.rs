use crate::error::ConfigError;
use crate::question::{Difficulty, QuestionKind};
use clap::ValueEnum;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MIN_ADVANCE_DELAY_MS: u64 = 1500;
pub const MAX_ADVANCE_DELAY_MS: u64 = 3000;

/// The three game variants sharing the session engine
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ValueEnum,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameMode {
    /// who said this quote
    Quotes,
    /// timed multiple-choice trivia
    Trivia,
    /// put events in chronological order
    Timeline,
}

impl GameMode {
    pub fn kind(&self) -> QuestionKind {
        match self {
            GameMode::Quotes => QuestionKind::Quote,
            GameMode::Trivia => QuestionKind::Trivia,
            GameMode::Timeline => QuestionKind::Event,
        }
    }

    /// Multiple-choice modes run a per-question countdown
    pub fn is_timed(&self) -> bool {
        !matches!(self, GameMode::Timeline)
    }
}

/// Fully resolved configuration a session is started with
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    pub mode: GameMode,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    /// questions per session, or events on the timeline
    pub question_count: usize,
    pub time_limit_secs: u32,
    pub hints: u32,
    pub max_attempts: u32,
    pub advance_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::for_mode(GameMode::Trivia)
    }
}

impl GameConfig {
    pub fn for_mode(mode: GameMode) -> Self {
        Self {
            mode,
            category: None,
            difficulty: None,
            question_count: match mode {
                GameMode::Timeline => 5,
                _ => 10,
            },
            time_limit_secs: match mode {
                GameMode::Quotes => 20,
                _ => 15,
            },
            hints: 3,
            max_attempts: 3,
            advance_delay_ms: MIN_ADVANCE_DELAY_MS,
        }
    }

    /// Reject configurations that could never produce a playable session
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.question_count == 0 {
            return Err(ConfigError::ZeroCount);
        }
        if self.mode.is_timed() && self.time_limit_secs == 0 {
            return Err(ConfigError::ZeroTimeLimit);
        }
        if self.mode == GameMode::Timeline && self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if !(MIN_ADVANCE_DELAY_MS..=MAX_ADVANCE_DELAY_MS).contains(&self.advance_delay_ms) {
            return Err(ConfigError::AdvanceDelay {
                got: self.advance_delay_ms,
                min: MIN_ADVANCE_DELAY_MS,
                max: MAX_ADVANCE_DELAY_MS,
            });
        }
        Ok(())
    }
}

/// User defaults persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub mode: GameMode,
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub question_count: Option<usize>,
    pub time_limit_secs: Option<u32>,
    pub hints: u32,
    pub max_attempts: u32,
    pub advance_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: GameMode::Trivia,
            category: None,
            difficulty: None,
            question_count: None,
            time_limit_secs: None,
            hints: 3,
            max_attempts: 3,
            advance_delay_ms: MIN_ADVANCE_DELAY_MS,
        }
    }
}

impl Config {
    /// Resolve stored defaults, filling per-mode values that were left unset
    pub fn to_game_config(&self) -> GameConfig {
        let base = GameConfig::for_mode(self.mode);
        GameConfig {
            mode: self.mode,
            category: self.category.clone(),
            difficulty: self.difficulty,
            question_count: self.question_count.unwrap_or(base.question_count),
            time_limit_secs: self.time_limit_secs.unwrap_or(base.time_limit_secs),
            hints: self.hints,
            max_attempts: self.max_attempts,
            advance_delay_ms: self.advance_delay_ms,
        }
    }
}

impl From<&GameConfig> for Config {
    fn from(gc: &GameConfig) -> Self {
        Self {
            mode: gc.mode,
            category: gc.category.clone(),
            difficulty: gc.difficulty,
            question_count: Some(gc.question_count),
            time_limit_secs: Some(gc.time_limit_secs),
            hints: gc.hints,
            max_attempts: gc.max_attempts,
            advance_delay_ms: gc.advance_delay_ms,
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = if let Some(pd) = ProjectDirs::from("", "", "annals") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("annals_config.json")
        };
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        match fs::read(&self.path) {
            Ok(bytes) => match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("ignoring unreadable config {}: {}", self.path.display(), e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn roundtrip_default_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config::default();
        store.save(&cfg).unwrap();
        let loaded = store.load();
        assert_eq!(cfg, loaded);
    }

    #[test]
    fn save_and_load_custom_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let store = FileConfigStore::with_path(&path);
        let cfg = Config {
            mode: GameMode::Timeline,
            category: Some("rome".into()),
            difficulty: Some(Difficulty::Hard),
            question_count: Some(7),
            time_limit_secs: None,
            hints: 1,
            max_attempts: 5,
            advance_delay_ms: 2500,
        };
        store.save(&cfg).unwrap();
        assert_eq!(store.load(), cfg);
    }

    #[test]
    fn corrupt_config_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, b"{ not json").unwrap();
        let store = FileConfigStore::with_path(&path);
        assert_eq!(store.load(), Config::default());
    }

    #[test]
    fn unset_counts_use_mode_defaults() {
        let cfg = Config {
            mode: GameMode::Timeline,
            ..Config::default()
        };
        let game = cfg.to_game_config();
        assert_eq!(game.question_count, 5);
        assert_eq!(game.mode, GameMode::Timeline);

        let quotes = Config {
            mode: GameMode::Quotes,
            ..Config::default()
        }
        .to_game_config();
        assert_eq!(quotes.question_count, 10);
        assert_eq!(quotes.time_limit_secs, 20);
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut cfg = GameConfig::default();
        assert_eq!(cfg.validate(), Ok(()));

        cfg.question_count = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroCount));

        let mut cfg = GameConfig::default();
        cfg.time_limit_secs = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroTimeLimit));

        let mut cfg = GameConfig::for_mode(GameMode::Timeline);
        cfg.time_limit_secs = 0;
        assert_eq!(cfg.validate(), Ok(()));
        cfg.max_attempts = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroAttempts));

        let mut cfg = GameConfig::default();
        cfg.advance_delay_ms = 500;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::AdvanceDelay { got: 500, .. })
        ));
    }

    #[test]
    fn mode_display_and_kind() {
        assert_eq!(GameMode::Timeline.to_string(), "timeline");
        assert_eq!(GameMode::Quotes.kind(), QuestionKind::Quote);
        assert!(GameMode::Trivia.is_timed());
        assert!(!GameMode::Timeline.is_timed());
    }
}
