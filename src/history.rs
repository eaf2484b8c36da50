use crate::app_dirs::AppDirs;
use crate::config::GameMode;
use crate::results::SessionStats;
use chrono::{DateTime, Local};
use clap::ValueEnum;
use rusqlite::{params, Connection, Result};
use std::path::{Path, PathBuf};

/// One completed session as stored in the history database
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub mode: GameMode,
    pub category: Option<String>,
    pub score: u32,
    pub correct_answers: usize,
    pub total_questions: usize,
    pub accuracy: f64,
    pub max_streak: u32,
    pub hints_used: u32,
    pub finished_at: DateTime<Local>,
}

/// SQLite log of completed sessions
#[derive(Debug)]
pub struct HistoryDb {
    conn: Connection,
}

impl HistoryDb {
    /// Open the database at the default state location
    pub fn new() -> Result<Self> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("annals_history.db"));
        Self::open(&path)
    }

    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CANTOPEN),
                    Some(format!("Failed to create directory: {}", e)),
                )
            })?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mode TEXT NOT NULL,
                category TEXT,
                score INTEGER NOT NULL,
                correct_answers INTEGER NOT NULL,
                total_questions INTEGER NOT NULL,
                accuracy REAL NOT NULL,
                max_streak INTEGER NOT NULL,
                hints_used INTEGER NOT NULL,
                finished_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_mode ON sessions(mode)",
            [],
        )?;
        Ok(Self { conn })
    }

    /// Store a completed session; returns its row id
    pub fn record(
        &self,
        mode: GameMode,
        category: Option<&str>,
        stats: &SessionStats,
    ) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO sessions
            (mode, category, score, correct_answers, total_questions, accuracy, max_streak, hints_used, finished_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                mode.to_string(),
                category,
                stats.score,
                stats.correct_answers as i64,
                stats.total_questions as i64,
                stats.accuracy,
                stats.max_streak,
                stats.hints_used,
                Local::now().to_rfc3339(),
            ],
        )?;
        tracing::debug!("recorded {} session with score {}", mode, stats.score);
        Ok(self.conn.last_insert_rowid())
    }

    /// Highest score ever recorded for a mode
    pub fn best_score(&self, mode: GameMode) -> Result<Option<u32>> {
        self.conn.query_row(
            "SELECT MAX(score) FROM sessions WHERE mode = ?1",
            [mode.to_string()],
            |row| row.get(0),
        )
    }

    /// Most recent sessions first
    pub fn recent(&self, limit: usize) -> Result<Vec<SessionRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT mode, category, score, correct_answers, total_questions, accuracy,
                   max_streak, hints_used, finished_at
            FROM sessions
            ORDER BY id DESC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], |row| {
            let mode_str: String = row.get(0)?;
            let mode = GameMode::from_str(&mode_str, true).map_err(|_| {
                rusqlite::Error::InvalidColumnType(0, "mode".to_string(), rusqlite::types::Type::Text)
            })?;
            let finished_str: String = row.get(8)?;
            let finished_at = DateTime::parse_from_rfc3339(&finished_str)
                .map_err(|_| {
                    rusqlite::Error::InvalidColumnType(
                        8,
                        "finished_at".to_string(),
                        rusqlite::types::Type::Text,
                    )
                })?
                .with_timezone(&Local);

            Ok(SessionRecord {
                mode,
                category: row.get(1)?,
                score: row.get(2)?,
                correct_answers: row.get::<_, i64>(3)? as usize,
                total_questions: row.get::<_, i64>(4)? as usize,
                accuracy: row.get(5)?,
                max_streak: row.get(6)?,
                hints_used: row.get(7)?,
                finished_at,
            })
        })?;

        rows.collect()
    }

    pub fn session_count(&self) -> Result<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM sessions", [], |row| row.get(0))
    }

    /// Clear all history (for testing or reset purposes)
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM sessions", [])?;
        Ok(())
    }
}
