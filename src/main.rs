use annals::{
    app::{App, KeyOutcome},
    app_dirs::AppDirs,
    bank::QuestionBank,
    config::{Config, ConfigStore, FileConfigStore, GameConfig, GameMode},
    history::HistoryDb,
    question::Difficulty,
    runtime::{CrosstermEventSource, GameEvent, Runner, SystemClock},
    session::SessionController,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, OpenOptions},
    io::{self, stdin},
    path::PathBuf,
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

const TICK_RATE_MS: u64 = 100;
const HISTORY_LIMIT: usize = 10;

/// timed ancient-history recall games in the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Guess who said a famous quote, answer timed trivia, or put historical events in order. Flags override the defaults stored in the config file."
)]
pub struct Cli {
    /// game to play
    #[clap(short = 'm', long, value_enum)]
    mode: Option<GameMode>,

    /// only draw questions from this category
    #[clap(short = 'c', long)]
    category: Option<String>,

    /// only draw questions of this difficulty
    #[clap(short = 'd', long, value_enum)]
    difficulty: Option<Difficulty>,

    /// questions per session, or events on the timeline
    #[clap(short = 'n', long)]
    count: Option<usize>,

    /// seconds allowed per question
    #[clap(short = 't', long)]
    time_limit: Option<u32>,

    /// hints available per session
    #[clap(long)]
    hints: Option<u32>,

    /// verification attempts in timeline mode
    #[clap(long)]
    attempts: Option<u32>,

    /// seed for question selection and shuffling
    #[clap(long)]
    seed: Option<u64>,

    /// load questions from a JSON file instead of the bundled bank
    #[clap(long)]
    bank: Option<PathBuf>,

    /// print a summary of the question bank and exit
    #[clap(long)]
    list: bool,

    /// print recently completed sessions and exit
    #[clap(long)]
    history: bool,

    /// store the resulting settings as the new defaults
    #[clap(long)]
    save_defaults: bool,
}

impl Cli {
    /// Merge flags over the stored defaults
    fn to_game_config(&self, stored: &Config) -> GameConfig {
        let mut base = Config {
            mode: self.mode.unwrap_or(stored.mode),
            ..stored.clone()
        };
        if self.mode.is_some_and(|m| m != stored.mode) {
            // per-mode count and time limit do not carry across modes
            base.question_count = None;
            base.time_limit_secs = None;
        }
        let mut config = base.to_game_config();
        if let Some(category) = &self.category {
            config.category = Some(category.to_lowercase());
        }
        if self.difficulty.is_some() {
            config.difficulty = self.difficulty;
        }
        if let Some(count) = self.count {
            config.question_count = count;
        }
        if let Some(secs) = self.time_limit {
            config.time_limit_secs = secs;
        }
        if let Some(hints) = self.hints {
            config.hints = hints;
        }
        if let Some(attempts) = self.attempts {
            config.max_attempts = attempts;
        }
        config
    }

    fn load_bank(&self) -> Result<QuestionBank, Box<dyn Error>> {
        let bank = match &self.bank {
            Some(path) => QuestionBank::from_path(path)?,
            None => QuestionBank::bundled()?,
        };
        Ok(bank)
    }
}

fn init_logging() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("annals=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn print_bank_summary(bank: &QuestionBank) {
    println!(
        "{} questions loaded ({} rejected)",
        bank.len(),
        bank.rejected()
    );
    println!("  from     {}", bank.sources().join(", "));
    for mode in [GameMode::Quotes, GameMode::Trivia, GameMode::Timeline] {
        let kind = mode.kind();
        println!(
            "  {:<9}{:>4}  {}",
            mode.to_string(),
            bank.count(kind),
            bank.categories(kind).join(", ")
        );
    }
}

fn print_history(db: &HistoryDb) -> Result<(), Box<dyn Error>> {
    for mode in [GameMode::Quotes, GameMode::Trivia, GameMode::Timeline] {
        match db.best_score(mode)? {
            Some(best) => println!("best {:<9}{:>6}", mode.to_string(), best),
            None => println!("best {:<9}{:>6}", mode.to_string(), "-"),
        }
    }
    for record in db.recent(HISTORY_LIMIT)? {
        println!(
            "{}  {:<9}{:>6}  {}/{} correct  {:.0}%{}",
            record.finished_at.format("%Y-%m-%d %H:%M"),
            record.mode.to_string(),
            record.score,
            record.correct_answers,
            record.total_questions,
            record.accuracy,
            record
                .category
                .as_ref()
                .map(|c| format!("  [{c}]"))
                .unwrap_or_default()
        );
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_logging();

    if cli.history {
        return print_history(&HistoryDb::new()?);
    }

    let bank = cli.load_bank()?;
    if cli.list {
        print_bank_summary(&bank);
        return Ok(());
    }

    let store = FileConfigStore::new();
    let config = cli.to_game_config(&store.load());
    if let Err(e) = config.validate() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::ValueValidation, e).exit();
    }
    if cli.save_defaults {
        store.save(&Config::from(&config))?;
        tracing::info!("saved defaults to {}", store.path().display());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let controller = match cli.seed {
        Some(seed) => SessionController::seeded(seed),
        None => SessionController::from_entropy(),
    };
    let mut app = match App::new(bank, config, controller) {
        Ok(app) => app,
        Err(e) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::ValueValidation, e).exit();
        }
    };

    let history = match HistoryDb::new() {
        Ok(db) => Some(db),
        Err(e) => {
            tracing::warn!("history disabled: {e}");
            None
        }
    };

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app, history.as_ref());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    history: Option<&HistoryDb>,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(
        CrosstermEventSource::new(),
        SystemClock,
        Duration::from_millis(TICK_RATE_MS),
    );

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            GameEvent::Tick(elapsed) => app.on_tick(elapsed),
            GameEvent::Resize => {}
            GameEvent::Key(key) => {
                if app.on_key(key) == KeyOutcome::Quit {
                    break;
                }
            }
        }

        if let Some(stats) = app.take_completed() {
            if let Some(db) = history {
                let mode = app.controller.mode();
                app.best_score = db.best_score(mode).unwrap_or_else(|e| {
                    tracing::warn!("could not read best score: {e}");
                    None
                });
                if let Err(e) = db.record(mode, app.config.category.as_deref(), &stats) {
                    tracing::warn!("could not record session: {e}");
                }
            }
        }

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}
