mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
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
    fs::{self, File, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    sync::Mutex,
    time::Instant,
};
use t4::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore, GridSize},
    history::{HistoryLog, HistoryRecord},
    layout,
    runtime::{CrosstermEventSource, FixedTicker, Runner, TermEvent, TermEventSource, Ticker},
    session::{InputEvent, Session, SessionOutcome, Transition},
    word_source::WordPool,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// terminal typing test: type the word grid before the clock runs out
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Type the generated word grid over itself. Correct characters turn green, mistakes red; space skips to the next word, backspace and ctrl+w delete. The result is reported in words per minute when time runs out or the text is done. Quit with ctrl+d."
)]
pub struct Cli {
    /// size of the grid in characters: {columns}x{rows}, at least 10x5
    #[clap(short = 's', long)]
    size: Option<GridSize>,

    /// path to a whitespace separated words file (default: built-in english list)
    #[clap(short = 'f', long = "file")]
    words_file: Option<PathBuf>,

    /// random seed for the word draw
    #[clap(short = 'r', long)]
    seed: Option<u64>,

    /// time limit in seconds
    #[clap(short = 't', long = "time")]
    time_limit_secs: Option<u64>,

    /// number of words to lay out (default: fill the grid)
    #[clap(short = 'w', long = "words")]
    word_budget: Option<usize>,

    /// store the effective settings as new defaults
    #[clap(long)]
    save_config: bool,

    /// append every finished session to the history file
    #[clap(long)]
    history: bool,
}

impl Cli {
    /// Command line values win over the stored config.
    fn merge_into(&self, mut config: Config) -> Config {
        if let Some(size) = self.size {
            config.columns = size.columns;
            config.rows = size.rows;
        }
        if let Some(path) = &self.words_file {
            config.words_file = Some(path.clone());
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(secs) = self.time_limit_secs {
            config.time_limit_secs = secs;
        }
        if let Some(budget) = self.word_budget {
            config.word_budget = Some(budget);
        }
        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppState {
    Typing,
    Results,
}

#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub pool: WordPool,
    pub seed: u64,
    pub session: Session,
    pub state: AppState,
    pub history: Option<HistoryLog>,
}

impl App {
    pub fn new(config: Config) -> t4::Result<Self> {
        let pool = match &config.words_file {
            Some(path) => WordPool::load(path)?,
            None => WordPool::builtin()?,
        };
        let session = new_session(&pool, &config, config.seed)?;

        Ok(Self {
            seed: config.seed,
            config,
            pool,
            session,
            state: AppState::Typing,
            history: None,
        })
    }

    /// Same text again.
    pub fn restart(&mut self) {
        self.session = Session::new(self.session.target().clone(), self.config.session_config());
        self.state = AppState::Typing;
    }

    /// Fresh text from the next seed.
    pub fn next_text(&mut self) -> t4::Result<()> {
        let seed = self.seed.wrapping_add(1);
        self.session = new_session(&self.pool, &self.config, seed)?;
        self.seed = seed;
        self.state = AppState::Typing;
        Ok(())
    }

    fn on_finished(&mut self) {
        self.state = AppState::Results;

        let Some(report) = self.session.report() else {
            return;
        };
        info!(
            outcome = %report.outcome,
            seed = self.seed,
            elapsed_secs = report.elapsed_secs,
            wpm = report.wpm,
            correct_chars = report.correct_chars,
            "session report"
        );

        if let Some(history) = &self.history {
            let record = HistoryRecord::new(&self.config, self.seed, &report);
            if let Err(err) = history.append(&record) {
                warn!(%err, path = %history.path().display(), "could not write history");
            }
        }
    }
}

fn new_session(pool: &WordPool, config: &Config, seed: u64) -> t4::Result<Session> {
    let target = layout::build(
        pool.seeded(seed),
        config.columns,
        config.rows,
        config.word_budget,
    )?;
    Ok(Session::new(target, config.session_config()))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = open_log_file(path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let log_path = AppDirs::log_path();
    if let Err(err) = init_logging(&log_path) {
        eprintln!("t4: logging disabled, cannot open {}: {err}", log_path.display());
    }

    let store = FileConfigStore::new();
    let config = cli.merge_into(store.load());
    if let Err(err) = config.validate() {
        Cli::command().error(ErrorKind::ValueValidation, err).exit();
    }
    if cli.save_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }

    // Word source and layout errors surface before the terminal is touched
    let mut app = App::new(config)?;
    if cli.history {
        app.history = Some(HistoryLog::new(AppDirs::history_path()));
    }
    info!(
        size = %app.config.size(),
        seed = app.seed,
        words = app.pool.name(),
        "starting session"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let result = start_tui(&mut terminal, &mut app, &runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Some(report) = app.session.report() {
        println!(
            "{}: {:.1} wpm, {} correct chars in {:.1}s",
            report.outcome, report.wpm, report.correct_chars, report.elapsed_secs
        );
    }

    result
}

fn is_exit_key(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => true,
        KeyCode::Char('c') | KeyCode::Char('d') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn start_tui<B: Backend, E: TermEventSource, T: Ticker>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    runner: &Runner<E, T>,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step() {
            TermEvent::Tick => {
                if app.state == AppState::Typing && app.session.has_started() {
                    let elapsed = app.session.elapsed_at(Instant::now());
                    if let Transition::Finished(_) = app.session.poll(elapsed) {
                        app.on_finished();
                    }
                }
            }
            TermEvent::Resize => {}
            TermEvent::Key(key) => match app.state {
                AppState::Typing => {
                    let event = InputEvent::from(key);
                    let now = Instant::now();
                    if !matches!(event, InputEvent::Quit | InputEvent::Ignored) {
                        app.session.start(now);
                    }

                    let elapsed = app.session.elapsed_at(now);
                    if let Transition::Finished(outcome) = app.session.handle(event, elapsed) {
                        app.on_finished();
                        if outcome == SessionOutcome::QuitRequested {
                            // leave the report on screen for the final frame
                            terminal.draw(|f| ui::draw(app, f))?;
                            return Ok(());
                        }
                    }
                }
                AppState::Results => match key.code {
                    _ if is_exit_key(&key) => return Ok(()),
                    KeyCode::Char('r') => app.restart(),
                    KeyCode::Char('n') => app.next_text()?,
                    _ => {}
                },
            },
        }
    }
}
