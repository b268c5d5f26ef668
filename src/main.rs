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
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};

use splitr::{
    app::App,
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    history::AttemptLog,
    logging,
    runtime::{Cadence, CrosstermEventSource, Runner, SplitEvent},
    storage::{CategoryStore, JsonFileGateway},
    time_format, ui, SplitError,
};

/// speedrun segment timer with splits, golds and personal bests
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal speedrun timer: split named segments, track gold segments and keep your personal best per category."
)]
pub struct Cli {
    /// categories file to use instead of the default data location
    #[clap(short = 'd', long)]
    data_file: Option<PathBuf>,

    /// open the timer for this category straight away
    #[clap(short = 'c', long)]
    category: Option<String>,

    /// display refresh period in milliseconds while the timer runs
    #[clap(long)]
    tick_ms: Option<u64>,

    /// number of segments visible around the current one
    #[clap(long)]
    visible_segments: Option<usize>,

    /// do not append finished or abandoned attempts to the history log
    #[clap(long)]
    no_history: bool,

    /// write logs here instead of the default state location
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// print the categories with their personal bests and exit
    #[clap(short = 'l', long)]
    list: bool,
}

impl Cli {
    /// Command line flags take precedence over the stored config
    fn apply_to(&self, mut config: Config) -> Config {
        if let Some(ms) = self.tick_ms {
            config.tick_interval_ms = ms;
        }
        if let Some(n) = self.visible_segments {
            config.visible_segments = n;
        }
        if self.no_history {
            config.record_history = false;
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(AppDirs::log_path);
    if let Err(e) = logging::init(&log_path) {
        eprintln!("logging disabled: {e}");
    }

    let config = cli.apply_to(FileConfigStore::new().load());
    let gateway = match &cli.data_file {
        Some(path) => JsonFileGateway::with_path(path),
        None => JsonFileGateway::new(),
    };
    let store = CategoryStore::open(gateway)?;

    if cli.list {
        print_categories(&store);
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let opening = match &cli.category {
        Some(title) => Some(
            store
                .find(title)
                .ok_or_else(|| SplitError::CategoryNotFound(title.clone()))?,
        ),
        None => None,
    };

    let record_history = config.record_history;
    let tick = config.tick_interval();
    let mut app = App::new(store, config);
    if record_history {
        app = app.with_history(AttemptLog::new());
    }
    if let Some(index) = opening {
        app.open_timer(index);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app, tick);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), Cadence::new(tick));

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        match runner.step(app.refresh_active()) {
            Some(SplitEvent::Tick) => app.on_tick(),
            Some(SplitEvent::Resize) => {}
            Some(SplitEvent::Key(key)) => app.handle_key(key),
            None => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn print_categories(store: &CategoryStore) {
    if store.is_empty() {
        println!("no categories");
        return;
    }
    println!(
        "{:<32} {:>8} {:>14} {:>12}",
        "TITLE", "SEGMENTS", "PERSONAL BEST", "SUM OF BEST"
    );
    for category in store.categories() {
        println!(
            "{:<32} {:>8} {:>14} {:>12}",
            category.title,
            category.segments.len(),
            time_format::format_opt(category.personal_best()),
            time_format::format_opt(category.sum_of_best()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["splitr"]);

        assert_eq!(cli.data_file, None);
        assert_eq!(cli.category, None);
        assert_eq!(cli.tick_ms, None);
        assert!(!cli.no_history);
        assert!(!cli.list);
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "splitr",
            "--tick-ms",
            "50",
            "--visible-segments",
            "12",
            "--no-history",
            "-c",
            "Any%",
        ]);
        let config = cli.apply_to(Config::default());

        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.visible_segments, 12);
        assert!(!config.record_history);
        assert_eq!(cli.category.as_deref(), Some("Any%"));
    }

    #[test]
    fn test_cli_keeps_config_without_flags() {
        let stored = Config {
            tick_interval_ms: 20,
            visible_segments: 5,
            record_history: true,
        };
        let cli = Cli::parse_from(["splitr"]);
        assert_eq!(cli.apply_to(stored.clone()), stored);
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }
}
