//! tagpick - pick several items from a filtered list in the terminal.
//!
//! On submit the selected keys are printed to stdout, comma separated, so
//! the tool composes with shell scripts.

mod cli;

use std::io::{self, Stdout, Write};
use std::process::ExitCode;

use clap::Parser;
use crossterm::event::{
    DisableBracketedPaste, DisableFocusChange, DisableMouseCapture, EnableBracketedPaste,
    EnableFocusChange, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{error, warn};

use tagpick::app::App;
use tagpick::config::{builtin_palette, load_candidates, Config, ConfigError};
use tagpick::error::{AppError, Result};
use tagpick::events::EventHandler;
use tagpick::logging;

use cli::Cli;

type Tui = Terminal<CrosstermBackend<Stdout>>;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = logging::init() {
        eprintln!("Warning: failed to initialize logging: {e}");
    }

    let result = run(&cli);
    logging::shutdown();

    match result {
        Ok(Some(line)) => {
            println!("{line}");
            Ok(ExitCode::SUCCESS)
        }
        Ok(None) => Ok(ExitCode::from(1)),
        Err(e) if e.is_critical() => {
            error!(error = %e, "Fatal error");
            eprintln!("tagpick: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("{action}");
            }
            Ok(ExitCode::from(2))
        }
        Err(e) => Err(e.into()),
    }
}

fn run(cli: &Cli) -> Result<Option<String>> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => match Config::load() {
            Ok(config) => config,
            Err(e @ ConfigError::NoConfigDir) => {
                warn!(error = %e, "Using default settings");
                Config::default()
            }
            Err(e) => return Err(e.into()),
        },
    };
    cli.apply(&mut config.settings);

    let candidates = match &cli.candidates {
        Some(path) => load_candidates(path)?,
        None => builtin_palette(),
    };

    let mut app = App::new(candidates, cli.initial_keys(), &config.settings)?;

    let mut terminal = setup_terminal()?;
    let looped = event_loop(&mut terminal, &mut app);
    let restored = restore_terminal(&mut terminal);
    looped?;
    restored?;

    Ok(app.output_line())
}

fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let events = EventHandler::new();
    while !app.should_quit() {
        terminal.draw(|frame| app.view(frame))?;
        app.update(events.next()?);
    }
    Ok(())
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(|e| AppError::terminal(e.to_string()))?;
    let mut stdout = io::stdout();
    let terminal = execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste,
        EnableFocusChange
    )
    .and_then(|()| Terminal::new(CrosstermBackend::new(stdout)));
    undo_on_error(terminal, || {
        let _ = reset_modes(&mut io::stdout());
    })
}

/// Map a setup failure to a terminal error, running `undo` first so the
/// shell is not left in raw mode or on the alternate screen.
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> Result<T> {
    result.map_err(|e| {
        undo();
        AppError::terminal(e.to_string())
    })
}

fn reset_modes(out: &mut impl Write) -> io::Result<()> {
    let raw = disable_raw_mode();
    execute!(
        out,
        DisableFocusChange,
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    raw
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    reset_modes(terminal.backend_mut())?;
    terminal.show_cursor()?;
    Ok(())
}
