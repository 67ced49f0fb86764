//! debugmate - AI code debugger for the terminal
//!
//! Write or paste code, add the error message, and let the debugging
//! service explain what went wrong:
//! - Full diagnosis (reason, line, explanation, fix, example) or a hint
//! - Collapsible sections, copy to clipboard, read aloud
//! - Light and dark themes
//!
//! Usage: debugmate [--server URL] [--hint] [--help] [--version]
//! Pipe:  cat broken.py | debugmate

mod app;
mod client;
mod clipboard;
mod config;
mod editor;
mod error;
mod parser;
mod speech;
mod stats;
mod submit;
mod types;
mod ui;
mod view;

use anyhow::{Context, Result};
use app::App;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::{self, stdout, IsTerminal, Read};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DEBUGMATE_LOG";

/// Session overrides from the command line
#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    help: bool,
    version: bool,
    server: Option<String>,
    hint: bool,
}

fn parse_args(args: &[String]) -> Result<CliArgs> {
    let mut cli = CliArgs::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => cli.help = true,
            "--version" | "-v" => cli.version = true,
            "--hint" => cli.hint = true,
            "--server" | "-s" => {
                let url = iter.next().context("--server needs a URL")?;
                cli.server = Some(url.clone());
            }
            other => {
                if let Some(url) = other.strip_prefix("--server=") {
                    cli.server = Some(url.to_string());
                } else {
                    anyhow::bail!("Unknown argument: {} (see --help)", other);
                }
            }
        }
    }
    Ok(cli)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cli = parse_args(&args)?;

    if cli.help {
        print_help();
        return Ok(());
    }

    if cli.version {
        println!("debugmate {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_logging();

    // Check for piped input BEFORE starting TUI
    let piped_input = read_piped_input();

    // If stdin was a pipe, reattach to /dev/tty so crossterm can read key events
    if piped_input.is_some() {
        reattach_stdin_to_tty()
            .context("Failed to reattach stdin to terminal. Are you running in a TTY?")?;
    }

    let result = run_app(cli, piped_input);

    if let Err(e) = result {
        tracing::error!("fatal: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Log to a file; the terminal belongs to the UI.
/// Failing to set up logging is not worth refusing to start.
fn init_logging() {
    let Some(dir) = dirs::data_dir().map(|d| d.join("debugmate")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("debugmate.log"))
    {
        Ok(file) => file,
        Err(_) => return,
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .try_init();
}

/// Read all of stdin if it's a pipe (not a terminal).
/// Returns None if stdin is a terminal (normal interactive mode).
/// Limits input to 1 MB to prevent excessive memory usage.
fn read_piped_input() -> Option<String> {
    if io::stdin().is_terminal() {
        return None;
    }

    const MAX_PIPE_SIZE: usize = 1024 * 1024;

    let mut input = String::new();
    match io::stdin().take(MAX_PIPE_SIZE as u64).read_to_string(&mut input) {
        Ok(_) => {}
        Err(_) => return None, // Non-UTF8 or read error
    }

    if input.trim().is_empty() {
        return None;
    }

    Some(input)
}

/// After reading piped stdin, reopen /dev/tty as fd 0 so crossterm
/// can read keyboard events.
#[cfg(unix)]
fn reattach_stdin_to_tty() -> Result<()> {
    use std::os::unix::io::AsRawFd;

    let tty = std::fs::File::open("/dev/tty")
        .context("Cannot open /dev/tty: pipe mode requires a controlling terminal")?;

    let tty_fd = tty.as_raw_fd();
    let result = unsafe { libc::dup2(tty_fd, libc::STDIN_FILENO) };
    if result == -1 {
        anyhow::bail!("dup2 failed: could not reattach stdin to /dev/tty");
    }

    // fd 0 now independently points to /dev/tty via the dup2 copy
    drop(tty);

    Ok(())
}

#[cfg(not(unix))]
fn reattach_stdin_to_tty() -> Result<()> {
    anyhow::bail!("Pipe mode is only supported on Unix systems (Linux, macOS)")
}

fn print_help() {
    println!(
        r#"debugmate - AI code debugger

USAGE:
    debugmate [OPTIONS]
    cat broken.py | debugmate          # preload the editor

OPTIONS:
    -s, --server <URL>   Debugging service for this session
        --hint           Start in hint mode
    -h, --help           Print help information
    -v, --version        Print version information

KEYBINDINGS:
    Ctrl+S / F5      Debug the code
    Shift+Tab / Tab  Switch focus (Tab indents inside the code editor)
    F2               Toggle full solution / hint only
    F3               Read the output aloud
    F4               Copy the output
    F6               Clear output
    F7               Clear code
    F8               Toggle light / dark theme
    Esc              Stop reading
    j/k, Enter       Move between / fold output sections
    Ctrl+Q           Quit

CONFIG:
    ~/.config/debugmate/config.toml   (or $DEBUGMATE_CONFIG)

LOG:
    ~/.local/share/debugmate/debugmate.log   (level via $DEBUGMATE_LOG)
"#
    );
}

fn run_app(cli: CliArgs, piped_input: Option<String>) -> Result<()> {
    let mut config = config::Config::load()
        .context("Failed to load configuration")?;

    // Session-only overrides; only the theme is ever written back
    if let Some(server) = cli.server {
        config.server_url = server;
    }
    if cli.hint {
        config.default_mode = types::Mode::Hint;
    }

    tracing::info!("starting against {}", config.server_url);

    let mut app = App::new(config, piped_input)
        .context("Failed to initialize application")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)
        .context("Failed to setup terminal")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)
        .context("Failed to create terminal")?;

    // Install panic handler so terminal is restored on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(
            std::io::stdout(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableBracketedPaste
        );
        let _ = execute!(std::io::stdout(), crossterm::cursor::Show);
        original_hook(info);
    }));

    let result = main_loop(&mut terminal, &mut app);

    // Stop any speech before the process exits
    app.stop_speech();

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

fn main_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::render(frame, app);
        })?;

        // Pick up finished requests, expire flash messages
        app.update_timers()?;

        // Poll for events with timeout (for spinner + flash expiry)
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => app.handle_key(key)?,
                // Multi-line pastes arrive whole instead of as Enter presses
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
