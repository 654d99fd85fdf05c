// ABOUTME: Main entry point for hsh-admin with TUI and CLI support
//
// Binary: hsh-admin
// Usage: hsh-admin [COMMAND]
// - No command / setup: runs the setup wizard TUI
// - env, status, libraries: inspect the backend
// - collections, search, show, add, remove, update, poster: manage collections

#![allow(missing_docs)]

use std::io::{self, IsTerminal};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*, Terminal};
use tracing::{error, info};

use hsh_admin::app::{App, AppOutcome, EventHandler};
use hsh_admin::cli::{self, Cli, Commands, SetupArgs};
use hsh_admin::config::AppConfig;
use hsh_admin::wizard::WizardComponent;

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = Cli::parse();
    let config = args.load_config()?;
    let format = args.format;

    let result = match args.command {
        Some(Commands::Env) => cli::server::env(&config, format).await,
        Some(Commands::Status) => cli::server::status(&config, format).await,
        Some(Commands::Libraries) => cli::server::libraries(&config, format).await,
        Some(Commands::Collections(list_args)) => {
            cli::collections::list(&config, list_args, format).await
        }
        Some(Commands::Search(search_args)) => {
            cli::collections::search(&config, search_args, format).await
        }
        Some(Commands::Show(target)) => cli::collections::show(&config, target, format).await,
        Some(Commands::Add(add_args)) => cli::collections::add(&config, add_args, format).await,
        Some(Commands::Remove(remove_args)) => cli::collections::remove(&config, remove_args).await,
        Some(Commands::Update(update_args)) => cli::collections::update(&config, update_args).await,
        Some(Commands::Poster(poster_args)) => cli::collections::poster(&config, poster_args).await,

        // TUI mode (explicit or default)
        Some(Commands::Setup(setup_args)) => run_setup(config, setup_args).await,
        None => run_setup(config, SetupArgs::default()).await,
    };

    // Ensure terminal is cleaned up on any error
    if result.is_err() {
        cleanup_terminal();
    }

    result
}

async fn run_setup(mut config: AppConfig, args: SetupArgs) -> Result<()> {
    if !args.force && !config.needs_setup() {
        println!(
            "Setup already completed at {}.",
            config.setup_completed_at.as_deref().unwrap_or("an earlier run")
        );
        println!("Run `hsh-admin setup --force` to go through it again.");
        return Ok(());
    }

    let client = cli::connect(&config).await?;
    info!("Starting setup wizard against {}", client.base_url());
    let mut app = App::new(Arc::new(client));

    // Flush pending terminal events so stray keypresses don't land in the first step
    while event::poll(Duration::from_millis(10)).unwrap_or(false) {
        let _ = event::read();
    }

    run_tui(&mut app).await?;

    match app.state.outcome {
        Some(AppOutcome::Completed(message)) => {
            config.mark_setup_completed();
            if let Err(e) = config.save() {
                error!("Failed to record setup completion: {}", e);
            }
            println!("{message}");
            println!("Homescreen Hero is configured at {}", config.server_url);
        }
        Some(AppOutcome::Cancelled) | None => println!("Setup cancelled; nothing was saved."),
    }
    Ok(())
}

async fn run_tui(app: &mut App) -> Result<()> {
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. The setup wizard requires a terminal.\n\
             Use the subcommands (see --help) for scripted access."
        ));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(app, &mut terminal).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();
    let component = WizardComponent::new();

    loop {
        // Runs queued requests and applies anything that came back
        app.tick();

        terminal.draw(|frame| {
            component.render(frame, frame.size(), &app.state.wizard);
        })?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(app_event) = EventHandler::handle_key_event(key_event, &app.state) {
                        EventHandler::process_event(app_event, &mut app.state);
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.state.should_quit {
            return Ok(());
        }

        // Let spawned requests make progress between polls
        tokio::task::yield_now().await;
    }
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use std::path::PathBuf;
    use tracing_subscriber::prelude::*;

    let log_dir = dirs::home_dir()
        .map(|home| home.join(".homescreen-hero-admin").join("logs"))
        .unwrap_or_else(|| PathBuf::from(".homescreen-hero-admin/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "hsh-admin-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        eprintln!("Could not open log file {}; continuing without logs", log_file.display());
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hsh_admin=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Ensure terminal is restored before logging the panic
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs in ~/.homescreen-hero-admin/logs for more details.");
    }));
}
