//! church-portal — the church homepage and content admin, in the terminal.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ PortalMsg  ┌──────────┐  draw()  ┌──────────┐
//! │ loader.rs │ ─────────► │  app.rs  │ ───────► │  ui.rs   │
//! │  (tasks)  │ (channel)  │ (state)  │          │ (render) │
//! └───────────┘            └──────────┘          └──────────┘
//!       ▲                    ▲      │ Request
//!       │                    │      ▼
//!  home::aggregator    handle_key_event()
//!  home::carousel      ┌──────────┐
//!                      │ input.rs │
//!                      └──────────┘
//! ```
//!
//! * **`api/`** — the `ContentApi` trait, JSON records, and the reqwest client.
//! * **`home/`** — the homepage slot table / aggregator and the hero carousel.
//! * **`loader`** — runs loads on tokio tasks and reports back over a channel.
//! * **`app`** — owns all UI state (loading gate, current page, selection).
//! * **`ui`** — pure rendering: reads `App` state and draws widgets.
//! * **`input`** — maps key events to `App` mutations.
//! * **`admin`** — `church-portal admin ...` CRUD commands.
//! * **`main`** — wires everything together: parse args, load config, set up
//!   logging and the terminal, and run the event loop.

mod admin;
mod api;
mod app;
mod cli;
mod config;
mod error;
mod format;
mod home;
mod input;
mod loader;
mod ui;

use std::fs::OpenOptions;
use std::io;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use api::{ContentApi, HttpApi};
use app::{App, Request};
use cli::{Args, Command};
use config::Config;
use home::{HeroCarousel, HomeAggregator, RotationTimer};
use loader::PortalMsg;

// ---------------------------------------------------------------------------
// RAII terminal guard — idiomatic cleanup even on panic
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
///
/// Constructing this struct enters raw mode + alternate screen.  When the
/// value is dropped (normally or during stack unwinding) it restores the
/// terminal.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Install a panic hook that restores the terminal before printing the
/// panic message.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    // -- init-config needs neither logging nor the API ----------------------
    if args.command == Some(Command::InitConfig) {
        return handle_init_config();
    }

    let config = Config::resolve(&args)?;
    let interactive = args.command.is_none();
    init_logging(&config, interactive)?;

    info!("church-portal v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    let api: Arc<dyn ContentApi> = Arc::new(
        HttpApi::new(&config.api.base_url, config.request_timeout())
            .context("Invalid API configuration")?,
    );

    match args.command {
        Some(Command::Admin { resource, action }) => {
            let output = admin::run(api.as_ref(), resource, action).await.map_err(|e| {
                error!("Admin command failed: {e:#}");
                e
            })?;
            println!("{output}");
            Ok(())
        }
        _ => run_portal(api, &config, args.devotional).await,
    }
}

/// Handle `init-config`: write a default church-portal.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            path.display()
        );
        std::process::exit(1);
    }

    std::fs::write(path, Config::default_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {} with default settings.", path.display());
    Ok(())
}

/// Initialize logging.  The interactive portal owns the terminal, so its
/// logs go to the configured file; admin commands log to stderr.
fn init_logging(config: &Config, to_file: bool) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact();

    if to_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log.file)
            .with_context(|| format!("Failed to open log file {}", config.log.file.display()))?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(io::stderr).init();
    }
    Ok(())
}

/// Run the interactive homepage until the user quits.
async fn run_portal(
    api: Arc<dyn ContentApi>,
    config: &Config,
    devotional: Option<i64>,
) -> Result<()> {
    install_panic_hook();

    let (tx, mut rx) = loader::channel();
    let timer = RotationTimer::new(
        config.carousel_interval(),
        tx.clone(),
        |epoch| PortalMsg::CarouselTick { epoch },
    );
    let mut app = App::new(HeroCarousel::with_timer(timer));
    if let Some(id) = devotional {
        app.open_devotional_id(id);
    }
    let aggregator = HomeAggregator::new(Arc::clone(&api));

    // -- terminal setup (RAII — Drop restores on exit or panic) --------------
    let mut guard = TerminalGuard::new()?;
    let tick_rate = config.tick_rate();

    // -- main event loop -----------------------------------------------------
    //   1. Start any loads the app asked for.
    //   2. Drain finished loads and carousel ticks.
    //   3. Render.
    //   4. Poll for keyboard input (up to tick_rate).
    loop {
        for request in app.take_requests() {
            match request {
                Request::LoadHome { generation } => {
                    loader::spawn_home_load(aggregator.clone(), generation, tx.clone());
                }
                Request::LoadDevotional { id } => {
                    loader::spawn_devotional_load(Arc::clone(&api), id, tx.clone());
                }
            }
        }

        while let Ok(msg) = rx.try_recv() {
            app.apply(msg);
        }

        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        let ready = tokio::task::block_in_place(|| event::poll(tick_rate))?;
        if ready {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    app.hero.teardown();
    info!("portal closed");
    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
