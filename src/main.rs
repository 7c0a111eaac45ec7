//! quotd - quote of the day in the terminal
//!
//! One-shot commands print a quote and exit; `watch` shows a live widget
//! that refreshes itself when the day rolls over.

mod app;
mod ui;

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::panic;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

use app::App;
use quotd::cli::{Cli, Command};
use quotd::clock::{Clock, SystemClock};
use quotd::config::Config;
use quotd::quote::{select_category, HttpQuoteSource, QuoteResponse, QuoteService, Role};
use quotd::scheduler::DailyScheduler;
use quotd::storage::FileStore;

type Service = QuoteService<FileStore, HttpQuoteSource, SystemClock>;

/// Installs the tracing subscriber, honouring `RUST_LOG` (default `info`)
fn init_logging<W>(writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

/// Sets up a panic hook that restores the terminal before printing the panic message.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Prints a response to stdout; failures also note the reason on stderr
fn print_response(response: &QuoteResponse, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout().lock();
    if json {
        writeln!(stdout, "{}", serde_json::to_string_pretty(response)?)?;
    } else {
        writeln!(stdout, "“{}”", response.data.text)?;
        writeln!(stdout, "  — {} (#{})", response.data.author, response.data.category)?;
    }
    if !response.success {
        eprintln!("{}", response.message);
    }
    Ok(())
}

/// Renders the widget and, when open, the help overlay
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    ui::render_quote_card(frame, app);
    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Runs the live quote widget until the user quits
async fn run_watch(
    service: Arc<Service>,
    role: Role,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    setup_panic_hook();

    let scheduler = Arc::new(DailyScheduler::new(Arc::clone(&service), role));
    let mut quotes = service.subscribe();
    let handle = Arc::clone(&scheduler).spawn(config.poll_interval);
    let (refresh_tx, mut refresh_rx) = mpsc::channel::<QuoteResponse>(4);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(role);

    loop {
        if quotes.has_changed().unwrap_or(false) {
            if let Some(quote) = quotes.borrow_and_update().clone() {
                app.apply_quote(quote);
            }
        }
        while let Ok(response) = refresh_rx.try_recv() {
            app.apply_refresh_result(response);
        }

        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.take_refresh_request() {
            let scheduler = Arc::clone(&scheduler);
            let tx = refresh_tx.clone();
            tokio::spawn(async move {
                let response = scheduler.force_update().await;
                let _ = tx.send(response).await;
            });
        }

        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    handle.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    let command = cli.resolved_command();

    // The widget owns the terminal, so its logs go to a file
    if let Command::Watch(_) = command {
        let log_path = config.log_path()?;
        if let Some(dir) = log_path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&log_path)?;
        init_logging(Mutex::new(file));
    } else {
        init_logging(io::stderr);
    }

    let store = config.open_store()?;
    tracing::debug!(dir = %store.dir().display(), api = %config.api_base, "Configuration loaded");
    let service = Arc::new(QuoteService::new(
        store,
        HttpQuoteSource::with_base_url(&config.api_base),
        SystemClock,
    ));

    match command {
        Command::Today(args) => {
            let response = service.get_quote_of_the_day(args.role.role).await;
            print_response(&response, args.json)?;
        }
        Command::Random {
            role,
            category,
            json,
        } => {
            let response = service
                .get_random_quote(role.role, category.as_deref())
                .await;
            print_response(&response, json)?;
        }
        Command::Refresh(args) => {
            let response = service.refresh_quote(args.role.role).await;
            print_response(&response, args.json)?;
        }
        Command::Category { role, date } => {
            let date = date.unwrap_or_else(|| service.clock().today());
            println!("{}", select_category(role.role, date));
        }
        Command::Clear => {
            service.cache().clear()?;
            tracing::info!("Quote cache cleared");
        }
        Command::Watch(args) => {
            run_watch(service, args.role, &config).await?;
        }
    }

    Ok(())
}
