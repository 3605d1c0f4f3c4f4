use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use ratatui::DefaultTerminal;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod controller;
mod domain;
mod filter;
mod format;
mod inputter;
mod model;
mod record;
mod seed;
mod sort;
mod table;
mod ui;

use controller::Controller;
use domain::{CardListError, TableConfig};
use model::{Model, RunState};
use ui::TableUI;

/// Browse, filter and edit a list of client records in the terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// CSV file with the columns id, avatar, client, amount, status, date.
    /// The built-in sample clients are shown when omitted.
    #[arg(short, long)]
    data: Option<String>,

    #[arg(long, default_value = "cardlist.log")]
    log_file: String,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Event poll interval in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,

    #[arg(long, default_value_t = 32)]
    max_column_width: usize,

    /// Seconds a status message stays visible
    #[arg(long, default_value_t = 5)]
    message_secs: u64,
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            error!("Exiting with error: {e:?}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn expand_path(raw: &str) -> Result<PathBuf, CardListError> {
    shellexpand::full(raw)
        .map(|p| PathBuf::from(p.into_owned()))
        .map_err(|e| CardListError::LoadingFailed(e.to_string()))
}

/// The terminal belongs to the table, so logs go to a file.
fn init_logging(path: &Path, level: &str) -> Result<(), CardListError> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .init();
    Ok(())
}

fn run() -> Result<(), CardListError> {
    let args = Args::parse();
    init_logging(&expand_path(&args.log_file)?, &args.log_level)?;
    info!("Starting cardlist with {args:?}");

    let clients = match &args.data {
        Some(raw) => seed::load_csv(&expand_path(raw)?)?,
        None => seed::default_clients()?,
    };

    let cfg = TableConfig::default()
        .with_event_poll_time(args.poll_ms)
        .with_max_column_width(args.max_column_width)
        .with_status_message_ttl(Duration::from_secs(args.message_secs));

    let mut model = Model::init(&cfg, clients);
    let mut ui = TableUI::new(&cfg);
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut model, &mut ui, &controller);
    ratatui::restore();

    info!("Bye");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    model: &mut Model,
    ui: &mut TableUI,
    controller: &Controller,
) -> Result<(), CardListError> {
    while model.status != RunState::Quitting {
        // Render the current view
        terminal.draw(|f| ui.draw(model, f))?;

        // Handle events and map to a Message
        if let Some(message) = controller.handle_event(model)? {
            model.update(message)?;
        };
    }
    Ok(())
}
