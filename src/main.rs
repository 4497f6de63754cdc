use std::sync::Arc;

use clap::Parser;

use quizdesk::api::{HttpBackend, QuizBackend};
use quizdesk::catalog::CatalogView;
use quizdesk::cli::Cli;
use quizdesk::error::AppError;
use quizdesk::logging;
use quizdesk::prefs::PrefsStore;
use quizdesk::state::AppState;
use quizdesk::tui;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let log_file = cli.log_file.clone().or_else(logging::default_log_file);
    logging::init(log_file.as_deref());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| AppError::Runtime(e.to_string()))?;

    let backend: Arc<dyn QuizBackend> = Arc::new(HttpBackend::new(&cli.server)?);
    tracing::info!(server = %cli.server, "starting");

    // Handle --list
    if cli.list {
        let catalog = runtime.block_on(backend.catalog())?;
        for line in CatalogView::new(catalog).listing() {
            println!("{}", line);
        }
        return Ok(());
    }

    let prefs = PrefsStore::open(cli.prefs.clone().or_else(PrefsStore::default_location));
    let mut state = AppState::new(backend, runtime.handle().clone(), cli.root.clone(), prefs);
    state.start_in_all_mode = cli.all;

    match cli.quiz_file.as_deref() {
        Some(quiz_file) => state.open_quiz(quiz_file)?,
        None => state.open_catalog(),
    }

    tui::run_tui(state)?;
    Ok(())
}
