#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use std::io::{self, stdout};
use std::sync::Arc;

use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use dynform::api::HttpFieldService;
use dynform::config::Config;
use dynform::logging;
use dynform::model::{ChoiceCatalog, DraftEditor};
use dynform::storage::DraftStore;
use dynform::tui::{App, AppError};

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Config::parse();
    let data_dir = config.data_dir()?;
    let log_path = logging::init(&data_dir, &config.log_level)?;
    info!(
        api_url = %config.api_url,
        timeout_secs = config.timeout_secs,
        log = %log_path.display(),
        "starting dynform"
    );

    let store = DraftStore::new(&data_dir)?;
    let mut editor = match store.load() {
        Some(draft) => {
            info!(label = %draft.label, "restored saved draft");
            DraftEditor::restore(draft, ChoiceCatalog::seeded())
        }
        None => DraftEditor::new(ChoiceCatalog::seeded()),
    };
    editor.subscribe(Box::new(store));

    let service = Arc::new(HttpFieldService::new(&config.api_url, config.timeout())?);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut app = App::new(editor, service, config.timeout());
    let result = app.run(&mut terminal).await;

    let restore_result = restore_terminal();
    info!("exiting");
    match result {
        Err(e) => Err(e),
        Ok(()) => restore_result.map_err(Into::into),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
fn restore_terminal() -> Result<(), io::Error> {
    let raw_result = disable_raw_mode();
    let screen_result = execute!(stdout(), LeaveAlternateScreen);
    raw_result.and(screen_result)
}
