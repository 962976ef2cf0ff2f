//! TUI application for remoteapp
//!
//! Lists the available applications next to a detail pane for the selected
//! one. Start and stop run in the background while the UI keeps drawing.

pub mod app;
mod config_editor;
mod event;
pub mod ui;
pub mod widgets;

pub use app::{App, AppError, AppResult, View};
pub use config_editor::{ConfigEditor, ConfigField, EditMode};
pub use event::{Event, EventHandler};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use remoteapp_core::view::Viewport;
use remoteapp_core::ApplicationListModel;
use std::io;
use std::sync::Arc;
use tracing_subscriber::layer::SubscriberExt;

/// Run the TUI application
pub async fn run(
    model: Arc<ApplicationListModel>,
    viewport: Viewport,
    username: Option<String>,
) -> AppResult<()> {
    // Log output would corrupt the display; the guard restores the previous
    // subscriber when dropped
    let _guard = tracing::subscriber::set_default(
        tracing_subscriber::registry().with(tracing_subscriber::layer::Identity::new()),
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(model, viewport).with_username(username);
    let res = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}
