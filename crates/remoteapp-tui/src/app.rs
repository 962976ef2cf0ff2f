//! Main TUI application state and logic

use crate::config_editor::ConfigEditor;
use crate::event::{Event, EventHandler};
use crate::ui;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use remoteapp_core::view::{DetailView, FrameSize, ListItemView, ListView, Viewport};
use remoteapp_core::{
    event_channel, AppEvent, ApplicationEntry, ApplicationListModel, CoreError, EventReceiver,
    StartingError,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),
}

pub type AppResult<T> = Result<T, AppError>;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Application list and detail pane
    Main,
    /// Configuration editor for the selected application
    EditConfig,
    /// Key help
    Help,
}

/// Application state
///
/// Model state is copied into the snapshot fields by [`App::refresh`]
/// before each draw, so rendering never waits on the model.
pub struct App {
    pub model: Arc<ApplicationListModel>,
    pub list_view: ListView,
    pub detail: DetailView,
    /// Events emitted by the view adapters
    app_events: EventReceiver,
    /// Outcome messages of background start/stop tasks
    op_tx: mpsc::UnboundedSender<String>,
    op_rx: mpsc::UnboundedReceiver<String>,
    pub view: View,
    pub base_url: String,
    pub username: Option<String>,
    pub items: Vec<ListItemView>,
    /// Highlighted row in the list
    pub selected: usize,
    pub current: Option<ApplicationEntry>,
    pub policy_lines: Vec<String>,
    pub app_source: Option<String>,
    pub frame_size: FrameSize,
    pub frame_focused: bool,
    /// Errors surfaced through `error` events, shown in one dialog until
    /// dismissed
    pub errors: Vec<StartingError>,
    pub loading: bool,
    pub communication_error: Option<String>,
    pub status_message: Option<String>,
    pub editor: Option<ConfigEditor>,
    pub should_quit: bool,
}

impl App {
    /// Create the application around a shared model
    pub fn new(model: Arc<ApplicationListModel>, viewport: Viewport) -> Self {
        let (tx, app_events) = event_channel();
        let (op_tx, op_rx) = mpsc::unbounded_channel();
        let list_view = ListView::new(model.clone()).with_events(tx.clone());
        let detail = DetailView::new(model.clone(), viewport).with_events(tx);
        let base_url = model.backend_info().base_url;
        let frame_size = detail.frame_size();

        Self {
            model,
            list_view,
            detail,
            app_events,
            op_tx,
            op_rx,
            view: View::Main,
            base_url,
            username: None,
            items: Vec::new(),
            selected: 0,
            current: None,
            policy_lines: Vec::new(),
            app_source: None,
            frame_size,
            frame_focused: false,
            errors: Vec::new(),
            loading: true,
            communication_error: None,
            status_message: None,
            editor: None,
            should_quit: false,
        }
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    /// Run the application main loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> AppResult<()> {
        let mut events = EventHandler::new(Duration::from_millis(250));

        if let Some(viewport) = terminal_viewport() {
            self.resize_frame(viewport);
        }
        terminal.draw(|frame| ui::draw(frame, self))?;
        self.reload().await;

        while !self.should_quit {
            self.refresh().await;
            terminal.draw(|frame| ui::draw(frame, self))?;

            tokio::select! {
                event = events.next() => {
                    if let Some(e) = event {
                        self.handle_event(e).await?;
                    }
                }
                Some(event) = self.app_events.recv() => {
                    self.handle_app_event(event).await;
                }
                Some(message) = self.op_rx.recv() => {
                    self.status_message = Some(message);
                }
            }
        }

        Ok(())
    }

    /// Copy model state into the snapshot fields
    pub async fn refresh(&mut self) {
        self.process_app_events().await;
        self.items = self.list_view.items().await;
        if let Some(index) = self.model.selected_index().await {
            self.selected = index;
        } else if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        self.current = self.detail.current().await;
        self.policy_lines = self.detail.policy_lines().await;
        let app_source = self.detail.app_source().await;
        if app_source != self.app_source {
            self.app_source = app_source;
            self.detail.updated().await;
        }
        self.frame_size = self.detail.frame_size();
        self.frame_focused = self.detail.frame_focused();
        self.loading = self.list_view.is_loading().await;
        self.communication_error = self.list_view.communication_error().await;
        if let Some(editor) = self.editor.as_mut() {
            editor.disabled = editor.form.is_disabled().await;
        }
    }

    /// Handle a terminal event
    pub async fn handle_event(&mut self, event: Event) -> AppResult<()> {
        match event {
            Event::Key(key) => self.handle_key(key.code, key.modifiers).await?,
            Event::Tick => {}
            Event::Resize(_, _) => {
                if let Some(viewport) = terminal_viewport() {
                    self.resize_frame(viewport);
                }
            }
        }
        Ok(())
    }

    /// Size the application frame for a new viewport
    pub fn resize_frame(&mut self, viewport: Viewport) {
        self.detail.set_viewport(viewport);
        self.frame_size = self.detail.frame_size();
    }

    /// Handle every adapter event already queued
    pub async fn process_app_events(&mut self) {
        while let Ok(event) = self.app_events.try_recv() {
            self.handle_app_event(event).await;
        }
    }

    /// Handle an event emitted by the view adapters
    pub async fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::StartApplication { name, .. } => {
                self.status_message = Some(format!("Starting {}...", name));
            }
            AppEvent::Error(error) => {
                tracing::warn!("{}", error);
                self.status_message = Some(error.to_string());
                self.errors.push(error);
            }
            AppEvent::EntryClicked { index } => {
                tracing::trace!("entry {} clicked", index);
                self.detail.focus_frame().await;
                self.frame_focused = self.detail.frame_focused();
            }
        }
    }

    /// Handle key press
    pub async fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> AppResult<()> {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        // The error dialog is modal
        if !self.errors.is_empty() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                self.detail.close_error().await;
                self.errors.clear();
            }
            return Ok(());
        }

        match self.view {
            View::Help => self.view = View::Main,
            View::EditConfig => self.handle_editor_key(code).await,
            View::Main => self.handle_main_key(code).await,
        }
        Ok(())
    }

    async fn handle_main_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.view = View::Help,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1).await,
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1).await,
            KeyCode::Enter => {
                if self.items.is_empty() {
                    return;
                }
                if self.click(self.selected).await && !self.detail.focus_frame().await {
                    self.status_message = Some("Application is not running".to_string());
                }
            }
            KeyCode::Esc => self.detail.blur_frame(),
            KeyCode::Char('s') => self.start_selected(),
            KeyCode::Char('x') => self.stop_selected(),
            KeyCode::Char('e') => self.open_editor().await,
            KeyCode::Char('r') => self.reload().await,
            _ => {}
        }
    }

    /// Move the highlight and select the entry under it
    async fn move_selection(&mut self, delta: isize) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let next = if self.model.selected_index().await.is_none() {
            0
        } else if delta > 0 {
            (self.selected + 1) % len
        } else {
            self.selected.checked_sub(1).unwrap_or(len - 1)
        };
        self.click(next).await;
    }

    /// Select an entry through the list adapter; focus follows through the
    /// `entryClicked` event
    async fn click(&mut self, index: usize) -> bool {
        match self.list_view.entry_clicked(index).await {
            Ok(()) => {
                self.selected = index;
                true
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
                false
            }
        }
    }

    /// Start the selected application on a background task
    fn start_selected(&mut self) {
        let Some(name) = self.current.as_ref().map(|e| e.display_name().to_string()) else {
            self.status_message = Some("No application selected".to_string());
            return;
        };
        let detail = self.detail.clone();
        let tx = self.op_tx.clone();
        tokio::spawn(async move {
            let message = match detail.start_application().await {
                Ok(()) => format!("Started {}", name),
                // Shown by the error dialog
                Err(CoreError::StartFailed(e)) => format!("Failed to start {}", e.app_name),
                Err(e) => e.to_string(),
            };
            let _ = tx.send(message);
        });
    }

    /// Stop the selected application on a background task
    fn stop_selected(&mut self) {
        let Some(name) = self.current.as_ref().map(|e| e.display_name().to_string()) else {
            self.status_message = Some("No application selected".to_string());
            return;
        };
        self.status_message = Some(format!("Stopping {}...", name));
        let model = self.model.clone();
        let tx = self.op_tx.clone();
        tokio::spawn(async move {
            let message = match model.stop_application().await {
                Ok(()) => format!("Stopped {}", name),
                Err(e) => format!("Failed to stop {}: {}", name, e),
            };
            let _ = tx.send(message);
        });
    }

    /// Reload the catalog
    pub async fn reload(&mut self) {
        match self.model.update().await {
            Ok(()) => {
                self.status_message =
                    Some(format!("Loaded {} applications", self.model.len().await));
            }
            Err(e) => {
                self.status_message = Some(e.to_string());
            }
        }
    }

    async fn open_editor(&mut self) {
        match self.detail.form().await {
            Ok(form) => {
                let mut editor = ConfigEditor::new(form);
                editor.disabled = editor.form.is_disabled().await;
                self.editor = Some(editor);
                self.view = View::EditConfig;
            }
            Err(e) => self.status_message = Some(e.to_string()),
        }
    }

    fn close_editor(&mut self) {
        self.editor = None;
        self.view = View::Main;
    }

    async fn handle_editor_key(&mut self, code: KeyCode) {
        let Some(editor) = self.editor.as_mut() else {
            self.view = View::Main;
            return;
        };

        if let Some((_, input)) = editor.input.as_mut() {
            match code {
                KeyCode::Enter => {
                    if let Err(e) = editor.finish_edit() {
                        self.status_message = Some(e.to_string());
                    }
                }
                KeyCode::Esc => editor.cancel_edit(),
                KeyCode::Backspace => input.backspace(),
                KeyCode::Delete => input.delete(),
                KeyCode::Left => input.move_left(),
                KeyCode::Right => input.move_right(),
                KeyCode::Home => input.home(),
                KeyCode::End => input.end(),
                KeyCode::Char(c) => input.insert(c),
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_editor(),
            KeyCode::Char('j') | KeyCode::Down => editor.select_next(),
            KeyCode::Char('k') | KeyCode::Up => editor.select_prev(),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('l') | KeyCode::Right
            | KeyCode::Enter | KeyCode::Char('a')
                if editor.disabled =>
            {
                self.status_message =
                    Some("Configuration is locked while the application starts".to_string());
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if let Err(e) = editor.cycle(false) {
                    self.status_message = Some(e.to_string());
                }
            }
            KeyCode::Char('l') | KeyCode::Right => {
                if let Err(e) = editor.cycle(true) {
                    self.status_message = Some(e.to_string());
                }
            }
            KeyCode::Enter => editor.begin_edit(),
            KeyCode::Char('a') => editor.begin_new_key(),
            KeyCode::Char('w') => match editor.form.commit().await {
                Ok(()) => {
                    self.status_message = Some("Configuration saved".to_string());
                    self.close_editor();
                }
                Err(e) => self.status_message = Some(e.to_string()),
            },
            _ => {}
        }
    }
}

/// Pixel size of the terminal window, when the terminal reports one
fn terminal_viewport() -> Option<Viewport> {
    let size = crossterm::terminal::window_size().ok()?;
    (size.width > 0 && size.height > 0)
        .then(|| Viewport::new(u32::from(size.width), u32::from(size.height)))
}
