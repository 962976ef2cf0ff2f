//! App state transitions driven through key handling

use crossterm::event::{KeyCode, KeyModifiers};
use remoteapp_client::{ApplicationData, ClientError};
use remoteapp_core::test_support::*;
use remoteapp_core::view::Viewport;
use remoteapp_core::{AppEvent, AppStatus, ApplicationListModel, StartingError, COMMUNICATION_ERROR};
use remoteapp_tui::{App, View};
use serde_json::Value;
use std::sync::Arc;

async fn test_app(mock: MockBackend) -> App {
    let model = Arc::new(ApplicationListModel::new(Box::new(mock)));
    let mut app = App::new(model, Viewport::new(1280, 800));
    app.reload().await;
    app.refresh().await;
    app
}

fn resolution_app(name: &str, mapping_id: &str) -> ApplicationData {
    let mut app = mock_app(name, mapping_id);
    app.image.configurables = vec!["resolution".to_string()];
    app
}

async fn press(app: &mut App, code: KeyCode) {
    app.handle_key(code, KeyModifiers::NONE).await.unwrap();
    app.refresh().await;
}

async fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        press(app, KeyCode::Char(c)).await;
    }
}

/// Refresh until `cond` holds, giving background tasks a chance to run
async fn settle(app: &mut App, cond: impl Fn(&App) -> bool) {
    for _ in 0..1000 {
        app.refresh().await;
        if cond(app) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

fn current_status(app: &App) -> Option<AppStatus> {
    app.current.as_ref().map(|e| e.status())
}

#[tokio::test]
async fn test_loading_until_reload() {
    let model = Arc::new(ApplicationListModel::new(Box::new(MockBackend::with_applications(
        vec![mock_app("jupyter", "m1")],
    ))));
    let mut app = App::new(model, Viewport::new(1280, 800));
    app.refresh().await;
    assert!(app.loading);
    assert!(app.items.is_empty());

    app.reload().await;
    app.refresh().await;
    assert!(!app.loading);
    assert_eq!(app.items.len(), 1);
    assert_eq!(app.status_message.as_deref(), Some("Loaded 1 applications"));
}

#[tokio::test]
async fn test_navigation_selects_and_wraps() {
    let mut app = test_app(MockBackend::with_applications(vec![
        mock_app("a", "m1"),
        mock_app("b", "m2"),
        mock_app("c", "m3"),
    ]))
    .await;
    assert!(app.current.is_none());

    // First move selects the first entry
    press(&mut app, KeyCode::Char('j')).await;
    assert_eq!(app.model.selected_index().await, Some(0));

    press(&mut app, KeyCode::Down).await;
    press(&mut app, KeyCode::Char('j')).await;
    assert_eq!(app.selected, 2);

    press(&mut app, KeyCode::Char('j')).await;
    assert_eq!(app.selected, 0);

    press(&mut app, KeyCode::Char('k')).await;
    assert_eq!(app.selected, 2);
    assert_eq!(app.current.as_ref().unwrap().display_name(), "c");
    assert!(app.items[2].selected);
}

#[tokio::test]
async fn test_navigation_with_empty_list() {
    let mut app = test_app(MockBackend::new()).await;
    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Enter).await;
    assert_eq!(app.selected, 0);
    assert!(app.current.is_none());
}

#[tokio::test]
async fn test_start_runs_in_background() {
    let mock = MockBackend::with_applications(vec![mock_app("jupyter", "m1")]);
    *mock.start_result.lock().unwrap() = Ok(mock_container("abc123"));
    let gate = mock.gate_start();
    let handle = mock.clone();
    let mut app = test_app(mock).await;

    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Char('s')).await;
    settle(&mut app, |_| handle.start_count() == 1).await;
    assert_eq!(current_status(&app), Some(AppStatus::Starting));

    // A second start while pending never reaches the backend
    press(&mut app, KeyCode::Char('s')).await;

    gate.notify_one();
    settle(&mut app, |a| current_status(a) == Some(AppStatus::Running)).await;
    // The frame takes focus once it is shown
    assert!(app.frame_focused);
    app.refresh().await;
    assert_eq!(
        app.app_source.as_deref(),
        Some("http://mock.invalid/user/test/containers/abc123/")
    );
    assert!(app.frame_focused);
    assert_eq!(handle.start_count(), 1);
}

#[tokio::test]
async fn test_moving_onto_running_entry_focuses_frame() {
    let mut app = test_app(MockBackend::with_applications(vec![
        mock_app("jupyter", "m1"),
        mock_running_app("desktop", "m2", "abc"),
    ]))
    .await;

    press(&mut app, KeyCode::Char('j')).await;
    assert!(!app.frame_focused);

    press(&mut app, KeyCode::Char('j')).await;
    assert_eq!(current_status(&app), Some(AppStatus::Running));
    assert!(app.frame_focused);

    // Back onto a stopped entry: nothing to focus
    press(&mut app, KeyCode::Char('k')).await;
    assert!(!app.frame_focused);
}

#[tokio::test]
async fn test_stop_drops_frame_focus() {
    let mock = MockBackend::with_applications(vec![mock_running_app("desktop", "m1", "abc")]);
    let mut app = test_app(mock).await;

    press(&mut app, KeyCode::Char('j')).await;
    assert!(app.frame_focused);
    press(&mut app, KeyCode::Char('x')).await;
    settle(&mut app, |a| current_status(a) == Some(AppStatus::Stopped)).await;
    assert!(!app.frame_focused);
}

#[tokio::test]
async fn test_start_failure_shows_dialog_until_closed() {
    let mock = MockBackend::with_applications(vec![mock_app("jupyter", "m1")]);
    *mock.start_result.lock().unwrap() = Err(ClientError::Status {
        code: 500,
        message: "boom".to_string(),
    });
    let mut app = test_app(mock).await;

    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Char('s')).await;
    settle(&mut app, |a| !a.errors.is_empty()).await;

    assert_eq!(
        app.errors,
        vec![StartingError {
            app_name: "jupyter".to_string(),
            code: "500".to_string(),
            message: "boom".to_string(),
        }]
    );
    assert_eq!(current_status(&app), Some(AppStatus::Stopped));

    // Keys other than close are swallowed by the dialog
    press(&mut app, KeyCode::Char('j')).await;
    assert_eq!(app.errors.len(), 1);

    press(&mut app, KeyCode::Enter).await;
    assert!(app.errors.is_empty());
    assert!(app.detail.starting_error().await.is_none());
}

#[tokio::test]
async fn test_errors_accumulate_until_dismissed() {
    let mock = MockBackend::with_applications(vec![mock_app("jupyter", "m1"), mock_app("desktop", "m2")]);
    *mock.start_result.lock().unwrap() = Err(ClientError::Timeout);
    let handle = mock.clone();
    let mut app = test_app(mock).await;

    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Char('s')).await;
    settle(&mut app, |a| a.errors.len() == 1).await;

    // A second failure lands in the same dialog before it is closed
    app.model.select(1).await.unwrap();
    app.refresh().await;
    app.detail.start_application().await.unwrap_err();
    app.refresh().await;

    let names: Vec<&str> = app.errors.iter().map(|e| e.app_name.as_str()).collect();
    assert_eq!(names, vec!["jupyter", "desktop"]);
    assert_eq!(handle.start_count(), 2);

    press(&mut app, KeyCode::Esc).await;
    assert!(app.errors.is_empty());
}

#[tokio::test]
async fn test_resize_updates_frame_size() {
    let mut app = test_app(MockBackend::new()).await;
    assert_eq!(app.frame_size.to_string(), "1050x750");

    app.resize_frame(Viewport::new(1920, 1080));
    app.refresh().await;
    assert_eq!(app.frame_size.to_string(), "1690x1030");
}

#[tokio::test]
async fn test_stop_running_application() {
    let mock = MockBackend::with_applications(vec![mock_running_app("desktop", "m1", "abc")]);
    let handle = mock.clone();
    let mut app = test_app(mock).await;

    press(&mut app, KeyCode::Char('j')).await;
    assert!(app.app_source.is_some());
    press(&mut app, KeyCode::Char('x')).await;
    settle(&mut app, |a| current_status(a) == Some(AppStatus::Stopped)).await;

    assert!(app.app_source.is_none());
    assert!(handle.get_calls().contains(&MockCall::Stop {
        url_id: "abc".to_string()
    }));
}

#[tokio::test]
async fn test_enter_focuses_running_frame() {
    let mut app = test_app(MockBackend::with_applications(vec![
        mock_app("a", "m1"),
        mock_running_app("b", "m2", "xyz"),
    ]))
    .await;

    press(&mut app, KeyCode::Enter).await;
    assert!(!app.frame_focused);
    assert_eq!(app.status_message.as_deref(), Some("Application is not running"));

    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Enter).await;
    assert!(app.frame_focused);

    press(&mut app, KeyCode::Esc).await;
    assert!(!app.frame_focused);
}

#[tokio::test]
async fn test_reload_failure_shows_communication_error() {
    let mock = MockBackend::new();
    *mock.applications_result.lock().unwrap() =
        Err(ClientError::Transport("connection refused".to_string()));
    let handle = mock.clone();
    let mut app = test_app(mock).await;

    assert!(!app.loading);
    assert!(app.items.is_empty());
    assert_eq!(app.communication_error.as_deref(), Some(COMMUNICATION_ERROR));

    *handle.applications_result.lock().unwrap() = Ok(vec![mock_app("a", "m1")]);
    press(&mut app, KeyCode::Char('r')).await;
    assert!(app.communication_error.is_none());
    assert_eq!(app.items.len(), 1);
}

#[tokio::test]
async fn test_edit_config_cycle_and_save() {
    let mut app = test_app(MockBackend::with_applications(vec![resolution_app("desktop", "m1")])).await;

    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Char('e')).await;
    assert_eq!(app.view, View::EditConfig);

    press(&mut app, KeyCode::Char('l')).await;
    let field = app.editor.as_ref().unwrap().selected_field().unwrap();
    assert_eq!(field.value, "1920x1080");

    press(&mut app, KeyCode::Char('w')).await;
    assert_eq!(app.view, View::Main);
    assert_eq!(app.status_message.as_deref(), Some("Configuration saved"));

    let entry = app.model.entry(0).await.unwrap();
    assert_eq!(
        entry.configurable("resolution").unwrap().get("resolution"),
        Some(&Value::from("1920x1080"))
    );
}

#[tokio::test]
async fn test_edit_config_text_value() {
    let mut app = test_app(MockBackend::with_applications(vec![resolution_app("desktop", "m1")])).await;

    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Char('e')).await;
    press(&mut app, KeyCode::Enter).await;
    for _ in 0.."Window".len() {
        press(&mut app, KeyCode::Backspace).await;
    }
    type_text(&mut app, "1024x768").await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('w')).await;

    let entry = app.model.entry(0).await.unwrap();
    assert_eq!(
        entry.configurable("resolution").unwrap().get("resolution"),
        Some(&Value::from("1024x768"))
    );
}

#[tokio::test]
async fn test_invalid_config_is_not_saved() {
    let mut app = test_app(MockBackend::with_applications(vec![resolution_app("desktop", "m1")])).await;

    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Char('e')).await;
    press(&mut app, KeyCode::Enter).await;
    type_text(&mut app, "!").await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('w')).await;

    assert_eq!(app.view, View::EditConfig);
    assert!(app.status_message.as_deref().unwrap().contains("resolution"));

    // Esc discards the drafts
    press(&mut app, KeyCode::Esc).await;
    assert_eq!(app.view, View::Main);
    let entry = app.model.entry(0).await.unwrap();
    assert_eq!(
        entry.configurable("resolution").unwrap().get("resolution"),
        Some(&Value::from("Window"))
    );
}

#[tokio::test]
async fn test_add_key_to_generic_configurable() {
    let mut data = mock_app("desktop", "m1");
    data.image.configurables = vec!["startupdata".to_string()];
    let mut app = test_app(MockBackend::with_applications(vec![data])).await;

    press(&mut app, KeyCode::Char('j')).await;
    press(&mut app, KeyCode::Char('e')).await;
    press(&mut app, KeyCode::Char('a')).await;
    type_text(&mut app, "path=/data").await;
    press(&mut app, KeyCode::Enter).await;
    press(&mut app, KeyCode::Char('w')).await;

    let entry = app.model.entry(0).await.unwrap();
    assert_eq!(
        entry.configurable("startupdata").unwrap().get("path"),
        Some(&Value::from("/data"))
    );
}

#[tokio::test]
async fn test_help_and_quit() {
    let mut app = test_app(MockBackend::new()).await;

    press(&mut app, KeyCode::Char('?')).await;
    assert_eq!(app.view, View::Help);
    press(&mut app, KeyCode::Char('x')).await;
    assert_eq!(app.view, View::Main);

    press(&mut app, KeyCode::Char('q')).await;
    assert!(app.should_quit);
}

#[tokio::test]
async fn test_app_events_update_status() {
    let mut app = test_app(MockBackend::new()).await;

    app.handle_app_event(AppEvent::StartApplication {
        name: "jupyter".to_string(),
        mapping_id: "m1".to_string(),
    })
    .await;
    assert_eq!(app.status_message.as_deref(), Some("Starting jupyter..."));

    app.handle_app_event(AppEvent::Error(StartingError {
        app_name: "jupyter".to_string(),
        code: String::new(),
        message: "unreachable".to_string(),
    }))
    .await;
    assert_eq!(
        app.status_message.as_deref(),
        Some("Error when starting jupyter: unreachable")
    );
    assert_eq!(app.errors.len(), 1);
}
