//! Mock-based command tests.
//!
//! These call command functions directly with an `ApplicationListModel`
//! backed by a `MockBackend`, avoiding any real server.

use remoteapp_cli::commands;
use remoteapp_client::ClientError;
use remoteapp_core::test_support::*;
use remoteapp_core::view::Viewport;
use remoteapp_core::{AppStatus, ApplicationListModel};
use serde_json::Value;
use std::sync::Arc;

const BASE: &str = "http://mock.invalid/user/test";

fn test_model(mock: MockBackend) -> Arc<ApplicationListModel> {
    Arc::new(ApplicationListModel::new(Box::new(mock)))
}

fn viewport() -> Viewport {
    Viewport::new(1280, 800)
}

#[tokio::test]
async fn test_list_empty() {
    let model = test_model(MockBackend::new());
    assert!(commands::list(&model).await.is_ok());
}

#[tokio::test]
async fn test_list_propagates_backend_error() {
    let mock = MockBackend::new();
    *mock.applications_result.lock().unwrap() = Err(ClientError::Timeout);
    let model = test_model(mock);
    assert!(commands::list(&model).await.is_err());
}

#[tokio::test]
async fn test_start_returns_stable_url() {
    let mock = MockBackend::with_applications(vec![mock_app("jupyter", "m1")]);
    *mock.start_result.lock().unwrap() = Ok(mock_container("abc123"));
    let model = test_model(mock);

    let url = commands::start(&model, viewport(), "jupyter", &[]).await.unwrap();
    assert_eq!(url, format!("{}/containers/abc123/", BASE));
    let entry = model.selected_entry().await.unwrap();
    assert_eq!(entry.status(), AppStatus::Running);
    // No frame was rendered, so the first-render flag is still pending
    assert!(entry.is_delayed());
}

#[tokio::test]
async fn test_start_applies_overrides() {
    let mut app = mock_app("simphony/desktop", "m1");
    app.image.configurables = vec!["resolution".to_string()];
    let mock = MockBackend::with_applications(vec![app]);
    let handle = mock.clone();
    let model = test_model(mock);

    commands::start(
        &model,
        viewport(),
        "m1",
        &["resolution.resolution=1280x800".to_string()],
    )
    .await
    .unwrap();

    let start = handle
        .get_calls()
        .into_iter()
        .find(|c| matches!(c, MockCall::Start { .. }))
        .unwrap();
    match start {
        MockCall::Start { configuration, .. } => {
            assert_eq!(
                configuration["resolution"]["resolution"],
                Value::from("1280x800")
            );
        }
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_start_rejects_invalid_override() {
    let mut app = mock_app("desktop", "m1");
    app.image.configurables = vec!["resolution".to_string()];
    let mock = MockBackend::with_applications(vec![app]);
    let handle = mock.clone();
    let model = test_model(mock);

    let result = commands::start(
        &model,
        viewport(),
        "desktop",
        &["resolution.resolution=huge".to_string()],
    )
    .await;
    assert!(result.is_err());
    assert_eq!(handle.start_count(), 0);
}

#[tokio::test]
async fn test_start_failure_reports_code_and_message() {
    let mock = MockBackend::with_applications(vec![mock_app("jupyter", "m1")]);
    *mock.start_result.lock().unwrap() = Err(ClientError::Status {
        code: 500,
        message: "boom".to_string(),
    });
    let model = test_model(mock);

    let err = commands::start(&model, viewport(), "jupyter", &[])
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Error when starting jupyter: [500] boom");
    assert_eq!(
        model.selected_entry().await.unwrap().status(),
        AppStatus::Stopped
    );
}

#[tokio::test]
async fn test_start_already_running() {
    let mock = MockBackend::with_applications(vec![mock_running_app("jupyter", "m1", "abc")]);
    let handle = mock.clone();
    let model = test_model(mock);

    let url = commands::start(&model, viewport(), "jupyter", &[]).await.unwrap();
    assert_eq!(url, format!("{}/containers/abc/", BASE));
    assert_eq!(handle.start_count(), 0);
}

#[tokio::test]
async fn test_stop_not_running() {
    let mock = MockBackend::with_applications(vec![mock_app("jupyter", "m1")]);
    let handle = mock.clone();
    let model = test_model(mock);

    assert!(commands::stop(&model, "jupyter").await.is_ok());
    assert!(!handle
        .get_calls()
        .iter()
        .any(|c| matches!(c, MockCall::Stop { .. })));
}

#[tokio::test]
async fn test_stop_running() {
    let mock = MockBackend::with_applications(vec![mock_running_app("jupyter", "m1", "abc")]);
    let handle = mock.clone();
    let model = test_model(mock);

    commands::stop(&model, "jupyter").await.unwrap();
    assert!(handle.get_calls().contains(&MockCall::Stop {
        url_id: "abc".to_string()
    }));
}

#[tokio::test]
async fn test_open_running_and_stopped() {
    let model = test_model(MockBackend::with_applications(vec![
        mock_running_app("jupyter", "m1", "abc"),
        mock_app("desktop", "m2"),
    ]));

    let url = commands::open(&model, viewport(), "jupyter").await.unwrap();
    assert_eq!(url, format!("{}/containers/abc/", BASE));

    let err = commands::open(&model, viewport(), "desktop").await.unwrap_err();
    assert_eq!(err.to_string(), "Application 'desktop' is not running");
}

#[tokio::test]
async fn test_find_application() {
    let mut desktop = mock_app("simphony/desktop", "m2");
    desktop.image.ui_name = Some("Desktop".to_string());
    let model = test_model(MockBackend::with_applications(vec![
        mock_app("simphony/jupyter", "m1"),
        desktop,
    ]));
    model.update().await.unwrap();

    assert_eq!(commands::find_application(&model, "Desktop").await.unwrap(), 1);
    assert_eq!(commands::find_application(&model, "m1").await.unwrap(), 0);
    assert_eq!(commands::find_application(&model, "Desk").await.unwrap(), 1);

    let err = commands::find_application(&model, "simphony/")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Ambiguous"));

    let err = commands::find_application(&model, "nope").await.unwrap_err();
    assert_eq!(err.to_string(), "Application 'nope' not found");
}
