//! Test support utilities for remoteapp-core
//!
//! Provides MockBackend and helpers for unit testing the ApplicationListModel
//! and view adapters without a running application manager.

use async_trait::async_trait;
use remoteapp_client::*;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Records which methods were called on the mock
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Applications,
    Start {
        mapping_id: String,
        configuration: BTreeMap<String, ConfigDict>,
    },
    Stop {
        url_id: String,
    },
}

/// Configurable mock backend for testing
///
/// Clones share the same call log and results, so a test can keep a handle
/// after boxing the mock into a model.
#[derive(Clone)]
pub struct MockBackend {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    /// Result for applications calls
    pub applications_result: Arc<Mutex<Result<Vec<ApplicationData>>>>,
    /// Result for start calls
    pub start_result: Arc<Mutex<Result<Container>>>,
    /// Result for stop calls
    pub stop_result: Arc<Mutex<Result<()>>>,
    /// When set, start calls wait for a notification before answering
    pub start_gate: Arc<Mutex<Option<Arc<Notify>>>>,
    /// When set, applications calls take their result, then wait for a
    /// notification before answering
    pub applications_gate: Arc<Mutex<Option<Arc<Notify>>>>,
}

impl MockBackend {
    /// Create a new mock backend with an empty catalog and successful results
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            applications_result: Arc::new(Mutex::new(Ok(Vec::new()))),
            start_result: Arc::new(Mutex::new(Ok(mock_container("mock_url_id")))),
            stop_result: Arc::new(Mutex::new(Ok(()))),
            start_gate: Arc::new(Mutex::new(None)),
            applications_gate: Arc::new(Mutex::new(None)),
        }
    }

    /// Create a mock backend serving the given catalog
    pub fn with_applications(apps: Vec<ApplicationData>) -> Self {
        let mock = Self::new();
        *mock.applications_result.lock().unwrap() = Ok(apps);
        mock
    }

    /// Hold start calls until the returned handle is notified
    pub fn gate_start(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.start_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Hold applications calls, after their result is taken, until the
    /// returned handle is notified
    pub fn gate_applications(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.applications_gate.lock().unwrap() = Some(gate.clone());
        gate
    }

    /// Record a call
    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of catalog requests received
    pub fn applications_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::Applications))
            .count()
    }

    /// Number of start requests received
    pub fn start_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::Start { .. }))
            .count()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to clone a Result<T> from an Arc<Mutex<Result<T>>>
fn clone_result<T: Clone>(r: &Arc<Mutex<Result<T>>>) -> Result<T> {
    let guard = r.lock().unwrap();
    match &*guard {
        Ok(v) => Ok(v.clone()),
        Err(e) => Err(clone_client_error(e)),
    }
}

/// Clone a ClientError (thiserror types don't implement Clone)
pub fn clone_client_error(e: &ClientError) -> ClientError {
    match e {
        ClientError::Transport(s) => ClientError::Transport(s.clone()),
        ClientError::Status { code, message } => ClientError::Status {
            code: *code,
            message: message.clone(),
        },
        ClientError::Decode(s) => ClientError::Decode(s.clone()),
        ClientError::InvalidUrl(s) => ClientError::InvalidUrl(s.clone()),
        ClientError::Timeout => ClientError::Timeout,
        ClientError::InvalidToken => ClientError::InvalidToken,
    }
}

/// Create a mock catalog item without a running container
pub fn mock_app(name: &str, mapping_id: &str) -> ApplicationData {
    ApplicationData {
        mapping_id: mapping_id.to_string(),
        image: Image {
            name: name.to_string(),
            ..Default::default()
        },
        container: None,
    }
}

/// Create a mock catalog item with a running container
pub fn mock_running_app(name: &str, mapping_id: &str, url_id: &str) -> ApplicationData {
    let mut app = mock_app(name, mapping_id);
    let mut container = mock_container(url_id);
    container.mapping_id = mapping_id.to_string();
    app.container = Some(container);
    app
}

/// Create a mock container
pub fn mock_container(url_id: &str) -> Container {
    Container {
        name: format!("remoteexec-mock-{}", url_id),
        image_name: "mock_image:latest".to_string(),
        url_id: url_id.to_string(),
        mapping_id: String::new(),
        docker_id: format!("docker_{}", url_id),
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn applications(&self) -> Result<Vec<ApplicationData>> {
        self.record(MockCall::Applications);
        let result = clone_result(&self.applications_result);
        let gate = self.applications_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        result
    }

    async fn start(&self, request: &StartRequest) -> Result<Container> {
        self.record(MockCall::Start {
            mapping_id: request.mapping_id.clone(),
            configuration: request.configuration.clone(),
        });
        let gate = self.start_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut container = clone_result(&self.start_result)?;
        if container.mapping_id.is_empty() {
            container.mapping_id = request.mapping_id.clone();
        }
        Ok(container)
    }

    async fn stop(&self, url_id: &str) -> Result<()> {
        self.record(MockCall::Stop {
            url_id: url_id.to_string(),
        });
        clone_result(&self.stop_result)
    }

    fn info(&self) -> BackendInfo {
        BackendInfo {
            name: "mock".to_string(),
            base_url: "http://mock.invalid/user/test".to_string(),
        }
    }
}
