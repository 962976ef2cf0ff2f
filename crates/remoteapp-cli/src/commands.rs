//! CLI command implementations

use anyhow::{anyhow, bail, Context, Result};
use remoteapp_config::GlobalConfig;
use remoteapp_core::view::{frame_url, ConfigurationForm, DetailView, Viewport};
use remoteapp_core::{AppStatus, ApplicationListModel, CoreError};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

/// One `--set` override: `tag.key=value`
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigOverride {
    pub tag: String,
    pub key: String,
    pub value: Value,
}

/// Parse `tag.key=value`. Values that parse as JSON are kept typed.
pub fn parse_override(raw: &str) -> Result<ConfigOverride> {
    let (path, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected TAG.KEY=VALUE, got '{}'", raw))?;
    let (tag, key) = path
        .split_once('.')
        .filter(|(tag, key)| !tag.is_empty() && !key.is_empty())
        .ok_or_else(|| anyhow!("Expected TAG.KEY=VALUE, got '{}'", raw))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok(ConfigOverride {
        tag: tag.to_string(),
        key: key.to_string(),
        value,
    })
}

/// List applications
pub async fn list(model: &ApplicationListModel) -> Result<()> {
    model.update().await?;
    let entries = model.entries().await;

    if entries.is_empty() {
        println!("No applications available.");
        return Ok(());
    }

    const NAME_WIDTH: usize = 30;
    const STATUS_WIDTH: usize = 10;

    println!("  {:<NAME_WIDTH$} {:<STATUS_WIDTH$} URL", "NAME", "STATUS");
    println!("{}", "-".repeat(75));

    let base_url = model.backend_info().base_url;
    for entry in entries {
        let status_symbol = match entry.status() {
            AppStatus::Running => "●",
            AppStatus::Stopped => "○",
            AppStatus::Starting => "◐",
            AppStatus::Error => "✗",
        };
        let url = entry
            .container()
            .map(|c| frame_url(&base_url, &c.url_id, false))
            .unwrap_or_default();
        println!(
            "{} {:<NAME_WIDTH$} {:<STATUS_WIDTH$} {}",
            status_symbol,
            entry.display_name(),
            entry.status().to_string(),
            url
        );
    }

    Ok(())
}

/// Start an application, applying configuration overrides first.
/// Returns the frame URL of the new container.
pub async fn start(
    model: &Arc<ApplicationListModel>,
    viewport: Viewport,
    app: &str,
    overrides: &[String],
) -> Result<String> {
    let overrides = overrides
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<Result<Vec<_>>>()?;

    model.update().await?;
    let index = find_application(model, app).await?;
    model.select(index).await?;
    let entry = model
        .selected_entry()
        .await
        .ok_or_else(|| anyhow!("Application '{}' not found", app))?;

    if entry.is_running() {
        let url = DetailView::new(model.clone(), viewport)
            .app_source()
            .await
            .unwrap_or_default();
        println!("Application '{}' is already running", entry.display_name());
        return Ok(url);
    }

    if !overrides.is_empty() {
        let mut form = ConfigurationForm::load(model.clone(), index).await?;
        for o in &overrides {
            form.set(&o.tag, &o.key, o.value.clone())?;
        }
        form.commit().await?;
    }

    println!("Starting '{}'...", entry.display_name());
    let detail = DetailView::new(model.clone(), viewport);
    match detail.start_application().await {
        Ok(()) => {}
        Err(CoreError::StartFailed(e)) => bail!("{}", e),
        Err(e) => return Err(e.into()),
    }

    // The printed URL is the stable one; the one-shot flag is left for a
    // shell that renders the frame
    let url = model
        .entry(index)
        .await
        .and_then(|e| e.container().map(|c| c.url_id.clone()))
        .map(|url_id| frame_url(&model.backend_info().base_url, &url_id, false))
        .ok_or_else(|| anyhow!("Application '{}' has no container", entry.display_name()))?;
    println!("Started '{}' at {}", entry.display_name(), url);
    Ok(url)
}

/// Stop an application
pub async fn stop(model: &ApplicationListModel, app: &str) -> Result<()> {
    model.update().await?;
    let index = find_application(model, app).await?;
    model.select(index).await?;
    let entry = model
        .selected_entry()
        .await
        .ok_or_else(|| anyhow!("Application '{}' not found", app))?;

    if entry.is_stopped() {
        println!("Application '{}' is not running", entry.display_name());
        return Ok(());
    }

    println!("Stopping '{}'...", entry.display_name());
    model.stop_application().await?;
    println!("Stopped '{}'", entry.display_name());
    Ok(())
}

/// Print the frame URL of a running application
pub async fn open(model: &Arc<ApplicationListModel>, viewport: Viewport, app: &str) -> Result<String> {
    model.update().await?;
    let index = find_application(model, app).await?;
    model.select(index).await?;

    let detail = DetailView::new(model.clone(), viewport);
    let url = match detail.app_source().await {
        Some(url) => url,
        None => bail!(
            "Application '{}' is not running",
            detail.display_name().await.unwrap_or_else(|| app.to_string())
        ),
    };
    println!("{}", url);
    Ok(url)
}

/// Show or edit the global configuration
pub async fn config(edit: bool, path: Option<&Path>) -> Result<()> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => GlobalConfig::config_path()?,
    };

    if edit {
        let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());

        if !config_path.exists() {
            GlobalConfig::default().save_to(&config_path)?;
            println!("Created default config at {:?}", config_path);
        }

        std::process::Command::new(&editor)
            .arg(&config_path)
            .status()
            .context(format!("Failed to open editor: {}", editor))?;
    } else if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)?;
        println!("# Config file: {:?}\n", config_path);
        println!("{}", content);
    } else {
        println!("# Config file: {:?} (not created yet)\n", config_path);
        println!("# Default configuration:");
        let content = toml::to_string_pretty(&GlobalConfig::default())?;
        println!("{}", content);
        println!("\n# Run 'remoteapp config --edit' to create and edit the config file.");
    }

    Ok(())
}

/// Find an application by mapping id, image name or display name, falling
/// back to a unique prefix match
pub async fn find_application(model: &ApplicationListModel, name: &str) -> Result<usize> {
    if let Some(index) = model.find(name).await {
        return Ok(index);
    }

    let entries = model.entries().await;
    let matches: Vec<usize> = entries
        .iter()
        .enumerate()
        .filter(|(_, e)| {
            e.display_name().starts_with(name) || e.app_data().image.name.starts_with(name)
        })
        .map(|(i, _)| i)
        .collect();

    match matches.as_slice() {
        [] => Err(anyhow!("Application '{}' not found", name)),
        [index] => Ok(*index),
        _ => Err(anyhow!(
            "Ambiguous application reference '{}', matches: {}",
            name,
            matches
                .iter()
                .map(|i| entries[*i].display_name())
                .collect::<Vec<_>>()
                .join(", ")
        )),
    }
}
