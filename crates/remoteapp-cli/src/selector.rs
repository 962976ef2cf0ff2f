//! Interactive application selector for CLI commands

use anyhow::{bail, Result};
use dialoguer::{theme::ColorfulTheme, Select};
use remoteapp_core::{AppStatus, ApplicationEntry};

/// Which applications a command may act on
#[derive(Debug, Clone, Copy)]
pub enum SelectionContext {
    /// Stopped or failed applications (for start)
    Startable,
    /// Applications with a container (for stop)
    Stoppable,
    /// Running applications (for open)
    Running,
}

impl SelectionContext {
    pub fn matches(&self, entry: &ApplicationEntry) -> bool {
        match self {
            SelectionContext::Startable => entry.can_start(),
            SelectionContext::Stoppable => entry.can_stop(),
            SelectionContext::Running => entry.status() == AppStatus::Running,
        }
    }

    fn description(&self) -> &'static str {
        match self {
            SelectionContext::Startable => "startable",
            SelectionContext::Stoppable => "stoppable",
            SelectionContext::Running => "running",
        }
    }
}

/// Prompt for one of the matching applications and return its mapping id
pub fn select_application(
    entries: &[ApplicationEntry],
    context: SelectionContext,
    prompt: &str,
) -> Result<String> {
    let candidates: Vec<&ApplicationEntry> =
        entries.iter().filter(|e| context.matches(e)).collect();

    if candidates.is_empty() {
        bail!("No {} applications", context.description());
    }
    if !std::io::IsTerminal::is_terminal(&std::io::stdin()) {
        bail!("No application specified (interactive selection needs a terminal)");
    }

    let items: Vec<String> = candidates
        .iter()
        .map(|e| format!("{} ({})", e.display_name(), e.status()))
        .collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(&items)
        .default(0)
        .interact()?;

    Ok(candidates[selection].app_data().mapping_id.clone())
}
