//! remoteapp - remote application manager client

use clap::{Parser, Subcommand};
use remoteapp_cli::commands;
use remoteapp_cli::selector::{select_application, SelectionContext};
use remoteapp_client::create_backend;
use remoteapp_config::GlobalConfig;
use remoteapp_core::view::Viewport;
use remoteapp_core::ApplicationListModel;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "remoteapp")]
#[command(author, version, about = "Remote application manager client", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Override the server base URL
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available applications
    List,

    /// Start an application
    Start {
        /// Application name or mapping id (interactive selection if not specified)
        app: Option<String>,
        /// Configuration override, repeatable
        #[arg(long = "set", value_name = "TAG.KEY=VALUE")]
        set: Vec<String>,
    },

    /// Stop an application
    Stop {
        /// Application name or mapping id (interactive selection if not specified)
        app: Option<String>,
    },

    /// Print the URL of a running application
    Open {
        /// Application name or mapping id (interactive selection if not specified)
        app: Option<String>,
    },

    /// Show or edit global configuration
    Config {
        /// Open config in editor
        #[arg(short, long)]
        edit: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let Cli {
        command,
        config: config_path,
        base_url,
        ..
    } = cli;
    let session = || connect(config_path.as_deref(), base_url.clone());

    match command {
        None => {
            let (config, model) = session()?;
            remoteapp_tui::run(
                model,
                Viewport::from(&config.view),
                config.server.username.clone(),
            )
            .await?;
        }
        Some(Commands::List) => {
            let (_, model) = session()?;
            commands::list(&model).await?;
        }
        Some(Commands::Start { app, set }) => {
            // Validate overrides before any request goes out
            for raw in &set {
                commands::parse_override(raw)?;
            }
            let (config, model) = session()?;
            let name = match app {
                Some(name) => name,
                None => {
                    model.update().await?;
                    select_application(
                        &model.entries().await,
                        SelectionContext::Startable,
                        "Select application to start:",
                    )?
                }
            };
            commands::start(&model, Viewport::from(&config.view), &name, &set).await?;
        }
        Some(Commands::Stop { app }) => {
            let (_, model) = session()?;
            let name = match app {
                Some(name) => name,
                None => {
                    model.update().await?;
                    select_application(
                        &model.entries().await,
                        SelectionContext::Stoppable,
                        "Select application to stop:",
                    )?
                }
            };
            commands::stop(&model, &name).await?;
        }
        Some(Commands::Open { app }) => {
            let (config, model) = session()?;
            let name = match app {
                Some(name) => name,
                None => {
                    model.update().await?;
                    select_application(
                        &model.entries().await,
                        SelectionContext::Running,
                        "Select application to open:",
                    )?
                }
            };
            commands::open(&model, Viewport::from(&config.view), &name).await?;
        }
        // Config command doesn't need a backend
        Some(Commands::Config { edit }) => {
            commands::config(edit, config_path.as_deref()).await?;
        }
    }

    Ok(())
}

/// Load the configuration and build the model on top of its backend
fn connect(
    path: Option<&Path>,
    base_url: Option<String>,
) -> anyhow::Result<(GlobalConfig, Arc<ApplicationListModel>)> {
    let mut config = match path {
        Some(path) => GlobalConfig::load_from(path)?,
        None => GlobalConfig::load().unwrap_or_else(|e| {
            eprintln!("Warning: {}; using defaults", e);
            GlobalConfig::default()
        }),
    };
    if let Some(url) = base_url {
        config = config.with_base_url(url)?;
    }

    let model = Arc::new(ApplicationListModel::new(create_backend(&config)?));
    Ok((config, model))
}
