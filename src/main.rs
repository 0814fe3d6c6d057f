use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use farmland::api::{AppState, create_router};
use farmland::cms;
use farmland::config::CONFIG;
use farmland::content::ContentStore;

#[derive(Parser)]
#[command(name = "farmland", about = "Content API and CMS checks for the farmland site")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the content API and the static site
    Serve {
        /// Address to bind, overrides SERVER_ADDR
        #[arg(long)]
        addr: Option<String>,
    },
    /// Check the CMS admin panel config and content files
    ValidateCms {
        #[arg(long)]
        admin_dir: Option<PathBuf>,
        #[arg(long)]
        content_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { addr } => {
            serve(addr.unwrap_or_else(|| CONFIG.server_addr.clone())).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::ValidateCms {
            admin_dir,
            content_dir,
        } => {
            let admin_dir = admin_dir.unwrap_or_else(|| PathBuf::from(&CONFIG.admin_dir));
            let content_dir = content_dir.unwrap_or_else(|| PathBuf::from(&CONFIG.content_dir));
            let report = cms::validate(&admin_dir, &content_dir);
            for check in report.checks.iter() {
                let mark = if check.passed { "ok  " } else { "FAIL" };
                println!("{mark} {} ({})", check.name, check.detail);
            }
            if report.is_ok() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
    }
}

async fn serve(addr: String) -> anyhow::Result<()> {
    let content = ContentStore::from_config()?;
    let state = Arc::new(
        AppState::new(content, CONFIG.listing).with_lead_capacity(CONFIG.leads_capacity),
    );
    let app = create_router(state, &CONFIG.static_dir);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
