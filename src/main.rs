use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use linkdrop::client::HttpExchangeClient;
use linkdrop::common::config::{
    apply_overrides, config_path, load_config, AppConfig, ConfigOverrides,
};
use linkdrop::download::{DownloadResolver, DownloadStatus};
use linkdrop::notify::ConsoleNotifier;
use linkdrop::upload::{UploadController, UploadStatus};
use linkdrop::validate::FileCandidate;

#[derive(Parser)]
#[command(name = "linkdrop")]
#[command(about = "Short-link file exchange client")]
struct Cli {
    /// Override the exchange service base URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file and print its short identifier
    Upload {
        #[arg(help = "Path to file to upload")]
        file: PathBuf,

        /// Protect the file with a password
        #[arg(long)]
        password: Option<String>,
    },
    /// Fetch a download URL for a short identifier
    Download {
        #[arg(help = "Short file identifier")]
        id: Option<String>,

        /// Password for a protected file (prompted interactively if omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved configuration
    Show,
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config()?;
    let config = apply_overrides(
        config,
        &ConfigOverrides {
            api_url: cli.api_url,
        },
    );

    match cli.command {
        Commands::Upload { file, password } => run_upload(&config, file, password).await,
        Commands::Download { id, password } => run_download(&config, id, password).await,
        Commands::Config { action } => run_config(&config, action),
    }
}

async fn run_upload(config: &AppConfig, file: PathBuf, password: Option<String>) -> Result<()> {
    // fail fast before spinning up the client
    if !file.exists() {
        eprintln!("Error: File not found: {}", file.display());
        std::process::exit(1);
    }

    let bytes = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "file".to_string());

    let notifier = Arc::new(ConsoleNotifier::new());
    let client = Arc::new(HttpExchangeClient::new(config)?);
    let mut controller =
        UploadController::new(client, notifier.clone(), config.upload_policy());

    controller.select_file(FileCandidate::new(name, bytes.into()));
    if let Some(password) = password {
        controller.set_password_protection(true);
        controller.set_password(password);
    }

    notifier.begin("Uploading...");
    controller.submit().await;

    match controller.session().status {
        UploadStatus::Succeeded => {
            let result = controller
                .session()
                .result
                .as_ref()
                .context("succeeded upload is missing its result")?;
            println!("File ID: {}", result.short_id);
            if let Some(url) = &result.download_url {
                println!("Download link: {url}");
            }
            println!(
                "The file expires in {} hours.",
                linkdrop::common::config::RETENTION_WINDOW_HOURS
            );
            Ok(())
        }
        _ => std::process::exit(1),
    }
}

async fn run_download(
    config: &AppConfig,
    id: Option<String>,
    mut password: Option<String>,
) -> Result<()> {
    let id = match id {
        Some(id) => id,
        None => prompt("Enter file ID: ")?,
    };

    let notifier = Arc::new(ConsoleNotifier::new());
    let client = Arc::new(HttpExchangeClient::new(config)?);
    let mut resolver = DownloadResolver::new(client, notifier.clone(), config.id_policy());

    notifier.begin("Fetching file...");
    resolver.resolve(&id).await;

    loop {
        match resolver.session().status {
            DownloadStatus::AwaitingPassword => {
                let candidate = match password.take() {
                    Some(p) => p,
                    None => prompt("Password: ")?,
                };
                notifier.begin("Verifying password...");
                resolver.verify_password(&candidate).await;
            }
            DownloadStatus::Ready => {
                let url = resolver
                    .session()
                    .retrieval_url
                    .as_deref()
                    .context("ready download is missing its URL")?;
                println!("Download link: {url}");
                return Ok(());
            }
            _ => std::process::exit(1),
        }
    }
}

fn run_config(config: &AppConfig, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let rendered =
                serde_json::to_string_pretty(config).context("Failed to render configuration")?;
            println!("{rendered}");
        }
        ConfigAction::Path => {
            println!("{}", config_path().display());
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}
