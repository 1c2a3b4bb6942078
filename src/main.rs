//! WatchML CLI
//!
//! Command-line interface for the WatchML ECG backend:
//! - Show or create the user key
//! - List recordings and inspect one
//! - Upload a recording export
//! - Fetch a rendered ECG plot

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use watchml::config::{generate_default_config, ConfigSource};
use watchml::{
    bootstrap, Config, EcgImage, EcgPageController, FileStore, KeyState, LoggingConfig,
    WatchClient,
};

#[derive(Parser)]
#[command(name = "watchml")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Upload and inspect Apple Watch ECG recordings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend URL, overrides the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the user key, requesting one if none is stored
    Key,

    /// List uploaded recordings
    List,

    /// Show the raw samples of one recording
    Show {
        /// Recording name
        name: String,
    },

    /// Upload a recording export
    Upload {
        /// File to upload
        path: PathBuf,
    },

    /// Fetch the rendered plot of a recording
    Image {
        /// Recording name
        name: String,
        /// Output file (default: <name>.png)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let (mut config, source) = match &cli.config {
        Some(path) => (
            Config::load_with_env(path)?,
            ConfigSource::File {
                path: path.clone(),
                skipped: Vec::new(),
            },
        ),
        None => Config::discover(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    init_logging(&config.logging);
    // Config loading ran before the subscriber existed
    source.log();
    tracing::debug!("WatchML CLI v{}", env!("CARGO_PKG_VERSION"));

    let client = WatchClient::new(config.client_config())?;
    let store = FileStore::new(config.identity.resolved_store_path());

    match cli.command {
        Commands::Key => match bootstrap(&store, &client).await {
            KeyState::Present(key) => match cli.format {
                OutputFormat::Json => println!("{}", serde_json::json!({ "user_key": key })),
                OutputFormat::Text => println!("{}", key),
            },
            _ => bail!("No userKey found"),
        },

        Commands::List => {
            let routes = client.routes().clone();
            let mut page = EcgPageController::new(store, client, routes);
            page.mount().await;
            print_page(&page, cli.format)?;
        }

        Commands::Show { name } => {
            let routes = client.routes().clone();
            let mut page = EcgPageController::new(store, client, routes);
            page.mount().await;
            page.select(name);
            print_page(&page, cli.format)?;
        }

        Commands::Upload { path } => {
            let Some(key) = bootstrap(&store, &client).await.key().cloned() else {
                bail!("No userKey found");
            };

            let receipt = client.upload_ecg(key.as_str(), &path).await?;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&receipt)?),
                OutputFormat::Text => println!(
                    "Uploaded {} ({}) at {}",
                    receipt.file_name,
                    receipt.status,
                    receipt.uploaded_at.format("%Y-%m-%d %H:%M:%S")
                ),
            }
        }

        Commands::Image { name, output } => {
            let Some(key) = bootstrap(&store, &client).await.key().cloned() else {
                bail!("No userKey found");
            };

            match client.ecg_image(key.as_str(), &name).await? {
                EcgImage::Pending => {
                    println!("Plot for {} is being rendered, try again shortly", name);
                }
                EcgImage::Ready(bytes) => {
                    let path = output.unwrap_or_else(|| PathBuf::from(format!("{}.png", name)));
                    std::fs::write(&path, &bytes)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("Saved {} ({} bytes)", path.display(), bytes.len());
                }
            }
        }

        // Written out before configuration was loaded
        Commands::Config { .. } => {}
    }

    Ok(())
}

fn print_page<S, B>(page: &EcgPageController<S, B>, format: OutputFormat) -> anyhow::Result<()>
where
    S: watchml::IdentityStore,
    B: watchml::KeyIssuer + watchml::EcgSource,
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(page.state())?),
        OutputFormat::Text => print!("{}", page.render()),
    }
    Ok(())
}

/// Install the tracing subscriber. Logs go to stderr so stdout stays clean
/// for page output.
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("watchml={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
