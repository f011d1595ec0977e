mod analyze_cmd;
mod compare_cmd;
mod config;
mod status_cmd;
mod terminal_output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use legallens_analysis::{DiscrepancyService, ExtractionService};
use legallens_config::IntakeConfig;
use legallens_gateway::{start_server, GatewayState};
use legallens_logging::init_logger;
use legallens_model::{ModelClient, OllamaGateway};

use terminal_output::note_error;

#[derive(Parser)]
#[command(name = "legallens")]
#[command(about = "LegalLens: document extraction and cross-document discrepancy checks")]
#[command(version)]
struct Cli {
    /// Config file (default: $LEGALLENS_CONFIG_DIR/config.yaml or ~/.legallens/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Extract a document from a local image and print it as JSON
    Analyze {
        file: PathBuf,
        /// Media type to send instead of guessing from the extension
        #[arg(long)]
        media_type: Option<String>,
        /// Print a table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Compare two or more saved analyses for discrepancies
    Compare {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
        /// Print a table instead of JSON
        #[arg(long)]
        table: bool,
    },
    /// Show the health of a running server
    Status,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        note_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = config::load(cli.config.as_deref()).await?;
    init_logger(config.log_dir(), config.log_level(), config.log_json());

    match cli.command {
        Commands::Serve { port } => run_server(&config, port).await,
        Commands::Analyze {
            file,
            media_type,
            table,
        } => {
            let service =
                ExtractionService::new(model_client(&config), &config::analysis_config(&config));
            analyze_cmd::run(&service, &file, media_type.as_deref(), table).await
        }
        Commands::Compare { files, table } => {
            let service =
                DiscrepancyService::new(model_client(&config), &config::analysis_config(&config));
            compare_cmd::run(&service, &files, table).await
        }
        Commands::Status => {
            let host = match config.bind_address() {
                "0.0.0.0" | "::" => "127.0.0.1",
                other => other,
            };
            status_cmd::run(&format!("http://{host}:{}", config.port())).await
        }
    }
}

fn model_client(config: &IntakeConfig) -> ModelClient {
    ModelClient::new(Arc::new(
        OllamaGateway::new().with_base_url(config.base_url()),
    ))
}

async fn run_server(config: &IntakeConfig, port: Option<u16>) -> Result<()> {
    let addr = config::listen_addr(config, port)?;
    let analysis = config::analysis_config(config);
    info!(
        addr = %addr,
        model_service = %config.base_url(),
        vision_model = %analysis.vision_model,
        text_model = %analysis.text_model,
        extraction_timeout_ms = analysis.extraction_timeout.as_millis() as u64,
        discrepancy_timeout_ms = analysis.discrepancy_timeout.as_millis() as u64,
        "Starting LegalLens"
    );

    let state = Arc::new(GatewayState::new(model_client(config), &analysis));
    start_server(addr, state, config.max_upload_bytes()).await
}
