//! Command-line client for the POS backend.
//!
//! Every command runs through the same request pipeline the library exposes:
//! cached GETs, cache invalidation on writes, and classified failures
//! reported as `[CODE] message`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use http::Method;
use serde_json::Value;

use pos_client::client::decode;
use pos_client::config::{apply_overrides, load_config, PipelineConfig};
use pos_client::observability::logging::init_logging;
use pos_client::session::{AuthSession, LoginRequest};
use pos_client::ApiClient;

#[derive(Parser)]
#[command(name = "pos-client")]
#[command(about = "Command-line client for the POS backend", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides `api.base_url`
    #[arg(short, long)]
    base_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(short, long, env = "POS_TOKEN")]
    token: Option<String>,

    /// Overrides `observability.log_level`
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GET a path
    Get {
        path: String,
        /// Query parameter as key=value; repeatable
        #[arg(short, long, value_parser = parse_pair)]
        query: Vec<(String, String)>,
        /// Suppress the failure notice
        #[arg(long)]
        silent: bool,
        /// Issue the request this many times (later ones are served from cache)
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },
    /// POST a JSON body
    Post {
        path: String,
        #[arg(short, long, default_value = "{}")]
        data: String,
    },
    /// PUT a JSON body
    Put {
        path: String,
        #[arg(short, long, default_value = "{}")]
        data: String,
    },
    /// DELETE a path
    Delete { path: String },
    /// Log in and print the issued token
    Login { username: String, password: String },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => load_config(path),
        None => Ok(PipelineConfig::default()),
    };
    let config = match loaded.and_then(|config| {
        apply_overrides(config, cli.base_url.as_deref(), cli.log_level.as_deref())
    }) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.observability.log_level) {
        eprintln!("Error: failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: PipelineConfig) -> Result<(), Box<dyn std::error::Error>> {
    let session = match cli.token {
        Some(token) => AuthSession::with_token(token),
        None => AuthSession::new(),
    };
    let client = ApiClient::builder(config)
        .session(Arc::new(session))
        .build()?;

    match cli.command {
        Commands::Get {
            path,
            query,
            silent,
            repeat,
        } => {
            let query: Vec<(&str, &str)> =
                query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
            for _ in 0..repeat.max(1) {
                let value: Value = if silent {
                    client.get_json_silent(&path, &query).await?
                } else {
                    client.get_json(&path, &query).await?
                };
                print_json(&value)?;
            }
            tracing::debug!(entries = client.cache().len(), "Cache state");
        }
        Commands::Post { path, data } => {
            let body: Value = serde_json::from_str(&data)?;
            let value: Value = client.send_json(Method::POST, &path, &body).await?;
            print_json(&value)?;
        }
        Commands::Put { path, data } => {
            let body: Value = serde_json::from_str(&data)?;
            let value: Value = client.send_json(Method::PUT, &path, &body).await?;
            print_json(&value)?;
        }
        Commands::Delete { path } => {
            let response = client.delete(&path).await?;
            if response.body().is_empty() {
                println!("{}", response.status());
            } else {
                let value: Value = decode(&response)?;
                print_json(&value)?;
            }
        }
        Commands::Login { username, password } => {
            let envelope = client.login(&LoginRequest { username, password }).await?;
            if !envelope.success {
                return Err(envelope
                    .message
                    .unwrap_or_else(|| "login rejected".to_string())
                    .into());
            }
            print_json(&serde_json::to_value(&envelope)?)?;
        }
    }

    Ok(())
}

fn print_json(value: &Value) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
