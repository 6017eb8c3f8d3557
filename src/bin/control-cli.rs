use std::path::PathBuf;
use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::RequestBuilder;
use serde_json::Value;

#[derive(Parser)]
#[command(name = "control-cli")]
#[command(about = "Management CLI for the HAProxy control plane", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token, when the admin API requires one
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show control plane status
    Status,
    /// List registered services
    Services,
    /// Register or replace a service from a JSON file
    AddService { file: PathBuf },
    /// Remove a service by name
    RemoveService { name: String },
    /// Register a certificate file name
    AddCert { name: String },
    /// Show base64-encoded certificate contents by name
    Certs,
    /// Print the compiled proxy configuration
    Config,
    /// Recompile and reload the proxy
    Reconfigure,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))?,
        );
    }
    let url = |path: &str| format!("{}{}", cli.url.trim_end_matches('/'), path);

    let request = match &cli.command {
        Commands::Status => client.get(url("/v1/status")),
        Commands::Services => client.get(url("/v1/services")),
        Commands::AddService { file } => {
            let body: Value = serde_json::from_str(&std::fs::read_to_string(file)?)?;
            client.put(url("/v1/services")).json(&body)
        }
        Commands::RemoveService { name } => client.delete(url(&format!("/v1/services/{}", name))),
        Commands::AddCert { name } => client.put(url(&format!("/v1/certs/{}", name))),
        Commands::Certs => client.get(url("/v1/certs")),
        Commands::Config => client.get(url("/v1/config")),
        Commands::Reconfigure => client.post(url("/v1/reconfigure")),
    };

    send(request.headers(headers)).await
}

async fn send(request: RequestBuilder) -> Result<(), Box<dyn std::error::Error>> {
    let res = request.send().await?;
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        eprintln!("Response: {}", text);
        std::process::exit(1);
    }

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => print!("{}", text),
    }
    Ok(())
}
