use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use relay_locator::availability::load_routers;
use relay_locator::config::load_config;

#[derive(Parser)]
#[command(name = "locator-cli")]
#[command(about = "Management CLI for the relay locator", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask for the nearest routers
    Locate {
        /// Transport to request; repeat for several
        #[arg(long = "cap")]
        caps: Vec<String>,
        /// Number of routers per transport
        #[arg(short, long)]
        k: Option<u32>,
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Do not accept IPv4-only routers
        #[arg(long)]
        no_ipv4: bool,
        /// Do not accept IPv6-only routers
        #[arg(long)]
        no_ipv6: bool,
    },
    /// Show the current router snapshot
    Routers,
    /// Check service health
    Health,
    /// Validate a config file and the router list it points to
    CheckConfig { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Locate {
            caps,
            k,
            lon,
            lat,
            no_ipv4,
            no_ipv6,
        } => {
            let mut params: Vec<(&str, String)> = caps.into_iter().map(|c| ("cap", c)).collect();
            if let Some(k) = k {
                params.push(("k", k.to_string()));
            }
            if let Some(lon) = lon {
                params.push(("lon", lon.to_string()));
            }
            if let Some(lat) = lat {
                params.push(("lat", lat.to_string()));
            }
            if no_ipv4 {
                params.push(("ipv4", "0".to_string()));
            }
            if no_ipv6 {
                params.push(("ipv6", "0".to_string()));
            }

            let res = client
                .get(format!("{}/locate", cli.url))
                .query(&params)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Routers => {
            let res = client.get(format!("{}/routers", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::Health => {
            let res = client.get(format!("{}/health", cli.url)).send().await?;
            print_response(res).await?;
        }
        Commands::CheckConfig { path } => {
            let config = load_config(&path)?;
            let routers = load_routers(std::path::Path::new(&config.availability.path))?;
            println!(
                "{}: ok ({} routers in {})",
                path.display(),
                routers.len(),
                config.availability.path
            );
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: locator returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
