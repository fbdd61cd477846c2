use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "healthcheck-cli")]
#[command(about = "Query a running health checker's status server", long_about = None)]
struct Cli {
    #[arg(short, long, env = "HEALTHCHECK_URL", default_value = "http://localhost:8989")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Is the checker process up
    Health,
    /// Summary of the latest tick
    Status,
    /// Raw Prometheus metrics
    Metrics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_json(res).await?;
        }
        Commands::Status => {
            let res = client.get(format!("{}/status", base)).send().await?;
            if res.status() == reqwest::StatusCode::NOT_FOUND {
                println!("No tick has completed yet");
                return Ok(());
            }
            print_json(res).await?;
        }
        Commands::Metrics => {
            let res = client.get(format!("{}/metrics", base)).send().await?;
            if !res.status().is_success() {
                eprintln!("Error: status server returned {}", res.status());
                return Ok(());
            }
            print!("{}", res.text().await?);
        }
    }

    Ok(())
}

async fn print_json(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: status server returned {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
