use clap::{ArgAction, Parser, Subcommand};
use reqwest::Method;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hello-cli")]
#[command(about = "Client for the hello service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask the service for a greeting
    Hello {
        /// Keep asking until interrupted. `--loop=false` sends a single request.
        #[arg(long = "loop", default_value_t = true, action = ArgAction::Set)]
        repeat: bool,

        /// Seconds between requests when looping
        #[arg(long, default_value_t = 2)]
        interval_secs: u64,
    },
    /// Read the HTTP health endpoint
    Health,
    /// Enable health checks
    Pass,
    /// Disable health checks
    Fail,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    match cli.command {
        Commands::Hello {
            repeat,
            interval_secs,
        } => {
            let target = format!("{}/hello", cli.url);
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            loop {
                ticker.tick().await;
                match request(&client, Method::GET, &target).await {
                    Ok(body) => println!("{} says: {}", target, body.trim_end()),
                    Err(e) if repeat => eprintln!("Failed to reach hello service: {}", e),
                    Err(e) => return Err(e),
                }
                if !repeat {
                    break;
                }
            }
        }
        Commands::Health => {
            let body = request(&client, Method::GET, &format!("{}/healthz", cli.url)).await?;
            println!("{}", body.trim_end());
        }
        Commands::Pass => {
            let body = request(&client, Method::PUT, &format!("{}/health/pass", cli.url)).await?;
            println!("{}", body.trim_end());
        }
        Commands::Fail => {
            let body = request(&client, Method::PUT, &format!("{}/health/fail", cli.url)).await?;
            println!("{}", body.trim_end());
        }
    }

    Ok(())
}

async fn request(
    client: &reqwest::Client,
    method: Method,
    target: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let res = client.request(method, target).send().await?;
    let status = res.status();
    let body = res.text().await?;
    if !status.is_success() {
        return Err(format!("{} returned status {}", target, status).into());
    }
    Ok(body)
}
