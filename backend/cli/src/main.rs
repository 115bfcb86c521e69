mod config;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use glossbot_commands::{build_default_dispatcher, CommandContext};

use config::Config;

#[derive(Parser)]
#[command(name = "glossbot")]
#[command(about = "GlossBot: a Slack glossary bot")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook receiver and command worker
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Accept signed jobs forwarded by a receiver-only process
        #[arg(long)]
        worker: bool,
    },
    /// Show whether a local GlossBot is running
    Status,
    /// Run one command against the configured store and print the reply
    Exec {
        /// Command text, e.g. "!word tokio"
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Initialize structured logging
    glossbot_logging::init_logger(&config.log_options());

    match cli.command {
        Commands::Serve { port, worker } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                worker_intake: config.worker_intake || worker,
                ..config
            };
            config.validate()?;
            server::run_server(config).await?;
        }
        Commands::Status => {
            println!("GlossBot status: checking...");
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("GlossBot is not running on port {}", config.port);
                }
            }
        }
        Commands::Exec { text } => {
            let store = server::open_store(&config)?;
            let dispatcher = build_default_dispatcher(store);
            let reply = dispatcher.respond(&CommandContext::new("cli"), &text).await;
            println!("{reply}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::error::ErrorKind;

    use super::*;

    #[test]
    fn test_help_and_version_parse_without_config() {
        let err = Cli::try_parse_from(["glossbot", "--help"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        let err = Cli::try_parse_from(["glossbot", "--version"]).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_serve_worker_flag() {
        let cli = Cli::try_parse_from(["glossbot", "serve", "--worker", "-p", "9000"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Serve { port: Some(9000), worker: true }
        ));
    }
}
