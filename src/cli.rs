// command line interface

use crate::core::{check_prompt_safety, DEFAULT_MAX_REQUESTS};
use crate::Server;
use clap::{Parser, Subcommand};
use miette::Result;

#[derive(Parser)]
#[command(name = "promptgate", about = "Prompt firewall and AI provider orchestration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// start as http server
    Serve {
        /// port number
        #[arg(long, short, default_value = "3000", env = "PROMPTGATE_PORT")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "127.0.0.1", env = "PROMPTGATE_HOST")]
        host: String,

        /// per-caller request cap per hour window
        #[arg(long, default_value_t = DEFAULT_MAX_REQUESTS, env = "PROMPTGATE_MAX_REQUESTS")]
        max_requests: u32,
    },

    /// run a prompt through the firewall and print the verdict
    Check {
        /// the prompt to classify
        prompt: String,
    },
}

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "promptgate=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            host,
            max_requests,
        } => Ok(Server::run(&host, port, max_requests).await?),

        Commands::Check { prompt } => {
            let verdict = check_prompt_safety(&prompt);
            let json = serde_json::to_string_pretty(&verdict)
                .map_err(|e| miette::miette!("failed to encode verdict: {e}"))?;
            println!("{json}");
            Ok(())
        }
    }
}
