mod chat_api_client;
mod cli;
mod error;
mod wit_client;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::Result;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::chat_api_client::BadgerApiClient;
use crate::cli::chat::ChatContext;
use crate::wit_client::WitClient;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input to send to the chat
    #[arg(short, long)]
    input: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a chat session
    Chat {
        /// Input to send to the chat
        #[arg(short, long)]
        input: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    // Initialize tracing with appropriate level
    let (input, verbose) = match cli.command {
        Some(Commands::Chat { input, verbose }) => (input, verbose),
        None => (cli.input, cli.verbose),
    };

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    info!("Starting BadgerChat CLI");

    let nlu = match WitClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to initialize wit.ai client: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let chat_api = match BadgerApiClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to initialize BadgerChat client: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut chat_context = ChatContext::new(
        Box::new(io::stdout()),
        input,
        true,
        Box::new(nlu),
        Box::new(chat_api),
    );
    chat_context.run().await
}
