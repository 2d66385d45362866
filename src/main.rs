use clap::Parser;
use tracing::{error, info};

mod cli;

use crate::cli::CliArgs;
use doris_agent::GatewayClient;
use doris_agent::config::AppConfig;
use doris_agent::util::logging::init_tracing;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args = CliArgs::parse();

    // Initialize logging
    init_tracing(args.log_json);

    // Load configuration
    let config = match AppConfig::new(&args.overrides) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!("Using gateway at {}", config.gateway.base_url);
    let client = match GatewayClient::new(config.gateway) {
        Ok(client) => client,
        Err(e) => {
            cli::report(&e);
            std::process::exit(2);
        }
    };

    if let Err(e) = cli::run(&client, args.command).await {
        error!("Command failed: {}", e);
        cli::report(&e);
        std::process::exit(1);
    }

    Ok(())
}
