use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use doris_agent::config::ConfigOverrides;
use doris_agent::models::upload::DEFAULT_PREVIEW_ROWS;
use doris_agent::models::{LlmConfig, NaturalQueryRequest, UploadRequest};
use doris_agent::{GatewayClient, GatewayError, GatewayResult};

#[derive(Parser, Debug)]
#[command(author, version, about = "Command-line agent for the Doris data platform gateway", long_about = None)]
pub struct CliArgs {
    #[command(flatten)]
    pub overrides: ConfigOverrides,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the gateway banner
    Info,
    /// Check gateway and Doris connectivity
    Health,
    /// Ask a question in natural language
    Ask {
        question: String,
        /// LLM API key for this question only
        #[arg(long)]
        api_key: Option<String>,
        /// LLM model for this question only
        #[arg(long)]
        model: Option<String>,
        /// Alternate LLM endpoint for this question only
        #[arg(long)]
        llm_base_url: Option<String>,
    },
    /// Import a spreadsheet into a table
    Upload {
        file: PathBuf,
        /// Target table
        #[arg(short, long)]
        table: String,
        /// Fail instead of creating the table when it is missing
        #[arg(long)]
        no_create_table: bool,
        /// Column renames as a JSON object, e.g. '{"名称":"name"}'
        #[arg(long, value_name = "JSON")]
        column_mapping: Option<String>,
    },
    /// Preview the first rows of a spreadsheet
    Preview {
        file: PathBuf,
        #[arg(short, long, default_value_t = DEFAULT_PREVIEW_ROWS)]
        rows: u32,
    },
    /// Execute a SQL statement
    Sql { statement: String },
    /// List tables
    Tables,
    /// Describe a table
    Schema { table: String },
    /// Manage LLM resources
    Llm {
        #[command(subcommand)]
        command: LlmCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum LlmCommand {
    List,
    Create {
        resource_name: String,
        #[arg(long)]
        provider: String,
        #[arg(long)]
        endpoint: String,
        #[arg(long)]
        model_name: String,
        #[arg(long)]
        api_key: String,
        #[arg(long)]
        temperature: Option<f32>,
        #[arg(long)]
        max_tokens: Option<u32>,
    },
    Test { resource_name: String },
    Delete { resource_name: String },
}

pub async fn run(client: &GatewayClient, command: Command) -> GatewayResult<()> {
    match command {
        Command::Info => print_json(&client.service_info().await?),
        Command::Health => print_json(&client.check_health().await?),
        Command::Ask {
            question,
            api_key,
            model,
            llm_base_url,
        } => {
            let request = NaturalQueryRequest {
                question,
                api_key,
                model,
                llm_base_url,
            };
            print_json(&client.ask_with(request).await?)
        }
        Command::Upload {
            file,
            table,
            no_create_table,
            column_mapping,
        } => {
            let mut request = UploadRequest::new(file, table).with_create_table(!no_create_table);
            if let Some(raw) = column_mapping {
                let mapping: BTreeMap<String, String> = serde_json::from_str(&raw).map_err(|e| {
                    GatewayError::invalid_input(format!("--column-mapping is not a JSON object: {}", e))
                })?;
                request = request.with_column_mapping(mapping);
            }
            print_json(&client.upload_file(&request).await?)
        }
        Command::Preview { file, rows } => print_json(&client.preview_file(file, rows).await?),
        Command::Sql { statement } => print_json(&client.run_query(&statement).await?),
        Command::Tables => print_json(&client.list_tables().await?),
        Command::Schema { table } => print_json(&client.get_table_schema(&table).await?),
        Command::Llm { command } => run_llm(client, command).await,
    }
}

async fn run_llm(client: &GatewayClient, command: LlmCommand) -> GatewayResult<()> {
    match command {
        LlmCommand::List => print_json(&client.list_llm_configs().await?),
        LlmCommand::Create {
            resource_name,
            provider,
            endpoint,
            model_name,
            api_key,
            temperature,
            max_tokens,
        } => {
            let mut config = LlmConfig::new(resource_name, provider, endpoint, model_name, api_key);
            config.temperature = temperature;
            config.max_tokens = max_tokens;
            print_json(&client.create_llm_config(&config).await?)
        }
        LlmCommand::Test { resource_name } => {
            print_json(&client.test_llm_config(&resource_name).await?)
        }
        LlmCommand::Delete { resource_name } => {
            print_json(&client.delete_llm_config(&resource_name).await?)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> GatewayResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| GatewayError::protocol("output", e))?;
    println!("{}", text);
    Ok(())
}

/// Prints a failed command for a human: kind, message and, for gateway
/// rejections, whatever diagnostics the server sent along.
pub fn report(err: &GatewayError) {
    eprintln!("{}: {}", err.kind(), err);
    if let GatewayError::Remote {
        status, traceback, ..
    } = err
    {
        eprintln!("  status: {}", status);
        if let Some(trace) = traceback {
            eprintln!("  server traceback:\n{}", trace);
        }
    }
    if err.is_retryable() {
        eprintln!("  (transient failure, retrying later may succeed)");
    }
}
