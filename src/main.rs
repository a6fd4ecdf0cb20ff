// Pentest Gateway - Main Entry Point
//
// CLI front end for the validation and execution gateway:
// - MCP stdio server
// - One-shot operation runs
// - Operation catalog and system inventory

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pentest_gateway::config::Config;
use pentest_gateway::logging;
use pentest_gateway::mcp::McpServer;
use pentest_gateway::tools::{OperationKind, ProcessExecutor, RawParams, ToolGateway, ToolResult};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

/// Pentest Gateway: validated, bounded execution of security tools
#[derive(Parser, Debug)]
#[command(name = "pentest-gateway")]
#[command(version)]
#[command(about = "Validate parameters and run security tools without a shell", long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to a config file (default: ~/.config/pentest-gateway/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the gateway to an MCP client over stdio
    Serve,
    /// Run one operation and print its result
    Run {
        /// Operation name, e.g. nmap_scan
        operation: String,

        /// Parameter as key=value (repeatable)
        #[arg(short = 'p', long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supported operations and their parameters
    List,
    /// Report OS and installed tools
    SystemInfo {
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let config = load_config(args.config.as_ref())?;
    logging::init(&config.logging, args.verbose)?;
    debug!(?config, "Configuration loaded");

    let gateway = ToolGateway::new(ProcessExecutor::with_config(config.executor_config()));

    match args.command {
        Some(Commands::Serve) => {
            info!("Starting pentest-gateway v{}", env!("CARGO_PKG_VERSION"));
            McpServer::new(gateway).serve_stdio().await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Run {
            operation,
            params,
            json,
        }) => {
            let params: RawParams = params.into_iter().collect();
            let result = gateway.invoke(&operation, &params).await;
            print_result(&result, json)
        }
        Some(Commands::List) => {
            print!("{}", catalog());
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::SystemInfo { json }) => {
            let result = gateway
                .invoke(OperationKind::SystemInfo.name(), &RawParams::new())
                .await;
            print_result(&result, json)
        }
        None => {
            info!("No command specified. Use \"pentest-gateway --help\" for usage.");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file {:?} does not exist", path);
            }
            Config::load_from_path(path)
                .with_context(|| format!("Failed to load config from {:?}", path))
        }
        None => Config::load().context("Failed to load default config"),
    }
}

fn print_result(result: &ToolResult, json: bool) -> Result<ExitCode> {
    if json {
        let out =
            serde_json::to_string_pretty(result).context("Failed to serialize result to JSON")?;
        println!("{}", out);
    } else {
        println!("{}", result.render());
    }

    Ok(if result.succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Human-readable operation catalog
fn catalog() -> String {
    let mut out = String::new();
    for kind in OperationKind::ALL {
        out.push_str(&format!(
            "{} - {} (timeout {}s)\n",
            kind.name(),
            kind.description(),
            kind.timeout().as_secs()
        ));
        for param in kind.parameters() {
            let requirement = match (param.required, param.default) {
                (true, _) => "required".to_string(),
                (false, Some(default)) => format!("default: {}", default),
                (false, None) => "optional".to_string(),
            };
            out.push_str(&format!(
                "    {:<12} {} [{}]\n",
                param.name, param.description, requirement
            ));
        }
    }
    out
}

/// Parse a `key=value` pair; the value may be empty
fn parse_param(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}
