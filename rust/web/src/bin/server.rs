//! Card API server.
//!
//! Usage: cargo run -p tarot_web --bin tarot-web-server -- [OPTIONS]

use std::process::ExitCode;
use tarot_web::{config, init_logging, ConfigResolved, WebServer};

const USAGE: &str = "\
Tarot card API server

Usage: tarot-web-server [OPTIONS]

Options:
  --host, -h <HOST>   Host to bind to (default: 0.0.0.0, env HOST)
  --port, -p <PORT>   Port to bind to (default: 5001, env PORT)
  --print-config      Print the resolved configuration as JSON and exit
  --help              Show this help message

Environment:
  DATABASE_URL         SQLite database, e.g. sqlite://tarot.db (required)
  CORS_ORIGIN          Comma-separated allowed origins (default: http://localhost:5173)
  TAROT_DAILY_VARIANT  hashed | legacy (default: hashed)
  TAROT_LOG_FORMAT     pretty | json (default: pretty)
  TAROT_CONFIG         Optional TOML file read before the environment";

struct Args {
    host: Option<String>,
    port: Option<u16>,
    print_config: bool,
}

fn parse_args(args: &[String]) -> Result<Option<Args>, String> {
    let mut parsed = Args {
        host: None,
        port: None,
        print_config: false,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--host" | "-h" => {
                let value = iter.next().ok_or("--host requires a value")?;
                parsed.host = Some(value.clone());
            }
            "--port" | "-p" => {
                let value = iter.next().ok_or("--port requires a value")?;
                let port = value
                    .parse()
                    .map_err(|_| format!("invalid port number `{value}`"))?;
                parsed.port = Some(port);
            }
            "--print-config" => parsed.print_config = true,
            "--help" => return Ok(None),
            other => return Err(format!("unknown argument `{other}`")),
        }
    }

    Ok(Some(parsed))
}

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = match parse_args(&args) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(message) => {
            eprintln!("Error: {message}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let mut resolved: ConfigResolved = match config::load() {
        Ok(resolved) => resolved,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::from(2);
        }
    };
    if let Some(host) = args.host {
        resolved.override_host(host);
    }
    if let Some(port) = args.port {
        resolved.override_port(port);
    }

    if args.print_config {
        match serde_json::to_string_pretty(&resolved.to_json()) {
            Ok(json) => {
                println!("{json}");
                return ExitCode::SUCCESS;
            }
            Err(err) => {
                eprintln!("Error: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    if let Err(err) = init_logging(resolved.config.log_format()) {
        eprintln!("Error: failed to initialise logging: {err}");
        return ExitCode::FAILURE;
    }

    match run(resolved).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "server failed");
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(resolved: ConfigResolved) -> Result<(), Box<dyn std::error::Error>> {
    let config = resolved.config;
    tracing::info!(
        host = config.host(),
        port = config.port(),
        daily_variant = %config.daily_variant(),
        cors_origins = ?config.cors_origins(),
        "starting card api"
    );

    let handle = WebServer::new(config)?.start().await?;
    println!("Card API running at http://{}", handle.address());

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down");
    handle.shutdown().await?;
    Ok(())
}
