//! Gantry CLI binary entry point.

use clap::Parser;
use gantry::cli::{Cli, Commands, ServeArgs, ToolsArgs};
use gantry::compiler::compile_tools;
use gantry::config::parse_header_args;
use gantry::document::loader::load_from_source;
use gantry::error::Result;
use gantry::invoke::Invoker;
use gantry::mcp::{serve_stdio, GantryServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // stdout carries the MCP wire protocol; logs go to stderr.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => run_serve(args).await,
        Commands::Tools(args) => run_tools(args).await,
        Commands::Configure(args) => gantry::cli::configure::run(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run_serve(args: ServeArgs) -> Result<()> {
    let spec = load_from_source(&args.source).await?;
    let headers = parse_header_args(&args.headers)?;
    let tools = compile_tools(spec.as_ref())?;
    let invoker = Invoker::new(headers)?;
    let server = GantryServer::new(spec.as_ref(), tools, invoker);
    serve_stdio(server).await
}

async fn run_tools(args: ToolsArgs) -> Result<()> {
    let spec = load_from_source(&args.source).await?;
    let tools = compile_tools(spec.as_ref())?;

    println!("{:<4} {:<40} DESCRIPTION", "#", "NAME");
    for (i, tool) in tools.iter().enumerate() {
        println!("{:<4} {:<40} {}", i + 1, tool.name, tool.description);
    }
    Ok(())
}
