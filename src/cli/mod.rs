//! CLI entry point for Gantry.

pub mod configure;

use clap::{Parser, Subcommand};

/// Gantry CLI
#[derive(Parser, Debug)]
#[command(
    name = "gantry",
    version,
    about = "Serve any OpenAPI-described HTTP API as a set of MCP tools"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an MCP server from an API description
    Serve(ServeArgs),
    /// List the tools an API description compiles to
    Tools(ToolsArgs),
    /// Write MCP client configuration for this server
    Configure(configure::ConfigureArgs),
}

/// Arguments for the `serve` subcommand.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Description file path or http(s) URL
    pub source: String,

    /// Static header applied to every outbound call (repeatable, "Key=Value")
    #[arg(long = "header")]
    pub headers: Vec<String>,
}

/// Arguments for the `tools` subcommand.
#[derive(Parser, Debug)]
pub struct ToolsArgs {
    /// Description file path or http(s) URL
    pub source: String,
}
