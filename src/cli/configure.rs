//! Client-configuration writers for MCP-capable LLM clients.
//!
//! Pure output formatting: resolve the current executable and the spec
//! path, build a server entry, and merge it into the target client's config
//! file (or print it with `--dry-run`). Unknown keys already present in the
//! file are preserved.

use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::info;

use crate::error::{GantryError, Result};

/// Arguments for the `configure` subcommand.
#[derive(Parser, Debug)]
pub struct ConfigureArgs {
    /// Description file to serve
    pub spec: String,

    /// Name to register the server under
    pub server_name: String,

    /// Target LLM client
    #[arg(long, value_enum, default_value_t = Client::ClaudeDesktop)]
    pub client: Client,

    /// Print the configuration without installing it
    #[arg(long)]
    pub dry_run: bool,

    /// Static header passed through to `serve` (repeatable, "Key=Value")
    #[arg(long = "header")]
    pub headers: Vec<String>,
}

/// Supported target clients.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Client {
    ClaudeDesktop,
    Cursor,
}

/// Run `gantry configure`.
pub fn run(args: &ConfigureArgs) -> Result<()> {
    let spec_path = Path::new(&args.spec);
    if !spec_path.exists() {
        return Err(GantryError::Configuration(format!(
            "spec file does not exist: {}",
            args.spec
        )));
    }
    let spec_abs = spec_path.canonicalize()?;
    let executable = std::env::current_exe()?;

    let entry = server_entry(&executable, &spec_abs, &args.headers);

    if args.dry_run {
        let preview = json!({ "mcpServers": { &args.server_name: entry } });
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    let path = config_path(args.client)?;
    write_entry(&path, &args.server_name, entry)?;
    info!(client = ?args.client, path = %path.display(), "installed MCP server configuration");
    println!(
        "Configured '{}' for {:?} at {}",
        args.server_name,
        args.client,
        path.display()
    );
    Ok(())
}

fn server_entry(executable: &Path, spec: &Path, headers: &[String]) -> serde_json::Value {
    let mut command_args = vec!["serve".to_string(), spec.display().to_string()];
    for header in headers {
        command_args.push("--header".to_string());
        command_args.push(header.clone());
    }
    json!({
        "command": executable.display().to_string(),
        "args": command_args,
    })
}

fn config_path(client: Client) -> Result<PathBuf> {
    let base = directories::BaseDirs::new().ok_or_else(|| {
        GantryError::Configuration("could not determine the home directory".to_string())
    })?;

    Ok(match client {
        Client::ClaudeDesktop => {
            #[cfg(target_os = "macos")]
            {
                base.home_dir()
                    .join("Library/Application Support/Claude/claude_desktop_config.json")
            }
            #[cfg(not(target_os = "macos"))]
            {
                base.config_dir().join("Claude/claude_desktop_config.json")
            }
        }
        Client::Cursor => base.home_dir().join(".cursor/mcp.json"),
    })
}

/// Merge one server entry into the config file at `path`, creating the file
/// and its parent directories when absent.
fn write_entry(path: &Path, server_name: &str, entry: serde_json::Value) -> Result<()> {
    let mut config: serde_json::Value = match std::fs::read(path) {
        Ok(data) => serde_json::from_slice(&data)
            .map_err(|err| GantryError::Configuration(format!(
                "existing config at {} is not valid JSON: {err}",
                path.display()
            )))?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => json!({}),
        Err(err) => return Err(err.into()),
    };

    let root = config.as_object_mut().ok_or_else(|| {
        GantryError::Configuration(format!(
            "existing config at {} is not a JSON object",
            path.display()
        ))
    })?;

    let servers = root
        .entry("mcpServers")
        .or_insert_with(|| json!({}))
        .as_object_mut()
        .ok_or_else(|| {
            GantryError::Configuration(format!(
                "mcpServers in {} is not a JSON object",
                path.display()
            ))
        })?;
    servers.insert(server_name.to_string(), entry);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_vec_pretty(&config)?)?;
    Ok(())
}
