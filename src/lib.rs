//! Gantry — serve any OpenAPI-described HTTP API as a set of MCP tools.
//!
//! Pipeline: load a description document (Swagger 2.0 or OpenAPI 3.x),
//! compile every operation into a [`compiler::ToolDescriptor`], then either
//! list the descriptors or serve them over MCP stdio, with each call
//! dispatched as one real HTTP request by the [`invoke::Invoker`].
//!
//! # Quick Start
//!
//! ```no_run
//! # async fn example() -> gantry::error::Result<()> {
//! let spec = gantry::document::loader::load_from_source("./openapi.json").await?;
//! let tools = gantry::compiler::compile_tools(spec.as_ref())?;
//! for tool in &tools {
//!     println!("{}: {}", tool.name, tool.description);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod compiler;
pub mod config;
pub mod document;
pub mod error;
pub mod invoke;
pub mod mcp;
pub mod schema;
