//! MCP transport layer: registers compiled tools and dispatches calls.

pub mod server;

pub use server::{serve_stdio, GantryServer};
