//! MCP server exposing compiled tools over stdio.
//!
//! The server is a thin registration-and-dispatch shell: compilation has
//! already produced the immutable descriptor list, and every call is routed
//! through the shared [`Invoker`]. Engine failures are reported inside the
//! structured result (mirroring the normalized output shape) rather than as
//! protocol errors, so a caller always sees what went wrong with the HTTP
//! side of the call.

use std::collections::HashMap;
use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData, Implementation, ListToolsResult,
    PaginatedRequestParams, ServerCapabilities, ServerInfo, Tool,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler, ServiceExt};
use serde_json::json;
use tracing::{info, warn};

use crate::compiler::ToolDescriptor;
use crate::document::Spec;
use crate::error::{GantryError, Result};
use crate::invoke::Invoker;

/// MCP server handler over a compiled tool list.
pub struct GantryServer {
    title: String,
    version: String,
    tools: Vec<ToolDescriptor>,
    index: HashMap<String, usize>,
    invoker: Invoker,
}

impl GantryServer {
    /// Build a server from a loaded document, its compiled tools, and the
    /// invoker that will execute them.
    pub fn new(spec: &dyn Spec, tools: Vec<ToolDescriptor>, invoker: Invoker) -> Self {
        let title = match spec.title() {
            title if title.is_empty() => "Gantry MCP Server".to_string(),
            title => title,
        };
        let version = match spec.version() {
            version if version.is_empty() => env!("CARGO_PKG_VERSION").to_string(),
            version => version,
        };

        let index = tools
            .iter()
            .enumerate()
            .map(|(i, tool)| (tool.name.clone(), i))
            .collect();

        Self {
            title,
            version,
            tools,
            index,
            invoker,
        }
    }

    /// The compiled descriptors this server exposes.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    fn find_tool(&self, name: &str) -> Option<&ToolDescriptor> {
        self.index.get(name).map(|i| &self.tools[*i])
    }

    fn registered_tools(&self) -> Vec<Tool> {
        self.tools
            .iter()
            .map(|tool| {
                Tool::new(
                    tool.name.clone(),
                    tool.description.clone(),
                    Arc::new(tool.input_schema.to_object_map()),
                )
            })
            .collect()
    }
}

impl ServerHandler for GantryServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "gantry-mcp-server".to_string(),
                title: Some(self.title.clone()),
                version: self.version.clone(),
                ..Default::default()
            },
            instructions: Some(
                "Each tool wraps one HTTP operation of the configured API. \
                 Supply path, query, header, and body fields as sibling keys \
                 of the tool input; the result carries the HTTP status code, \
                 response headers, and the decoded JSON body."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: self.registered_tools(),
            meta: Default::default(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let Some(tool) = self.find_tool(request.name.as_ref()) else {
            return Err(ErrorData::invalid_params(
                format!("unknown tool: {}", request.name),
                None,
            ));
        };

        let input = request.arguments.unwrap_or_default();

        match self.invoker.invoke(tool, &input).await {
            Ok(output) => {
                let value = serde_json::to_value(&output).map_err(|err| {
                    ErrorData::internal_error(
                        format!("failed to encode invocation output: {err}"),
                        None,
                    )
                })?;
                Ok(CallToolResult::structured(value))
            }
            Err(err) => {
                warn!(tool = %tool.name, error = %err, "invocation failed");
                Ok(CallToolResult::structured(json!({
                    "error": err.to_string(),
                })))
            }
        }
    }
}

/// Run the server over stdin/stdout until the client disconnects.
pub async fn serve_stdio(server: GantryServer) -> Result<()> {
    info!(
        tools = server.tools.len(),
        title = %server.title,
        "serving MCP over stdio"
    );

    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .map_err(|err| GantryError::Transport(err.to_string()))?;

    service
        .waiting()
        .await
        .map_err(|err| GantryError::Transport(err.to_string()))?;

    Ok(())
}
