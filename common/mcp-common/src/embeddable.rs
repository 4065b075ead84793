//! In-process tool execution
//!
//! [`EmbeddableMcp`] lets a host (or a test) call a server's tools directly,
//! without a stdio transport in between.
//!
//! ```rust,ignore
//! use mcp_common::EmbeddableMcp;
//!
//! let server = MyServer::load()?;
//! let result = server.call_tool("scrape", serde_json::json!({ "url": "https://example.com" })).await?;
//! ```

use async_trait::async_trait;
use rmcp::model::{CallToolResult, Tool};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddableError {
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Parameters did not deserialize into the tool's parameter type
    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    /// The tool itself returned an MCP error
    #[error("mcp error: {0}")]
    McpError(String),
}

impl From<rmcp::ErrorData> for EmbeddableError {
    fn from(err: rmcp::ErrorData) -> Self {
        EmbeddableError::McpError(err.message.to_string())
    }
}

pub type EmbeddableResult<T> = Result<T, EmbeddableError>;

/// An MCP server whose tools can be invoked in-process.
///
/// Implementations must be `Send + Sync`; hosts call tools concurrently.
/// Servers built with `#[tool_router]` typically return
/// `self.tool_router.list_all()` from [`list_tools`](Self::list_tools) and
/// dispatch [`call_tool`](Self::call_tool) on the tool name.
#[async_trait]
pub trait EmbeddableMcp: Send + Sync {
    /// Name used in MCP configuration files
    fn server_name(&self) -> &str;

    fn list_tools(&self) -> Vec<Tool>;

    /// Run the tool `name` with a JSON object of parameters
    async fn call_tool(&self, name: &str, params: Value) -> EmbeddableResult<CallToolResult>;

    fn server_description(&self) -> Option<&str> {
        None
    }

    fn server_version(&self) -> Option<&str> {
        None
    }
}
