//! MCP Common - plumbing shared by the MCP servers in this workspace
//!
//! - **Startup**: [`init_tracing`] and the `serve_stdio!` macro
//! - **Errors**: [`IntoMcpError`] / [`ResultExt`] for turning domain errors into
//!   `rmcp::ErrorData`
//! - **Results**: [`json_success`] and [`text_success`] for tool responses
//! - **Embedding**: [`EmbeddableMcp`] for calling tools in-process
//!
//! ```rust,ignore
//! use mcp_common::json_success;
//!
//! // main.rs
//! mcp_common::serve_stdio!(MyServer::load, "my_mcp");
//!
//! // a tool body
//! fn my_tool(&self) -> Result<CallToolResult, McpError> {
//!     json_success(&self.snapshot())
//! }
//! ```

pub mod embeddable;
pub mod error;
pub mod init;
pub mod result;

pub use embeddable::{EmbeddableError, EmbeddableMcp, EmbeddableResult};
pub use error::{internal_error, invalid_params, invalid_request, IntoMcpError, McpResult, ResultExt};
pub use init::init_tracing;
pub use result::{json_success, text_success};

pub use rmcp::{
    model::{CallToolResult, Content, Tool},
    ErrorData as McpError,
};

pub use async_trait::async_trait;
