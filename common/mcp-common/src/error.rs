//! Conversions from domain errors into MCP errors

use rmcp::ErrorData as McpError;

/// Result of an MCP tool body
pub type McpResult<T> = Result<T, McpError>;

/// Conversion into the error type rmcp tools return.
///
/// Servers implement this for their own error enums to pick an MCP error
/// code per variant; the impls below cover the common foreign errors.
pub trait IntoMcpError {
    fn into_mcp_error(self) -> McpError;
}

impl IntoMcpError for serde_json::Error {
    fn into_mcp_error(self) -> McpError {
        internal_error(format!("JSON error: {self}"))
    }
}

impl IntoMcpError for anyhow::Error {
    fn into_mcp_error(self) -> McpError {
        internal_error(format!("{self:#}"))
    }
}

impl IntoMcpError for String {
    fn into_mcp_error(self) -> McpError {
        internal_error(self)
    }
}

/// `.to_mcp_err()` on any `Result` whose error implements [`IntoMcpError`]
pub trait ResultExt<T> {
    fn to_mcp_err(self) -> McpResult<T>;
}

impl<T, E: IntoMcpError> ResultExt<T> for Result<T, E> {
    fn to_mcp_err(self) -> McpResult<T> {
        self.map_err(IntoMcpError::into_mcp_error)
    }
}

/// Internal server error with a message
pub fn internal_error(message: impl Into<String>) -> McpError {
    McpError::internal_error(message.into(), None)
}

/// The caller passed parameters the tool cannot work with
pub fn invalid_params(message: impl Into<String>) -> McpError {
    McpError::invalid_params(message.into(), None)
}

/// The request is well-formed but the server is not set up to serve it
pub fn invalid_request(message: impl Into<String>) -> McpError {
    McpError::invalid_request(message.into(), None)
}
