//! Server startup: tracing setup and the `serve_stdio!` macro

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Output format for log lines, selected with `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT`; anything other than `json` means plain text
    pub fn from_env() -> Self {
        match std::env::var("LOG_FORMAT") {
            Ok(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Initialize tracing for an MCP server.
///
/// Logs go to stderr because stdout carries the MCP protocol. `RUST_LOG`
/// controls filtering; `<crate_name>=info` is always added so the server's own
/// events show up without extra setup.
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(format!("{crate_name}=info").parse()?);
    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_env() {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?,
        LogFormat::Text => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?,
    }

    Ok(())
}

/// Generate `main` for a stdio MCP server.
///
/// `$constructor` is called with no arguments and must return
/// `Result<Server, E>` where `E` converts into `anyhow::Error`, so servers that
/// load config at startup fail before the transport is opened.
///
/// ```rust,ignore
/// mcp_common::serve_stdio!(MyServer::load, "my_mcp");
/// ```
#[macro_export]
macro_rules! serve_stdio {
    ($constructor:path, $crate_name:expr) => {
        #[tokio::main]
        async fn main() -> anyhow::Result<()> {
            use rmcp::ServiceExt;

            $crate::init_tracing($crate_name)?;
            tracing::info!(concat!("Starting ", $crate_name, " MCP Server"));

            let server = $constructor()?;
            let service = server.serve(rmcp::transport::stdio()).await?;

            tracing::info!("Server running, waiting for requests...");
            service.waiting().await?;

            tracing::info!("Server shutting down");
            Ok(())
        }
    };
}
