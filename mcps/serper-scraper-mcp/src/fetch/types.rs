//! Types for HTTP fetch results

use serde::{Deserialize, Serialize};

/// A successfully fetched page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedPage {
    /// URL after following redirects
    pub final_url: String,
    /// Content-Type header value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Response body as text, never empty
    pub body: String,
}
