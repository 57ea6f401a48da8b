//! **Web Tools**: `web_search`, `news_search` and `wikipedia_search`
//!
//! | Tool | Description | Backend |
//! |------|-------------|---------|
//! | `web_search` | Instant answers, abstracts and related topics | DuckDuckGo |
//! | `news_search` | Recent headlines | DuckDuckGo |
//! | `wikipedia_search` | Article summary, with title search as fallback | Wikipedia REST |
//!
//! All share one `reqwest::Client`. The client has no timeout of its own;
//! the executor bounds each call.

mod news;
mod search;
mod wikipedia;

pub use news::{NEWS_SEARCH, NewsSearchTool};
pub use search::{WEB_SEARCH, WebSearchTool};
pub use wikipedia::{WIKIPEDIA_SEARCH, WikipediaTool};

use tutor_domain::tool::value_objects::ToolError;

/// Build the HTTP client shared by the web tools.
pub fn http_client(user_agent: &str) -> Result<reqwest::Client, ToolError> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| ToolError::execution_failed(format!("Failed to create HTTP client: {}", e)))
}

/// Fetch `request` and decode the JSON body.
async fn get_json(request: reqwest::RequestBuilder) -> Result<serde_json::Value, ToolError> {
    let response = request
        .send()
        .await
        .map_err(|e| ToolError::execution_failed(format!("Request failed: {}", e)))?;

    if !response.status().is_success() {
        return Err(ToolError::execution_failed(format!(
            "API returned error: {}",
            response.status()
        )));
    }

    response
        .json()
        .await
        .map_err(|e| ToolError::execution_failed(format!("Failed to parse response: {}", e)))
}
