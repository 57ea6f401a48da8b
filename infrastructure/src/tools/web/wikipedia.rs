//! `wikipedia_search` tool: encyclopedic lookups on Wikipedia.
//!
//! First asks the REST summary endpoint for a page titled exactly like the
//! query. When there is no such page, falls back to `opensearch` and lists
//! the closest titles.
//!
//! # Parameters
//!
//! | Name | Type | Required | Description |
//! |------|------|:---:|-------------|
//! | `query` | string | Yes | Article title or topic |
//! | `language` | string | No | Wikipedia edition (`pt`, `en`, ...) |
//! | `max_results` | integer | No | Titles listed by the fallback |

use super::super::ToolHandler;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;
use tutor_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolError,
};

/// Canonical tool name for the Wikipedia tool.
pub const WIKIPEDIA_SEARCH: &str = "wikipedia_search";

const MAX_RESULTS_LIMIT: usize = 10;

static LANGUAGE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2,3}(-[a-z]+)?$").expect("valid regex"));

/// Wikipedia-backed encyclopedic search.
pub struct WikipediaTool {
    client: reqwest::Client,
    language: String,
    max_results: usize,
}

impl WikipediaTool {
    pub fn new(client: reqwest::Client, language: impl Into<String>, max_results: usize) -> Self {
        Self {
            client,
            language: language.into(),
            max_results: max_results.clamp(1, MAX_RESULTS_LIMIT),
        }
    }

    fn language_for<'a>(&'a self, call: &'a ToolCall) -> Result<&'a str, ToolError> {
        match call.get_string("language").map(str::trim) {
            None | Some("") => Ok(&self.language),
            Some(lang) if LANGUAGE_CODE.is_match(lang) => Ok(lang),
            Some(lang) => Err(ToolError::invalid_argument(format!(
                "Invalid Wikipedia language code: {}",
                lang
            ))),
        }
    }

    async fn summary(&self, base: &Url, query: &str) -> Result<Option<String>, ToolError> {
        let url = summary_url(base, query)?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            return Ok(None);
        }
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ToolError::execution_failed(format!("Failed to parse response: {}", e)))?;
        Ok(format_summary(&body))
    }

    async fn opensearch(&self, base: &Url, query: &str, limit: usize) -> Result<String, ToolError> {
        let url = base
            .join("w/api.php")
            .map_err(|e| ToolError::execution_failed(format!("Invalid Wikipedia URL: {}", e)))?;
        let limit = limit.to_string();
        let request = self.client.get(url).query(&[
            ("action", "opensearch"),
            ("search", query),
            ("limit", limit.as_str()),
            ("format", "json"),
        ]);
        let body = super::get_json(request).await?;

        format_opensearch(query, &body).ok_or_else(|| {
            ToolError::execution_failed(format!("No Wikipedia article found for '{}'", query))
        })
    }
}

#[async_trait]
impl ToolHandler for WikipediaTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            WIKIPEDIA_SEARCH,
            "Search Wikipedia for encyclopedic information about a topic, person, place or event.",
        )
        .with_parameter(ToolParameter::new("query", "Article title or topic", true))
        .with_parameter(ToolParameter::new(
            "language",
            "Wikipedia language code, e.g. 'pt' or 'en'",
            false,
        ))
        .with_parameter(
            ToolParameter::new("max_results", "Maximum number of articles to list", false)
                .with_type("integer"),
        )
    }

    async fn call(&self, call: &ToolCall) -> Result<String, ToolError> {
        let query = call.require_string("query").map_err(ToolError::invalid_argument)?.trim();
        let language = self.language_for(call)?;
        let limit = call
            .get_i64("max_results")
            .map(|n| n.clamp(1, MAX_RESULTS_LIMIT as i64) as usize)
            .unwrap_or(self.max_results);

        let base = Url::parse(&format!("https://{}.wikipedia.org/", language))
            .map_err(|e| ToolError::execution_failed(format!("Invalid Wikipedia URL: {}", e)))?;

        match self.summary(&base, query).await? {
            Some(summary) => Ok(summary),
            None => self.opensearch(&base, query, limit).await,
        }
    }
}

/// `{base}/api/rest_v1/page/summary/{Title_With_Underscores}`
fn summary_url(base: &Url, query: &str) -> Result<Url, ToolError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ToolError::execution_failed("Wikipedia URL cannot take a path"))?
        .pop_if_empty()
        .extend(["api", "rest_v1", "page", "summary"])
        .push(&query.replace(' ', "_"));
    Ok(url)
}

fn format_summary(data: &serde_json::Value) -> Option<String> {
    let extract = data["extract"].as_str().map(str::trim).filter(|s| !s.is_empty())?;
    let title = data["title"].as_str().unwrap_or_default();

    let mut output = format!("## Wikipedia: {}\n{}", title, extract);
    if let Some(url) = data["content_urls"]["desktop"]["page"].as_str() {
        output.push_str(&format!("\nFonte: {}", url));
    }
    Some(output)
}

/// Opensearch answers `[query, [titles], [snippets], [urls]]`.
fn format_opensearch(query: &str, data: &serde_json::Value) -> Option<String> {
    let titles = data[1].as_array().filter(|t| !t.is_empty())?;

    let lines: Vec<String> = titles
        .iter()
        .enumerate()
        .filter_map(|(i, title)| {
            let title = title.as_str()?;
            let snippet = data[2][i].as_str().unwrap_or_default().trim();
            let url = data[3][i].as_str().unwrap_or_default();
            let mut line = format!("- {}", title);
            if !snippet.is_empty() {
                line.push_str(&format!(": {}", snippet));
            }
            if !url.is_empty() {
                line.push_str(&format!(" ({})", url));
            }
            Some(line)
        })
        .collect();

    if lines.is_empty() {
        return None;
    }
    Some(format!(
        "## Wikipedia: artigos para \"{}\"\n{}",
        query,
        lines.join("\n")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> WikipediaTool {
        WikipediaTool::new(reqwest::Client::new(), "pt", 2)
    }

    #[test]
    fn test_summary_url_encodes_title() {
        let base = Url::parse("https://pt.wikipedia.org/").unwrap();
        let url = summary_url(&base, "Revolução dos Cravos").unwrap();
        assert!(
            url.as_str()
                .starts_with("https://pt.wikipedia.org/api/rest_v1/page/summary/Revolu")
        );
        assert!(url.as_str().ends_with("_dos_Cravos"));
    }

    #[test]
    fn test_format_summary() {
        let data = serde_json::json!({
            "title": "Luís de Camões",
            "extract": "Poeta português, autor de Os Lusíadas.",
            "content_urls": {"desktop": {"page": "https://pt.wikipedia.org/wiki/Lu%C3%ADs_de_Cam%C3%B5es"}}
        });
        let output = format_summary(&data).unwrap();
        assert!(output.starts_with("## Wikipedia: Luís de Camões"));
        assert!(output.contains("Os Lusíadas"));
        assert!(output.contains("Fonte: https://pt.wikipedia.org/wiki/"));
    }

    #[test]
    fn test_format_summary_without_extract() {
        let data = serde_json::json!({"title": "Página", "extract": ""});
        assert!(format_summary(&data).is_none());
    }

    #[test]
    fn test_format_opensearch() {
        let data = serde_json::json!([
            "camoes",
            ["Luís de Camões", "Prémio Camões"],
            ["", "Prémio literário"],
            ["https://pt.wikipedia.org/wiki/A", "https://pt.wikipedia.org/wiki/B"]
        ]);
        let output = format_opensearch("camoes", &data).unwrap();
        assert!(output.contains("- Luís de Camões (https://pt.wikipedia.org/wiki/A)"));
        assert!(output.contains("- Prémio Camões: Prémio literário (https://pt.wikipedia.org/wiki/B)"));
    }

    #[test]
    fn test_format_opensearch_empty() {
        let data = serde_json::json!(["xyzzy", [], [], []]);
        assert!(format_opensearch("xyzzy", &data).is_none());
    }

    #[test]
    fn test_language_argument() {
        let tool = tool();
        let default = ToolCall::new(WIKIPEDIA_SEARCH).with_arg("query", "Lisboa");
        assert_eq!(tool.language_for(&default).unwrap(), "pt");

        let english = default.clone().with_arg("language", "en");
        assert_eq!(tool.language_for(&english).unwrap(), "en");

        let hostile = default.with_arg("language", "evil.com/");
        assert_eq!(
            tool.language_for(&hostile).unwrap_err().code,
            ToolError::INVALID_ARGUMENT
        );
    }

    #[test]
    fn test_max_results_is_clamped() {
        let tool = WikipediaTool::new(reqwest::Client::new(), "pt", 50);
        assert_eq!(tool.max_results, MAX_RESULTS_LIMIT);
    }
}
