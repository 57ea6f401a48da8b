//! `news_search` tool: recent headlines through the DuckDuckGo API.
//!
//! The query is prefixed with `latest news` so DuckDuckGo favours recent
//! coverage. Related topics become headlines: the title is the topic text up
//! to the first ` - `, the source is the link's host.
//!
//! ## Arguments
//!
//! | Name | Type | Required | Description |
//! |------|------|----------|-------------|
//! | `query` | string | Yes | What to look up |
//! | `max_results` | integer | No | Headlines to return (1-10) |

use super::super::ToolHandler;
use async_trait::async_trait;
use reqwest::Url;
use tutor_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolError,
};

/// Canonical tool name for the news search tool.
pub const NEWS_SEARCH: &str = "news_search";

const MAX_RESULTS_LIMIT: usize = 10;

/// DuckDuckGo-backed headline search.
pub struct NewsSearchTool {
    client: reqwest::Client,
    endpoint: String,
    max_results: usize,
}

impl NewsSearchTool {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, max_results: usize) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            max_results: max_results.clamp(1, MAX_RESULTS_LIMIT),
        }
    }
}

#[async_trait]
impl ToolHandler for NewsSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            NEWS_SEARCH,
            "Search recent news headlines about a person, event or topic.",
        )
        .with_parameter(ToolParameter::new("query", "What to look up in the news", true))
        .with_parameter(
            ToolParameter::new("max_results", "Maximum number of headlines", false)
                .with_type("integer"),
        )
    }

    async fn call(&self, call: &ToolCall) -> Result<String, ToolError> {
        let query = call.require_string("query").map_err(ToolError::invalid_argument)?;
        let max_results = call
            .get_i64("max_results")
            .map(|n| n.clamp(1, MAX_RESULTS_LIMIT as i64) as usize)
            .unwrap_or(self.max_results);

        let search = format!("latest news {}", query.trim());
        let request = self.client.get(&self.endpoint).query(&[
            ("q", search.as_str()),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ]);
        let body = super::get_json(request).await?;

        let headlines = collect_headlines(&body, max_results);
        if headlines.is_empty() {
            return Err(ToolError::execution_failed(format!(
                "No headlines for '{}'",
                query
            )));
        }
        Ok(format_headlines(query, &headlines))
    }
}

#[derive(Debug, PartialEq)]
struct Headline {
    title: String,
    description: String,
    url: String,
    source: String,
}

fn collect_headlines(data: &serde_json::Value, limit: usize) -> Vec<Headline> {
    let mut topics = Vec::new();
    if let Some(related) = data["RelatedTopics"].as_array() {
        for item in related {
            match item["Topics"].as_array() {
                Some(nested) => topics.extend(nested),
                None => topics.push(item),
            }
        }
    }

    topics
        .into_iter()
        .filter_map(|topic| {
            let text = topic["Text"].as_str().map(str::trim).unwrap_or_default();
            let title = text.split(" - ").next().unwrap_or_default().trim();
            if title.is_empty() {
                return None;
            }
            let url = topic["FirstURL"].as_str().unwrap_or_default();
            Some(Headline {
                title: title.to_string(),
                description: text.to_string(),
                url: url.to_string(),
                source: source_domain(url),
            })
        })
        .take(limit)
        .collect()
}

fn source_domain(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| url.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_default()
}

fn format_headlines(query: &str, headlines: &[Headline]) -> String {
    let mut out = format!("## Notícias: {}\n", query);
    for (i, h) in headlines.iter().enumerate() {
        out.push_str(&format!("\n{}. **{}**", i + 1, h.title));
        if !h.source.is_empty() {
            out.push_str(&format!(" ({})", h.source));
        }
        if h.description != h.title {
            out.push_str(&format!("\n   {}", h.description));
        }
        if !h.url.is_empty() {
            out.push_str(&format!("\n   {}", h.url));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> serde_json::Value {
        serde_json::json!({
            "RelatedTopics": [
                {"Text": "Eleições 2025 - resultados finais", "FirstURL": "https://www.publico.pt/eleicoes"},
                {
                    "Name": "Mais",
                    "Topics": [
                        {"Text": "Debate televisivo", "FirstURL": "https://rtp.pt/debate"},
                        {"Text": ""}
                    ]
                },
                {"Text": "Sondagem de março", "FirstURL": "not a url"}
            ]
        })
    }

    #[test]
    fn test_headlines_flatten_and_split_title() {
        let headlines = collect_headlines(&sample(), 10);
        assert_eq!(headlines.len(), 3);
        assert_eq!(headlines[0].title, "Eleições 2025");
        assert_eq!(headlines[0].description, "Eleições 2025 - resultados finais");
        assert_eq!(headlines[0].source, "publico.pt");
        assert_eq!(headlines[1].title, "Debate televisivo");
        assert_eq!(headlines[1].source, "rtp.pt");
        assert_eq!(headlines[2].source, "");
    }

    #[test]
    fn test_headlines_respect_limit() {
        assert_eq!(collect_headlines(&sample(), 1).len(), 1);
    }

    #[test]
    fn test_no_topics_is_empty() {
        let data = serde_json::json!({"AbstractText": "Só um resumo", "RelatedTopics": []});
        assert!(collect_headlines(&data, 5).is_empty());
    }

    #[test]
    fn test_format_headlines() {
        let headlines = collect_headlines(&sample(), 2);
        let output = format_headlines("eleições", &headlines);
        assert!(output.starts_with("## Notícias: eleições"));
        assert!(output.contains("1. **Eleições 2025** (publico.pt)\n   Eleições 2025 - resultados finais"));
        assert!(output.contains("2. **Debate televisivo** (rtp.pt)\n   https://rtp.pt/debate"));
    }

    #[test]
    fn test_definition_and_clamp() {
        let tool = NewsSearchTool::new(reqwest::Client::new(), "https://api.duckduckgo.com/", 0);
        assert_eq!(tool.max_results, 1);

        let definition = tool.definition();
        assert_eq!(definition.name, NEWS_SEARCH);
        assert!(definition.parameters.iter().any(|p| p.name == "query" && p.required));
    }
}
