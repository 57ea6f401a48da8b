//! `web_search` tool: search the web using the DuckDuckGo Instant Answer API.
//!
//! The API needs no key and returns instant answers, abstracts, definitions
//! and related topics rather than a full result listing.
//!
//! # Output Format
//!
//! Markdown with Portuguese section headings:
//! - **Resumo**: abstract text with source attribution
//! - **Resposta**: direct factual answers
//! - **Definição**: dictionary-style definitions
//! - **Tópicos relacionados**: up to 5 related topics, nested groups flattened
//!
//! A response with none of these is reported as a failure so the loop can
//! mark the answer as unverified.

use super::super::ToolHandler;
use async_trait::async_trait;
use tutor_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolParameter},
    value_objects::ToolError,
};

/// Canonical tool name for the web search tool.
pub const WEB_SEARCH: &str = "web_search";

const MAX_RELATED_TOPICS: usize = 5;

/// DuckDuckGo-backed web search.
pub struct WebSearchTool {
    client: reqwest::Client,
    endpoint: String,
}

impl WebSearchTool {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ToolHandler for WebSearchTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            WEB_SEARCH,
            "Search the web for current information: news, recent events, dates, prices, \
             sports results. Returns instant answers, abstracts and related topics.",
        )
        .with_parameter(ToolParameter::new("query", "The search query", true))
    }

    async fn call(&self, call: &ToolCall) -> Result<String, ToolError> {
        let query = call.require_string("query").map_err(ToolError::invalid_argument)?;

        let request = self.client.get(&self.endpoint).query(&[
            ("q", query),
            ("format", "json"),
            ("no_html", "1"),
            ("skip_disambig", "1"),
        ]);
        let body = super::get_json(request).await?;

        format_search_results(query, &body).ok_or_else(|| {
            ToolError::execution_failed(format!("No instant answer for '{}'", query))
        })
    }
}

fn non_empty<'a>(data: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    data[key].as_str().map(str::trim).filter(|s| !s.is_empty())
}

/// Collect topic texts, descending into `{"Name", "Topics": [...]}` groups.
fn collect_topics(topics: &[serde_json::Value], out: &mut Vec<String>) {
    for topic in topics {
        if out.len() >= MAX_RELATED_TOPICS {
            return;
        }
        if let Some(text) = non_empty(topic, "Text") {
            match non_empty(topic, "FirstURL") {
                Some(url) => out.push(format!("- {} ({})", text, url)),
                None => out.push(format!("- {}", text)),
            }
        } else if let Some(nested) = topic["Topics"].as_array() {
            collect_topics(nested, out);
        }
    }
}

/// Format a DuckDuckGo response; `None` when it carries no content.
fn format_search_results(query: &str, data: &serde_json::Value) -> Option<String> {
    let mut sections: Vec<String> = Vec::new();

    if let Some(abstract_text) = non_empty(data, "AbstractText") {
        let source = non_empty(data, "AbstractSource").unwrap_or("desconhecida");
        let mut section = format!("### Resumo ({})\n{}", source, abstract_text);
        if let Some(url) = non_empty(data, "AbstractURL") {
            section.push_str(&format!("\nFonte: {}", url));
        }
        sections.push(section);
    }

    if let Some(answer) = non_empty(data, "Answer") {
        sections.push(format!("### Resposta\n{}", answer));
    }

    if let Some(definition) = non_empty(data, "Definition") {
        let source = non_empty(data, "DefinitionSource").unwrap_or("desconhecida");
        sections.push(format!("### Definição ({})\n{}", source, definition));
    }

    if let Some(topics) = data["RelatedTopics"].as_array() {
        let mut lines = Vec::new();
        collect_topics(topics, &mut lines);
        if !lines.is_empty() {
            sections.push(format!("### Tópicos relacionados\n{}", lines.join("\n")));
        }
    }

    if sections.is_empty() {
        return None;
    }

    sections.insert(0, format!("## Resultados para: {}", query));
    Some(sections.join("\n\n"))
}
