//! Local tool executor, the concrete implementation of [`ToolExecutorPort`].
//!
//! # Execution path
//!
//! ```text
//! execute(call)
//!   ├─ resolve name (aliases)      → NOT_FOUND when unknown
//!   ├─ validate required arguments → INVALID_ARGUMENT
//!   ├─ timeout(permit + handler)   → TIMEOUT
//!   └─ truncate output to summary_max_chars
//! ```
//!
//! The timeout covers the wait for a concurrency permit, so a saturated tool
//! cannot stall a request past the configured deadline.

use super::ToolHandler;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use tutor_application::ports::tool_executor::ToolExecutorPort;
use tutor_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    traits::{DefaultToolValidator, ToolValidator},
    value_objects::{ToolError, ToolResult},
};

/// Limits applied to every tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolSettings {
    pub timeout: Duration,
    /// Concurrent calls per tool, shared across requests
    pub max_concurrent_calls: usize,
    pub summary_max_chars: usize,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(8),
            max_concurrent_calls: 4,
            summary_max_chars: 2000,
        }
    }
}

struct RegisteredTool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
    permits: Arc<Semaphore>,
}

/// Executor over a set of registered [`ToolHandler`]s.
pub struct LocalToolExecutor {
    tool_spec: ToolSpec,
    tools: HashMap<String, RegisteredTool>,
    settings: ToolSettings,
}

impl LocalToolExecutor {
    pub fn new(settings: ToolSettings) -> Self {
        Self {
            tool_spec: ToolSpec::new(),
            tools: HashMap::new(),
            settings,
        }
    }

    /// Register a handler under its definition's name.
    pub fn with_handler(mut self, handler: Arc<dyn ToolHandler>) -> Self {
        let definition = handler.definition();
        self.tool_spec = std::mem::take(&mut self.tool_spec).register(definition.clone());
        self.tools.insert(
            definition.name.clone(),
            RegisteredTool {
                definition,
                handler,
                permits: Arc::new(Semaphore::new(self.settings.max_concurrent_calls.max(1))),
            },
        );
        self
    }

    /// Register [`default_aliases`](super::default_aliases).
    ///
    /// Aliases pointing at tools that are not registered never resolve.
    pub fn with_default_aliases(mut self) -> Self {
        self.tool_spec = std::mem::take(&mut self.tool_spec).register_aliases(super::default_aliases());
        self
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    async fn run(&self, tool: &RegisteredTool, call: &ToolCall) -> Result<String, ToolError> {
        let work = async {
            let _permit = tool
                .permits
                .acquire()
                .await
                .map_err(|_| ToolError::execution_failed("tool is shutting down"))?;
            tool.handler.call(call).await
        };

        match tokio::time::timeout(self.settings.timeout, work).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ToolError::timeout(&tool.definition.name).with_details(format!(
                "after {}ms",
                self.settings.timeout.as_millis()
            ))),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let started = Instant::now();

        let Some(tool) = self
            .tool_spec
            .resolve(&call.tool_name)
            .and_then(|canonical| self.tools.get(canonical))
        else {
            warn!(tool = %call.tool_name, "Model requested an unsupported tool");
            return ToolResult::failure(&call.tool_name, ToolError::unsupported_tool(&call.tool_name))
                .for_call(&call.call_id);
        };
        let name = tool.definition.name.as_str();

        if let Err(e) = DefaultToolValidator.validate(call, &tool.definition) {
            return ToolResult::failure(name, ToolError::invalid_argument(e)).for_call(&call.call_id);
        }

        let result = match self.run(tool, call).await {
            Ok(output) => {
                ToolResult::success(name, output).truncated_to(self.settings.summary_max_chars)
            }
            Err(error) => {
                warn!(tool = name, error = %error, "Tool call failed");
                ToolResult::failure(name, error)
            }
        };

        let elapsed = started.elapsed().as_millis() as u64;
        debug!(
            tool = name,
            requested_as = %call.tool_name,
            success = result.is_success(),
            duration_ms = elapsed,
            "Tool call finished"
        );
        result.with_duration(elapsed).for_call(&call.call_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tutor_domain::tool::entities::ToolParameter;

    /// Echoes its query after an optional delay, tracking peak concurrency.
    struct EchoTool {
        delay: Duration,
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    impl EchoTool {
        fn new(delay: Duration) -> Self {
            Self {
                delay,
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ToolHandler for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("web_search", "Echo search")
                .with_parameter(ToolParameter::new("query", "Search query", true))
        }

        async fn call(&self, call: &ToolCall) -> Result<String, ToolError> {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.active.fetch_sub(1, Ordering::SeqCst);

            let query = call.require_string("query").map_err(ToolError::invalid_argument)?;
            if query == "fail" {
                return Err(ToolError::execution_failed("backend unavailable"));
            }
            Ok(format!("results for {}", query))
        }
    }

    fn executor(settings: ToolSettings, tool: Arc<EchoTool>) -> LocalToolExecutor {
        LocalToolExecutor::new(settings)
            .with_handler(tool)
            .with_default_aliases()
    }

    fn search(query: &str) -> ToolCall {
        ToolCall::new("web_search")
            .with_call_id("call_1")
            .with_arg("query", query)
    }

    #[tokio::test]
    async fn test_successful_call() {
        let exec = executor(ToolSettings::default(), Arc::new(EchoTool::new(Duration::ZERO)));
        let result = exec.execute(&search("fotossíntese")).await;

        assert!(result.is_success());
        assert_eq!(result.output(), Some("results for fotossíntese"));
        assert_eq!(result.call_id, "call_1");
        assert!(result.metadata.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_alias_resolves_to_canonical_tool() {
        let exec = executor(ToolSettings::default(), Arc::new(EchoTool::new(Duration::ZERO)));
        assert_eq!(exec.tool_spec().resolve("duckduckgo_search"), Some("web_search"));
        assert_eq!(exec.tool_spec().resolve("wikipedia"), None);

        let call = ToolCall::new("news_search").with_arg("query", "eleições");
        let result = exec.execute(&call).await;
        assert!(result.is_success());
        assert_eq!(result.tool_name, "web_search");
    }

    #[tokio::test]
    async fn test_unknown_tool_is_not_found() {
        let exec = executor(ToolSettings::default(), Arc::new(EchoTool::new(Duration::ZERO)));
        let call = ToolCall::new("calculator").with_call_id("c9");
        let result = exec.execute(&call).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, ToolError::NOT_FOUND);
        assert_eq!(result.call_id, "c9");
    }

    #[tokio::test]
    async fn test_missing_argument_is_invalid() {
        let exec = executor(ToolSettings::default(), Arc::new(EchoTool::new(Duration::ZERO)));
        let result = exec.execute(&ToolCall::new("web_search")).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, ToolError::INVALID_ARGUMENT);
    }

    #[tokio::test]
    async fn test_handler_error_becomes_failure() {
        let exec = executor(ToolSettings::default(), Arc::new(EchoTool::new(Duration::ZERO)));
        let result = exec.execute(&search("fail")).await;

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, ToolError::EXECUTION_FAILED);
    }

    #[tokio::test]
    async fn test_slow_tool_times_out() {
        let settings = ToolSettings {
            timeout: Duration::from_millis(20),
            ..Default::default()
        };
        let exec = executor(settings, Arc::new(EchoTool::new(Duration::from_millis(500))));
        let result = exec.execute(&search("lento")).await;

        assert!(!result.is_success());
        assert!(result.error().unwrap().is_timeout());
    }

    #[tokio::test]
    async fn test_output_is_truncated() {
        let settings = ToolSettings {
            summary_max_chars: 10,
            ..Default::default()
        };
        let exec = executor(settings, Arc::new(EchoTool::new(Duration::ZERO)));
        let result = exec.execute(&search("uma pergunta bastante longa")).await;

        assert!(result.metadata.truncated);
        assert_eq!(result.output().unwrap().chars().count(), 11);
    }

    #[tokio::test]
    async fn test_concurrency_is_capped_per_tool() {
        let settings = ToolSettings {
            max_concurrent_calls: 2,
            ..Default::default()
        };
        let tool = Arc::new(EchoTool::new(Duration::from_millis(30)));
        let exec = executor(settings, tool.clone());

        let calls: Vec<_> = (0..6).map(|i| search(&format!("q{}", i))).collect();
        let results = futures::future::join_all(calls.iter().map(|c| exec.execute(c))).await;

        assert!(results.iter().all(|r| r.is_success()));
        assert_eq!(tool.peak.load(Ordering::SeqCst), 2);
    }

    struct HeadlineTool;

    #[async_trait]
    impl ToolHandler for HeadlineTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("news_search", "Headlines")
                .with_parameter(ToolParameter::new("query", "Topic", true))
        }

        async fn call(&self, call: &ToolCall) -> Result<String, ToolError> {
            Ok(format!("headlines for {}", call.get_string("query").unwrap_or_default()))
        }
    }

    #[tokio::test]
    async fn test_registered_news_tool_wins_over_alias() {
        let exec = executor(ToolSettings::default(), Arc::new(EchoTool::new(Duration::ZERO)))
            .with_handler(Arc::new(HeadlineTool));

        let call = ToolCall::new("news_search").with_arg("query", "eleições");
        let result = exec.execute(&call).await;
        assert_eq!(result.tool_name, "news_search");
        assert_eq!(result.output(), Some("headlines for eleições"));

        let result = exec.execute(&ToolCall::new("current_events").with_arg("query", "x")).await;
        assert_eq!(result.tool_name, "web_search");
    }
}
