//! Dispatch Query use case.
//!
//! Entry point for one inbound question: validates the request, looks up
//! school context, runs the orchestration loop under the platform deadline
//! and shapes the [`QueryResponse`].

use crate::config::ExecutionParams;
use crate::ports::llm_gateway::GatewayError;
use crate::ports::school_context::SchoolContextPort;
use crate::use_cases::run_orchestration::{
    OrchestrationError, RunOrchestrationInput, RunOrchestrationOutput, RunOrchestrationUseCase,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tutor_domain::{
    AccessKey, CallerId, DEGRADED_ANSWER, DomainError, Platform, QueryRequest, QueryResponse,
    Question, TutorPromptTemplate, normalize_answer, web_context_excerpt,
};

/// Errors returned to the caller.
///
/// Messages from [`QueryError::public_message`] are safe to show; the
/// `Display` form may contain provider detail and is for logs only.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unknown model: {0}")]
    UnknownModel(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(GatewayError),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request cancelled by caller")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl QueryError {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidRequest(_) => "INVALID_REQUEST",
            QueryError::UnknownModel(_) => "UNKNOWN_MODEL",
            QueryError::UpstreamFailure(_) => "UPSTREAM_FAILURE",
            QueryError::Timeout(_) => "TIMEOUT",
            QueryError::Cancelled => "CANCELLED",
            QueryError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Short message without provider payloads.
    pub fn public_message(&self) -> String {
        match self {
            QueryError::InvalidRequest(msg) => msg.clone(),
            QueryError::UnknownModel(id) => format!("Unknown model: {}", id),
            QueryError::UpstreamFailure(_) => {
                "The language model provider is unavailable, please try again later".to_string()
            }
            QueryError::Timeout(_) => "The request took too long to answer".to_string(),
            QueryError::Cancelled => "Request cancelled".to_string(),
            QueryError::Internal(_) => "Internal error".to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            QueryError::InvalidRequest(_) | QueryError::UnknownModel(_)
        )
    }
}

impl From<DomainError> for QueryError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidQuestion(msg) | DomainError::InvalidRequest(msg) => {
                QueryError::InvalidRequest(msg)
            }
            DomainError::UnknownModel(id) => QueryError::UnknownModel(id),
            other => QueryError::Internal(other.to_string()),
        }
    }
}

impl From<OrchestrationError> for QueryError {
    fn from(e: OrchestrationError) -> Self {
        match e {
            OrchestrationError::UnknownModel(id) => QueryError::UnknownModel(id),
            OrchestrationError::Gateway(e) => QueryError::UpstreamFailure(e),
            OrchestrationError::Internal(msg) => QueryError::Internal(msg),
        }
    }
}

/// Raw inbound query, as received from a transport.
#[derive(Debug, Clone, Default)]
pub struct QueryInput {
    pub phone_number: Option<String>,
    pub question: String,
    pub platform: Option<String>,
    pub ai_model: Option<String>,
    pub school_id: Option<String>,
    pub streaming: bool,
    pub access_key: Option<String>,
}

impl QueryInput {
    pub fn new(phone_number: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            phone_number: Some(phone_number.into()),
            question: question.into(),
            ..Default::default()
        }
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.ai_model = Some(model.into());
        self
    }

    pub fn with_school_id(mut self, school_id: impl Into<String>) -> Self {
        self.school_id = Some(school_id.into());
        self
    }
}

/// Use case answering one query end to end.
pub struct DispatchQueryUseCase {
    orchestration: RunOrchestrationUseCase,
    school_context: Arc<dyn SchoolContextPort>,
    execution: ExecutionParams,
}

impl DispatchQueryUseCase {
    pub fn new(
        orchestration: RunOrchestrationUseCase,
        school_context: Arc<dyn SchoolContextPort>,
        execution: ExecutionParams,
    ) -> Self {
        Self {
            orchestration,
            school_context,
            execution,
        }
    }

    pub fn execution(&self) -> &ExecutionParams {
        &self.execution
    }

    /// Validate and normalize raw input.
    ///
    /// Runs before anything else, so invalid input never reaches the model
    /// registry or the provider.
    pub fn validate(&self, input: QueryInput) -> Result<QueryRequest, QueryError> {
        let question = Question::sanitized(&input.question, self.execution.max_question_chars)?;
        let caller = CallerId::new(input.phone_number.unwrap_or_default())?;
        let platform: Platform = input
            .platform
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .and_then(|p| p.parse().ok())
            .unwrap_or_default();

        Ok(QueryRequest::new(caller, question)
            .with_platform(platform)
            .with_model(input.ai_model)
            .with_school_id(input.school_id)
            .with_streaming(input.streaming)
            .with_access_key(input.access_key.filter(|k| !k.is_empty()).map(AccessKey::new)))
    }

    pub async fn execute(
        &self,
        input: QueryInput,
        cancel: &CancellationToken,
    ) -> Result<QueryResponse, QueryError> {
        let started = Instant::now();
        let request = self.validate(input)?;
        let deadline = self.execution.timeout_for(&request.platform);

        info!(
            "Query from {} via {} (model: {}, school: {}, authenticated: {})",
            request.caller_id.masked(),
            request.platform,
            request.requested_model.as_deref().unwrap_or("default"),
            request.school_id.as_deref().unwrap_or("-"),
            request.access_key.is_some()
        );

        let work = self.run(&request);
        let output = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Query from {} cancelled by caller", request.caller_id.masked());
                return Err(QueryError::Cancelled);
            }
            result = tokio::time::timeout(deadline, work) => match result {
                Ok(output) => output?,
                Err(_) => {
                    warn!("Query from {} timed out after {:?}", request.caller_id.masked(), deadline);
                    return Err(QueryError::Timeout(deadline));
                }
            },
        };

        let response = self.shape_response(&request, output, started);
        info!(
            "Answered {} with {} in {} ms (tools: {:?})",
            request.caller_id.masked(),
            response.model_used,
            response.processing_time_ms,
            response.tools_used
        );
        Ok(response)
    }

    async fn run(&self, request: &QueryRequest) -> Result<RunOrchestrationOutput, QueryError> {
        let school_context = match request.school_id.as_deref() {
            Some(id) => match self.school_context.lookup(id).await {
                Ok(context) => context,
                Err(e) => {
                    warn!("School context for {} ignored: {}", id, e);
                    None
                }
            },
            None => None,
        };

        let input = RunOrchestrationInput::new(request.question.clone(), self.execution.clone())
            .with_platform(request.platform.clone())
            .with_model(request.requested_model.clone())
            .with_school_context(school_context)
            .with_streaming(request.streaming);

        Ok(self.orchestration.execute(input).await?)
    }

    fn shape_response(
        &self,
        request: &QueryRequest,
        output: RunOrchestrationOutput,
        started: Instant,
    ) -> QueryResponse {
        let answer = if output.live_data_verified || output.answer == DEGRADED_ANSWER {
            output.answer
        } else {
            TutorPromptTemplate::with_unverified_note(&output.answer)
        };

        let web_search_context = if output.tool_outputs.is_empty() {
            None
        } else {
            Some(web_context_excerpt(
                &output.tool_outputs.join("\n\n"),
                self.execution.context_max_chars,
            ))
        };

        QueryResponse {
            answer: normalize_answer(&answer, &request.platform),
            model_used: output.selection.resolved_model.to_string(),
            model_requested: request.requested_model.clone(),
            tools_used: output.tools_used,
            processing_time_ms: started.elapsed().as_millis() as u64,
            grounding_enabled: output.selection.grounding_enabled,
            web_search_context,
            live_data_verified: output.live_data_verified,
            tool_turns: output.tool_turns,
            degraded: output.degraded,
        }
    }
}
