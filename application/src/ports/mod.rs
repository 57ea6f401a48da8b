pub mod llm_gateway;
pub mod school_context;
pub mod tool_executor;
pub mod tool_schema;
