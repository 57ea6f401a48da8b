//! Wire types of the query endpoint

use serde::{Deserialize, Serialize};
use tutor_application::QueryInput;
use tutor_domain::QueryResponse;

/// Body of `POST /api/v1/query`.
///
/// Every field is optional at the JSON level; missing or blank values are
/// rejected by request validation with a proper error body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryRequestDto {
    pub phone_number: Option<String>,
    pub question: String,
    /// `web` when absent
    pub platform: Option<String>,
    pub ai_model: Option<String>,
    pub school_id: Option<String>,
    pub streaming: bool,
}

impl QueryRequestDto {
    /// Combine the body with the opaque `x-api-key` header value.
    pub fn into_input(self, access_key: Option<String>) -> QueryInput {
        QueryInput {
            phone_number: self.phone_number,
            question: self.question,
            platform: self.platform,
            ai_model: self.ai_model,
            school_id: self.school_id,
            streaming: self.streaming,
            access_key,
        }
    }
}

/// Success body: the response fields plus `canRespond: true`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponseDto {
    #[serde(flatten)]
    pub response: QueryResponse,
    pub can_respond: bool,
}

impl From<QueryResponse> for QueryResponseDto {
    fn from(response: QueryResponse) -> Self {
        Self {
            response,
            can_respond: true,
        }
    }
}
