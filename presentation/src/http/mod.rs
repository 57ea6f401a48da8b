//! HTTP API
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/v1/query` | Answer one question |
//! | `GET` | `/health` | Liveness probe |

mod dto;
mod error;
mod routes;
mod state;

pub use dto::{QueryRequestDto, QueryResponseDto};
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
