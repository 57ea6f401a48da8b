//! Query request/response value types and response shaping.

pub mod format;
pub mod request;
pub mod response;
