//! Inbound query request

use crate::core::{error::DomainError, question::Question};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of the caller, usually a phone number.
///
/// Callers without a persistent account (tests, the web playground) use
/// [`CallerId::ANONYMOUS`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallerId(String);

impl CallerId {
    pub const ANONYMOUS: &'static str = "anonymous";

    /// Build a caller id, rejecting blank input
    pub fn new(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(DomainError::InvalidRequest(
                "caller id (phoneNumber) is required".to_string(),
            ));
        }
        Ok(Self(id))
    }

    pub fn anonymous() -> Self {
        Self(Self::ANONYMOUS.to_string())
    }

    pub fn is_anonymous(&self) -> bool {
        self.0 == Self::ANONYMOUS
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Form safe for logs: keeps only the last four characters.
    pub fn masked(&self) -> String {
        if self.is_anonymous() {
            return self.0.clone();
        }
        let chars: Vec<char> = self.0.chars().collect();
        let visible = chars.len().min(4);
        let tail: String = chars[chars.len() - visible..].iter().collect();
        format!("***{}", tail)
    }
}

impl std::fmt::Display for CallerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Channel the question arrived on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Platform {
    #[default]
    Web,
    Whatsapp,
    Discord,
    /// Any other channel tag, lowercased
    Other(String),
}

impl Platform {
    pub fn as_str(&self) -> &str {
        match self {
            Platform::Web => "web",
            Platform::Whatsapp => "whatsapp",
            Platform::Discord => "discord",
            Platform::Other(tag) => tag,
        }
    }

    /// Messaging channels render a reduced markdown dialect.
    pub fn is_messaging(&self) -> bool {
        matches!(self, Platform::Whatsapp | Platform::Discord)
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Ok(match tag.as_str() {
            "" | "web" => Platform::Web,
            "whatsapp" => Platform::Whatsapp,
            "discord" => Platform::Discord,
            _ => Platform::Other(tag),
        })
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for Platform {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Platform {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(s.parse().unwrap_or_default())
    }
}

/// Opaque internal access credential.
///
/// Validated by the host, never by the orchestrator. `Debug` is redacted so
/// the key cannot leak through request logging.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessKey(String);

impl AccessKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessKey(***)")
    }
}

/// A validated question request. Created per inbound call.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    pub caller_id: CallerId,
    pub question: Question,
    pub platform: Platform,
    pub requested_model: Option<String>,
    pub school_id: Option<String>,
    pub streaming: bool,
    pub access_key: Option<AccessKey>,
}

impl QueryRequest {
    pub fn new(caller_id: CallerId, question: Question) -> Self {
        Self {
            caller_id,
            question,
            platform: Platform::default(),
            requested_model: None,
            school_id: None,
            streaming: false,
            access_key: None,
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Blank model names mean "use the default".
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.requested_model = model
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        self
    }

    pub fn with_school_id(mut self, school_id: Option<String>) -> Self {
        self.school_id = school_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_access_key(mut self, key: Option<AccessKey>) -> Self {
        self.access_key = key;
        self
    }
}
