//! Versioned command/response envelopes for the design query host.

use serde::{Deserialize, Serialize};

/// Contract version for command/response envelopes.
pub const CONTRACT_VERSION: u32 = 1;

/// Command set served by the query host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandName {
    #[serde(rename = "host.ping")]
    HostPing,
    #[serde(rename = "host.version")]
    HostVersion,
    #[serde(rename = "runtime.stop")]
    RuntimeStop,
    #[serde(rename = "tools.list")]
    ToolsList,
    #[serde(rename = "design_search")]
    DesignSearch,
    /// Legacy alias of `design_search` that always searches every source.
    #[serde(rename = "search")]
    Search,
    #[serde(rename = "list_categories")]
    ListCategories,
    #[serde(rename = "browse_category")]
    BrowseCategory,
    #[serde(rename = "list_sources")]
    ListSources,
}

impl CommandName {
    /// Query commands, in the order they are advertised by `tools.list`.
    pub const QUERIES: [CommandName; 5] = [
        Self::DesignSearch,
        Self::Search,
        Self::ListCategories,
        Self::BrowseCategory,
        Self::ListSources,
    ];

    /// Render command name to wire format.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::HostPing => "host.ping",
            Self::HostVersion => "host.version",
            Self::RuntimeStop => "runtime.stop",
            Self::ToolsList => "tools.list",
            Self::DesignSearch => "design_search",
            Self::Search => "search",
            Self::ListCategories => "list_categories",
            Self::BrowseCategory => "browse_category",
            Self::ListSources => "list_sources",
        }
    }

    /// Parse a command name from wire format.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "host.ping" => Some(Self::HostPing),
            "host.version" => Some(Self::HostVersion),
            "runtime.stop" => Some(Self::RuntimeStop),
            "tools.list" => Some(Self::ToolsList),
            "design_search" => Some(Self::DesignSearch),
            "search" => Some(Self::Search),
            "list_categories" => Some(Self::ListCategories),
            "browse_category" => Some(Self::BrowseCategory),
            "list_sources" => Some(Self::ListSources),
            _ => None,
        }
    }
}

/// Result body of a query command: structured data or a plain-text notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutput {
    Json { data: serde_json::Value },
    Text { text: String },
}

impl QueryOutput {
    #[must_use]
    pub fn json(data: serde_json::Value) -> Self {
        Self::Json { data }
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Render as an envelope payload.
    #[must_use]
    pub fn into_payload(self) -> serde_json::Value {
        match self {
            Self::Json { data } => serde_json::json!({"kind": "json", "data": data}),
            Self::Text { text } => serde_json::json!({"kind": "text", "text": text}),
        }
    }
}

/// A versioned response envelope from host -> caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub v: u32,
    pub request_id: String,
    pub ok: bool,
    pub payload: serde_json::Value,
    pub error: Option<String>,
}

impl ResponseEnvelope {
    /// Build a successful response envelope.
    #[must_use]
    pub fn ok(request_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            v: CONTRACT_VERSION,
            request_id: request_id.into(),
            ok: true,
            payload,
            error: None,
        }
    }

    /// Build an error response envelope.
    #[must_use]
    pub fn error(request_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            v: CONTRACT_VERSION,
            request_id: request_id.into(),
            ok: false,
            payload: serde_json::Value::Null,
            error: Some(message.into()),
        }
    }
}

/// A versioned command envelope from caller -> host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    pub v: u32,
    pub request_id: String,
    pub command: CommandName,
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl CommandEnvelope {
    /// Build a v1 command envelope.
    #[must_use]
    pub fn new(
        request_id: impl Into<String>,
        command: CommandName,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            v: CONTRACT_VERSION,
            request_id: request_id.into(),
            command,
            payload,
        }
    }

    /// Validate envelope version and required identifiers.
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.v != CONTRACT_VERSION {
            return Err(ContractError::new(
                ContractErrorKind::UnsupportedVersion,
                format!(
                    "unsupported contract version {}; expected {}",
                    self.v, CONTRACT_VERSION
                ),
            ));
        }
        if self.request_id.trim().is_empty() {
            return Err(ContractError::new(
                ContractErrorKind::InvalidEnvelope,
                "request_id cannot be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Contract validation error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractErrorKind {
    UnsupportedVersion,
    InvalidEnvelope,
}

/// Contract validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    pub kind: ContractErrorKind,
    pub message: String,
}

impl ContractError {
    #[must_use]
    pub fn new(kind: ContractErrorKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ContractError {}
