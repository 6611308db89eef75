//! design-scout: design-inspiration search served over a JSON command bridge.
//!
//! Callers send newline-delimited command envelopes on stdin and receive
//! response envelopes on stdout:
//! caller → `CommandEnvelope` → router → [`design_search`] → `ResponseEnvelope`
//!
//! # Architecture
//!
//! - **Contract**: versioned command/response envelopes ([`host::contract`])
//! - **Router**: payload validation and result rendering ([`host::channel`])
//! - **Handler**: the live gallery registry ([`host::handler`])
//! - **Bridge**: stdin/stdout framing ([`host::stdio`])
//! - **Config**: TOML file with search and limit settings ([`config`])

pub mod config;
pub mod error;
pub mod host;

pub use config::{LimitsConfig, ScoutConfig};
pub use error::{Result, ScoutError};
pub use host::channel::{QueryHandler, SourceInfo};
pub use host::handler::DesignQueryHandler;
