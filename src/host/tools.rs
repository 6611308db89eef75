//! JSON-schema descriptors for the query commands, served by `tools.list`.

use crate::config::LimitsConfig;
use crate::host::channel::SourceInfo;
use crate::host::contract::CommandName;
use serde::{Deserialize, Serialize};

/// Describes one query command so a caller can present it as a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Command name as sent in the envelope.
    pub name: String,
    /// Human-readable description of the command's purpose.
    pub description: String,
    /// JSON Schema describing `payload`.
    pub parameters: serde_json::Value,
}

impl ToolDescriptor {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Build descriptors for every query command in [`CommandName::QUERIES`] order.
#[must_use]
pub fn tool_descriptors(sources: &[SourceInfo], limits: &LimitsConfig) -> Vec<ToolDescriptor> {
    let names = sources
        .iter()
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let slugs: Vec<&str> = sources.iter().map(|s| s.slug.as_str()).collect();

    CommandName::QUERIES
        .iter()
        .map(|command| match command {
            CommandName::DesignSearch => ToolDescriptor::new(
                command.as_str(),
                format!(
                    "Search design inspiration across {names}. Returns preview image URLs, titles and links, interleaved across sources."
                ),
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "What to look for, e.g. \"dashboard\", \"pricing page\", \"serif typography\""
                        },
                        "limit": limit_schema(limits),
                        "sources": {
                            "type": "array",
                            "items": {"type": "string", "enum": slugs},
                            "description": "Restrict the search to these sources. Omit to search all."
                        }
                    },
                    "required": ["query"]
                }),
            ),
            CommandName::Search => ToolDescriptor::new(
                command.as_str(),
                "Search design inspiration across every source. Alias of design_search without source selection.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "What to look for"},
                        "limit": limit_schema(limits)
                    },
                    "required": ["query"]
                }),
            ),
            CommandName::ListCategories => ToolDescriptor::new(
                command.as_str(),
                "List Collect UI design categories with their design counts.",
                serde_json::json!({"type": "object", "properties": {}}),
            ),
            CommandName::BrowseCategory => ToolDescriptor::new(
                command.as_str(),
                "Browse designs in one Collect UI category, by popularity or recency.",
                serde_json::json!({
                    "type": "object",
                    "properties": {
                        "category": {
                            "type": "string",
                            "description": "Category slug from list_categories, e.g. \"landing-page\""
                        },
                        "sort": {
                            "type": "string",
                            "enum": ["popular", "newest"],
                            "default": "popular"
                        },
                        "limit": limit_schema(limits)
                    },
                    "required": ["category"]
                }),
            ),
            _ => ToolDescriptor::new(
                command.as_str(),
                "List the design sources this host searches, with their slugs.",
                serde_json::json!({"type": "object", "properties": {}}),
            ),
        })
        .collect()
}

fn limit_schema(limits: &LimitsConfig) -> serde_json::Value {
    serde_json::json!({
        "type": "integer",
        "minimum": 1,
        "maximum": limits.max_limit,
        "default": limits.default_limit
    })
}
