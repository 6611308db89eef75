//! Host command channel and router for the design query surface.

use crate::config::LimitsConfig;
use crate::error::{Result, ScoutError};
use crate::host::contract::{CommandEnvelope, CommandName, QueryOutput, ResponseEnvelope};
use crate::host::tools::tool_descriptors;
use async_trait::async_trait;
use design_search::{Category, DesignRecord, SearchOutcome, SortOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinSet;

/// A registered gallery as advertised by `list_sources`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub name: String,
    pub slug: String,
}

/// Backend for the query commands.
#[async_trait]
pub trait QueryHandler: Send + Sync + 'static {
    /// Merged multi-gallery search. `sources` restricts the galleries by slug.
    async fn design_search(
        &self,
        query: &str,
        limit: usize,
        sources: Option<&[String]>,
    ) -> Result<SearchOutcome>;

    /// The category directory.
    async fn list_categories(&self) -> Result<Arc<Vec<Category>>>;

    /// One live category listing.
    async fn browse_category(
        &self,
        slug: &str,
        sort: SortOrder,
        limit: usize,
    ) -> Result<Vec<DesignRecord>>;

    /// Registered galleries in merge order.
    fn sources(&self) -> Vec<SourceInfo>;
}

struct HostCommandRequest {
    envelope: CommandEnvelope,
    response_tx: oneshot::Sender<ResponseEnvelope>,
}

#[derive(Clone)]
pub struct HostCommandClient {
    request_tx: mpsc::Sender<HostCommandRequest>,
}

impl HostCommandClient {
    pub async fn send(&self, envelope: CommandEnvelope) -> Result<ResponseEnvelope> {
        envelope.validate().map_err(|e| {
            ScoutError::Pipeline(format!(
                "invalid host command envelope {}: {}",
                envelope.request_id, e
            ))
        })?;

        let (response_tx, response_rx) = oneshot::channel();
        self.request_tx
            .send(HostCommandRequest {
                envelope,
                response_tx,
            })
            .await
            .map_err(|e| {
                ScoutError::Channel(format!("failed to send host command request: {e}"))
            })?;

        response_rx
            .await
            .map_err(|e| ScoutError::Channel(format!("host command response dropped: {e}")))
    }
}

/// Receives commands from [`HostCommandClient`]s and answers each one on
/// its own task.
pub struct HostCommandServer<H: QueryHandler> {
    request_rx: mpsc::Receiver<HostCommandRequest>,
    router: Arc<CommandRouter<H>>,
}

#[must_use]
pub fn command_channel<H: QueryHandler>(
    request_capacity: usize,
    handler: H,
    limits: LimitsConfig,
) -> (HostCommandClient, HostCommandServer<H>) {
    let (request_tx, request_rx) = mpsc::channel(request_capacity.max(1));

    (
        HostCommandClient { request_tx },
        HostCommandServer {
            request_rx,
            router: Arc::new(CommandRouter::new(handler, limits)),
        },
    )
}

impl<H: QueryHandler> HostCommandServer<H> {
    /// Serve until every client is dropped, then wait for in-flight commands.
    pub async fn run(mut self) {
        let mut in_flight = JoinSet::new();
        self.serve(&mut in_flight).await;
        while in_flight.join_next().await.is_some() {}
    }

    /// Spawn one task per request and reap finished ones as they complete.
    async fn serve(&mut self, in_flight: &mut JoinSet<()>) {
        loop {
            tokio::select! {
                biased;
                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
                request = self.request_rx.recv() => {
                    let Some(request) = request else { break };
                    let router = Arc::clone(&self.router);
                    in_flight.spawn(async move {
                        let response = router.dispatch(&request.envelope).await;
                        let _ = request.response_tx.send(response);
                    });
                }
            }
        }
    }

    #[must_use]
    pub fn router(&self) -> &CommandRouter<H> {
        &self.router
    }
}

/// Maps command envelopes onto a [`QueryHandler`].
pub struct CommandRouter<H: QueryHandler> {
    handler: H,
    limits: LimitsConfig,
}

impl<H: QueryHandler> CommandRouter<H> {
    #[must_use]
    pub fn new(handler: H, limits: LimitsConfig) -> Self {
        Self { handler, limits }
    }

    /// Route and convert failures into error envelopes for the same request.
    pub async fn dispatch(&self, envelope: &CommandEnvelope) -> ResponseEnvelope {
        match self.route(envelope).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    command = envelope.command.as_str(),
                    request_id = %envelope.request_id,
                    error = %e,
                    "host command failed"
                );
                ResponseEnvelope::error(envelope.request_id.clone(), e.to_string())
            }
        }
    }

    /// Route a command envelope to the appropriate handler.
    pub async fn route(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        tracing::debug!(
            command = envelope.command.as_str(),
            request_id = %envelope.request_id,
            "routing host command"
        );
        match envelope.command {
            CommandName::HostPing => Ok(ResponseEnvelope::ok(
                envelope.request_id.clone(),
                serde_json::json!({"pong": true}),
            )),
            CommandName::HostVersion => self.handle_host_version(envelope),
            CommandName::RuntimeStop => Ok(ResponseEnvelope::ok(
                envelope.request_id.clone(),
                serde_json::json!({"accepted": true}),
            )),
            CommandName::ToolsList => self.handle_tools_list(envelope),
            CommandName::DesignSearch => self.handle_design_search(envelope).await,
            CommandName::Search => self.handle_search(envelope).await,
            CommandName::ListCategories => self.handle_list_categories(envelope).await,
            CommandName::BrowseCategory => self.handle_browse_category(envelope).await,
            CommandName::ListSources => self.handle_list_sources(envelope),
        }
    }

    fn handle_host_version(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let slugs: Vec<String> = self.handler.sources().into_iter().map(|s| s.slug).collect();
        Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            serde_json::json!({
                "contract_version": crate::host::contract::CONTRACT_VERSION,
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
                "sources": slugs
            }),
        ))
    }

    fn handle_tools_list(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let tools = tool_descriptors(&self.handler.sources(), &self.limits);
        Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            serde_json::json!({ "tools": tools }),
        ))
    }

    fn handle_list_sources(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let data = to_json(&self.handler.sources())?;
        Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            QueryOutput::json(data).into_payload(),
        ))
    }

    async fn handle_design_search(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let command = CommandName::DesignSearch.as_str();
        let query = parse_non_empty_field(&envelope.payload, "query", command)?;
        let limit = parse_limit(&envelope.payload, command, &self.limits)?;
        let sources = parse_sources(&envelope.payload, command)?;

        let outcome = self
            .handler
            .design_search(&query, limit, sources.as_deref())
            .await?;

        let output = if outcome.is_empty() {
            QueryOutput::text(format!(
                "No designs found for \"{query}\". Try broader terms like \"website\", \"dashboard\", \"landing page\"."
            ))
        } else {
            search_output(&query, outcome)?
        };
        Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            output.into_payload(),
        ))
    }

    async fn handle_search(&self, envelope: &CommandEnvelope) -> Result<ResponseEnvelope> {
        let command = CommandName::Search.as_str();
        let query = parse_non_empty_field(&envelope.payload, "query", command)?;
        let limit = parse_limit(&envelope.payload, command, &self.limits)?;

        let outcome = self.handler.design_search(&query, limit, None).await?;

        let output = if outcome.is_empty() {
            QueryOutput::text(format!(
                "No designs found for \"{query}\". Try broader terms."
            ))
        } else {
            search_output(&query, outcome)?
        };
        Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            output.into_payload(),
        ))
    }

    async fn handle_list_categories(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<ResponseEnvelope> {
        let categories = self.handler.list_categories().await?;
        let data = to_json(categories.as_ref())?;
        Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            QueryOutput::json(data).into_payload(),
        ))
    }

    async fn handle_browse_category(
        &self,
        envelope: &CommandEnvelope,
    ) -> Result<ResponseEnvelope> {
        let command = CommandName::BrowseCategory.as_str();
        let category = parse_non_empty_field(&envelope.payload, "category", command)?
            .trim()
            .to_owned();
        let sort = parse_sort(&envelope.payload, command)?;
        let limit = parse_limit(&envelope.payload, command, &self.limits)?;

        let designs = self
            .handler
            .browse_category(&category, sort, limit)
            .await?;

        let output = if designs.is_empty() {
            QueryOutput::text(format!(
                "No designs found for category \"{category}\". Use list_categories to see available categories."
            ))
        } else {
            QueryOutput::json(serde_json::json!({
                "category": category,
                "sort": sort.as_str(),
                "count": designs.len(),
                "designs": to_json(&designs)?
            }))
        };
        Ok(ResponseEnvelope::ok(
            envelope.request_id.clone(),
            output.into_payload(),
        ))
    }
}

fn search_output(query: &str, outcome: SearchOutcome) -> Result<QueryOutput> {
    Ok(QueryOutput::json(serde_json::json!({
        "query": query,
        "sources": outcome.sources_used,
        "count": outcome.designs.len(),
        "designs": to_json(&outcome.designs)?
    })))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| ScoutError::Pipeline(format!("failed to serialize query output: {e}")))
}

fn parse_non_empty_field(
    payload: &serde_json::Value,
    field: &str,
    command: &str,
) -> Result<String> {
    let Some(raw) = payload.get(field).and_then(serde_json::Value::as_str) else {
        return Err(ScoutError::Pipeline(format!(
            "{command} requires payload.{field}"
        )));
    };
    if raw.trim().is_empty() {
        return Err(ScoutError::Pipeline(format!(
            "{command} requires a non-empty payload.{field}"
        )));
    }
    Ok(raw.to_owned())
}

fn parse_limit(payload: &serde_json::Value, command: &str, limits: &LimitsConfig) -> Result<usize> {
    let out_of_range = || {
        ScoutError::Pipeline(format!(
            "{command} payload.limit must be an integer between 1 and {}",
            limits.max_limit
        ))
    };
    match payload.get("limit") {
        None | Some(serde_json::Value::Null) => Ok(limits.default_limit),
        Some(raw) => {
            let limit = raw
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(out_of_range)?;
            if (1..=limits.max_limit).contains(&limit) {
                Ok(limit)
            } else {
                Err(out_of_range())
            }
        }
    }
}

fn parse_sources(payload: &serde_json::Value, command: &str) -> Result<Option<Vec<String>>> {
    match payload.get("sources") {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(|s| s.trim().to_owned()).ok_or_else(|| {
                    ScoutError::Pipeline(format!(
                        "{command} payload.sources must contain only strings"
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(_) => Err(ScoutError::Pipeline(format!(
            "{command} payload.sources must be an array of source slugs when provided"
        ))),
    }
}

fn parse_sort(payload: &serde_json::Value, command: &str) -> Result<SortOrder> {
    match payload.get("sort") {
        None | Some(serde_json::Value::Null) => Ok(SortOrder::default()),
        Some(serde_json::Value::String(raw)) => SortOrder::parse(raw).ok_or_else(|| {
            ScoutError::Pipeline(format!(
                "unsupported sort `{raw}` (expected popular/newest)"
            ))
        }),
        Some(_) => Err(ScoutError::Pipeline(format!(
            "{command} payload.sort must be a string when provided"
        ))),
    }
}
