//! Stdin/stdout JSON bridge for the host command channel.
//!
//! Reads newline-delimited JSON `CommandEnvelope` messages from stdin,
//! dispatches them through the `HostCommandServer` router, and writes
//! `ResponseEnvelope` messages as newline-delimited JSON to stdout.
//!
//! Stdout is exclusively reserved for the JSON protocol; all diagnostic
//! output (tracing, logs) must be routed to stderr.

use crate::config::LimitsConfig;
use crate::error::{Result, ScoutError};
use crate::host::channel::{HostCommandClient, QueryHandler, command_channel};
use crate::host::contract::{CommandEnvelope, CommandName, ResponseEnvelope};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::sync::Mutex;
use tokio::task::JoinSet;

/// Default request channel capacity for the stdio bridge.
const REQUEST_CAPACITY: usize = 64;

/// Run the bridge on the process stdin/stdout until stdin closes or a
/// `runtime.stop` command is received.
pub async fn run_stdio_bridge<H: QueryHandler>(handler: H, limits: LimitsConfig) -> Result<()> {
    run_bridge(
        BufReader::new(tokio::io::stdin()),
        BufWriter::new(tokio::io::stdout()),
        handler,
        limits,
    )
    .await
}

/// Run the bridge over any line reader and writer.
///
/// Commands are dispatched concurrently, so responses may be written in a
/// different order than the requests arrived; callers correlate them by
/// `request_id`. `runtime.stop` waits for in-flight commands before it is
/// acknowledged.
pub async fn run_bridge<R, W, H>(reader: R, writer: W, handler: H, limits: LimitsConfig) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
    H: QueryHandler,
{
    let (client, server) = command_channel(REQUEST_CAPACITY, handler, limits);
    let writer = Arc::new(Mutex::new(writer));

    let server_handle = tokio::spawn(server.run());

    let reader_result = run_reader(reader, client, Arc::clone(&writer)).await;

    // The client is dropped by `run_reader`, closing the request channel.
    let _ = server_handle.await;

    reader_result
}

/// Read line-by-line, dispatch each command, and write responses.
///
/// Finished response tasks are reaped while waiting for input; the first
/// failed write ends the loop.
async fn run_reader<R, W>(
    reader: R,
    client: HostCommandClient,
    writer: Arc<Mutex<W>>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut in_flight: JoinSet<Result<()>> = JoinSet::new();
    let mut lines = reader.lines();

    loop {
        let next = tokio::select! {
            biased;
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                flatten_join(joined)?;
                continue;
            }
            next = lines.next_line() => next,
        };

        let Some(line) =
            next.map_err(|e| ScoutError::Channel(format!("failed to read from stdin: {e}")))?
        else {
            tracing::info!("stdin closed (EOF); shutting down stdio bridge");
            break;
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let envelope: CommandEnvelope = match serde_json::from_str(trimmed) {
            Ok(env) => env,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    raw_line = %trimmed,
                    "failed to parse command envelope from stdin"
                );
                let error_response = ResponseEnvelope::error(
                    "parse-error",
                    format!("failed to parse command envelope: {e}"),
                );
                write_response(&writer, &error_response).await?;
                continue;
            }
        };

        if envelope.command == CommandName::RuntimeStop {
            while let Some(joined) = in_flight.join_next().await {
                flatten_join(joined)?;
            }
            let response = send_or_error(&client, envelope).await;
            write_response(&writer, &response).await?;
            tracing::info!("runtime.stop received; shutting down stdio bridge");
            return Ok(());
        }

        let client = client.clone();
        let writer = Arc::clone(&writer);
        in_flight.spawn(async move {
            let response = send_or_error(&client, envelope).await;
            write_response(&writer, &response).await
        });
    }

    while let Some(joined) = in_flight.join_next().await {
        flatten_join(joined)?;
    }
    Ok(())
}

async fn send_or_error(client: &HostCommandClient, envelope: CommandEnvelope) -> ResponseEnvelope {
    let request_id = envelope.request_id.clone();
    match client.send(envelope).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, request_id = %request_id, "host command dispatch failed");
            let request_id = if request_id.trim().is_empty() {
                "dispatch-error".to_owned()
            } else {
                request_id
            };
            ResponseEnvelope::error(request_id, format!("dispatch failed: {e}"))
        }
    }
}

fn flatten_join(joined: std::result::Result<Result<()>, tokio::task::JoinError>) -> Result<()> {
    joined.map_err(|e| ScoutError::Channel(format!("response task failed: {e}")))?
}

/// Serialize and write one response line, then flush.
async fn write_response<W>(writer: &Mutex<W>, response: &ResponseEnvelope) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(response).map_err(|e| {
        ScoutError::Pipeline(format!("failed to serialize response envelope: {e}"))
    })?;
    let mut w = writer.lock().await;
    write_line(&mut *w, &json).await
}

async fn write_line<W>(writer: &mut W, json: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer
        .write_all(json.as_bytes())
        .await
        .map_err(|e| ScoutError::Channel(format!("failed to write to stdout: {e}")))?;
    writer
        .write_all(b"\n")
        .await
        .map_err(|e| ScoutError::Channel(format!("failed to write newline to stdout: {e}")))?;
    writer
        .flush()
        .await
        .map_err(|e| ScoutError::Channel(format!("failed to flush stdout: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::channel::SourceInfo;
    use async_trait::async_trait;
    use design_search::{Category, DesignRecord, SearchOutcome, SortOrder};
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context, Poll};
    use std::time::Duration;

    struct EmptyHandler;

    #[async_trait]
    impl QueryHandler for EmptyHandler {
        async fn design_search(
            &self,
            _query: &str,
            _limit: usize,
            _sources: Option<&[String]>,
        ) -> Result<SearchOutcome> {
            Ok(SearchOutcome::default())
        }

        async fn list_categories(&self) -> Result<Arc<Vec<Category>>> {
            Ok(Arc::new(Vec::new()))
        }

        async fn browse_category(
            &self,
            _slug: &str,
            _sort: SortOrder,
            _limit: usize,
        ) -> Result<Vec<DesignRecord>> {
            Ok(Vec::new())
        }

        fn sources(&self) -> Vec<SourceInfo> {
            Vec::new()
        }
    }

    async fn run_lines(input: &str) -> Vec<ResponseEnvelope> {
        let (mut client_side, bridge_side) = tokio::io::duplex(64 * 1024);
        let (read_half, write_half) = tokio::io::split(bridge_side);
        tokio::io::AsyncWriteExt::write_all(&mut client_side, input.as_bytes())
            .await
            .unwrap();
        tokio::io::AsyncWriteExt::shutdown(&mut client_side).await.unwrap();

        run_bridge(
            BufReader::new(read_half),
            write_half,
            EmptyHandler,
            LimitsConfig::default(),
        )
        .await
        .unwrap();

        let mut output = String::new();
        tokio::io::AsyncReadExt::read_to_string(&mut client_side, &mut output)
            .await
            .unwrap();
        output
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    struct CountingHandler {
        searches: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl QueryHandler for CountingHandler {
        async fn design_search(
            &self,
            query: &str,
            limit: usize,
            sources: Option<&[String]>,
        ) -> Result<SearchOutcome> {
            self.searches.fetch_add(1, Ordering::SeqCst);
            EmptyHandler.design_search(query, limit, sources).await
        }

        async fn list_categories(&self) -> Result<Arc<Vec<Category>>> {
            EmptyHandler.list_categories().await
        }

        async fn browse_category(
            &self,
            slug: &str,
            sort: SortOrder,
            limit: usize,
        ) -> Result<Vec<DesignRecord>> {
            EmptyHandler.browse_category(slug, sort, limit).await
        }

        fn sources(&self) -> Vec<SourceInfo> {
            Vec::new()
        }
    }

    /// Stdout whose reader has gone away.
    struct ClosedStdout;

    impl AsyncWrite for ClosedStdout {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::ErrorKind::BrokenPipe.into()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn failed_write_stops_reading_before_eof() {
        let (mut client_side, bridge_side) = tokio::io::duplex(64 * 1024);
        tokio::io::AsyncWriteExt::write_all(
            &mut client_side,
            b"{\"v\":1,\"request_id\":\"s1\",\"command\":\"design_search\",\"payload\":{\"query\":\"x\"}}\n",
        )
        .await
        .unwrap();

        let searches = Arc::new(AtomicUsize::new(0));
        let handler = CountingHandler {
            searches: Arc::clone(&searches),
        };

        // `client_side` stays open: the bridge must stop without seeing EOF.
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            run_bridge(
                BufReader::new(bridge_side),
                ClosedStdout,
                handler,
                LimitsConfig::default(),
            ),
        )
        .await
        .expect("bridge kept reading after its output closed");

        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to write to stdout"));
        assert_eq!(searches.load(Ordering::SeqCst), 1);
        drop(client_side);
    }

    #[tokio::test]
    async fn unparseable_line_yields_parse_error() {
        let responses = run_lines("not json\n").await;
        assert_eq!(responses.len(), 1);
        assert!(!responses[0].ok);
        assert_eq!(responses[0].request_id, "parse-error");
    }

    #[tokio::test]
    async fn runtime_stop_ends_the_loop() {
        let input = concat!(
            r#"{"v":1,"request_id":"a","command":"host.ping"}"#,
            "\n",
            r#"{"v":1,"request_id":"b","command":"runtime.stop"}"#,
            "\n",
            r#"{"v":1,"request_id":"c","command":"host.ping"}"#,
            "\n",
        );
        let responses = run_lines(input).await;
        let ids: Vec<&str> = responses.iter().map(|r| r.request_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(responses[1].payload["accepted"], true);
    }

    #[tokio::test]
    async fn wrong_version_keeps_request_id() {
        let responses =
            run_lines("{\"v\":9,\"request_id\":\"r1\",\"command\":\"host.ping\"}\n").await;
        assert_eq!(responses.len(), 1);
        assert!(!responses[0].ok);
        assert_eq!(responses[0].request_id, "r1");
        assert!(responses[0].error.as_deref().unwrap().contains("version"));
    }

    #[tokio::test]
    async fn blank_lines_are_skipped() {
        let responses = run_lines(
            "\n\n{\"v\":1,\"request_id\":\"x\",\"command\":\"design_search\",\"payload\":{\"query\":\"zzz\"}}\n",
        )
        .await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0].payload["kind"], "text");
    }
}
