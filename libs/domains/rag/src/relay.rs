//! Forwarding of completion fragments into an HTTP response body.

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use tracing::{error, info, warn};

use crate::completion::CompletionStream;
use crate::error::RagError;

/// Tracks one relay and reports it if the body is dropped before the
/// upstream finished, which is how a client disconnect shows up.
#[derive(Debug, Default)]
struct RelayGuard {
    fragments: usize,
    bytes: usize,
    finished: bool,
}

impl RelayGuard {
    fn record(&mut self, fragment: &str) {
        self.fragments += 1;
        self.bytes += fragment.len();
    }
}

impl Drop for RelayGuard {
    fn drop(&mut self) {
        if !self.finished {
            warn!(
                fragments = self.fragments,
                bytes = self.bytes,
                "Completion relay abandoned before upstream finished"
            );
        }
    }
}

/// Turns completion fragments into response body chunks.
///
/// One non-empty fragment becomes one chunk, unmodified and in arrival
/// order. An upstream fault is passed on as the final `Err` item so the
/// server aborts the response. Upstream is only polled when the body is.
pub fn relay_body(
    mut completion: CompletionStream,
) -> impl Stream<Item = Result<Bytes, RagError>> + Send + 'static {
    async_stream::stream! {
        let mut guard = RelayGuard::default();

        while let Some(item) = completion.next().await {
            match item {
                Ok(fragment) if fragment.is_empty() => continue,
                Ok(fragment) => {
                    guard.record(&fragment);
                    yield Ok(Bytes::from(fragment));
                }
                Err(e) => {
                    guard.finished = true;
                    error!(
                        error_code = "STREAM_INTERRUPTED",
                        fragments = guard.fragments,
                        "Completion stream failed mid-relay: {}",
                        e
                    );
                    yield Err(e);
                    return;
                }
            }
        }

        guard.finished = true;
        info!(
            fragments = guard.fragments,
            bytes = guard.bytes,
            "Completion relay finished"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RagResult;
    use futures::stream;

    fn source(items: Vec<RagResult<&'static str>>) -> CompletionStream {
        Box::pin(stream::iter(
            items.into_iter().map(|item| item.map(str::to_string)),
        ))
    }

    #[tokio::test]
    async fn test_relay_preserves_fragments_and_order() {
        let fragments = vec!["Dr. ", "Chen ", "teaches ", "databases", "."];
        let body: Vec<Bytes> = relay_body(source(fragments.iter().copied().map(Ok).collect()))
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(body.len(), fragments.len());
        let concatenated: Vec<u8> = body.iter().flat_map(|b| b.iter().copied()).collect();
        assert_eq!(concatenated, fragments.concat().into_bytes());
    }

    #[tokio::test]
    async fn test_relay_skips_empty_fragments() {
        let body: Vec<Bytes> = relay_body(source(vec![Ok(""), Ok("a"), Ok(""), Ok("b")]))
            .map(Result::unwrap)
            .collect()
            .await;

        assert_eq!(body, vec![Bytes::from("a"), Bytes::from("b")]);
    }

    #[tokio::test]
    async fn test_fault_after_n_fragments_yields_exactly_n_then_error() {
        let items = relay_body(source(vec![
            Ok("one"),
            Ok("two"),
            Err(RagError::StreamInterrupted("connection reset".into())),
            Ok("never"),
        ]))
        .collect::<Vec<_>>()
        .await;

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap(), &Bytes::from("one"));
        assert_eq!(items[1].as_ref().unwrap(), &Bytes::from("two"));
        assert!(matches!(items[2], Err(RagError::StreamInterrupted(_))));
    }

    #[tokio::test]
    async fn test_relay_pulls_lazily_and_can_be_dropped_early() {
        let mut body = Box::pin(relay_body(source(vec![Ok("first"), Ok("second")])));
        assert_eq!(body.next().await.unwrap().unwrap(), Bytes::from("first"));
        drop(body);
    }
}
