// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::stream::StreamExt;
use futures::{FutureExt, Stream};
use std::time::Duration;
use tokio::time::{sleep, timeout};

pub async fn assert_no_element_emitted<S, T>(stream: &mut S, timeout_ms: u64)
where
    S: Stream<Item = T> + Unpin,
{
    tokio::select! {
        _item = stream.next() => {
            panic!(
                "Unexpected element emitted, expected no output."
            );
        }
        _ = sleep(Duration::from_millis(timeout_ms)) => {
        }
    }
}

/// Poll `stream` exactly once with a no-op waker.
///
/// Streams in this workspace register their listener on first poll, so this is how a test
/// activates a stream without waiting for an element. `None` means the stream is pending.
pub fn poll_once<S>(stream: &mut S) -> Option<Option<S::Item>>
where
    S: Stream + Unpin,
{
    stream.next().now_or_never()
}

pub async fn expect_next<S>(stream: &mut S, timeout_ms: u64) -> S::Item
where
    S: Stream + Unpin,
{
    timeout(Duration::from_millis(timeout_ms), stream.next())
        .await
        .expect("timed out waiting for the next element")
        .expect("stream ended, expected another element")
}

pub async fn expect_end<S>(stream: &mut S, timeout_ms: u64)
where
    S: Stream + Unpin,
    S::Item: std::fmt::Debug,
{
    let next = timeout(Duration::from_millis(timeout_ms), stream.next())
        .await
        .expect("timed out waiting for the end of the stream");
    assert!(next.is_none(), "expected end of stream, got {next:?}");
}

/// Wait until `condition` holds, checking every millisecond.
pub async fn wait_until<F>(mut condition: F, timeout_ms: u64)
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within {timeout_ms} ms"
        );
        sleep(Duration::from_millis(1)).await;
    }
}
