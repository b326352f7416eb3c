// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::Stream;

/// A stream backed by a registration that can be torn down explicitly.
///
/// Dropping such a stream also releases its registration, but consumers that need cleanup to
/// happen at a known point call [`cancel`](CancellableStream::cancel) instead of relying on
/// when the value happens to be dropped.
pub trait CancellableStream: Stream {
    /// Release the underlying registration and end the stream. Idempotent.
    fn cancel(&self);

    /// `true` once the stream has ended for any reason.
    fn is_terminated(&self) -> bool;
}
