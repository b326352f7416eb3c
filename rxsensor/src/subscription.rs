// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Registration lifecycle shared by continuous and trigger streams.
//!
//! One [`Subscription`] backs exactly one stream instance and owns exactly one listener
//! registration. Its state only moves forward:
//!
//! ```text
//! Idle -> Registering -> Active -> Terminating -> Closed
//!              \                                   ^
//!               `-------- (absent / refused) ------'
//! Idle -> Closed                 (cancelled before the first poll)
//! ```
//!
//! Leaving `Active` always goes through `Terminating`, where the producer is cut off and the
//! listener is deregistered, before the consumer can observe the end of the stream. A cancel
//! that arrives while another thread is registering or tearing down blocks until `Closed`.

use crate::resolver::SensorHandleResolver;
use crate::subsystem::{ListenerId, SensorSubsystem, SubsystemError};
use core::task::{Context, Poll};
use parking_lot::{Condvar, Mutex, MutexGuard};
use rxsensor_core::{LatestSlot, SensorError, SensorHandle, SensorKind, StreamItem, Teardown};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// Lifecycle state of the registration behind a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionState {
    /// Created, not polled yet.
    Idle,
    /// Resolving the sensor and registering the listener.
    Registering,
    /// Listener registered; events flow.
    Active,
    /// Producer cut off; deregistration in progress.
    Terminating,
    /// Nothing registered, nothing more will be delivered.
    Closed,
}

impl SubscriptionState {
    /// Whether the lifecycle allows moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        use SubscriptionState::{Active, Closed, Idle, Registering, Terminating};
        matches!(
            (self, next),
            (Idle, Registering)
                | (Idle, Closed)
                | (Registering, Active)
                | (Registering, Closed)
                | (Active, Terminating)
                | (Terminating, Closed)
        )
    }

    #[must_use]
    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// The subsystem calls that register and deregister one kind of listener.
pub(crate) trait Protocol: Send + Sync + Sized + 'static {
    type Item: Send + 'static;

    fn register(subscription: &Arc<Subscription<Self>>, handle: &SensorHandle) -> bool;

    fn deregister(
        &self,
        subsystem: &dyn SensorSubsystem,
        listener: ListenerId,
        handle: &SensorHandle,
    ) -> Result<(), SubsystemError>;
}

// An exit requested while registration was still in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exit {
    Cancel,
    Complete,
}

struct Lifecycle {
    state: SubscriptionState,
    deferred: Option<Exit>,
    handle: Option<SensorHandle>,
    // Thread currently registering or tearing down; it never waits on itself.
    owner: Option<ThreadId>,
}

impl Lifecycle {
    fn advance(&mut self, next: SubscriptionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal subscription transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;
        self.owner = match next {
            SubscriptionState::Registering | SubscriptionState::Terminating => {
                Some(thread::current().id())
            }
            _ => None,
        };
    }
}

pub(crate) struct Subscription<P: Protocol> {
    id: ListenerId,
    kind: SensorKind,
    protocol: P,
    subsystem: Arc<dyn SensorSubsystem>,
    resolver: SensorHandleResolver,
    lifecycle: Mutex<Lifecycle>,
    closed: Condvar,
    slot: LatestSlot<P::Item>,
    teardown: Teardown,
}

impl<P: Protocol> Subscription<P> {
    pub(crate) fn new(
        kind: SensorKind,
        protocol: P,
        subsystem: Arc<dyn SensorSubsystem>,
        resolver: SensorHandleResolver,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: ListenerId::next(),
            kind,
            protocol,
            subsystem,
            resolver,
            lifecycle: Mutex::new(Lifecycle {
                state: SubscriptionState::Idle,
                deferred: None,
                handle: None,
                owner: None,
            }),
            closed: Condvar::new(),
            slot: LatestSlot::new(),
            teardown: Teardown::new(),
        })
    }

    pub(crate) fn id(&self) -> ListenerId {
        self.id
    }

    pub(crate) fn protocol(&self) -> &P {
        &self.protocol
    }

    pub(crate) fn subsystem(&self) -> &dyn SensorSubsystem {
        self.subsystem.as_ref()
    }

    pub(crate) fn slot(&self) -> &LatestSlot<P::Item> {
        &self.slot
    }

    /// Resolve the sensor and register the listener. Only the first call does anything.
    fn start(self: &Arc<Self>) -> Result<(), SensorError> {
        {
            let mut lifecycle = self.lifecycle.lock();
            if lifecycle.state != SubscriptionState::Idle {
                return Ok(());
            }
            lifecycle.advance(SubscriptionState::Registering);
        }

        let Some(handle) = self.resolver.resolve_kind(self.kind) else {
            warn!(kind = %self.kind, listener = %self.id, "sensor unavailable");
            self.abort();
            return Err(SensorError::unavailable(self.kind));
        };

        debug!(sensor = %handle, listener = %self.id, "registering listener");
        if !P::register(self, &handle) {
            warn!(sensor = %handle, listener = %self.id, "listener registration refused");
            self.abort();
            return Err(SensorError::registration_failed(handle));
        }

        let deferred = {
            let mut lifecycle = self.lifecycle.lock();
            lifecycle.handle = Some(handle);
            lifecycle.advance(SubscriptionState::Active);
            lifecycle.deferred.take()
        };
        debug!(listener = %self.id, "subscription active");

        match deferred {
            Some(Exit::Cancel) => {
                self.terminate(false);
            }
            Some(Exit::Complete) => {
                self.terminate(true);
            }
            None => {}
        }
        Ok(())
    }

    // Registering -> Closed. Nothing was registered, so there is nothing to deregister.
    fn abort(&self) {
        self.slot.seal(false);
        self.close();
    }

    // Final transition; wakes every caller blocked in `wait_closed`.
    fn close(&self) {
        self.lifecycle.lock().advance(SubscriptionState::Closed);
        self.slot.close();
        self.closed.notify_all();
    }

    // Blocks until another thread's registration or teardown has reached `Closed`.
    fn wait_closed(&self, mut lifecycle: MutexGuard<'_, Lifecycle>) {
        if lifecycle.owner == Some(thread::current().id()) {
            return;
        }
        while !lifecycle.state.is_closed() {
            self.closed.wait(&mut lifecycle);
        }
    }

    /// Consumer-side exit. Safe in any state and from any thread.
    pub(crate) fn cancel(&self) {
        let mut lifecycle = self.lifecycle.lock();
        match lifecycle.state {
            SubscriptionState::Idle => {
                drop(lifecycle);
                self.slot.seal(false);
                self.close();
            }
            // The registering thread finishes the teardown once registration returns.
            SubscriptionState::Registering => {
                lifecycle.deferred = Some(Exit::Cancel);
                self.wait_closed(lifecycle);
            }
            SubscriptionState::Active => {
                drop(lifecycle);
                if !self.terminate(false) {
                    self.wait_closed(self.lifecycle.lock());
                }
            }
            SubscriptionState::Terminating => self.wait_closed(lifecycle),
            SubscriptionState::Closed => {}
        }
    }

    /// Producer-side exit after a final element. The pending element is still delivered.
    /// Never blocks: the notification thread must not wait on a consumer-side teardown.
    pub(crate) fn complete(&self) {
        let mut lifecycle = self.lifecycle.lock();
        match lifecycle.state {
            SubscriptionState::Registering => {
                lifecycle.deferred.get_or_insert(Exit::Complete);
            }
            SubscriptionState::Active => {
                drop(lifecycle);
                self.terminate(true);
            }
            _ => {}
        }
    }

    // Active -> Terminating -> Closed, run by exactly one caller. Returns whether this call ran it.
    fn terminate(&self, keep_pending: bool) -> bool {
        self.teardown.run(|| {
            let handle = {
                let mut lifecycle = self.lifecycle.lock();
                lifecycle.advance(SubscriptionState::Terminating);
                lifecycle.handle.clone()
            };

            // Cut the producer off first so no callback lands after deregistration begins.
            self.slot.seal(keep_pending);
            if let Some(handle) = handle {
                self.deregister(&handle);
            }

            self.close();
        })
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn deregister(&self, handle: &SensorHandle) {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            self.protocol
                .deregister(self.subsystem.as_ref(), self.id, handle)
        }));

        match outcome {
            Ok(Ok(())) => debug!(sensor = %handle, listener = %self.id, "listener deregistered"),
            Ok(Err(error)) => {
                warn!(sensor = %handle, listener = %self.id, %error, "deregistration failed; ignoring");
            }
            Err(_) => {
                warn!(sensor = %handle, listener = %self.id, "deregistration panicked; ignoring");
            }
        }
    }
}

/// Object-safe view of a subscription, independent of its stream kind.
pub(crate) trait SubscriptionControl: Send + Sync {
    fn cancel(&self);
    fn state(&self) -> SubscriptionState;
    fn overwritten(&self) -> u64;
    fn listener_id(&self) -> ListenerId;
    fn kind(&self) -> SensorKind;
}

impl<P: Protocol> SubscriptionControl for Subscription<P> {
    fn cancel(&self) {
        Subscription::cancel(self);
    }

    fn state(&self) -> SubscriptionState {
        self.lifecycle.lock().state
    }

    fn overwritten(&self) -> u64 {
        self.slot.overwritten()
    }

    fn listener_id(&self) -> ListenerId {
        self.id
    }

    fn kind(&self) -> SensorKind {
        self.kind
    }
}

/// Cloneable, thread-safe control over a live stream's registration.
///
/// Handles outlive nothing: cancelling through a handle is the same as cancelling the stream,
/// and it is fine to keep a handle after the stream has been dropped.
#[derive(Clone)]
pub struct SubscriptionHandle {
    inner: Arc<dyn SubscriptionControl>,
}

impl SubscriptionHandle {
    /// Deregister and end the stream. Idempotent; callable from any thread.
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        self.inner.state()
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state().is_closed()
    }

    /// Samples discarded by latest-value-wins because the consumer was not ready.
    #[must_use]
    pub fn dropped_samples(&self) -> u64 {
        self.inner.overwritten()
    }

    #[must_use]
    pub fn listener_id(&self) -> ListenerId {
        self.inner.listener_id()
    }

    #[must_use]
    pub fn kind(&self) -> SensorKind {
        self.inner.kind()
    }
}

impl core::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("listener", &self.listener_id())
            .field("kind", &self.kind())
            .field("state", &self.state())
            .finish()
    }
}

// Poll-side half of a stream: starts the subscription lazily and drains its slot.
pub(crate) struct Driver<P: Protocol> {
    subscription: Arc<Subscription<P>>,
    started: bool,
    finished: bool,
}

impl<P: Protocol> Driver<P> {
    pub(crate) fn new(subscription: Arc<Subscription<P>>) -> Self {
        Self {
            subscription,
            started: false,
            finished: false,
        }
    }

    pub(crate) fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Option<StreamItem<P::Item>>> {
        if self.finished {
            return Poll::Ready(None);
        }

        if !self.started {
            self.started = true;
            if let Err(error) = self.subscription.start() {
                self.finished = true;
                return Poll::Ready(Some(StreamItem::Error(error)));
            }
        }

        match self.subscription.slot.poll_take(cx) {
            Poll::Ready(Some(value)) => Poll::Ready(Some(StreamItem::Value(value))),
            Poll::Ready(None) => {
                self.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    pub(crate) fn cancel(&self) {
        self.subscription.cancel();
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn state(&self) -> SubscriptionState {
        SubscriptionControl::state(self.subscription.as_ref())
    }

    pub(crate) fn handle(&self) -> SubscriptionHandle {
        SubscriptionHandle {
            inner: self.subscription.clone(),
        }
    }
}

impl<P: Protocol> Drop for Driver<P> {
    fn drop(&mut self) {
        self.subscription.cancel();
    }
}
