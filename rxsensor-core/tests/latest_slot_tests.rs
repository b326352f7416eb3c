// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use futures::future::poll_fn;
use futures::task::noop_waker_ref;
use rxsensor_core::{LatestSlot, Offer};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

fn poll_once<T>(slot: &LatestSlot<T>) -> Poll<Option<T>> {
    let mut cx = Context::from_waker(noop_waker_ref());
    slot.poll_take(&mut cx)
}

#[test]
fn latest_value_wins_when_consumer_stalls() {
    let slot = LatestSlot::new();

    assert_eq!(slot.offer("s1"), Offer::Stored);
    assert_eq!(slot.offer("s2"), Offer::Replaced);
    assert_eq!(slot.offer("s3"), Offer::Replaced);

    assert_eq!(poll_once(&slot), Poll::Ready(Some("s3")));
    assert_eq!(poll_once(&slot), Poll::Pending);
    assert_eq!(slot.overwritten(), 2);
}

#[test]
fn empty_open_slot_is_pending() {
    let slot = LatestSlot::<u32>::new();
    assert_eq!(poll_once(&slot), Poll::Pending);
    assert!(slot.is_open());
}

#[test]
fn sealed_slot_rejects_offers_and_can_drop_pending() {
    let slot = LatestSlot::new();
    slot.offer(1);

    slot.seal(false);

    assert_eq!(slot.offer(2), Offer::Rejected);
    assert!(!slot.has_pending());
    // Sealed is not closed: the consumer still waits.
    assert_eq!(poll_once(&slot), Poll::Pending);
}

#[test]
fn close_delivers_kept_value_before_end_of_stream() {
    let slot = LatestSlot::new();
    slot.offer(7);

    slot.seal(true);
    slot.close();

    assert_eq!(poll_once(&slot), Poll::Ready(Some(7)));
    assert_eq!(poll_once(&slot), Poll::Ready(None));
    assert!(slot.is_closed());
}

#[test]
fn close_is_idempotent() {
    let slot = LatestSlot::<u8>::new();
    slot.close();
    slot.close();
    assert_eq!(poll_once(&slot), Poll::Ready(None));
}

#[tokio::test]
async fn offer_from_another_thread_wakes_consumer() {
    let slot = Arc::new(LatestSlot::new());
    let producer = slot.clone();

    let thread = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(10));
        producer.offer(42u64);
    });

    let value = tokio::time::timeout(Duration::from_secs(1), poll_fn(|cx| slot.poll_take(cx)))
        .await
        .expect("consumer should be woken by the offer");

    assert_eq!(value, Some(42));
    thread.join().unwrap();
}

#[tokio::test]
async fn close_from_another_thread_wakes_consumer() {
    let slot = Arc::new(LatestSlot::<u64>::new());
    let owner = slot.clone();

    let thread = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(10));
        owner.close();
    });

    let value = tokio::time::timeout(Duration::from_secs(1), poll_fn(|cx| slot.poll_take(cx)))
        .await
        .expect("consumer should observe the close");

    assert_eq!(value, None);
    thread.join().unwrap();
}
