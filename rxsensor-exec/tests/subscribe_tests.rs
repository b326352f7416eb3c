// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use parking_lot::Mutex;
use rxsensor::{CancellationToken, SensorError, SensorKind, SensorSample, SensorStreamAdapter};
use rxsensor_exec::{spawn_subscription, SubscribeExt, SubscriptionOutcome};
use rxsensor_test_utils::{fixtures, wait_until};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::spawn;

const TIMEOUT_MS: u64 = 500;

#[tokio::test]
async fn test_subscribe_delivers_samples_until_cancelled() -> anyhow::Result<()> {
    // Arrange
    let mock = fixtures::phone();
    let adapter = SensorStreamAdapter::new(mock.clone());
    let stream = adapter.observe(SensorKind::Accelerometer);
    let received = Arc::new(Mutex::new(Vec::new()));
    let token = CancellationToken::new();

    let task = spawn({
        let received = received.clone();
        let token = token.clone();
        async move {
            stream
                .subscribe(
                    move |sample: SensorSample, _token| {
                        received.lock().push(sample.timestamp_ns());
                        async {}
                    },
                    |error| panic!("unexpected error: {error}"),
                    || panic!("continuous stream must not complete"),
                    Some(token),
                )
                .await
        }
    });
    wait_until(|| mock.active_listener_count() == 1, TIMEOUT_MS).await;

    // Act
    for timestamp in 1..=3_i64 {
        mock.emit_sample(SensorKind::Accelerometer, fixtures::marked(1.0), timestamp);
        wait_until(|| received.lock().last() == Some(&timestamp), TIMEOUT_MS).await;
    }
    token.cancel();

    // Assert
    assert_eq!(task.await?, SubscriptionOutcome::Cancelled);
    assert_eq!(*received.lock(), vec![1, 2, 3]);
    assert_eq!(mock.deregistration_count(), 1);
    assert_eq!(mock.active_listener_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_completes_trigger_stream() -> anyhow::Result<()> {
    // Arrange
    let mock = fixtures::phone();
    let adapter = SensorStreamAdapter::new(mock.clone());
    let stream = adapter.single_trigger_stream(SensorKind::SignificantMotion);
    let signals = Arc::new(AtomicUsize::new(0));
    let completions = Arc::new(AtomicUsize::new(0));

    let task = spawn({
        let signals = signals.clone();
        let completions = completions.clone();
        async move {
            stream
                .subscribe(
                    move |_signal, _token| {
                        signals.fetch_add(1, Ordering::SeqCst);
                        async {}
                    },
                    |error| panic!("unexpected error: {error}"),
                    move || {
                        completions.fetch_add(1, Ordering::SeqCst);
                    },
                    None,
                )
                .await
        }
    });
    wait_until(|| mock.active_trigger_count() == 1, TIMEOUT_MS).await;

    // Act
    mock.fire_trigger(SensorKind::SignificantMotion, 5);

    // Assert
    assert_eq!(task.await?, SubscriptionOutcome::Completed);
    assert_eq!(signals.load(Ordering::SeqCst), 1);
    assert_eq!(completions.load(Ordering::SeqCst), 1);
    assert_eq!(mock.deregistration_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_subscribe_reports_unavailable_sensor_once() {
    // Arrange
    let mock = fixtures::phone();
    let adapter = SensorStreamAdapter::new(mock.clone());
    let errors = Arc::new(Mutex::new(Vec::new()));

    // Act
    let outcome = adapter
        .observe(SensorKind::Gyroscope)
        .subscribe(
            |_sample, _token| async {},
            {
                let errors = errors.clone();
                move |error| errors.lock().push(error)
            },
            || panic!("failed stream must not complete"),
            None,
        )
        .await;

    // Assert
    let expected = SensorError::unavailable(SensorKind::Gyroscope);
    assert_eq!(outcome, SubscriptionOutcome::Failed(expected.clone()));
    assert_eq!(outcome.error(), Some(&expected));
    assert_eq!(*errors.lock(), vec![expected]);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_already_cancelled_token_never_registers() {
    // Arrange
    let mock = fixtures::phone();
    let adapter = SensorStreamAdapter::new(mock.clone());
    let token = CancellationToken::new();
    token.cancel();

    // Act
    let outcome = adapter
        .observe(SensorKind::Accelerometer)
        .subscribe(
            |_sample, _token| async {},
            |_error| {},
            || {},
            Some(token),
        )
        .await;

    // Assert
    assert!(outcome.is_cancelled());
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_spawned_subscription_cancels_on_drop() -> anyhow::Result<()> {
    // Arrange
    let mock = fixtures::phone();
    let adapter = SensorStreamAdapter::new(mock.clone());
    let task = spawn_subscription(
        adapter.observe(SensorKind::Accelerometer),
        |_sample, _token| async {},
        |_error| {},
        || {},
    );
    wait_until(|| mock.active_listener_count() == 1, TIMEOUT_MS).await;

    // Act
    drop(task);

    // Assert
    wait_until(|| mock.deregistration_count() == 1, TIMEOUT_MS).await;
    assert_eq!(mock.active_listener_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_spawned_subscription_join_reports_outcome() -> anyhow::Result<()> {
    // Arrange
    let mock = fixtures::phone();
    let adapter = SensorStreamAdapter::new(mock.clone());
    let task = spawn_subscription(
        adapter.observe(SensorKind::Accelerometer),
        |_sample, _token| async {},
        |_error| {},
        || {},
    );
    wait_until(|| mock.active_listener_count() == 1, TIMEOUT_MS).await;

    // Act
    task.cancel();
    let outcome = task.join().await?;

    // Assert
    assert_eq!(outcome, SubscriptionOutcome::Cancelled);
    assert_eq!(mock.deregistration_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_spawned_subscription_stops_when_its_token_is_cancelled() -> anyhow::Result<()> {
    // Arrange
    let mock = fixtures::phone();
    let adapter = SensorStreamAdapter::new(mock.clone());
    let task = spawn_subscription(
        adapter.observe(SensorKind::Accelerometer),
        |_sample, _token| async {},
        |_error| {},
        || {},
    );
    wait_until(|| mock.active_listener_count() == 1, TIMEOUT_MS).await;
    let token = task.cancellation_token().clone();

    // Act
    assert!(token.cancel());
    wait_until(|| task.is_finished(), TIMEOUT_MS).await;

    // Assert
    assert!(task.cancellation_token().is_cancelled());
    let outcome = task.join().await?;
    assert!(outcome.is_cancelled());
    assert_eq!(outcome.error(), None);
    assert_eq!(mock.deregistration_count(), 1);
    Ok(())
}
