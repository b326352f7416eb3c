// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Sensor Console - RxSensor on a simulated phone
//!
//! This demo shows:
//! - A switch-mapped accelerometer stream: every tick cancels the running subscription
//!   (deregistering its listener) before the next one starts with another sampling period
//! - A significant-motion trigger that is re-armed each time it fires
//! - How a missing sensor is reported
//!
//! ```text
//! notifier thread ──callbacks──▶ MockSensorSubsystem ──▶ SensorStreamAdapter ──▶ tasks
//! ```
//!
//! Run with: `cargo run -p sensor-console`
//! Set `RUST_LOG=rxsensor=debug` to watch registrations come and go.

mod notifier;

use anyhow::Context as _;
use notifier::Notifier;
use rxsensor::{
    CancellationToken, SamplingPeriod, SensorKind, SensorSample, SensorStreamAdapter, TriggerSignal,
};
use rxsensor_exec::{spawn_subscription, SubscribeExt, SubscriptionOutcome, SubscriptionTask};
use rxsensor_test_utils::fixtures;
use std::time::Duration;
use tokio::select;
use tokio::signal;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt as _;
use tracing_subscriber::EnvFilter;

const RUN_FOR: Duration = Duration::from_secs(6);
const TOGGLE_EVERY: Duration = Duration::from_millis(1500);

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .init();
}

fn subscribe_accelerometer(adapter: &SensorStreamAdapter, period: SamplingPeriod) -> SubscriptionTask {
    println!("  [Accelerometer] subscribing at {period:?}");
    spawn_subscription(
        adapter.observe_sensor(SensorKind::Accelerometer, period),
        |sample: SensorSample, _token| async move {
            let values = sample.values();
            println!(
                "  [Accelerometer] x={:+.2} y={:+.2} z={:+.2} @ {} ns",
                values[0], values[1], values[2],
                sample.timestamp_ns()
            );
            // Slow consumer: samples arriving meanwhile collapse into the latest one.
            tokio::time::sleep(Duration::from_millis(250)).await;
        },
        |error| eprintln!("  [Accelerometer] {error}"),
        || println!("  [Accelerometer] completed"),
    )
}

// Switch-map: each tick replaces the running subscription with a new one.
fn toggle_accelerometer(adapter: SensorStreamAdapter, token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticks = IntervalStream::new(tokio::time::interval(TOGGLE_EVERY));
        let mut periods = [SamplingPeriod::Game, SamplingPeriod::Normal].into_iter().cycle();
        let mut current: Option<SubscriptionTask> = None;

        loop {
            select! {
                _ = ticks.next() => {
                    if let Some(previous) = current.take() {
                        stop_subscription(previous).await;
                    }
                    if let Some(period) = periods.next() {
                        current = Some(subscribe_accelerometer(&adapter, period));
                    }
                }
                _ = token.cancelled() => break,
            }
        }

        if let Some(previous) = current.take() {
            stop_subscription(previous).await;
        }
    })
}

async fn stop_subscription(task: SubscriptionTask) {
    task.cancel();
    if let Err(error) = task.join().await {
        tracing::warn!(%error, "accelerometer subscription task failed");
    }
}

fn watch_significant_motion(adapter: SensorStreamAdapter, token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let outcome = adapter
                .single_trigger_stream(SensorKind::SignificantMotion)
                .subscribe(
                    |signal: TriggerSignal, _token| async move {
                        println!("  [Motion] significant motion @ {} ns", signal.timestamp_ns());
                    },
                    |error| eprintln!("  [Motion] {error}"),
                    || println!("  [Motion] re-arming"),
                    Some(token.clone()),
                )
                .await;

            if !outcome.is_completed() {
                break;
            }
        }
    })
}

async fn report_missing_gyroscope(adapter: &SensorStreamAdapter) {
    let outcome = adapter
        .observe(SensorKind::Gyroscope)
        .subscribe(|_sample, _token| async {}, |_error| {}, || {}, None)
        .await;

    if let SubscriptionOutcome::Failed(error) = outcome {
        println!("  [Gyroscope] {error} (permanent: {})", error.is_permanent());
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    println!("\n📱 RxSensor Console");
    println!("===================\n");
    println!("Press Ctrl+C to stop\n");

    let device = fixtures::phone();
    let adapter = SensorStreamAdapter::new(device.clone());
    tracing::info!(sensors = ?adapter.resolver().available_kinds(), "device ready");

    let notifier = Notifier::start(device.clone(), 0x5EED);
    let token = CancellationToken::new();

    report_missing_gyroscope(&adapter).await;
    let accelerometer = toggle_accelerometer(adapter.clone(), token.clone());
    let motion = watch_significant_motion(adapter.clone(), token.clone());

    select! {
        _ = signal::ctrl_c() => println!("\n\n🛑 Shutting down gracefully...\n"),
        _ = tokio::time::sleep(RUN_FOR) => println!("\n\n⏱️  Time is up, shutting down...\n"),
    }

    token.cancel();
    accelerometer.await.context("accelerometer task failed")?;
    motion.await.context("motion task failed")?;
    notifier.stop();

    println!(
        "✅ Stopped with {} listeners and {} triggers still registered\n",
        device.active_listener_count(),
        device.active_trigger_count()
    );
    Ok(())
}
