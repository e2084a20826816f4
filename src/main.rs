//! Calc Cache - sample workload driver
//!
//! Runs a repeated amortization workload through the caches and prints the
//! resulting cache statistics and operation metrics as JSON.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::json;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use calc_cache::amortization::{
    amortization_schedule, monthly_payment, total_interest, EXTRA_PAYMENT,
};
use calc_cache::memo::encode_key;
use calc_cache::{
    memoize, spawn_cleanup_task, Cache, CacheConfig, CalculationCache, CalculationParams,
    OperationMonitor,
};

/// (principal, annual rate, term in months)
const SAMPLE_LOANS: [(f64, f64, u32); 4] = [
    (200_000.0, 0.06, 360),
    (350_000.0, 0.0525, 360),
    (25_000.0, 0.079, 60),
    (12_000.0, 0.0, 48),
];

const ROUNDS: usize = 5;

const CLEANUP_INTERVAL: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calc_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: ttl={}ms, max_size={}, strategy={}",
        config.ttl.as_millis(),
        config.max_size,
        config.strategy
    );

    let payments: Arc<Cache<f64>> = Arc::new(Cache::try_new(config.clone())?);
    let cleanup_handle = spawn_cleanup_task(payments.clone(), CLEANUP_INTERVAL);

    let schedules = CalculationCache::new();
    let monitor = OperationMonitor::global();
    let interest = memoize(
        |(principal, rate, term): (f64, f64, u32)| total_interest(principal, rate, term),
        config,
    );

    let mut extra = CalculationParams::new();
    extra.insert(EXTRA_PAYMENT.to_string(), 150.0);

    for round in 0..ROUNDS {
        for &(principal, rate, term) in &SAMPLE_LOANS {
            // Generic cache, instrumented by hand
            let key = encode_key(&(principal, rate, term))?;
            let start = Instant::now();
            let hit = if payments.get(&key).is_some() {
                true
            } else {
                payments.set(&key, monthly_payment(principal, rate, term));
                false
            };
            monitor.record(
                "monthly_payment",
                hit,
                start.elapsed().as_secs_f64() * 1000.0,
            );

            // Specialized cache, instrumented by the timing wrapper
            let params = (round % 2 == 1).then_some(&extra);
            let rows = monitor.with_timing("amortization_schedule", || {
                if let Some(rows) =
                    schedules.get_amortization_schedule(principal, rate, term, params)
                {
                    return Ok(rows);
                }
                let rows = amortization_schedule(principal, rate, term, params);
                if rows.is_empty() {
                    anyhow::bail!("empty schedule for {} over {} months", principal, term);
                }
                schedules.set_amortization_schedule(principal, rate, term, params, rows.clone());
                Ok(rows)
            });
            if let Err(e) = rows {
                warn!("Schedule calculation failed: {}", e);
            }

            // Memoized function
            let _ = interest((principal, rate, term));
        }
    }

    let report = json!({
        "payments": payments.stats(),
        "schedules": schedules.stats(),
        "operations": monitor.get_metrics(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    cleanup_handle.abort();
    info!("Workload complete");

    Ok(())
}
