//! Worker pool over an in-memory collection, throttled by a rate limiter.
//!
//! Run with: cargo run --example parallel_queue

use std::sync::Arc;

use kyro::pool::{BoxError, ParallelQueue};
use kyro::util::RateLimiter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let ids: Vec<u32> = (1..=1000).collect();
    let limiter = Arc::new(RateLimiter::new(400.0, 40)?);

    let (failed, result) = ParallelQueue::new(40)
        .with_items(ids)
        .with_progress_notifier(100, |processed, elapsed, rate| {
            tracing::info!("Processed {} items in {:?} ({:.2} items/sec)", processed, elapsed, rate);
        })
        .with_error_notifier(|err, item: &u32| {
            tracing::warn!("Error processing item {}: {}", item, err);
        })
        .on_process_item(move |item: u32| {
            let limiter = Arc::clone(&limiter);
            async move {
                limiter.wait().await;
                if item % 420 == 0 {
                    return Err::<(), BoxError>(format!("simulated error for item {item}").into());
                }
                Ok(())
            }
        })
        .process()
        .await;

    if let Err(err) = result {
        println!("Error during data processing: {err}");
        println!("Errored items: {failed:?}");
    }

    Ok(())
}
