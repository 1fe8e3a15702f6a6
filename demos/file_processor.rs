//! Worker pool over the lines of a JSON Lines file.
//!
//! Run with: cargo run --example file_processor [path]

use kyro::pool::{BoxError, Line, ParallelFileProcessor};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Record {
    id: u64,
    #[allow(dead_code)]
    name: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/data/items.jsonl".to_string());

    let (failed, result) = ParallelFileProcessor::new(5)
        .with_file_path(&path)
        .with_progress_notifier(10, |processed, elapsed, rate| {
            tracing::info!("Processed {} lines in {:?} ({:.2} lines/sec)", processed, elapsed, rate);
        })
        .with_error_notifier(|err, line: &Line| {
            tracing::warn!("Error processing line {}: {}", String::from_utf8_lossy(line), err);
        })
        .on_process_line(|line: Line| async move {
            let record: Record = serde_json::from_slice(&line)?;
            tracing::debug!(id = record.id, "parsed record");
            Ok::<(), BoxError>(())
        })
        .process()
        .await;

    if let Err(err) = result {
        println!("Error during data processing: {err}");
        for line in &failed {
            println!("Errored line: {}", String::from_utf8_lossy(line));
        }
    }

    Ok(())
}
