use std::io::Write;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use kyro::pipeline::{Step, execute, in_parallel, in_sequence};
use kyro::pool::{BoxError, Line, ParallelFileProcessor, ParallelQueue};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MockRecord {
    id: u64,
    username: String,
    tags: Vec<String>,
}

fn mock_record(id: u64) -> MockRecord {
    MockRecord {
        id,
        username: format!("user_{}", id),
        tags: (0..5).map(|i| format!("tag{}", i)).collect(),
    }
}

async fn parse_record(line: Line) -> Result<(), BoxError> {
    let record: MockRecord = serde_json::from_slice(&line)?;
    if record.id % 1000 == 0 {
        return Err(format!("rejected record {}", record.id).into());
    }
    Ok(())
}

fn bench_queue_worker_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_worker_counts");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let items: Vec<MockRecord> = (0..10_000).map(mock_record).collect();

    for workers in [1usize, 4, 16, 64] {
        group.throughput(Throughput::Elements(items.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.to_async(&runtime).iter(|| {
                let items = items.clone();
                async move {
                    let (_, result) = ParallelQueue::new(workers)
                        .with_items(items)
                        .on_process_item(|record: MockRecord| async move {
                            serde_json::to_vec(&record)?;
                            Ok::<(), BoxError>(())
                        })
                        .process()
                        .await;
                    result.unwrap();
                }
            });
        });
    }

    group.finish();
}

fn bench_file_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_lines");
    let runtime = tokio::runtime::Runtime::new().unwrap();

    let mut file = tempfile::NamedTempFile::new().unwrap();
    for id in 1..=20_000 {
        serde_json::to_writer(&mut file, &mock_record(id)).unwrap();
        file.write_all(b"\n").unwrap();
    }
    file.flush().unwrap();

    for workers in [2usize, 8, 32] {
        group.throughput(Throughput::Elements(20_000));
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.to_async(&runtime).iter(|| async {
                let (failed, _) = ParallelFileProcessor::new(workers)
                    .with_file_path(file.path())
                    .on_process_line(parse_record)
                    .process()
                    .await;
                assert_eq!(failed.len(), 20);
            });
        });
    }

    group.finish();
}

fn bench_parallel_fan_out(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let pipeline = in_sequence(vec![
        Step::generator(|| async { Ok(mock_record(7)) }),
        in_parallel(
            (0..8)
                .map(|_| Step::new(|record: MockRecord, _| async move { Ok(record.tags.len()) }))
                .collect::<Vec<_>>(),
        ),
    ]);

    c.bench_function("parallel_fan_out_8", |b| {
        b.to_async(&runtime).iter(|| async {
            execute(&pipeline).await.into_result().unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_queue_worker_counts,
    bench_file_lines,
    bench_parallel_fan_out
);
criterion_main!(benches);
