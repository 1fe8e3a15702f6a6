//! Pipeline example combining sequential and parallel steps.
//!
//! Measures a greeting, doubles and triples the length in parallel, then
//! adds both results together.
//!
//! Run with: cargo run --example pipeline

use kyro::pipeline::{BranchResults, Step, StepError, assert_in, execute, in_parallel, in_sequence};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let generate = Step::generator(|| async { Ok::<_, StepError>("Hello, Kyro Pipeline!".to_string()) });
    let string_length = Step::new(|input: String, _| async move { Ok(input.len()) });
    let double = Step::new(|input: usize, _| async move { Ok(input * 2) });
    let triple = Step::new(|input: usize, _| async move { Ok(input * 3) });
    let add = Step::new(|input: BranchResults, _| async move {
        let first = assert_in::<usize>(input[0].clone());
        let second = assert_in::<usize>(input[1].clone());
        Ok(first + second)
    });

    let pipeline = in_sequence(vec![
        generate,
        string_length,
        in_parallel(vec![double, triple]),
        add,
    ]);

    let result = execute(&pipeline).await.into_result()?;
    let total = result.and_then(|value| value.downcast_ref::<usize>().copied());

    println!("Pipeline execution successful. Final result: {total:?}");
    Ok(())
}
