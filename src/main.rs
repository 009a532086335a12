//! Main entry point for the blocksig CLI app

use blocksig::{cli, workers};
use std::time::Instant;

fn main() -> std::process::ExitCode {
    if let Err(e) = run_app() {
        eprintln!("Error: {}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

fn run_app() -> Result<(), Box<dyn std::error::Error>> {
    let args = cli::run();

    let input = cli::open_input(&args.input)
        .map_err(|e| format!("{}: {}", args.input.display(), e))?;
    let output = cli::open_output(&args.output)
        .map_err(|e| format!("{}: {}", args.output.display(), e))?;

    let jobs = if args.jobs == 0 {
        // One extra worker over the core count keeps the CPU busy while
        // siblings sit in read syscalls.
        num_cpus::get() + 1
    } else {
        args.jobs
    };

    let input_len = input.metadata()?.len();
    let start_ts = Instant::now();

    workers::generate_signature(&input, &output, args.block_size, jobs)?;

    let duration = start_ts.elapsed();
    let throughput = if duration.as_secs_f64() > 0.0 {
        (input_len as f64 / (1024.0 * 1024.0)) / duration.as_secs_f64()
    } else {
        0.0
    };
    println!(
        "[blocksig] Manifest complete | Blocks: {} | Input: {:.2} MiB | Time: {:.2}s | {:.1} MB/s",
        input_len.div_ceil(args.block_size),
        input_len as f64 / (1024.0 * 1024.0),
        duration.as_secs_f64(),
        throughput,
    );

    Ok(())
}
