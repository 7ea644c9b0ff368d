use anyhow::Context;
use clap::Parser;
use msglog_processor::ProcessingStats;
use msglog_processor::cli::{Args, setup_logging};
use msglog_processor::processor::LogProcessor;
use std::process;
use tokio_util::sync::CancellationToken;
use tracing::info;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let cancellation_token = CancellationToken::new();

        // The run sees the cancellation between chunks and closes its output
        let shutdown_token = cancellation_token.clone();
        let shutdown_signal = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nReceived CTRL+C, shutting down gracefully...");
                shutdown_token.cancel();
            }
        });

        let result = run(&args, cancellation_token).await;
        shutdown_signal.abort();
        result
    });

    match result {
        Ok(_stats) => process::exit(0),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}

async fn run(args: &Args, cancellation_token: CancellationToken) -> anyhow::Result<ProcessingStats> {
    let input = args.input_source()?;
    let config = args.to_config();

    info!("Starting message log processor");

    let mut processor = LogProcessor::new(input, args.output.clone())
        .with_config(config)
        .with_cancellation(cancellation_token);

    processor
        .process()
        .await
        .with_context(|| format!("Failed to process into {}", args.output.display()))
}
