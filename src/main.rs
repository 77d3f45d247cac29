use std::process;

use clap::Parser;
use release_notes_bot::action::is_already_reported;
use release_notes_bot::Cli;

#[tokio::main]
async fn main() {
    // RUST_LOG controls diagnostics (default "warn"); they go to stderr so
    // stdout stays reserved for workflow commands and command output.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.execute().await {
        // Failures already sent to the workflow log only set the exit code
        if is_already_reported(&e) {
            process::exit(1);
        }

        eprintln!("Error: {e}");

        let mut source = e.source();
        while let Some(err) = source {
            eprintln!("  Caused by: {err}");
            source = err.source();
        }

        process::exit(1);
    }
}
