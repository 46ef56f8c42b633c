//! Entry point for the a203-extract binary.
//!
//! Takes no arguments: extracts `A47/A203.zip` into the working directory
//! and prints a single completion line on success. Any failure is returned
//! from `main`, which reports it on stderr and exits non-zero.

use anyhow::{Context, Result};
use clap::Parser;

use a203_extract::{COMPLETION_MESSAGE, Cli, ExtractConfig, Extractor};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr so stdout carries only the completion line
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    let config = ExtractConfig::default();
    let extractor = Extractor::new(config);
    extractor.run().await.with_context(|| {
        format!(
            "failed to extract {}",
            extractor.config().archive_path.display()
        )
    })?;

    println!("{}", COMPLETION_MESSAGE);

    Ok(())
}
