//! Command-line interface for codebase_snapshot.
//!
//! Writes a single text file with the project's directory tree and file contents.

use clap::Parser;
use clap::error::ErrorKind;
use codebase_snapshot::{Snapshot, SnapshotBuilder, SnapshotError, SnapshotOptions};
use std::path::PathBuf;
use std::process::exit;

/// Generate a comprehensive codebase snapshot for LLM analysis
#[derive(Parser)]
#[command(name = "snapshot", version, about, long_about = None)]
struct Cli {
    /// Path to the project directory
    project_path: PathBuf,

    /// Output file name (default: auto-generated)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum directory depth for tree display
    #[arg(short = 'd', long)]
    max_depth: Option<usize>,
}

impl Cli {
    fn into_options(self) -> SnapshotOptions {
        let mut builder = SnapshotBuilder::new(self.project_path);
        if let Some(output) = self.output {
            builder = builder.output(output);
        }
        builder = if let Some(depth) = self.max_depth {
            builder.max_depth(depth)
        } else {
            builder.no_limit_depth()
        };
        builder.build()
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            e.print().ok();
            exit(1);
        }
    };

    #[cfg(feature = "logging")]
    init_logging();

    if let Err(e) = run(cli.into_options()) {
        if e.is_invalid_input() {
            println!("Error: {}", e);
        } else {
            println!("Error creating snapshot: {}", e);
        }
        exit(1);
    }
}

fn run(options: SnapshotOptions) -> Result<(), SnapshotError> {
    let snapshot = Snapshot::prepare(options)?;
    println!(
        "Creating codebase snapshot for: {}",
        snapshot.project_path().display()
    );
    println!("Output file: {}", snapshot.output_path().display());

    let summary = snapshot.write(|count| println!("Processed {} files...", count))?;

    println!(
        "Snapshot created successfully: {}",
        summary.output_path.display()
    );
    println!("Total files processed: {}", summary.files_processed);
    Ok(())
}

#[cfg(feature = "logging")]
fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
