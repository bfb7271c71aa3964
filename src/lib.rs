//! # Codebase Snapshot
//!
//! `codebase_snapshot` walks a project directory and writes a single plain-text file holding
//! a rendered directory tree followed by the contents of every source, config and
//! documentation file, ready to paste into a language model's context.
//!
//! Inclusion is decided by an [`InclusionRules`] value: ignored directory names are pruned,
//! ignored file names and binary extensions are skipped, allow-listed extensions are kept, and
//! files without an extension are kept when their first bytes look like UTF-8 text.
//!
//! # Features
//!
//! - `logging`: Enables debug logging via the `tracing` crate.
//!
//! # Example
//!
//! ```no_run
//! use codebase_snapshot::{SnapshotBuilder, create_snapshot};
//!
//! let options = SnapshotBuilder::new(".")
//!     .output("context.txt")
//!     .max_depth(3)
//!     .build();
//!
//! let summary = create_snapshot(options).expect("Failed to write snapshot");
//! println!("{} files written to {}", summary.files_processed, summary.output_path.display());
//! ```

mod engine;
mod error;
mod options;
pub mod output;
pub mod reader;
pub mod rules;
pub mod tree;
mod types;

pub use engine::{PROGRESS_INTERVAL, Snapshot, create_snapshot};
pub use error::SnapshotError;
pub use options::{SnapshotBuilder, SnapshotOptions};
pub use reader::{Encoding, read_file_content};
pub use rules::InclusionRules;
pub use tree::render_tree;
pub use types::SnapshotSummary;
