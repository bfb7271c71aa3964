use std::path::PathBuf;

/// Outcome of a completed snapshot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotSummary {
    /// Final component of the project path.
    pub project_name: String,
    /// The project directory, absolute and with symlinks resolved.
    pub project_path: PathBuf,
    /// Where the snapshot was written.
    pub output_path: PathBuf,
    /// Number of file blocks in the `FILE CONTENTS` section.
    pub files_processed: usize,
}
