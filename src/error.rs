use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Project path '{}' does not exist.", .0.display())]
    NotFound(PathBuf),
    #[error("'{}' is not a directory.", .0.display())]
    NotADirectory(PathBuf),
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write snapshot: {0}")]
    Write(#[source] std::io::Error),
}
impl SnapshotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SnapshotError::Io {
            path: path.into(),
            source,
        }
    }
    /// True for failures caused by a bad project path rather than by the run itself.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SnapshotError::NotFound(_) | SnapshotError::NotADirectory(_)
        )
    }
}
