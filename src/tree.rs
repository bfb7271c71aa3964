//! Renders the directory listing shown in the snapshot's `DIRECTORY STRUCTURE` section.

use crate::error::SnapshotError;
use crate::rules::InclusionRules;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

/// Line emitted in place of a subtree whose directory could not be listed.
pub const PERMISSION_DENIED_MARKER: &str = "[Permission Denied]";

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

/// Renders the tree below `root` as one string per line, without the root line itself.
///
/// Directories come before files at every level, each group sorted case-insensitively.
/// With `max_depth` set, nothing deeper than that many levels is listed; `Some(0)` yields
/// no lines at all.
///
/// # Errors
///
/// A directory that cannot be read for lack of permission is rendered as
/// [`PERMISSION_DENIED_MARKER`]; any other listing failure is returned.
pub fn render_tree(
    root: &Path,
    rules: &InclusionRules,
    max_depth: Option<usize>,
) -> Result<Vec<String>, SnapshotError> {
    TreeRenderer::new(rules, max_depth).render(root)
}

struct Child {
    path: PathBuf,
    name: String,
    descend: bool,
}

pub(crate) struct TreeRenderer<'a> {
    rules: &'a InclusionRules,
    max_depth: Option<usize>,
    skip: Option<&'a Path>,
}

impl<'a> TreeRenderer<'a> {
    pub(crate) fn new(rules: &'a InclusionRules, max_depth: Option<usize>) -> Self {
        Self {
            rules,
            max_depth,
            skip: None,
        }
    }

    /// Leaves `path` out of the listing entirely.
    pub(crate) fn skip(mut self, path: Option<&'a Path>) -> Self {
        self.skip = path;
        self
    }

    pub(crate) fn render(&self, root: &Path) -> Result<Vec<String>, SnapshotError> {
        let mut lines = Vec::new();
        self.render_dir(root, "", 0, &mut lines)?;
        Ok(lines)
    }

    fn render_dir(
        &self,
        dir: &Path,
        prefix: &str,
        depth: usize,
        lines: &mut Vec<String>,
    ) -> Result<(), SnapshotError> {
        if self.max_depth.is_some_and(|max| depth >= max) {
            return Ok(());
        }
        let (dirs, files) = match self.list(dir) {
            Ok(children) => children,
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                #[cfg(feature = "logging")]
                tracing::debug!("Permission denied listing {}", dir.display());
                lines.push(format!("{}{}", prefix, PERMISSION_DENIED_MARKER));
                return Ok(());
            }
            Err(e) => return Err(SnapshotError::io(dir, e)),
        };

        let count = dirs.len() + files.len();
        for (i, child) in dirs.iter().chain(files.iter()).enumerate() {
            let (branch, continuation) = if i + 1 == count {
                (LAST_BRANCH, BLANK)
            } else {
                (BRANCH, PIPE)
            };
            lines.push(format!("{}{}{}", prefix, branch, child.name));
            if child.descend {
                let next_prefix = format!("{}{}", prefix, continuation);
                self.render_dir(&child.path, &next_prefix, depth + 1, lines)?;
            }
        }
        Ok(())
    }

    /// Included subdirectories and files of `dir`, each sorted for display.
    fn list(&self, dir: &Path) -> io::Result<(Vec<Child>, Vec<Child>)> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            if self.skip == Some(path.as_path()) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if path.is_dir() {
                if self.rules.should_include_dir(&path) {
                    // symlinked directories are listed but never entered
                    let descend = !entry.file_type()?.is_symlink();
                    dirs.push(Child {
                        path,
                        name,
                        descend,
                    });
                }
            } else if path.is_file() && self.rules.should_include_file(&path) {
                files.push(Child {
                    path,
                    name,
                    descend: false,
                });
            }
        }
        sort_by_name(&mut dirs);
        sort_by_name(&mut files);
        Ok((dirs, files))
    }
}

fn sort_by_name(children: &mut [Child]) {
    children.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
}
