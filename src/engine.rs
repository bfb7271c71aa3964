use crate::error::SnapshotError;
use crate::options::SnapshotOptions;
use crate::output;
use crate::reader::read_file_content;
use crate::rules::InclusionRules;
use crate::tree::TreeRenderer;
use crate::types::SnapshotSummary;
use chrono::{Local, NaiveDateTime};
use ignore::WalkBuilder;
use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
#[cfg(feature = "logging")]
use tracing;

/// How often, in files, the progress callback is invoked.
pub const PROGRESS_INTERVAL: usize = 10;

/// A validated snapshot run: the project exists, is a directory, and the output path is fixed.
#[derive(Debug)]
pub struct Snapshot {
    project_name: String,
    project_path: PathBuf,
    output_path: PathBuf,
    max_depth: Option<usize>,
    rules: InclusionRules,
}

impl Snapshot {
    /// Resolves the project root and settles on an output path.
    ///
    /// # Errors
    ///
    /// [`SnapshotError::NotFound`] or [`SnapshotError::NotADirectory`] when the root is
    /// unusable.
    pub fn prepare(options: SnapshotOptions) -> Result<Self, SnapshotError> {
        let requested = std::path::absolute(&options.root).unwrap_or_else(|_| options.root.clone());
        let metadata = match fs::metadata(&requested) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SnapshotError::NotFound(requested));
            }
            Err(e) => return Err(SnapshotError::io(requested, e)),
        };
        if !metadata.is_dir() {
            return Err(SnapshotError::NotADirectory(requested));
        }
        let project_path =
            fs::canonicalize(&requested).map_err(|e| SnapshotError::io(&requested, e))?;
        let project_name = project_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let output_path = options.output.unwrap_or_else(|| {
            PathBuf::from(output::default_output_name(
                &project_name,
                &Local::now().naive_local(),
            ))
        });
        Ok(Self {
            project_name,
            project_path,
            output_path,
            max_depth: options.max_depth,
            rules: options.rules,
        })
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Creates the output file and writes the whole snapshot into it.
    ///
    /// `progress` is called with the running count every [`PROGRESS_INTERVAL`] files. A
    /// failure part-way through leaves the partially written file in place.
    pub fn write(&self, progress: impl FnMut(usize)) -> Result<SnapshotSummary, SnapshotError> {
        let file =
            File::create(&self.output_path).map_err(|e| SnapshotError::io(&self.output_path, e))?;
        let own_output = fs::canonicalize(&self.output_path).ok();
        let mut out = BufWriter::new(file);
        let files_processed = self.render(
            &mut out,
            &Local::now().naive_local(),
            own_output.as_deref(),
            progress,
        )?;
        out.flush().map_err(SnapshotError::Write)?;
        Ok(SnapshotSummary {
            project_name: self.project_name.clone(),
            project_path: self.project_path.clone(),
            output_path: self.output_path.clone(),
            files_processed,
        })
    }

    /// Writes the snapshot document to `out`, stamped with `generated`, and returns the
    /// number of files dumped.
    pub fn write_to<W: Write>(
        &self,
        out: &mut W,
        generated: &NaiveDateTime,
        progress: impl FnMut(usize),
    ) -> Result<usize, SnapshotError> {
        self.render(out, generated, None, progress)
    }

    fn render<W: Write>(
        &self,
        out: &mut W,
        generated: &NaiveDateTime,
        skip: Option<&Path>,
        mut progress: impl FnMut(usize),
    ) -> Result<usize, SnapshotError> {
        #[cfg(feature = "logging")]
        tracing::debug!("Snapshotting {}", self.project_path.display());
        output::write_header(out, &self.project_name, &self.project_path, generated)
            .map_err(SnapshotError::Write)?;

        let tree = TreeRenderer::new(&self.rules, self.max_depth)
            .skip(skip)
            .render(&self.project_path)?;
        output::write_tree(out, &self.project_name, &tree).map_err(SnapshotError::Write)?;
        output::write_contents_heading(out).map_err(SnapshotError::Write)?;

        let mut files_processed = 0;
        for path in self.content_files() {
            if skip == Some(path.as_path()) || !self.rules.should_include_file(&path) {
                continue;
            }
            let relative = path.strip_prefix(&self.project_path).unwrap_or(&path);
            let content = read_file_content(&path);
            output::write_file(out, relative, &path, &content).map_err(SnapshotError::Write)?;
            files_processed += 1;
            if files_processed % PROGRESS_INTERVAL == 0 {
                progress(files_processed);
            }
        }

        output::write_footer(out, files_processed).map_err(SnapshotError::Write)?;
        Ok(files_processed)
    }

    /// Every non-directory entry below the root, top-down, skipping ignored directories.
    ///
    /// At each level the files come before the subdirectories' contents. Directories that
    /// cannot be listed are passed over.
    fn content_files(&self) -> impl Iterator<Item = PathBuf> {
        let rules = self.rules.clone();
        let mut builder = WalkBuilder::new(&self.project_path);
        builder
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_path(files_first)
            .filter_entry(move |entry| {
                let keep = entry.depth() == 0
                    || !entry.path().is_dir()
                    || rules.should_include_dir(entry.path());
                #[cfg(feature = "logging")]
                if !keep {
                    tracing::debug!("Pruned {}", entry.path().display());
                }
                keep
            });
        builder.build().filter_map(|result| match result {
            Ok(entry) if entry.depth() > 0 && !entry.path().is_dir() => Some(entry.into_path()),
            Ok(_) => None,
            Err(_e) => {
                #[cfg(feature = "logging")]
                tracing::warn!("Skipping unreadable entry: {}", _e);
                None
            }
        })
    }
}

fn files_first(a: &Path, b: &Path) -> Ordering {
    a.is_dir()
        .cmp(&b.is_dir())
        .then_with(|| name_key(a).cmp(&name_key(b)))
        .then_with(|| a.file_name().cmp(&b.file_name()))
}

fn name_key(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Validates the options, writes the snapshot file and reports what was written.
pub fn create_snapshot(options: SnapshotOptions) -> Result<SnapshotSummary, SnapshotError> {
    Snapshot::prepare(options)?.write(|_| {})
}
