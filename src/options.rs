use crate::rules::InclusionRules;
use std::path::PathBuf;
#[derive(Debug, Clone)]
pub struct SnapshotOptions {
    pub root: PathBuf,
    /// Destination file; derived from the project name and current time when unset.
    pub output: Option<PathBuf>,
    /// Depth limit for the tree listing only. The content section is never limited.
    pub max_depth: Option<usize>,
    pub rules: InclusionRules,
}
impl Default for SnapshotOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            output: None,
            max_depth: None,
            rules: InclusionRules::default(),
        }
    }
}
#[derive(Debug, Default)]
pub struct SnapshotBuilder {
    options: SnapshotOptions,
}
impl SnapshotBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: SnapshotOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.options.output = Some(path.into());
        self
    }
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.options.max_depth = Some(depth);
        self
    }
    pub fn no_limit_depth(mut self) -> Self {
        self.options.max_depth = None;
        self
    }
    pub fn rules(mut self, rules: InclusionRules) -> Self {
        self.options.rules = rules;
        self
    }
    pub fn build(self) -> SnapshotOptions {
        self.options
    }
}
