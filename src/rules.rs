//! Inclusion rules and the per-entry classifier.
//!
//! An [`InclusionRules`] value decides which directories are descended into and which
//! files end up in a snapshot. The same value drives both the tree listing and the
//! content dump, so the two sections always agree on what is included.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Number of leading bytes inspected when sniffing a file without an extension.
pub const SNIFF_LEN: u64 = 1024;

const INCLUDE_EXTENSIONS: &[&str] = &[
    // source
    "py", "js", "ts", "jsx", "tsx", "java", "c", "cpp", "cc", "cxx", "h", "hpp", "cs", "php",
    "rb", "go", "rs", "swift", "kt", "scala", "r", "m", "mm", "pl", "sh", "bash", "zsh", "fish",
    "ps1", "bat", "cmd",
    // web
    "html", "htm", "css", "scss", "sass", "less", "vue", "svelte",
    // config and data
    "json", "xml", "yaml", "yml", "toml", "ini", "cfg", "conf", "config", "env", "gitignore",
    "gitattributes", "dockerignore",
    // docs
    "md", "rst", "txt", "rtf",
    // build
    "makefile", "cmake", "gradle", "pom", "sln", "csproj", "vbproj", "fsproj", "package", "lock",
    "requirements",
    // database
    "sql", "sqlite", "db",
];

const IGNORE_DIRS: &[&str] = &[
    "__pycache__", ".git", ".svn", ".hg", ".bzr", "node_modules", "venv", "env", ".env", ".venv",
    "build", "dist", "target", "bin", "obj", ".idea", ".vscode", ".vs", "coverage", ".nyc_output",
    ".pytest_cache", ".mypy_cache", ".tox", "logs", "temp", "tmp", ".cache", ".DS_Store",
    "Thumbs.db",
];

const IGNORE_FILES: &[&str] = &[
    ".DS_Store", "Thumbs.db", "desktop.ini", ".gitkeep", ".keep", "snapshot.py", "snapshot.txt",
    "LICENSE",
];

const IGNORE_EXTENSIONS: &[&str] = &[
    // images
    "jpg", "jpeg", "png", "gif", "bmp", "tiff", "svg", "ico", "webp",
    // audio and video
    "mp3", "wav", "ogg", "flac", "mp4", "avi", "mov", "wmv", "flv",
    // archives
    "zip", "rar", "7z", "tar", "gz", "bz2", "xz",
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // executables and libraries
    "exe", "dll", "so", "dylib", "a", "lib", "obj", "o",
    // other binary formats
    "pyc", "pyo", "class", "jar", "war", "ear",
];

/// The sets that decide whether an entry belongs in a snapshot.
///
/// Entries added through the builder methods are lower-cased and extensions lose their
/// leading dot, so `".PNG"`, `"png"` and `"Png"` all register the same extension. The stock
/// name lists are kept exactly as written: mixed-case entries such as `LICENSE` never match
/// the lower-cased names they are compared against, so those files stay in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InclusionRules {
    include_extensions: HashSet<String>,
    ignore_extensions: HashSet<String>,
    ignore_dirs: HashSet<String>,
    ignore_files: HashSet<String>,
}

impl Default for InclusionRules {
    fn default() -> Self {
        Self {
            include_extensions: normalized_set(INCLUDE_EXTENSIONS, normalize_extension),
            ignore_extensions: normalized_set(IGNORE_EXTENSIONS, normalize_extension),
            ignore_dirs: literal_set(IGNORE_DIRS),
            ignore_files: literal_set(IGNORE_FILES),
        }
    }
}

impl InclusionRules {
    /// A rule set with every list empty. Only extensionless text files pass it.
    pub fn empty() -> Self {
        Self {
            include_extensions: HashSet::new(),
            ignore_extensions: HashSet::new(),
            ignore_dirs: HashSet::new(),
            ignore_files: HashSet::new(),
        }
    }
    pub fn include_extension(mut self, ext: &str) -> Self {
        self.include_extensions.insert(normalize_extension(ext));
        self
    }
    pub fn ignore_extension(mut self, ext: &str) -> Self {
        self.ignore_extensions.insert(normalize_extension(ext));
        self
    }
    pub fn ignore_dir(mut self, name: &str) -> Self {
        self.ignore_dirs.insert(normalize_name(name));
        self
    }
    pub fn ignore_file(mut self, name: &str) -> Self {
        self.ignore_files.insert(normalize_name(name));
        self
    }

    /// Decides whether a file's contents belong in the snapshot.
    ///
    /// Ignored names and denied extensions are checked before the allow list. A file
    /// without an extension is included only if its first [`SNIFF_LEN`] bytes hold no
    /// NUL and are valid UTF-8; any error while sniffing excludes it.
    pub fn should_include_file(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(name) => normalize_name(&name.to_string_lossy()),
            None => return false,
        };
        if self.ignore_files.contains(&name) {
            return false;
        }
        match extension_of(&name) {
            Some(ext) if self.ignore_extensions.contains(ext) => false,
            Some(ext) => self.include_extensions.contains(ext),
            None => looks_like_text(path),
        }
    }

    /// Decides whether a directory is listed and descended into.
    pub fn should_include_dir(&self, path: &Path) -> bool {
        match path.file_name() {
            Some(name) => !self
                .ignore_dirs
                .contains(&normalize_name(&name.to_string_lossy())),
            None => true,
        }
    }
}

fn normalized_set(items: &[&str], normalize: fn(&str) -> String) -> HashSet<String> {
    items.iter().map(|item| normalize(item)).collect()
}

fn literal_set(items: &[&str]) -> HashSet<String> {
    items.iter().map(|item| item.to_string()).collect()
}

fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// Extension of an already lower-cased file name.
///
/// The extension follows the last dot, unless that dot starts the name (`.gitignore`) or
/// ends it (`notes.`).
fn extension_of(name: &str) -> Option<&str> {
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 == name.len() {
        None
    } else {
        Some(&name[dot + 1..])
    }
}

fn looks_like_text(path: &Path) -> bool {
    let mut chunk = Vec::with_capacity(SNIFF_LEN as usize);
    let read = File::open(path).and_then(|file| file.take(SNIFF_LEN).read_to_end(&mut chunk));
    if read.is_err() {
        return false;
    }
    !chunk.contains(&0) && std::str::from_utf8(&chunk).is_ok()
}
