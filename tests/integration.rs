use chrono::{NaiveDate, NaiveDateTime};
use codebase_snapshot::{
    InclusionRules, Snapshot, SnapshotBuilder, SnapshotError, create_snapshot,
};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_file(path: &Path, content: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(3, 4, 5)
        .unwrap()
}

fn render(snapshot: &Snapshot) -> String {
    let mut out = Vec::new();
    snapshot.write_to(&mut out, &fixed_time(), |_| {}).unwrap();
    String::from_utf8(out).unwrap()
}

/// The document without the lines that embed absolute paths.
fn without_paths(document: &str) -> String {
    document
        .lines()
        .filter(|line| !line.starts_with("Path: ") && !line.starts_with("FULL PATH: "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn file_headers(document: &str) -> Vec<&str> {
    document
        .lines()
        .filter_map(|line| line.strip_prefix("FILE: "))
        .collect()
}

#[test]
fn full_document_layout() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("demo");
    write_file(&project.join("a.py"), "print(1)");
    write_file(&project.join("b.png"), [0x89u8, b'P', b'N', b'G', 0, 0]);
    write_file(&project.join("node_modules/x.js"), "module.exports = 1;");

    let snapshot = Snapshot::prepare(SnapshotBuilder::new(&project).build()).unwrap();
    let root = snapshot.project_path().to_path_buf();
    let eq = "=".repeat(80);
    let dash = "-".repeat(80);
    let expected = format!(
        "{eq}\nCODEBASE SNAPSHOT\n{eq}\n\
         Project: demo\nPath: {root}\nGenerated: 2024-01-02 03:04:05\n{eq}\n\n\
         DIRECTORY STRUCTURE\n{short}\ndemo/\n└── a.py\n\n\
         {eq}\nFILE CONTENTS\n{eq}\n\n\
         {dash}\nFILE: a.py\nFULL PATH: {full}\n{dash}\nprint(1)\n\n\
         {eq}\nEND OF SNAPSHOT\nTotal files processed: 1\n{eq}\n",
        root = root.display(),
        short = "-".repeat(40),
        full = root.join("a.py").display(),
    );
    assert_eq!(render(&snapshot), expected);
}

#[test]
fn ignored_directories_vanish_from_both_sections() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("src/main.rs"), "fn main() {}");
    write_file(&dir.path().join("src/__pycache__/m.py"), "cached");
    write_file(&dir.path().join(".git/config"), "[core]");
    write_file(&dir.path().join("target/debug/out.rs"), "");

    let snapshot = Snapshot::prepare(SnapshotBuilder::new(dir.path()).build()).unwrap();
    let document = render(&snapshot);
    let body = without_paths(&document);
    for hidden in ["__pycache__", ".git", "target", "m.py", "out.rs"] {
        assert!(!body.contains(hidden), "{} leaked into output", hidden);
    }
    assert_eq!(file_headers(&document), vec![Path::new("src").join("main.rs").to_str().unwrap()]);
}

#[test]
fn contents_visit_files_before_subdirectories() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("zeta.rs"), "");
    write_file(&dir.path().join("Alpha.rs"), "");
    write_file(&dir.path().join("lib/inner.rs"), "");
    write_file(&dir.path().join("app/main.rs"), "");

    let snapshot = Snapshot::prepare(SnapshotBuilder::new(dir.path()).build()).unwrap();
    let document = render(&snapshot);
    let app_main = Path::new("app").join("main.rs");
    let lib_inner = Path::new("lib").join("inner.rs");
    assert_eq!(
        file_headers(&document),
        vec![
            "Alpha.rs",
            "zeta.rs",
            app_main.to_str().unwrap(),
            lib_inner.to_str().unwrap(),
        ]
    );
}

#[test]
fn max_depth_limits_only_the_tree() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("a/b/c/deep.rs"), "deep");
    write_file(&dir.path().join("top.rs"), "top");

    let options = SnapshotBuilder::new(dir.path()).max_depth(0).build();
    let snapshot = Snapshot::prepare(options).unwrap();
    let document = render(&snapshot);

    let tree_section = document
        .split("DIRECTORY STRUCTURE")
        .nth(1)
        .and_then(|rest| rest.split("FILE CONTENTS").next())
        .unwrap();
    assert!(!tree_section.contains("── "));
    assert!(tree_section.contains(&format!("{}/", snapshot.project_name())));

    let deep = Path::new("a").join("b").join("c").join("deep.rs");
    assert_eq!(file_headers(&document), vec!["top.rs", deep.to_str().unwrap()]);
}

#[test]
fn tree_and_contents_agree() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("README"), "# readme");
    write_file(&dir.path().join("blob"), b"\0\0");
    write_file(&dir.path().join("docs/guide.md"), "guide");
    write_file(&dir.path().join("docs/photo.jpg"), "jpg");
    write_file(&dir.path().join("scripts/run.sh"), "echo hi");

    let snapshot = Snapshot::prepare(SnapshotBuilder::new(dir.path()).build()).unwrap();
    let document = render(&snapshot);
    let mut dumped: Vec<String> = file_headers(&document)
        .into_iter()
        .map(|path| Path::new(path).file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    dumped.sort();
    assert_eq!(dumped, vec!["README", "guide.md", "run.sh"]);
    for name in &dumped {
        assert!(document.contains(&format!("── {}\n", name)));
    }
    let body = without_paths(&document);
    assert!(!body.contains("blob"));
    assert!(!body.contains("photo.jpg"));
}

#[test]
fn custom_rules_are_honoured() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("keep.rs"), "kept");
    write_file(&dir.path().join("drop.py"), "dropped");
    write_file(&dir.path().join("vendor/dep.rs"), "vendored");

    let rules = InclusionRules::empty()
        .include_extension("rs")
        .ignore_dir("vendor");
    let options = SnapshotBuilder::new(dir.path()).rules(rules).build();
    let document = render(&Snapshot::prepare(options).unwrap());
    assert_eq!(file_headers(&document), vec!["keep.rs"]);
    assert!(!without_paths(&document).contains("vendor"));
}

#[test]
fn rendering_is_deterministic() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write_file(&dir.path().join(format!("m{}/f{}.rs", i, i)), format!("// {}", i));
    }
    let snapshot = Snapshot::prepare(SnapshotBuilder::new(dir.path()).build()).unwrap();
    assert_eq!(render(&snapshot), render(&snapshot));
}

#[test]
fn progress_reported_every_ten_files() {
    let dir = tempdir().unwrap();
    for i in 0..25 {
        write_file(&dir.path().join(format!("f{:02}.txt", i)), "x");
    }
    let snapshot = Snapshot::prepare(SnapshotBuilder::new(dir.path()).build()).unwrap();
    let mut seen = Vec::new();
    let count = snapshot
        .write_to(&mut Vec::<u8>::new(), &fixed_time(), |n| seen.push(n))
        .unwrap();
    assert_eq!(count, 25);
    assert_eq!(seen, vec![10, 20]);
}

#[test]
fn missing_project_is_rejected() {
    let dir = tempdir().unwrap();
    let err = Snapshot::prepare(SnapshotBuilder::new(dir.path().join("nope")).build()).unwrap_err();
    assert!(matches!(err, SnapshotError::NotFound(_)));
    assert!(err.is_invalid_input());
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn file_project_is_rejected() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    write_file(&file, "x");
    let err = create_snapshot(SnapshotBuilder::new(&file).build()).unwrap_err();
    assert!(matches!(err, SnapshotError::NotADirectory(_)));
    assert!(err.to_string().ends_with("is not a directory."));
}

#[test]
fn default_output_name_uses_project_name() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("widget");
    fs::create_dir(&project).unwrap();
    let snapshot = Snapshot::prepare(SnapshotBuilder::new(&project).build()).unwrap();
    let name = snapshot.output_path().to_str().unwrap();
    assert!(name.starts_with("widget_snapshot_"));
    assert!(name.ends_with(".txt"));
    assert_eq!(name.len(), "widget_snapshot_YYYYMMDD_HHMMSS.txt".len());
}

#[test]
fn create_snapshot_writes_file() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("proj");
    write_file(&project.join("main.rs"), "fn main() {}");
    write_file(&project.join("src/lib.rs"), "pub fn test() {}");
    let output = dir.path().join("out.txt");

    let summary = create_snapshot(SnapshotBuilder::new(&project).output(&output).build()).unwrap();
    assert_eq!(summary.files_processed, 2);
    assert_eq!(summary.project_name, "proj");
    assert_eq!(summary.output_path, output);

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.contains("fn main() {}"));
    assert!(written.contains("pub fn test() {}"));
    assert!(written.ends_with(&format!("Total files processed: 2\n{}\n", "=".repeat(80))));
}

#[test]
fn output_inside_project_is_not_snapshotted() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("notes.txt"), "notes");
    let output = dir.path().join("context.txt");

    create_snapshot(SnapshotBuilder::new(dir.path()).output(&output).build()).unwrap();
    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(file_headers(&written), vec!["notes.txt"]);
    assert!(!without_paths(&written).contains("context.txt"));
}

#[test]
fn repeated_runs_differ_only_in_timestamp() {
    let dir = tempdir().unwrap();
    let project = dir.path().join("proj");
    write_file(&project.join("a.rs"), "a");
    write_file(&project.join("sub/b.rs"), "b");
    let output = dir.path().join("snap.out");

    let read_run = || {
        create_snapshot(SnapshotBuilder::new(&project).output(&output).build()).unwrap();
        fs::read_to_string(&output)
            .unwrap()
            .lines()
            .filter(|line| !line.starts_with("Generated: "))
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };
    assert_eq!(read_run(), read_run());
}

#[test]
fn license_files_are_dumped() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("LICENSE"), "MIT License");
    write_file(&dir.path().join("a.py"), "print(1)");

    let document = render(&Snapshot::prepare(SnapshotBuilder::new(dir.path()).build()).unwrap());
    assert_eq!(file_headers(&document), vec!["a.py", "LICENSE"]);
    assert!(document.contains("└── LICENSE\n"));
    assert!(document.contains("MIT License\n\n"));
    assert!(document.contains("Total files processed: 2\n"));
}

#[cfg(unix)]
#[test]
fn unreadable_file_is_reported_inline() {
    let dir = tempdir().unwrap();
    write_file(&dir.path().join("good.rs"), "fn good() {}");
    std::os::unix::fs::symlink(dir.path().join("gone.rs"), dir.path().join("bad.rs")).unwrap();

    let snapshot = Snapshot::prepare(SnapshotBuilder::new(dir.path()).build()).unwrap();
    let mut out = Vec::new();
    let count = snapshot
        .write_to(&mut out, &fixed_time(), |_| {})
        .expect("a broken file must not abort the run");
    let document = String::from_utf8(out).unwrap();

    assert_eq!(count, 2);
    assert_eq!(file_headers(&document), vec!["bad.rs", "good.rs"]);
    let bad_block = document.split("FILE: bad.rs\n").nth(1).unwrap();
    let body = bad_block.lines().nth(2).unwrap();
    assert!(body.starts_with("[Error reading file: "), "got {:?}", body);
    assert!(!document.contains("── bad.rs"));
    assert!(document.contains("Total files processed: 2\n"));
}

#[cfg(unix)]
#[test]
fn unreadable_directory_does_not_abort_the_run() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let locked = dir.path().join("locked");
    write_file(&locked.join("secret.rs"), "secret");
    write_file(&dir.path().join("z.rs"), "z");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read_dir(&locked).is_ok() {
        // running with privileges that bypass permission bits
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let snapshot = Snapshot::prepare(SnapshotBuilder::new(dir.path()).build()).unwrap();
    let mut out = Vec::new();
    let result = snapshot.write_to(&mut out, &fixed_time(), |_| {});
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    assert_eq!(result.unwrap(), 1);
    let document = String::from_utf8(out).unwrap();
    assert!(document.contains("├── locked\n│   [Permission Denied]\n└── z.rs\n"));
    assert_eq!(file_headers(&document), vec!["z.rs"]);
    assert!(!without_paths(&document).contains("secret"));
    assert!(document.contains("Total files processed: 1\n"));
}
