//! Framing of the snapshot document.
//!
//! The document is plain UTF-8 text written in four sections: a header banner, the
//! directory tree, one framed block per file, and a footer with the file count.

use chrono::NaiveDateTime;
use std::io::{self, Write};
use std::path::Path;

const WIDE: usize = 80;
const NARROW: usize = 40;

fn rule(ch: char, width: usize) -> String {
    std::iter::repeat_n(ch, width).collect()
}

/// File name used when no output path is given: `<project>_snapshot_<YYYYMMDD_HHMMSS>.txt`.
pub fn default_output_name(project_name: &str, at: &NaiveDateTime) -> String {
    format!("{}_snapshot_{}.txt", project_name, at.format("%Y%m%d_%H%M%S"))
}

pub(crate) fn write_header<W: Write>(
    out: &mut W,
    project_name: &str,
    project_path: &Path,
    generated: &NaiveDateTime,
) -> io::Result<()> {
    let banner = rule('=', WIDE);
    writeln!(out, "{}", banner)?;
    writeln!(out, "CODEBASE SNAPSHOT")?;
    writeln!(out, "{}", banner)?;
    writeln!(out, "Project: {}", project_name)?;
    writeln!(out, "Path: {}", project_path.display())?;
    writeln!(out, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(out, "{}", banner)?;
    writeln!(out)
}

pub(crate) fn write_tree<W: Write>(
    out: &mut W,
    root_name: &str,
    lines: &[String],
) -> io::Result<()> {
    writeln!(out, "DIRECTORY STRUCTURE")?;
    writeln!(out, "{}", rule('-', NARROW))?;
    writeln!(out, "{}/", root_name)?;
    for line in lines {
        writeln!(out, "{}", line)?;
    }
    Ok(())
}

pub(crate) fn write_contents_heading<W: Write>(out: &mut W) -> io::Result<()> {
    let banner = rule('=', WIDE);
    writeln!(out)?;
    writeln!(out, "{}", banner)?;
    writeln!(out, "FILE CONTENTS")?;
    writeln!(out, "{}", banner)?;
    writeln!(out)
}

pub(crate) fn write_file<W: Write>(
    out: &mut W,
    relative: &Path,
    full: &Path,
    content: &str,
) -> io::Result<()> {
    let banner = rule('-', WIDE);
    writeln!(out, "{}", banner)?;
    writeln!(out, "FILE: {}", relative.display())?;
    writeln!(out, "FULL PATH: {}", full.display())?;
    writeln!(out, "{}", banner)?;
    out.write_all(content.as_bytes())?;
    out.write_all(b"\n\n")
}

pub(crate) fn write_footer<W: Write>(out: &mut W, files_processed: usize) -> io::Result<()> {
    let banner = rule('=', WIDE);
    writeln!(out, "{}", banner)?;
    writeln!(out, "END OF SNAPSHOT")?;
    writeln!(out, "Total files processed: {}", files_processed)?;
    writeln!(out, "{}", banner)
}
