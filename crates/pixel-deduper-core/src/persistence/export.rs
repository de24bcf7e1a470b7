use log::{info, warn};
use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::logging::{log_file_error, log_fs_modification};
use crate::types::DuplicateGroup;

/// First line of every report
pub const REPORT_HEADER: &str = "=== pixel-deduper duplicate report ===";

const GROUP_PREFIX: &str = "GROUP ";

/// Render groups as a plain-text report
///
/// One header line, then for each group a `GROUP <index>` line followed by
/// one member path per line, in store order. Paths that cannot be read back
/// (not UTF-8, containing a line break, or starting with `GROUP `) are left
/// out with a warning.
pub fn render_report(groups: &[DuplicateGroup]) -> String {
    let mut report = String::new();
    report.push_str(REPORT_HEADER);
    report.push('\n');

    for (i, group) in groups.iter().enumerate() {
        // Writing into a String cannot fail
        let _ = writeln!(report, "{}{}", GROUP_PREFIX, i);
        for path in group {
            match reportable(path) {
                Some(line) => {
                    let _ = writeln!(report, "{}", line);
                }
                None => warn!(
                    "Leaving {} out of the report: path cannot be written as one line",
                    path.display()
                ),
            }
        }
    }

    report
}

fn reportable(path: &Path) -> Option<&str> {
    path.to_str().filter(|line| {
        !line.starts_with(GROUP_PREFIX) && !line.contains(|c: char| c == '\n' || c == '\r')
    })
}

/// Write the report to a file that must not exist yet
///
/// Fails with `ExportConflict` if `destination` exists. Nothing is left behind
/// if writing fails half-way.
pub fn write_report(destination: &Path, groups: &[DuplicateGroup]) -> Result<()> {
    let report = render_report(groups);

    let mut file = match OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(destination)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(Error::ExportConflict(destination.to_path_buf()));
        }
        Err(e) => {
            log_file_error(destination, "create_report", &e);
            return Err(e.into());
        }
    };

    if let Err(e) = file.write_all(report.as_bytes()).and_then(|_| file.sync_all()) {
        log_file_error(destination, "write_report", &e);
        drop(file);
        let _ = std::fs::remove_file(destination);
        return Err(e.into());
    }

    log_fs_modification(
        "export",
        destination,
        Some(&format!("{} group(s)", groups.len())),
    );
    info!("Exported {} group(s) to {}", groups.len(), destination.display());
    Ok(())
}

/// Read groups back from a report produced by [`render_report`]
pub fn parse_report(report: &str) -> Result<Vec<DuplicateGroup>> {
    let mut lines = report.lines();
    if lines.next() != Some(REPORT_HEADER) {
        return Err(Error::Configuration(
            "Report does not start with the expected header".to_string(),
        ));
    }

    let mut groups: Vec<Vec<PathBuf>> = Vec::new();
    for line in lines {
        if let Some(index) = line.strip_prefix(GROUP_PREFIX) {
            if index.parse::<usize>().ok() != Some(groups.len()) {
                return Err(Error::Configuration(format!(
                    "Unexpected group header: {}",
                    line
                )));
            }
            groups.push(Vec::new());
        } else if let Some(current) = groups.last_mut() {
            current.push(PathBuf::from(line));
        } else {
            return Err(Error::Configuration(format!(
                "Path outside of a group: {}",
                line
            )));
        }
    }

    Ok(groups.into_iter().map(DuplicateGroup::new).collect())
}
