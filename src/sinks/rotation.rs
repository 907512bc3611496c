//! Hourly rotation of live log files
//!
//! Rotation renames the live file to an hour-stamped archive name
//! (`{name}.{YYYYMMDDHH}`, numeric suffix on collision) and reopens the live
//! path fresh. Every failure mode is reported on the process stderr and
//! leaves the live path open for writing; rotation never stops ingestion.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local};

use crate::core::error::{LoggerError, Result};
use crate::core::metrics::SinkMetrics;

/// Upper bound on the `.{n}` collision probe. Exhausting it is reported as a
/// rotation error and the rename is skipped for that cycle.
pub const MAX_SUFFIX_PROBES: u32 = 10_000;

/// Live-file location of a rotating sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotationTarget {
    dir: PathBuf,
    file_name: String,
}

impl RotationTarget {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
        }
    }

    /// `{dir}/{file_name}` — the path the sink keeps open for appending.
    #[must_use]
    pub fn live_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }
}

/// Archive label for the hour that ended most recently before `now`.
///
/// An invocation at `2024-03-05T10:05` labels the completed 09:00–10:00 hour
/// as `2024030509`. Subtracting the hour before formatting lets the date
/// roll correctly at midnight.
#[must_use]
pub fn rotation_label(now: DateTime<Local>) -> String {
    (now - Duration::hours(1)).format("%Y%m%d%H").to_string()
}

/// First unused archive path for `label`.
///
/// Probes `{name}.{label}`, then `{name}.{label}.{n}` for n = 0, 1, 2, …,
/// so a rotation within an hour that already produced an archive (e.g.
/// after a restart) never overwrites it.
///
/// # Errors
///
/// Returns [`LoggerError::Rotation`] when [`MAX_SUFFIX_PROBES`] names are
/// all taken.
pub fn rotated_path(target: &RotationTarget, label: &str) -> Result<PathBuf> {
    let candidate = target.dir.join(format!("{}.{}", target.file_name, label));
    if !candidate.exists() {
        return Ok(candidate);
    }

    for n in 0..MAX_SUFFIX_PROBES {
        let numbered = target
            .dir
            .join(format!("{}.{}.{}", target.file_name, label, n));
        if !numbered.exists() {
            return Ok(numbered);
        }
    }

    Err(LoggerError::rotation(
        candidate.display().to_string(),
        format!("no unused archive name after {} probes", MAX_SUFFIX_PROBES),
    ))
}

/// Open the live file for appending, creating it if absent.
///
/// # Errors
///
/// Returns [`LoggerError::FileOpen`]; at sink construction this is the one
/// failure that halts startup.
pub fn open_live_file(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| LoggerError::file_open(path.display().to_string(), e.to_string()))
}

/// Rename the live file to its archive name and reopen the live path.
///
/// Returns the replacement handle when the live path was reopened, `None`
/// when the previous handle must stay in service. A failed rename is
/// reported and does not abort: the live path is reopened regardless, so
/// only the archive artifact is at risk.
pub(crate) fn rotate(target: &RotationTarget, metrics: &SinkMetrics) -> Option<File> {
    let live_path = target.live_path();
    let label = rotation_label(Local::now());

    match rotated_path(target, &label) {
        Ok(archive) => {
            if let Err(e) = std::fs::rename(&live_path, &archive) {
                metrics.record_rotation_failure();
                eprintln!(
                    "[LOGGER ERROR] rename of {} to {} failed: {}",
                    live_path.display(),
                    archive.display(),
                    e
                );
            }
        }
        Err(e) => {
            metrics.record_rotation_failure();
            eprintln!("[LOGGER ERROR] {}", e);
        }
    }

    match open_live_file(&live_path) {
        Ok(fresh) => {
            metrics.record_rotation();
            Some(fresh)
        }
        Err(e) => {
            metrics.record_rotation_failure();
            eprintln!(
                "[LOGGER ERROR] reopen after rotation failed: {}; keeping previous handle",
                e
            );
            None
        }
    }
}
