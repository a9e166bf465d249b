//! Hourly log file rotation.
//!
//! Files are named `{identifier}-{YYYY-MM-DD-HH}.log`. The active file is
//! switched only when a write arrives in a later hour than the one it was
//! opened for; idle hours produce no rotation. After each rotation the
//! oldest historical files for the same identifier are deleted so that at
//! most `max_history` remain next to the active file.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use tracing::{debug, info, warn};

use crate::sink::SinkError;

/// Number of historical files kept besides the active one.
pub const DEFAULT_MAX_HISTORY: usize = 5;

/// Hour-granularity stamp embedded in file names.
const FILE_STAMP_FORMAT: &str = "%Y-%m-%d-%H";

/// Length of a rendered `FILE_STAMP_FORMAT` stamp.
const FILE_STAMP_LEN: usize = 13;

const LOG_EXTENSION: &str = ".log";

/// Build the file name for `identifier` during the hour containing `now`.
pub fn file_name(identifier: &str, now: NaiveDateTime) -> String {
    format!(
        "{}-{}{}",
        identifier,
        now.format(FILE_STAMP_FORMAT),
        LOG_EXTENSION
    )
}

fn hour_key(instant: NaiveDateTime) -> (NaiveDate, u32) {
    (instant.date(), instant.hour())
}

fn open_append(path: &Path) -> Result<File, SinkError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| SinkError::OpenFile {
            path: path.to_path_buf(),
            source,
        })
}

/// An append-only log file that rolls over to a new file every clock hour.
#[derive(Debug)]
pub struct RotatingFile {
    directory: PathBuf,
    identifier: String,
    max_history: usize,
    active_hour: NaiveDateTime,
    active_path: PathBuf,
    file: File,
    rotations: u64,
}

impl RotatingFile {
    /// Create `directory` if needed and open the file for the hour of `now`.
    ///
    /// An existing file for that hour is appended to, so a restart within
    /// the same hour continues the same file.
    ///
    /// # Errors
    ///
    /// Returns `SinkError::CreateDir` or `SinkError::OpenFile` when the
    /// directory or file cannot be created.
    pub fn open(
        directory: impl Into<PathBuf>,
        identifier: impl Into<String>,
        max_history: usize,
        now: NaiveDateTime,
    ) -> Result<Self, SinkError> {
        let directory = directory.into();
        let identifier = identifier.into();

        fs::create_dir_all(&directory).map_err(|source| SinkError::CreateDir {
            path: directory.clone(),
            source,
        })?;

        let active_path = directory.join(file_name(&identifier, now));
        let file = open_append(&active_path)?;

        debug!(path = %active_path.display(), "Opened log file");

        Ok(Self {
            directory,
            identifier,
            max_history,
            active_hour: now,
            active_path,
            file,
            rotations: 0,
        })
    }

    /// Append one line, rotating first if `now` falls in a later hour.
    ///
    /// A newline is appended to `line`. Writes are not buffered.
    pub fn write_line(&mut self, now: NaiveDateTime, line: &str) -> Result<(), SinkError> {
        if hour_key(now) > hour_key(self.active_hour) {
            self.rotate(now)?;
        }

        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        self.file
            .write_all(buf.as_bytes())
            .map_err(|source| SinkError::Write {
                path: self.active_path.clone(),
                source,
            })
    }

    fn rotate(&mut self, now: NaiveDateTime) -> Result<(), SinkError> {
        let next_path = self.directory.join(file_name(&self.identifier, now));
        let next_file = open_append(&next_path)?;

        // Replacing the handle closes the previous hour's file; the file itself is kept.
        self.file = next_file;
        let previous = std::mem::replace(&mut self.active_path, next_path);
        self.active_hour = now;
        self.rotations += 1;

        info!(
            from = %previous.display(),
            to = %self.active_path.display(),
            "Rotated log file"
        );

        self.prune();
        Ok(())
    }

    /// Delete the oldest historical files beyond `max_history`.
    ///
    /// Failures are logged and otherwise ignored; they never fail a write.
    fn prune(&self) {
        let history = match self.historical_files() {
            Ok(history) => history,
            Err(e) => {
                warn!(
                    directory = %self.directory.display(),
                    error = %e,
                    "Failed to list log directory for pruning"
                );
                return;
            }
        };

        if history.len() <= self.max_history {
            return;
        }

        let excess = history.len() - self.max_history;
        for path in history.iter().take(excess) {
            match fs::remove_file(path) {
                Ok(()) => debug!(path = %path.display(), "Removed old log file"),
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove old log file"
                ),
            }
        }
    }

    /// Historical files for this identifier, oldest first, excluding the active file.
    pub fn historical_files(&self) -> io::Result<Vec<PathBuf>> {
        let active_name = self.active_path.file_name();
        let mut stamped = Vec::new();

        for entry in fs::read_dir(&self.directory)?.flatten() {
            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }
            let name = entry.file_name();
            if Some(name.as_os_str()) == active_name {
                continue;
            }
            if let Some(stamp) = name.to_str().and_then(|n| self.parse_stamp(n)) {
                stamped.push((stamp, entry.path()));
            }
        }

        stamped.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(stamped.into_iter().map(|(_, path)| path).collect())
    }

    /// Extract the hour stamp from a file name owned by this identifier.
    fn parse_stamp(&self, name: &str) -> Option<NaiveDateTime> {
        let stamp = name
            .strip_prefix(self.identifier.as_str())?
            .strip_prefix('-')?
            .strip_suffix(LOG_EXTENSION)?;

        if stamp.len() != FILE_STAMP_LEN {
            return None;
        }

        NaiveDateTime::parse_from_str(&format!("{}-00", stamp), "%Y-%m-%d-%H-%M").ok()
    }

    /// Path of the file currently being written.
    pub fn active_path(&self) -> &Path {
        &self.active_path
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    /// Number of rotations performed since the file was opened.
    pub fn rotations(&self) -> u64 {
        self.rotations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::tempdir;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn log_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .flatten()
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.ends_with(".log"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_file_name_format() {
        let name = file_name("payment-service", at(7, 45));
        assert_eq!(name, "payment-service-2024-01-15-07.log");
    }

    #[test]
    fn test_open_creates_directory_and_file() {
        let tmp = tempdir().unwrap();
        let dir = tmp.path().join("nested").join("logs");

        let file = RotatingFile::open(&dir, "service", DEFAULT_MAX_HISTORY, at(10, 0)).unwrap();

        assert!(dir.is_dir());
        assert!(file.active_path().is_file());
        assert_eq!(log_files(&dir), vec!["service-2024-01-15-10.log"]);
        assert_eq!(file.rotations(), 0);
    }

    #[test]
    fn test_open_fails_when_directory_is_a_file() {
        let tmp = tempdir().unwrap();
        let blocker = tmp.path().join("logs");
        fs::write(&blocker, b"not a directory").unwrap();

        let result = RotatingFile::open(&blocker, "service", DEFAULT_MAX_HISTORY, at(10, 0));
        assert!(matches!(result, Err(SinkError::CreateDir { .. })));
    }

    #[test]
    fn test_same_hour_writes_share_one_file() {
        let tmp = tempdir().unwrap();
        let mut file = RotatingFile::open(tmp.path(), "service", 5, at(10, 0)).unwrap();

        file.write_line(at(10, 1), "first").unwrap();
        file.write_line(at(10, 59), "second").unwrap();

        let contents = fs::read_to_string(file.active_path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");
        assert_eq!(file.rotations(), 0);
    }

    #[test]
    fn test_reopen_in_same_hour_appends() {
        let tmp = tempdir().unwrap();

        let mut first = RotatingFile::open(tmp.path(), "service", 5, at(10, 0)).unwrap();
        first.write_line(at(10, 5), "before restart").unwrap();
        drop(first);

        let mut second = RotatingFile::open(tmp.path(), "service", 5, at(10, 30)).unwrap();
        second.write_line(at(10, 31), "after restart").unwrap();

        let contents = fs::read_to_string(second.active_path()).unwrap();
        assert_eq!(contents, "before restart\nafter restart\n");
    }

    #[test]
    fn test_rotation_on_hour_boundary() {
        let tmp = tempdir().unwrap();
        let mut file = RotatingFile::open(tmp.path(), "service", 5, at(10, 0)).unwrap();

        file.write_line(at(10, 59), "old hour").unwrap();
        file.write_line(at(11, 0), "new hour").unwrap();

        assert_eq!(file.rotations(), 1);
        assert_eq!(
            log_files(tmp.path()),
            vec!["service-2024-01-15-10.log", "service-2024-01-15-11.log"]
        );
        let old = fs::read_to_string(tmp.path().join("service-2024-01-15-10.log")).unwrap();
        let new = fs::read_to_string(tmp.path().join("service-2024-01-15-11.log")).unwrap();
        assert_eq!(old, "old hour\n");
        assert_eq!(new, "new hour\n");
    }

    #[test]
    fn test_idle_hours_do_not_rotate() {
        let tmp = tempdir().unwrap();
        let mut file = RotatingFile::open(tmp.path(), "service", 5, at(10, 0)).unwrap();
        file.write_line(at(10, 0), "only write").unwrap();

        // Three hours pass with no writes.
        assert_eq!(file.rotations(), 0);
        assert_eq!(log_files(tmp.path()).len(), 1);

        file.write_line(at(13, 15), "after idle").unwrap();
        assert_eq!(file.rotations(), 1);
        assert_eq!(
            log_files(tmp.path()),
            vec!["service-2024-01-15-10.log", "service-2024-01-15-13.log"]
        );
    }

    #[test]
    fn test_clock_moving_backwards_does_not_rotate() {
        let tmp = tempdir().unwrap();
        let mut file = RotatingFile::open(tmp.path(), "service", 5, at(10, 30)).unwrap();

        file.write_line(at(9, 50), "skewed").unwrap();

        assert_eq!(file.rotations(), 0);
        assert_eq!(log_files(tmp.path()), vec!["service-2024-01-15-10.log"]);
    }

    #[test]
    fn test_retention_keeps_five_historical_files() {
        let tmp = tempdir().unwrap();
        let start = at(10, 0);
        let mut file = RotatingFile::open(tmp.path(), "service", 5, start).unwrap();
        file.write_line(start, "hour 0").unwrap();

        for k in 1..=8i64 {
            let now = start + Duration::hours(k);
            file.write_line(now, &format!("hour {}", k)).unwrap();

            let history = file.historical_files().unwrap();
            assert_eq!(history.len(), (k as usize).min(5));

            if k > 5 {
                let evicted = start + Duration::hours(k - 6);
                assert!(!tmp.path().join(file_name("service", evicted)).exists());
            }
            let oldest_kept = start + Duration::hours((k - 5).max(0));
            assert_eq!(history[0], tmp.path().join(file_name("service", oldest_kept)));
        }

        assert_eq!(log_files(tmp.path()).len(), 6);
        assert_eq!(file.rotations(), 8);
    }

    #[test]
    fn test_rotation_across_midnight() {
        let tmp = tempdir().unwrap();
        let mut file = RotatingFile::open(tmp.path(), "service", 5, at(23, 10)).unwrap();

        let next_day = NaiveDate::from_ymd_opt(2024, 1, 16)
            .unwrap()
            .and_hms_opt(0, 5, 0)
            .unwrap();
        file.write_line(next_day, "tomorrow").unwrap();

        assert_eq!(file.rotations(), 1);
        assert!(tmp.path().join("service-2024-01-16-00.log").is_file());
    }

    #[test]
    fn test_pruning_ignores_other_files() {
        let tmp = tempdir().unwrap();
        fs::write(tmp.path().join("notes.txt"), b"keep").unwrap();
        fs::write(tmp.path().join("other-2020-01-01-00.log"), b"keep").unwrap();
        fs::write(tmp.path().join("service-desk-2020-01-01-00.log"), b"keep").unwrap();
        fs::write(tmp.path().join("service-garbage.log"), b"keep").unwrap();

        let start = at(0, 0);
        let mut file = RotatingFile::open(tmp.path(), "service", 2, start).unwrap();
        for k in 1..=6 {
            file.write_line(start + Duration::hours(k), "line").unwrap();
        }

        assert!(tmp.path().join("notes.txt").exists());
        assert!(tmp.path().join("other-2020-01-01-00.log").exists());
        assert!(tmp.path().join("service-desk-2020-01-01-00.log").exists());
        assert!(tmp.path().join("service-garbage.log").exists());
        assert_eq!(file.historical_files().unwrap().len(), 2);
    }

    #[test]
    fn test_pruning_includes_files_from_earlier_runs() {
        let tmp = tempdir().unwrap();
        for day in 1..=7 {
            let old = NaiveDate::from_ymd_opt(2024, 1, day)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap();
            fs::write(tmp.path().join(file_name("service", old)), b"old run\n").unwrap();
        }

        let mut file = RotatingFile::open(tmp.path(), "service", 5, at(10, 0)).unwrap();
        assert_eq!(file.historical_files().unwrap().len(), 7);

        file.write_line(at(11, 0), "rotate").unwrap();

        let history = file.historical_files().unwrap();
        assert_eq!(history.len(), 5);
        assert_eq!(
            history.last().unwrap(),
            &tmp.path().join("service-2024-01-15-10.log")
        );
        assert!(!tmp.path().join("service-2024-01-01-08.log").exists());
        assert!(!tmp.path().join("service-2024-01-02-08.log").exists());
        assert!(!tmp.path().join("service-2024-01-03-08.log").exists());
    }
}
