// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Job output persistence.
//!
//! Every successful edit is written as a pair of files sharing one
//! timestamp-derived stem: `out-<stamp>.png` with the image bytes exactly
//! as the backend returned them, and `out-<stamp>.txt` with the prompt
//! that produced it.

use crate::models::job::OutputRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Writes paired image/prompt records into one directory.
#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist one record stamped with the current local time.
    pub fn write(&self, image_bytes: &[u8], prompt: &str) -> Result<OutputRecord> {
        self.write_at(Local::now(), image_bytes, prompt)
    }

    fn write_at(&self, now: DateTime<Local>, image_bytes: &[u8], prompt: &str) -> Result<OutputRecord> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create output directory {}", self.dir.display()))?;

        let stamp = file_stamp(now);
        for attempt in 0u32.. {
            let stem = match attempt {
                0 => format!("out-{stamp}"),
                n => format!("out-{stamp}-{n}"),
            };
            let image_path = self.dir.join(format!("{stem}.png"));

            // create_new reserves the stem even if another writer races us
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&image_path) {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to create {}", image_path.display()))
                }
            };
            file.write_all(image_bytes)
                .with_context(|| format!("Failed to write {}", image_path.display()))?;

            let prompt_path = self.dir.join(format!("{stem}.txt"));
            std::fs::write(&prompt_path, prompt)
                .with_context(|| format!("Failed to write {}", prompt_path.display()))?;

            log::info!("Saved edit result to {}", image_path.display());
            return Ok(OutputRecord {
                image_path,
                prompt_path,
            });
        }
        unreachable!("u32 attempts exhausted")
    }
}

/// ISO-8601 local time with microseconds, made filesystem-safe.
pub fn file_stamp(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
        .replace([':', '.'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 3, 14, 15, 9, 26).unwrap()
    }

    #[test]
    fn test_file_stamp_is_filesystem_safe() {
        let stamp = file_stamp(fixed_time());
        assert_eq!(stamp, "2025-03-14T15_09_26_000000");
        assert!(!stamp.contains(':') && !stamp.contains('.'));
    }

    #[test]
    fn test_write_creates_paired_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path());

        let record = store.write_at(fixed_time(), b"png-bytes", "the prompt").unwrap();

        assert_eq!(record.image_path, dir.path().join("out-2025-03-14T15_09_26_000000.png"));
        assert_eq!(record.prompt_path, dir.path().join("out-2025-03-14T15_09_26_000000.txt"));
        assert_eq!(std::fs::read(&record.image_path).unwrap(), b"png-bytes");
        assert_eq!(std::fs::read_to_string(&record.prompt_path).unwrap(), "the prompt");
    }

    #[test]
    fn test_write_never_overwrites_same_stamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = OutputStore::new(dir.path().join("nested"));

        let first = store.write_at(fixed_time(), b"one", "first").unwrap();
        let second = store.write_at(fixed_time(), b"two", "second").unwrap();

        assert_ne!(first.image_path, second.image_path);
        assert!(second.image_path.ends_with("out-2025-03-14T15_09_26_000000-1.png"));
        assert_eq!(std::fs::read(&first.image_path).unwrap(), b"one");
        assert_eq!(std::fs::read_to_string(&second.prompt_path).unwrap(), "second");
    }
}
