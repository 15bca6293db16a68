//! Stats operations
//!
//! Walks a directory listing, reads each regular file and folds the per-file
//! metrics into a `DirectoryStatsReport`.

use log::{debug, error, info};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::StorageError;
use crate::stats::results::DirectoryStatsReport;
use crate::stats::summary::summarize;

/// Computes directory statistics.
///
/// By default only the immediate entries are inspected; subdirectories add
/// their own entry size to the byte total and nothing else. In recursive mode
/// they are descended into instead.
#[derive(Debug, Clone, Default)]
pub struct StatsEngine {
    recursive: bool,
}

impl StatsEngine {
    pub fn new(recursive: bool) -> Self {
        Self { recursive }
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }

    /// Computes the report for the real directory `directory`.
    ///
    /// `virtual_path` is the caller's logical path, used for errors and logs.
    /// Any I/O failure aborts the whole computation.
    pub fn get_stats(
        &self,
        directory: &Path,
        virtual_path: &str,
    ) -> Result<DirectoryStatsReport, StorageError> {
        let metadata =
            fs::metadata(directory).map_err(|e| StorageError::from_io(e, virtual_path))?;
        if !metadata.is_dir() {
            return Err(StorageError::NotFound(virtual_path.to_string()));
        }

        let mut accumulator = StatsAccumulator::default();
        self.collect(directory, "", virtual_path, &mut accumulator)?;
        let report = accumulator.into_report();

        info!(
            "Stats for {} (real: {}): {} files, {} bytes",
            virtual_path,
            directory.display(),
            report.file_count,
            report.bytes_total
        );
        Ok(report)
    }

    fn collect(
        &self,
        directory: &Path,
        prefix: &str,
        virtual_path: &str,
        accumulator: &mut StatsAccumulator,
    ) -> Result<(), StorageError> {
        let entries = fs::read_dir(directory).map_err(|e| {
            error!(
                "Failed to list directory {} (real: {}): {}",
                virtual_path,
                directory.display(),
                e
            );
            StorageError::from_io(e, virtual_path)
        })?;

        for entry in entries {
            let entry = entry?;
            // Symlinks are not followed here
            let metadata = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().to_string();
            let key = if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            };

            if metadata.is_file() {
                let content = fs::read(entry.path()).map_err(|e| {
                    error!("Failed to read {} under {}: {}", key, virtual_path, e);
                    StorageError::IoError(e)
                })?;
                debug!("Stats: file {} ({} bytes)", key, metadata.len());
                accumulator.add_file(key, metadata.len(), &content);
            } else if metadata.is_dir() && self.recursive {
                debug!("Stats: descending into {}", key);
                self.collect(&entry.path(), &key, virtual_path, accumulator)?;
            } else {
                debug!("Stats: non-file entry {} ({} bytes)", key, metadata.len());
                accumulator.bytes_total += metadata.len();
            }
        }

        Ok(())
    }
}

/// Running totals while walking a directory
#[derive(Debug, Default)]
struct StatsAccumulator {
    file_count: u64,
    bytes_total: u64,
    alphanum_ratio: BTreeMap<String, f64>,
    alphanum_counts: Vec<usize>,
    word_lengths: Vec<usize>,
}

impl StatsAccumulator {
    fn add_file(&mut self, key: String, size: u64, content: &[u8]) {
        self.file_count += 1;
        self.bytes_total += size;

        let alphanum = count_alphanumeric(content);
        if alphanum > 0 {
            self.alphanum_ratio
                .insert(key, alphanum as f64 / content.len() as f64);
            self.alphanum_counts.push(alphanum);
        }

        // Files are separated by a newline, so words never span two files
        let text = String::from_utf8_lossy(content);
        self.word_lengths.extend(word_lengths(&text));
    }

    fn into_report(self) -> DirectoryStatsReport {
        let alphanum = summarize(&self.alphanum_counts);
        let words = summarize(&self.word_lengths);

        DirectoryStatsReport {
            file_count: self.file_count,
            alphanum_ratio: self.alphanum_ratio,
            alphanum_avg: alphanum.avg,
            alphanum_stddev: alphanum.stddev,
            word_length_avg: words.avg,
            word_length_stddev: words.stddev,
            bytes_total: self.bytes_total,
        }
    }
}

/// Number of ASCII `[A-Za-z0-9]` bytes
pub fn count_alphanumeric(content: &[u8]) -> usize {
    content.iter().filter(|b| b.is_ascii_alphanumeric()).count()
}

/// Character length of every whitespace-separated word
pub fn word_lengths(text: &str) -> impl Iterator<Item = usize> + '_ {
    text.split_whitespace().map(|word| word.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::summary::Statistic;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn approx(stat: Statistic, expected: f64) -> bool {
        stat.value().is_some_and(|v| (v - expected).abs() < 1e-9)
    }

    #[test]
    fn test_two_file_example() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", "ab1");
        write(dir.path(), "b.txt", "cd 22");

        let report = StatsEngine::default().get_stats(dir.path(), "/").unwrap();

        assert_eq!(report.file_count, 2);
        assert_eq!(report.bytes_total, 8);
        assert_eq!(report.alphanum_ratio.get("a.txt"), Some(&1.0));
        assert!((report.alphanum_ratio["b.txt"] - 0.8).abs() < 1e-9);
        // alphanumeric counts [3, 4]
        assert!(approx(report.alphanum_avg, 3.5));
        assert!(approx(report.alphanum_stddev, 0.5));
        // word lengths [3, 2, 2]
        assert!(approx(report.word_length_avg, 7.0 / 3.0));
        assert!(approx(report.word_length_stddev, (2.0f64 / 9.0).sqrt()));
    }

    #[test]
    fn test_single_empty_file_is_degenerate() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "empty.txt", "");

        let report = StatsEngine::default().get_stats(dir.path(), "/").unwrap();

        assert_eq!(report.file_count, 1);
        assert_eq!(report.bytes_total, 0);
        assert!(report.alphanum_ratio.is_empty());
        assert_eq!(report.alphanum_stddev, Statistic::Undefined);
        assert_eq!(report.word_length_avg, Statistic::Undefined);
        assert_eq!(report.word_length_stddev, Statistic::Undefined);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["alphanum_chars_stddev"], -1.0);
        assert_eq!(json["word_length_stddev"], -1.0);
    }

    #[test]
    fn test_files_without_alphanumerics_get_no_ratio() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "punct.txt", "!! ?? ...");
        write(dir.path(), "word.txt", "abc");

        let report = StatsEngine::default().get_stats(dir.path(), "/").unwrap();

        assert_eq!(report.file_count, 2);
        assert_eq!(report.alphanum_ratio.len(), 1);
        assert!(report.alphanum_ratio.contains_key("word.txt"));
        // single sample [3]
        assert!(approx(report.alphanum_stddev, 0.0));
        // words: "!!", "??", "...", "abc"
        assert!(approx(report.word_length_avg, 10.0 / 4.0));
    }

    #[test]
    fn test_whitespace_runs_do_not_produce_empty_words() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "spaced.txt", "  one \t\n  two   ");

        let report = StatsEngine::default().get_stats(dir.path(), "/").unwrap();

        assert!(approx(report.word_length_avg, 3.0));
        assert!(approx(report.word_length_stddev, 0.0));
    }

    #[test]
    fn test_subdirectories_count_bytes_only() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "top.txt", "hello");
        write(dir.path(), "nested/deep.txt", "ignored words here");
        let nested_size = fs::metadata(dir.path().join("nested")).unwrap().len();

        let report = StatsEngine::default().get_stats(dir.path(), "/").unwrap();

        assert_eq!(report.file_count, 1);
        assert_eq!(report.bytes_total, 5 + nested_size);
        assert!(!report.alphanum_ratio.contains_key("nested"));
        assert!(approx(report.word_length_avg, 5.0));
    }

    #[test]
    fn test_recursive_mode_folds_subdirectories() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "top.txt", "hello");
        write(dir.path(), "nested/deep.txt", "abc de");

        let engine = StatsEngine::new(true);
        let report = engine.get_stats(dir.path(), "/").unwrap();

        assert!(engine.is_recursive());
        assert_eq!(report.file_count, 2);
        assert_eq!(report.bytes_total, 5 + 6);
        assert!(report.alphanum_ratio.contains_key("nested/deep.txt"));
        // words: hello, abc, de
        assert!(approx(report.word_length_avg, 10.0 / 3.0));
    }

    #[test]
    fn test_stats_are_deterministic() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "x.txt", "some words 123");
        write(dir.path(), "y.txt", "more\nwords");

        let engine = StatsEngine::default();
        let first = engine.get_stats(dir.path(), "/").unwrap();
        let second = engine.get_stats(dir.path(), "/").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let result = StatsEngine::default().get_stats(&dir.path().join("nope"), "/nope");

        assert!(matches!(result, Err(StorageError::NotFound(p)) if p == "/nope"));
    }

    #[test]
    fn test_file_path_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", "ab1");

        let result = StatsEngine::default().get_stats(&dir.path().join("a.txt"), "/a.txt");

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_count_bytes_only() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.txt", "ab1");
        let link = dir.path().join("link.txt");
        std::os::unix::fs::symlink(dir.path().join("a.txt"), &link).unwrap();
        let link_size = fs::symlink_metadata(&link).unwrap().len();

        let report = StatsEngine::default().get_stats(dir.path(), "/").unwrap();

        assert_eq!(report.file_count, 1);
        assert_eq!(report.bytes_total, 3 + link_size);
        assert!(!report.alphanum_ratio.contains_key("link.txt"));
        // only the target's single word
        assert!(approx(report.word_length_avg, 3.0));
        assert!(approx(report.word_length_stddev, 0.0));
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_directory_is_io_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let locked = dir.path().join("locked");
        write(dir.path(), "locked/a.txt", "ab1");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can list it anyway
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = StatsEngine::default().get_stats(&locked, "/locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(result, Err(StorageError::IoError(_))));
    }

    #[test]
    fn test_count_alphanumeric_is_ascii_only() {
        assert_eq!(count_alphanumeric(b"aZ9 _-!"), 3);
        assert_eq!(count_alphanumeric("é1".as_bytes()), 1);
    }
}
