//! Stats result types

use serde::Serialize;
use std::collections::BTreeMap;

use crate::stats::summary::Statistic;

/// Lexical statistics for one directory, computed fresh on every request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectoryStatsReport {
    pub file_count: u64,
    /// Share of each file's bytes that are ASCII letters or digits; files
    /// without any are left out
    #[serde(rename = "alphanum_chars_percentage")]
    pub alphanum_ratio: BTreeMap<String, f64>,
    #[serde(rename = "alphanum_chars_avg")]
    pub alphanum_avg: Statistic,
    #[serde(rename = "alphanum_chars_stddev")]
    pub alphanum_stddev: Statistic,
    pub word_length_avg: Statistic,
    pub word_length_stddev: Statistic,
    pub bytes_total: u64,
}
