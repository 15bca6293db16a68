//! Directory statistics
//!
//! Per-file lexical metrics (alphanumeric share, word lengths) reduced into
//! directory-wide averages and population standard deviations.

pub mod operations;
pub mod results;
pub mod summary;

pub use operations::StatsEngine;
pub use results::DirectoryStatsReport;
pub use summary::{Statistic, Summary};
