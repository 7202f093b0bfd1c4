//! Output module for writing the harvested dataset and the run report
//!
//! This module handles:
//! - The [`TabularWriter`] seam the dataset is handed to
//! - Delimited-text (CSV/TSV) serialization
//! - The run report printed after a successful harvest

mod delimited;
mod report;

pub use delimited::DelimitedWriter;
pub use report::{print_report, DroppedCategories, RunReport};

use crate::dataset::{Dataset, Value};
use crate::OutputResult;
use std::path::Path;

/// Destination of a finished dataset: one header record, then one record per row
pub trait TabularWriter {
    /// Writes `header` and `rows` to `path`
    ///
    /// Implementations must not leave a partial file behind on failure.
    fn write(&self, path: &Path, header: &[String], rows: &[Vec<Value>]) -> OutputResult<()>;
}

/// Hands a dataset's header and records to `writer`
pub fn write_dataset(writer: &dyn TabularWriter, path: &Path, dataset: &Dataset) -> OutputResult<()> {
    writer.write(path, &dataset.header(), &dataset.records())
}
