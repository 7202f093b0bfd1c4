//! Run report of a finished harvest

use crate::dataset::FIXED_COLUMNS;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Parties of one municipality that were not in the fixed column header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCategories {
    pub code: u32,
    pub name: String,
    pub categories: Vec<String>,
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Number of rows in the dataset
    pub municipalities: usize,

    /// Number of party columns
    pub categories: usize,

    /// Municipalities whose tallies lost parties to the fixed header
    pub dropped: Vec<DroppedCategories>,
}

impl RunReport {
    pub fn elapsed_seconds(&self) -> f64 {
        (self.finished_at - self.started_at)
            .num_milliseconds()
            .max(0) as f64
            / 1000.0
    }

    /// Width of the output table: the fixed columns plus one per party
    pub fn columns(&self) -> usize {
        FIXED_COLUMNS.len() + self.categories
    }

    /// Total number of dropped party tallies across all municipalities
    pub fn dropped_total(&self) -> usize {
        self.dropped.iter().map(|d| d.categories.len()).sum()
    }
}

/// Prints the completion block for a dataset written to `path`
pub fn print_report(report: &RunReport, path: &Path) {
    println!("=== Harvest Complete ===\n");
    println!("  Started:        {}", report.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("  Duration:       {:.1}s", report.elapsed_seconds());
    println!("  Municipalities: {}", report.municipalities);
    println!(
        "  Columns:        {} ({} parties)",
        report.columns(),
        report.categories
    );

    if !report.dropped.is_empty() {
        println!(
            "\n  Warning: {} party tallies in {} municipalities were not in the column header and were dropped:",
            report.dropped_total(),
            report.dropped.len()
        );
        for entry in &report.dropped {
            println!(
                "    - {} ({}): {}",
                entry.name,
                entry.code,
                entry.categories.join(", ")
            );
        }
    }

    println!("\nDone. Results saved to file: {}", path.display());
}
