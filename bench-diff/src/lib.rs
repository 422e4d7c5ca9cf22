//! Benchmark Comparison Library
//!
//! Loads benchmark results tables (`name,pin,native` CSV) and turns them into a
//! comparison report with absolute and percentage deltas per instruction.
//!
//! # Architecture
//!
//! - `loader` parses a CSV file or standard input into a `MeasurementTable`,
//!   skipping any record that is not `name,int,int`
//! - `report` derives `delta(abs)` and `delta(%)` per name and renders the
//!   sorted output table
//!
//! The command line front end lives in `bench-diff-cli`.
//!
//! # Example Usage
//!
//! ```no_run
//! use bench_diff::{MeasurementTable, ReportGenerator, Source, TableLoader};
//!
//! let loader = TableLoader::new();
//! let current = loader.load(&Source::from_arg("current.csv")).unwrap();
//! let baseline = loader.load(&Source::from_arg("baseline.csv")).unwrap();
//!
//! for line in ReportGenerator::new().generate(&current, &baseline) {
//!     println!("{}", line);
//! }
//!
//! // Without a baseline run
//! let lines = ReportGenerator::new().generate(&current, &MeasurementTable::new());
//! assert!(!lines.is_empty());
//! ```

// Public modules
pub mod config;
pub mod loader;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use config::LoaderConfig;
pub use loader::{load, Source, TableLoader};
pub use report::{generate, ReportGenerator, ReportRow, REPORT_HEADER};
pub use types::{BenchDiffError, MeasurementRow, MeasurementTable, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
