//! Loader configuration types
//!
//! The defaults describe the results files produced by the benchmark harness:
//! comma separated, with an optional header row whose first field is `name`.

use serde::{Deserialize, Serialize};

/// CSV dialect used when loading a measurement table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Field delimiter (default: `,`)
    #[serde(default = "default_delimiter")]
    pub delimiter: u8,

    /// First-field value that marks the first record as a header (default: `name`)
    #[serde(default = "default_header_marker")]
    pub header_marker: String,
}

fn default_delimiter() -> u8 {
    b','
}

fn default_header_marker() -> String {
    "name".to_string()
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            header_marker: default_header_marker(),
        }
    }
}

impl LoaderConfig {
    /// Create a configuration with the default dialect
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Builder: set the header marker
    pub fn with_header_marker(mut self, marker: impl Into<String>) -> Self {
        self.header_marker = marker.into();
        self
    }

    /// True if a first record with this first field is a header
    pub fn is_header(&self, first_field: &str) -> bool {
        first_field == self.header_marker
    }
}
