//! Measurement table loader
//!
//! Reads a CSV results file (or standard input) into a `MeasurementTable`.
//! Loading is best-effort: any record that does not decompose into
//! `name,pin,native` is skipped and the rest of the source is still read. Only
//! a source that cannot be opened or read is an error.

use crate::config::LoaderConfig;
use crate::types::{BenchDiffError, MeasurementRow, MeasurementTable, Result};
use num_bigint::BigInt;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Where a measurement table is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Standard input, selected with `-`
    Stdin,
    /// A CSV file on disk
    Path(PathBuf),
}

impl Source {
    /// Interpret a command line token: `-` is stdin, anything else a path
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Source::Stdin
        } else {
            Source::Path(PathBuf::from(arg))
        }
    }
}

impl From<&Path> for Source {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Source {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => write!(f, "<stdin>"),
            Source::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Loads measurement tables with a fixed CSV dialect
#[derive(Debug, Clone, Default)]
pub struct TableLoader {
    config: LoaderConfig,
}

impl TableLoader {
    /// Create a loader with the default dialect
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a loader with a custom dialect
    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Load a table from a file or standard input
    ///
    /// # Arguments
    /// * `source` - `Source::Stdin` or `Source::Path`
    ///
    /// # Returns
    /// * `Result<MeasurementTable>` - all rows that parsed; Err only if the
    ///   source could not be opened or read
    ///
    /// # Example
    /// ```no_run
    /// use bench_diff::{Source, TableLoader};
    ///
    /// let table = TableLoader::new().load(&Source::from_arg("results.csv")).unwrap();
    /// println!("{} instructions", table.len());
    /// ```
    pub fn load(&self, source: &Source) -> Result<MeasurementTable> {
        log::info!("Loading measurements from {}", source);

        let table = match source {
            Source::Stdin => self.load_named(io::stdin().lock(), "<stdin>")?,
            Source::Path(path) => {
                let file = File::open(path).map_err(|error| BenchDiffError::Io {
                    source_name: path.display().to_string(),
                    error,
                })?;
                self.load_named(file, &path.display().to_string())?
            }
        };

        log::debug!("Loaded {} entries from {}", table.len(), source);
        Ok(table)
    }

    /// Load a table from any reader
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<MeasurementTable> {
        self.load_named(reader, "<reader>")
    }

    fn load_named<R: Read>(&self, reader: R, source_name: &str) -> Result<MeasurementTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            // The header row is optional and detected by its first field.
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut table = MeasurementTable::new();
        let mut first_record = true;
        let mut skipped = 0usize;

        for (index, result) in csv_reader.records().enumerate() {
            let record = match result {
                Ok(record) => record,
                Err(err) if matches!(err.kind(), csv::ErrorKind::Utf8 { .. }) => {
                    log::trace!("Skipping record {} (invalid UTF-8): {}", index, err);
                    first_record = false;
                    skipped += 1;
                    continue;
                }
                Err(err) => {
                    log::error!("Failed reading {}: {}", source_name, err);
                    return Err(BenchDiffError::Csv(err));
                }
            };

            if record.is_empty() {
                continue;
            }

            if first_record {
                first_record = false;
                if record.get(0).is_some_and(|field| self.config.is_header(field)) {
                    log::trace!("Skipping header record in {}", source_name);
                    continue;
                }
            }

            match parse_row(&record) {
                Some(row) => {
                    log::trace!("Loaded row {}", row);
                    table.insert(row);
                }
                None => {
                    log::trace!("Skipping malformed record {}: {:?}", index, record);
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            log::debug!("Skipped {} malformed records in {}", skipped, source_name);
        }

        Ok(table)
    }
}

/// Load a table from `source` with the default dialect
pub fn load(source: &Source) -> Result<MeasurementTable> {
    TableLoader::new().load(source)
}

/// Decompose a record into `(name, pin, native)`; `None` if any part is missing
/// or not an integer. Fields past the third are ignored.
fn parse_row(record: &csv::StringRecord) -> Option<MeasurementRow> {
    let name = record.get(0)?.trim();
    let pin = parse_integer(record.get(1)?)?;
    let native = parse_integer(record.get(2)?)?;
    Some(MeasurementRow::new(name, pin, native))
}

/// Parse an unbounded base-10 integer. Surrounding whitespace, a leading sign
/// and single underscores between digits (`1_000`) are accepted.
fn parse_integer(text: &str) -> Option<BigInt> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
        || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'_')
    {
        return None;
    }

    let magnitude: BigInt = digits.replace('_', "").parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::ToPrimitive;

    fn values(table: &MeasurementTable, name: &str) -> Option<(i64, i64)> {
        table
            .get(name)
            .map(|(pin, native)| (pin.to_i64().unwrap(), native.to_i64().unwrap()))
    }

    fn load_str(input: &str) -> MeasurementTable {
        TableLoader::new().load_from_reader(input.as_bytes()).unwrap()
    }

    #[test]
    fn test_source_from_arg() {
        assert_eq!(Source::from_arg("-"), Source::Stdin);
        assert_eq!(
            Source::from_arg("bench.csv"),
            Source::Path(PathBuf::from("bench.csv"))
        );
        assert_eq!(Source::Stdin.to_string(), "<stdin>");
    }

    #[test]
    fn test_explicit_header_is_skipped() {
        let table = load_str("name,pin,native\nadd,10,8\nmul,20,25\n");

        assert_eq!(table.len(), 2);
        assert!(!table.contains("name"));
        assert_eq!(values(&table, "add"), Some((10, 8)));
        assert_eq!(values(&table, "mul"), Some((20, 25)));
    }

    #[test]
    fn test_missing_header_keeps_first_row() {
        let table = load_str("add,10,8\nmul,20,25\n");

        assert_eq!(table.len(), 2);
        assert_eq!(values(&table, "add"), Some((10, 8)));
    }

    #[test]
    fn test_header_marker_is_exact() {
        // `Name` is not the marker, so that first row is data and fails to parse.
        let table = load_str("Name,pin,native\nadd,1,2\n");
        assert_eq!(table.len(), 1);

        let table = load_str(" name,5,6\n");
        assert_eq!(values(&table, "name"), Some((5, 6)));
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let input = "\
name,pin,native
add,10,8
# comment
short,1
float,1.5,2
text,abc,3
,,
mul,20,25
";
        let table = load_str(input);

        assert_eq!(table.len(), 2);
        assert_eq!(values(&table, "add"), Some((10, 8)));
        assert_eq!(values(&table, "mul"), Some((20, 25)));
    }

    #[test]
    fn test_blank_lines_and_whitespace() {
        let table = load_str("\n\nname,pin,native\n\n  add , 10 ,-8 \n\n");

        assert_eq!(table.len(), 1);
        assert_eq!(values(&table, "add"), Some((10, -8)));
    }

    #[test]
    fn test_values_beyond_i64_are_kept() {
        let table = load_str("big,99999999999999999999,1\nok,1,2\n");

        assert_eq!(table.len(), 2);
        let (pin, native) = table.get("big").unwrap();
        assert_eq!(pin.to_string(), "99999999999999999999");
        assert_eq!(native, &BigInt::from(1));
        assert_eq!(values(&table, "ok"), Some((1, 2)));
    }

    #[test]
    fn test_integer_syntax() {
        assert_eq!(parse_integer("1_000"), Some(BigInt::from(1000)));
        assert_eq!(parse_integer(" +42 "), Some(BigInt::from(42)));
        assert_eq!(parse_integer("-007"), Some(BigInt::from(-7)));
        assert_eq!(
            parse_integer("-18446744073709551616").map(|v| v.to_string()),
            Some("-18446744073709551616".to_string())
        );

        for bad in ["", "-", "+-1", "_1", "1_", "1__0", "1.0", "0x10", "- 1", "1e3"] {
            assert_eq!(parse_integer(bad), None, "{:?} should not parse", bad);
        }
    }

    #[test]
    fn test_duplicate_name_later_row_wins() {
        let table = load_str("add,1,1\nadd,7,9\n");

        assert_eq!(table.len(), 1);
        assert_eq!(values(&table, "add"), Some((7, 9)));
    }

    #[test]
    fn test_quoted_fields_and_extra_columns() {
        let table = load_str("\"a,b\",\"3\",4,extra,columns\n");
        assert_eq!(values(&table, "a,b"), Some((3, 4)));
    }

    #[test]
    fn test_invalid_utf8_record_is_skipped() {
        let mut input = b"name,pin,native\n".to_vec();
        input.extend_from_slice(b"bad\xff,1,2\n");
        input.extend_from_slice(b"add,3,4\n");

        let table = TableLoader::new().load_from_reader(&input[..]).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(values(&table, "add"), Some((3, 4)));
    }

    #[test]
    fn test_empty_input() {
        assert!(load_str("").is_empty());
        assert!(load_str("name,pin,native\n").is_empty());
    }

    #[test]
    fn test_custom_delimiter() {
        let loader = TableLoader::with_config(LoaderConfig::new().with_delimiter(b';'));
        let table = loader.load_from_reader("name;pin;native\nadd;2;1\n".as_bytes()).unwrap();
        assert_eq!(values(&table, "add"), Some((2, 1)));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = Source::from_arg("/nonexistent/bench-diff/results.csv");
        match load(&source) {
            Err(BenchDiffError::Io { source_name, .. }) => {
                assert!(source_name.contains("results.csv"));
            }
            other => panic!("expected Io error, got {:?}", other),
        }
    }
}
