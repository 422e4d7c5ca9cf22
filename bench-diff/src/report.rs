//! Comparison report generation
//!
//! Produces the `instr,pin,native,delta(abs),delta(%)` table for the current
//! run. The baseline table is accepted so callers can load and validate it,
//! but it does not feed into any row: each row compares its own `pin` against
//! its own `native`.

use crate::types::MeasurementTable;
use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};
use std::fmt;
use std::io::{self, Write};

/// Header line of every report
pub const REPORT_HEADER: &str = "instr,pin,native,delta(abs),delta(%)";

/// One derived output row
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub name: String,
    pub pin: BigInt,
    pub native: BigInt,
    /// `pin - native`
    pub delta_abs: BigInt,
    /// `delta_abs / native * 100`, or `0.0` when `native` is zero
    pub delta_pct: f64,
}

impl ReportRow {
    /// Derive the delta columns for one measurement
    pub fn new(name: impl Into<String>, pin: impl Into<BigInt>, native: impl Into<BigInt>) -> Self {
        let pin = pin.into();
        let native = native.into();
        let delta_abs = &pin - &native;
        let delta_pct = if native.is_zero() {
            0.0
        } else {
            ratio(&delta_abs, &native) * 100.0
        };

        Self {
            name: name.into(),
            pin,
            native,
            delta_abs,
            delta_pct,
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{:.1}",
            self.name, self.pin, self.native, self.delta_abs, self.delta_pct
        )
    }
}

/// `numerator / denominator` as `f64`, exact for operands within 2^53
fn ratio(numerator: &BigInt, denominator: &BigInt) -> f64 {
    // Drop low bits both operands can spare; the smaller keeps 1000 bits.
    let excess = numerator.bits().min(denominator.bits()).saturating_sub(1000);
    let n = (numerator >> excess).to_f64().unwrap_or(f64::NAN);
    let d = (denominator >> excess).to_f64().unwrap_or(f64::NAN);
    n / d
}

/// Builds comparison reports from loaded tables
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Derived rows for every name in `current`, sorted by name
    pub fn rows(&self, current: &MeasurementTable, baseline: &MeasurementTable) -> Vec<ReportRow> {
        if !baseline.is_empty() {
            let baseline_only = baseline
                .iter()
                .filter(|(name, _)| !current.contains(name))
                .count();
            log::debug!(
                "Baseline has {} entries ({} not in current run); not used in deltas",
                baseline.len(),
                baseline_only
            );
        }

        current
            .iter()
            .map(|(name, (pin, native))| ReportRow::new(name, pin.clone(), native.clone()))
            .collect()
    }

    /// Report as output lines, header first
    pub fn generate(&self, current: &MeasurementTable, baseline: &MeasurementTable) -> Vec<String> {
        std::iter::once(REPORT_HEADER.to_string())
            .chain(self.rows(current, baseline).iter().map(ToString::to_string))
            .collect()
    }

    /// Write the report, one line per row plus the header
    pub fn write_report<W: Write>(
        &self,
        out: &mut W,
        current: &MeasurementTable,
        baseline: &MeasurementTable,
    ) -> io::Result<()> {
        for line in self.generate(current, baseline) {
            writeln!(out, "{}", line)?;
        }
        out.flush()
    }
}

/// Report lines for `current` with the default generator
pub fn generate(current: &MeasurementTable, baseline: &MeasurementTable) -> Vec<String> {
    ReportGenerator::new().generate(current, baseline)
}
