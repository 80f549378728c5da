// SPDX-License-Identifier: PMPL-1.0-or-later

//! Verification report output

pub mod formatter;
pub mod output;

use crate::verify::VerificationReport;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

pub use formatter::ReportFormatter;
pub use output::ReportOutputFormat;

/// Print report to console
pub fn print_report(report: &VerificationReport) {
    ReportFormatter::new().print(report);
}

/// Save report to file in the given format
pub fn save_report<P: AsRef<Path>>(
    report: &VerificationReport,
    format: ReportOutputFormat,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = format.serialize(report)?;
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
