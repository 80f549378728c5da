// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serialization helpers for printed/exported reports

use crate::report::formatter::ReportFormatter;
use crate::verify::VerificationReport;
use anyhow::Result;
use clap::ValueEnum;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportOutputFormat {
    Text,
    Json,
    Yaml,
}

impl ReportOutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "text" | "txt" => Some(ReportOutputFormat::Text),
            "json" => Some(ReportOutputFormat::Json),
            "yaml" | "yml" => Some(ReportOutputFormat::Yaml),
            _ => None,
        }
    }

    /// Format implied by an output file's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::parse)
    }

    pub fn serialize(&self, report: &VerificationReport) -> Result<String> {
        match self {
            // Files never carry terminal escape codes.
            ReportOutputFormat::Text => Ok(ReportFormatter::plain().render(report)),
            ReportOutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportOutputFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        }
    }
}
