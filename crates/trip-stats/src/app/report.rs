//! Rendering computed statistics

use super::settings::OutputFormat;
use serde::Serialize;
use std::io::Write;
use time::Date;
use trip_stats_lib::{TripStats, TripSummary};

/// Statistics for one device, ready for output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceReport {
    pub device_id: String,
    pub fix_count: usize,
    pub summary: TripSummary,
    pub stats: TripStats,
}

impl DeviceReport {
    pub fn new(device_id: String, fix_count: usize, stats: TripStats) -> Self {
        Self {
            device_id,
            fix_count,
            summary: stats.into(),
            stats,
        }
    }
}

/// Write all reports in the requested format
pub fn write_reports<W: Write>(
    out: &mut W,
    reports: &[DeviceReport],
    format: OutputFormat,
    report_date: Date,
) -> std::io::Result<()> {
    match format {
        OutputFormat::Text => {
            for report in reports {
                writeln!(out, "{}: {}", report.device_id, report.summary)?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, reports)?;
            writeln!(out)?;
        }
        OutputFormat::Report => {
            for (i, report) in reports.iter().enumerate() {
                if i > 0 {
                    writeln!(out)?;
                }
                write_activity_report(out, report, report_date)?;
            }
        }
    }
    Ok(())
}

/// Printable activity report for one device
fn write_activity_report<W: Write>(
    out: &mut W,
    report: &DeviceReport,
    report_date: Date,
) -> std::io::Result<()> {
    let summary = &report.summary;
    writeln!(out, "Activity Report")?;
    writeln!(out, "Device: {}", report.device_id)?;
    writeln!(out, "Report date: {report_date}")?;
    writeln!(out, "Fixes analyzed: {}", report.fix_count)?;
    writeln!(out)?;
    writeln!(out, "Trip summary:")?;
    writeln!(out, "- Total distance: {}", summary.distance)?;
    writeln!(out, "- Total stops: {}", summary.stops)?;
    writeln!(out, "- Time stopped: {}", summary.stop_time)?;
    writeln!(out, "- Trip duration: {}", summary.trip_time)?;
    Ok(())
}
