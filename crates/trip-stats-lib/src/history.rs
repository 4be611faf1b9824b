//! Building fix sequences from recorded histories
//!
//! History exports arrive either as JSON records (see [`Fix`] with the `serde`
//! feature) or as GPX tracks. This module handles the GPX side and a couple of
//! sequence-level checks that front ends run before computing stats.

use crate::{Fix, Result};
use std::io::Read;
use std::path::Path;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

/// Parse a history timestamp
///
/// RFC 3339 is tried first, then ISO-8601. A date-time without an offset
/// (`2024-05-01T08:00:00`) is read as UTC.
pub fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(text, &Rfc3339)
        .or_else(|_| OffsetDateTime::parse(text, &Iso8601::DEFAULT))
        .or_else(|_| PrimitiveDateTime::parse(text, &Iso8601::DEFAULT).map(|t| t.assume_utc()))
        .ok()
}

/// Extract fixes from every track point of a GPX document, in document order
///
/// Track points without a `<time>` element cannot take part in duration
/// accounting and are dropped with a warning.
pub fn fixes_from_gpx(gpx: &gpx::Gpx) -> Vec<Fix> {
    #[cfg(feature = "profiling")]
    profiling::scope!("history::fixes_from_gpx");

    let mut fixes = Vec::new();
    let mut untimed = 0usize;

    for track in &gpx.tracks {
        for segment in &track.segments {
            for waypoint in &segment.points {
                match waypoint.time.clone() {
                    Some(time) => {
                        fixes.push(Fix::from_point(waypoint.point(), OffsetDateTime::from(time)))
                    }
                    None => untimed += 1,
                }
            }
        }
    }

    if untimed > 0 {
        tracing::warn!("Skipping {} GPX track points without a timestamp", untimed);
    }

    fixes
}

/// Parse a GPX document from a reader and extract its fixes
pub fn read_gpx<R: Read>(reader: R) -> Result<Vec<Fix>> {
    let gpx = gpx::read(reader)?;
    Ok(fixes_from_gpx(&gpx))
}

/// Load fixes from a GPX file on disk
pub fn load_gpx_file<P: AsRef<Path>>(path: P) -> Result<Vec<Fix>> {
    let file = std::fs::File::open(path.as_ref())?;
    read_gpx(std::io::BufReader::new(file))
}

/// Index of the first fix whose timestamp is earlier than its predecessor's
///
/// `None` means the sequence is chronologically non-decreasing.
pub fn first_out_of_order(fixes: &[Fix]) -> Option<usize> {
    fixes
        .windows(2)
        .position(|pair| pair[1].timestamp < pair[0].timestamp)
        .map(|index| index + 1)
}

/// Stable sort by timestamp; fixes sharing a timestamp keep their relative order
pub fn sort_chronologically(fixes: &mut [Fix]) {
    fixes.sort_by_key(|fix| fix.timestamp);
}
