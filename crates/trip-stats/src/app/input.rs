//! Loading tracking histories from disk
//!
//! Two inputs are understood:
//!
//! - JSON history exports: an array of location records
//!   (`{ "id", "deviceId", "lat", "lng", "timestamp" }`) possibly mixing devices.
//!   Records are grouped by `deviceId`, keeping the order in which they appear.
//!   Records whose timestamp cannot be parsed are dropped.
//! - GPX files: every timed track point, keyed by the file name.

use super::CliError;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use trip_stats_lib::{Fix, FixRecord, history};

/// One location record as stored by the history service
#[derive(Debug, Deserialize)]
struct LocationRecord {
    #[serde(rename = "deviceId", default)]
    device_id: Option<String>,
    #[serde(flatten)]
    fix: FixRecord,
}

/// The fixes of one tracked entity
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceHistory {
    pub device_id: String,
    pub fixes: Vec<Fix>,
}

/// Parse a JSON history export, grouping records by device
///
/// Records without a `deviceId` are attributed to `fallback_id`.
pub fn parse_json_history<R: Read>(
    reader: R,
    fallback_id: &str,
) -> Result<Vec<DeviceHistory>, CliError> {
    let records: Vec<LocationRecord> = serde_json::from_reader(reader)?;

    let mut histories: Vec<DeviceHistory> = Vec::new();
    let mut index_by_device: HashMap<String, usize> = HashMap::new();

    let mut untimed = 0usize;

    for record in records {
        let Some(fix) = record.fix.into_fix() else {
            untimed += 1;
            continue;
        };
        let device_id = record
            .device_id
            .unwrap_or_else(|| fallback_id.to_string());
        let index = *index_by_device
            .entry(device_id.clone())
            .or_insert_with(|| {
                histories.push(DeviceHistory {
                    device_id,
                    fixes: Vec::new(),
                });
                histories.len() - 1
            });
        histories[index].fixes.push(fix);
    }

    if untimed > 0 {
        tracing::warn!(
            "Skipping {} history records without a valid timestamp",
            untimed
        );
    }

    Ok(histories)
}

/// Load every history contained in a file, dispatching on its extension
pub fn load_file(path: &Path) -> Result<Vec<DeviceHistory>, CliError> {
    profiling::scope!("load_file");

    let file_id = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase());

    let histories = match extension.as_deref() {
        Some("json") => {
            let file = std::fs::File::open(path)?;
            parse_json_history(std::io::BufReader::new(file), &file_id)?
        }
        Some("gpx") => vec![DeviceHistory {
            device_id: file_id,
            fixes: history::load_gpx_file(path)?,
        }],
        _ => return Err(CliError::UnsupportedInput(path.to_path_buf())),
    };

    tracing::info!(
        "Loaded {} fixes for {} device(s) from {}",
        histories.iter().map(|h| h.fixes.len()).sum::<usize>(),
        histories.len(),
        path.display()
    );

    Ok(histories)
}

/// Load all files, merging histories that share a device id across files
pub fn load_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DeviceHistory>, CliError> {
    let mut merged: Vec<DeviceHistory> = Vec::new();

    for path in paths {
        for loaded in load_file(path.as_ref())? {
            match merged.iter_mut().find(|h| h.device_id == loaded.device_id) {
                Some(existing) => existing.fixes.extend(loaded.fixes),
                None => merged.push(loaded),
            }
        }
    }

    Ok(merged)
}

/// Keep only the requested devices, failing if one of them has no history
pub fn select_devices(
    histories: Vec<DeviceHistory>,
    devices: &[String],
) -> Result<Vec<DeviceHistory>, CliError> {
    if devices.is_empty() {
        return Ok(histories);
    }

    if let Some(missing) = devices
        .iter()
        .find(|id| !histories.iter().any(|h| &h.device_id == *id))
    {
        return Err(CliError::UnknownDevice(missing.clone()));
    }

    Ok(histories
        .into_iter()
        .filter(|h| devices.contains(&h.device_id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const EXPORT: &str = r#"[
        {"id": "loc-1", "deviceId": "truck-7", "lat": -25.2637, "lng": -57.5759, "timestamp": "2024-05-01T08:00:00.000Z"},
        {"id": "loc-2", "deviceId": "van-2", "lat": -25.3000, "lng": -57.6000, "timestamp": "2024-05-01T08:00:05.000Z"},
        {"id": "loc-3", "deviceId": "truck-7", "lat": -25.2700, "lng": -57.5800, "timestamp": "2024-05-01T08:01:00.000Z"},
        {"id": "loc-4", "lat": -25.0, "lng": -57.0, "timestamp": "2024-05-01T08:02:00.000Z"}
    ]"#;

    #[test]
    fn test_groups_by_device_in_order_of_appearance() {
        let histories = parse_json_history(EXPORT.as_bytes(), "export").unwrap();

        let ids: Vec<&str> = histories.iter().map(|h| h.device_id.as_str()).collect();
        assert_eq!(ids, vec!["truck-7", "van-2", "export"]);
        assert_eq!(histories[0].fixes.len(), 2);
        assert_eq!(histories[0].fixes[1].lat, Some(-25.27));
        assert_eq!(histories[1].fixes.len(), 1);
        assert_eq!(histories[2].fixes.len(), 1);
    }

    #[test]
    fn test_missing_coordinates_are_kept_as_none() {
        let json = r#"[{"deviceId": "d", "lng": -57.5, "timestamp": "2024-05-01T08:00:00Z"}]"#;
        let histories = parse_json_history(json.as_bytes(), "export").unwrap();
        assert_eq!(histories[0].fixes[0].lat, None);
    }

    #[test]
    fn test_timestamp_without_offset_is_utc() {
        let json = r#"[{"deviceId": "d", "lat": 1.0, "lng": 1.0, "timestamp": "2024-05-01T08:00:00"}]"#;
        let histories = parse_json_history(json.as_bytes(), "export").unwrap();
        assert_eq!(histories[0].fixes[0].timestamp, datetime!(2024-05-01 08:00 UTC));
    }

    #[test]
    fn test_unparseable_timestamps_are_dropped() {
        let json = r#"[
            {"deviceId": "d", "lat": 1.0, "lng": 1.0, "timestamp": "2024-05-01T08:00:00Z"},
            {"deviceId": "d", "lat": 2.0, "lng": 1.0, "timestamp": "yesterday"},
            {"deviceId": "e", "lat": 3.0, "lng": 1.0},
            {"deviceId": "d", "lat": 4.0, "lng": 1.0, "timestamp": "2024-05-01T08:05:00Z"}
        ]"#;
        let histories = parse_json_history(json.as_bytes(), "export").unwrap();

        assert_eq!(histories.len(), 1);
        let lats: Vec<_> = histories[0].fixes.iter().map(|f| f.lat).collect();
        assert_eq!(lats, vec![Some(1.0), Some(4.0)]);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(matches!(
            parse_json_history("[{".as_bytes(), "export"),
            Err(CliError::Json(_))
        ));
    }

    #[test]
    fn test_select_devices() {
        let histories = parse_json_history(EXPORT.as_bytes(), "export").unwrap();

        let all = select_devices(histories.clone(), &[]).unwrap();
        assert_eq!(all.len(), 3);

        let selected = select_devices(histories.clone(), &["van-2".to_string()]).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].device_id, "van-2");

        assert!(matches!(
            select_devices(histories, &["bus-1".to_string()]),
            Err(CliError::UnknownDevice(id)) if id == "bus-1"
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load_file(Path::new("history.csv")),
            Err(CliError::UnsupportedInput(_))
        ));
    }
}
