//! Timestamped GPS readings

use geo::Point;
use time::OffsetDateTime;

/// A single timestamped coordinate reading
///
/// Coordinates are optional because device feeds are noisy: a reading may arrive
/// without a latitude or longitude (or with a non-numeric one). Such fixes still
/// take part in trip duration, but any segment touching them is skipped.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix {
    /// Latitude in degrees
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::coordinate")
    )]
    pub lat: Option<f64>,
    /// Longitude in degrees
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::coordinate")
    )]
    pub lng: Option<f64>,
    /// Instant the reading was taken
    ///
    /// Written as RFC 3339. Read as RFC 3339 or ISO-8601, where a date-time
    /// without an offset is taken as UTC (see [`crate::history::parse_timestamp`]).
    #[cfg_attr(
        feature = "serde",
        serde(
            serialize_with = "time::serde::rfc3339::serialize",
            deserialize_with = "lenient::timestamp"
        )
    )]
    pub timestamp: OffsetDateTime,
}

/// A fix as it arrives from a history feed, before its timestamp is known to be usable
///
/// Every field degrades to `None` instead of failing: missing or non-numeric
/// coordinates, and missing, non-string or unparseable timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct FixRecord {
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::coordinate")
    )]
    pub lat: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::coordinate")
    )]
    pub lng: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(default, deserialize_with = "lenient::optional_timestamp")
    )]
    pub timestamp: Option<OffsetDateTime>,
}

impl FixRecord {
    /// The usable fix, or `None` when the record carries no valid timestamp
    pub fn into_fix(self) -> Option<Fix> {
        Some(Fix {
            lat: self.lat,
            lng: self.lng,
            timestamp: self.timestamp?,
        })
    }
}

impl Fix {
    /// Create a fix with both coordinates present
    pub fn new(lat: f64, lng: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            lat: Some(lat),
            lng: Some(lng),
            timestamp,
        }
    }

    /// Create a fix from a `geo` point (x = lng, y = lat)
    pub fn from_point(point: Point<f64>, timestamp: OffsetDateTime) -> Self {
        Self::new(point.y(), point.x(), timestamp)
    }

    /// Both coordinates, if present
    #[inline]
    pub fn lat_lng(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }

    /// Milliseconds elapsed from `earlier` to `self` (negative if `self` is older)
    #[inline]
    pub fn millis_since(&self, earlier: &Fix) -> i64 {
        let millis = (self.timestamp - earlier.timestamp).whole_milliseconds();
        millis.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }
}

#[cfg(feature = "serde")]
mod lenient {
    use crate::history::parse_timestamp;
    use serde::{Deserialize, Deserializer, de::Error, de::IgnoredAny};
    use time::OffsetDateTime;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCoordinate {
        Number(f64),
        Other(IgnoredAny),
    }

    /// Accept numbers, map `null`, strings and anything else to `None`
    pub fn coordinate<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawCoordinate::deserialize(deserializer)? {
            RawCoordinate::Number(value) => Some(value),
            RawCoordinate::Other(_) => None,
        })
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawTimestamp {
        Text(String),
        Other(IgnoredAny),
    }

    /// RFC 3339 or ISO-8601 date-time; anything else is an error
    pub fn timestamp<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        parse_timestamp(&text)
            .ok_or_else(|| D::Error::custom(format!("unrecognized timestamp {text:?}")))
    }

    /// Like [`timestamp`], but unusable values become `None`
    pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawTimestamp::deserialize(deserializer)? {
            RawTimestamp::Text(text) => parse_timestamp(&text),
            RawTimestamp::Other(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_from_point_axis_order() {
        let fix = Fix::from_point(Point::new(-57.63, -25.28), datetime!(2024-05-01 08:00 UTC));
        assert_eq!(fix.lat, Some(-25.28));
        assert_eq!(fix.lng, Some(-57.63));
    }

    #[test]
    fn test_missing_coordinate_has_no_lat_lng() {
        let fix = Fix {
            lat: None,
            lng: Some(-57.63),
            timestamp: datetime!(2024-05-01 08:00 UTC),
        };
        assert!(fix.lat_lng().is_none());
    }

    #[test]
    fn test_record_without_timestamp_has_no_fix() {
        let record = FixRecord {
            lat: Some(1.0),
            lng: Some(2.0),
            timestamp: None,
        };
        assert_eq!(record.into_fix(), None);

        let record = FixRecord {
            timestamp: Some(datetime!(2024-05-01 08:00 UTC)),
            ..record
        };
        assert_eq!(
            record.into_fix(),
            Some(Fix::new(1.0, 2.0, datetime!(2024-05-01 08:00 UTC)))
        );
    }

    #[test]
    fn test_millis_since() {
        let a = Fix::new(0.0, 0.0, datetime!(2024-05-01 08:00:00 UTC));
        let b = Fix::new(0.0, 0.0, datetime!(2024-05-01 08:01:30.250 UTC));
        assert_eq!(b.millis_since(&a), 90_250);
        assert_eq!(a.millis_since(&b), -90_250);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_history_record() {
        let json = r#"{
            "id": "loc-1714550400000",
            "deviceId": "truck-7",
            "lat": -25.2637,
            "lng": -57.5759,
            "timestamp": "2024-05-01T08:00:00.000Z"
        }"#;
        let fix: Fix = serde_json::from_str(json).unwrap();
        assert_eq!(fix.lat, Some(-25.2637));
        assert_eq!(fix.lng, Some(-57.5759));
        assert_eq!(fix.timestamp, datetime!(2024-05-01 08:00 UTC));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_tolerates_bad_coordinates() {
        let json = r#"[
            {"lng": -57.5, "timestamp": "2024-05-01T08:00:00Z"},
            {"lat": null, "lng": -57.5, "timestamp": "2024-05-01T08:00:00Z"},
            {"lat": "n/a", "lng": -57.5, "timestamp": "2024-05-01T08:00:00Z"}
        ]"#;
        let fixes: Vec<Fix> = serde_json::from_str(json).unwrap();
        assert!(fixes.iter().all(|f| f.lat.is_none() && f.lng == Some(-57.5)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_local_iso_timestamp_as_utc() {
        let json = r#"{"lat": 1.0, "lng": 1.0, "timestamp": "2024-05-01T08:00:00"}"#;
        let fix: Fix = serde_json::from_str(json).unwrap();
        assert_eq!(fix.timestamp, datetime!(2024-05-01 08:00 UTC));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_fix_rejects_unparseable_timestamp() {
        let json = r#"{"lat": 1.0, "lng": 1.0, "timestamp": "yesterday"}"#;
        assert!(serde_json::from_str::<Fix>(json).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_record_degrades_bad_timestamps_to_none() {
        let json = r#"[
            {"lat": 1.0, "lng": 1.0, "timestamp": "yesterday"},
            {"lat": 1.0, "lng": 1.0, "timestamp": 1714550400000},
            {"lat": 1.0, "lng": 1.0},
            {"lat": 1.0, "lng": 1.0, "timestamp": "2024-05-01T10:00:00+02:00"}
        ]"#;
        let records: Vec<FixRecord> = serde_json::from_str(json).unwrap();
        let timestamps: Vec<_> = records.iter().map(|r| r.timestamp).collect();
        assert_eq!(
            timestamps,
            vec![None, None, None, Some(datetime!(2024-05-01 08:00 UTC))]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serialize_writes_rfc3339() {
        let fix = Fix::new(1.0, 2.0, datetime!(2024-05-01 08:00 UTC));
        let json = serde_json::to_value(fix).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T08:00:00Z");
    }
}
