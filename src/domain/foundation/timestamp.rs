//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

const SPANISH_MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Long Spanish date used in report headers, e.g. `5 de marzo de 2025`.
    pub fn format_long_es(&self) -> String {
        let month = SPANISH_MONTHS[self.0.month0() as usize];
        format!("{} de {} de {}", self.0.day(), month, self.0.year())
    }

    /// Compact date used in file names, e.g. `20250305`.
    pub fn format_compact(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed(y: i32, m: u32, d: u32) -> Timestamp {
        Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap())
    }

    #[test]
    fn timestamp_now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.as_datetime() >= &before);
        assert!(ts.as_datetime() <= &after);
    }

    #[test]
    fn formats_long_spanish_date() {
        assert_eq!(fixed(2025, 3, 5).format_long_es(), "5 de marzo de 2025");
        assert_eq!(fixed(2024, 12, 31).format_long_es(), "31 de diciembre de 2024");
    }

    #[test]
    fn formats_compact_date() {
        assert_eq!(fixed(2025, 3, 5).format_compact(), "20250305");
    }

    #[test]
    fn ordering_follows_time() {
        let earlier = fixed(2024, 1, 1);
        let later = fixed(2024, 1, 2);
        assert!(earlier.is_before(&later));
        assert!(earlier < later);
    }

    #[test]
    fn timestamp_deserializes_from_json() {
        let ts: Timestamp = serde_json::from_str("\"2024-01-15T10:30:00Z\"").unwrap();
        assert_eq!(ts.as_datetime().year(), 2024);
    }
}
