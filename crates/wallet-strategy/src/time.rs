//! Timestamps for stored rows.
//!
//! All timestamps are Unix epoch microseconds (`i64`, the SQLite INTEGER type).

use chrono::{DateTime, Utc};

/// Current time as microseconds since the Unix epoch.
pub fn now_micros() -> i64 {
    Utc::now().timestamp_micros()
}

/// Format microseconds as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_micros(micros: i64) -> String {
    let secs = micros.div_euclid(1_000_000);
    let nsecs = (micros.rem_euclid(1_000_000) * 1000) as u32;
    DateTime::<Utc>::from_timestamp(secs, nsecs)
        .unwrap_or(DateTime::UNIX_EPOCH)
        .format("%Y-%m-%d %H:%M:%S UTC")
        .to_string()
}
