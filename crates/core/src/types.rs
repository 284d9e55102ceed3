/// All database primary keys are SQLite INTEGER PRIMARY KEY (64-bit rowid).
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current wall-clock time as fractional seconds since the Unix epoch.
pub fn epoch_seconds_now() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}
