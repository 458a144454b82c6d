use chrono::Utc;

/// Booking references are a kind prefix followed by an epoch-millisecond
/// timestamp (`THAR1761667594602`). Millisecond resolution alone is not
/// collision-proof, so callers check the candidate against the store and
/// bump the millisecond component until it is free.
pub fn generate(prefix: &str) -> String {
    generate_from(prefix, Utc::now().timestamp_millis())
}

pub fn generate_from(prefix: &str, millis: i64) -> String {
    format!("{prefix}{millis}")
}
