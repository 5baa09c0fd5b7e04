//! Platform abstraction layer
//!
//! Wall-clock time for timestamps and the daily-challenge date. The browser
//! build reads `Date`; native reads `SystemTime`.

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Today's UTC date as `YYYY-MM-DD`
pub fn today() -> String {
    date_string(now_ms())
}

/// UTC date of a millisecond timestamp as `YYYY-MM-DD`
pub fn date_string(timestamp_ms: f64) -> String {
    let days = (timestamp_ms / 86_400_000.0).floor() as i64;
    let (y, m, d) = civil_from_days(days);
    format!("{y:04}-{m:02}-{d:02}")
}

/// Proleptic Gregorian date for a day count since 1970-01-01
fn civil_from_days(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let y = yoe + era * 400 + i64::from(m <= 2);
    (y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_string() {
        assert_eq!(date_string(0.0), "1970-01-01");
        // 2000-02-29 12:00 UTC
        assert_eq!(date_string(951_825_600_000.0), "2000-02-29");
        // 2026-10-16 00:00 UTC
        assert_eq!(date_string(1_792_108_800_000.0), "2026-10-16");
    }

    #[test]
    fn test_today_is_well_formed() {
        let today = today();
        assert_eq!(today.len(), 10);
        assert_eq!(&today[4..5], "-");
        assert!(now_ms() > 0.0);
    }
}
