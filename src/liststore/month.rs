//! Month-stamp helpers (spec §6): `yyyymm` is `strftime("%Y%m", gmtime(ctime))`.

use chrono::{DateTime, Datelike, TimeZone, Utc};

/// Compute the six-character UTC month stamp for `ctime` (epoch seconds).
pub fn yyyymm(ctime: i64) -> String {
    let dt = DateTime::<Utc>::from_timestamp(ctime, 0).unwrap_or_else(|| Utc.timestamp_opt(0, 0).unwrap());
    dt.format("%Y%m").to_string()
}

/// Epoch second of the first day of `yyyymm` (UTC). Used as the
/// `ctime_max` placeholder for an empty month (spec §3/§4.5).
///
/// Panics if `stamp` is not a well-formed six-digit `yyyymm` string; this
/// is only ever called with stamps this crate produced itself via
/// [`yyyymm`].
pub fn first_of_month_epoch(stamp: &str) -> i64 {
    assert!(stamp.len() == 6, "malformed yyyymm stamp: {stamp:?}");
    let year: i32 = stamp[0..4].parse().expect("malformed yyyymm stamp");
    let month: u32 = stamp[4..6].parse().expect("malformed yyyymm stamp");
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .expect("malformed yyyymm stamp")
        .timestamp()
}

/// Year and month components of a `yyyymm` stamp, for ordering/arithmetic.
pub fn year_month(stamp: &str) -> (i32, u32) {
    let dt = DateTime::<Utc>::from_timestamp(first_of_month_epoch(stamp), 0).unwrap();
    (dt.year(), dt.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yyyymm_formats_known_date() {
        // 2013-01-01T00:00:00Z
        assert_eq!(yyyymm(1_356_998_400), "201301");
    }

    #[test]
    fn yyyymm_boundary_end_of_month() {
        // 2013-01-31T23:59:59Z and the next second, 2013-02-01T00:00:00Z.
        let jan31_end = first_of_month_epoch("201301") + 30 * 86_400 + 86_399;
        let feb1_start = jan31_end + 1;
        assert_eq!(yyyymm(jan31_end), "201301");
        assert_eq!(yyyymm(feb1_start), "201302");
    }

    #[test]
    fn first_of_month_epoch_round_trips_through_yyyymm() {
        let stamp = "201303";
        let epoch = first_of_month_epoch(stamp);
        assert_eq!(yyyymm(epoch), stamp);
    }

    #[test]
    fn year_month_parses_components() {
        assert_eq!(year_month("201307"), (2013, 7));
    }
}
