//! Looks up UTC offsets for the configured timezone.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// The current UTC offset of `canonical_timezone`, e.g. "Pacific/Auckland".
///
/// Returns `None` if the name is not a known timezone. The offset reflects
/// daylight saving at the time of the call, so callers should not cache it.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    let timezone = time_tz::timezones::get_by_name(canonical_timezone)?;

    Some(timezone.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod tests {
    use time::UtcOffset;

    use super::get_local_offset;

    #[test]
    fn utc_has_zero_offset() {
        assert_eq!(get_local_offset("Etc/UTC"), Some(UtcOffset::UTC));
    }

    #[test]
    fn fixed_offset_zone() {
        // The sign of Etc/GMT zones is inverted.
        assert_eq!(
            get_local_offset("Etc/GMT-10"),
            Some(UtcOffset::from_hms(10, 0, 0).unwrap())
        );
    }

    #[test]
    fn unknown_timezone_is_none() {
        assert_eq!(get_local_offset("Middle/Earth"), None);
        assert_eq!(get_local_offset(""), None);
    }
}
