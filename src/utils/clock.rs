use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Office offset from UTC. Fixed, so no daylight-saving shift ever applies.
pub const OFFICE_UTC_OFFSET_SECS: i32 = 7 * 60 * 60;

/// `DD-MM-YYYY`, the stored day key.
pub const DATE_FORMAT: &str = "%d-%m-%Y";
/// `HH:MM:SS`, the stored check-in/check-out time.
pub const TIME_FORMAT: &str = "%H:%M:%S";

pub fn office_offset() -> FixedOffset {
    FixedOffset::east_opt(OFFICE_UTC_OFFSET_SECS).expect("UTC+7 is a valid offset")
}

/// Source of the current instant. Injected so rules can be tested at a fixed moment.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    fn now_office(&self) -> DateTime<FixedOffset> {
        self.now_utc().with_timezone(&office_offset())
    }

    /// Current wall-clock time in the office zone.
    fn time_of_day(&self) -> String {
        self.now_office().format(TIME_FORMAT).to_string()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Parses a `DD-MM-YYYY` day key. Only the canonical spelling is accepted, so `1-2-2026` or
/// a two-digit year is refused even though chrono would read them.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .filter(|d| d.format(DATE_FORMAT).to_string() == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn late_utc_evening_is_next_office_day() {
        let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 15, 17, 30, 5).unwrap());
        assert_eq!(clock.now_office().format(DATE_FORMAT).to_string(), "16-10-2026");
        assert_eq!(clock.time_of_day(), "00:30:05");
    }

    #[test]
    fn offset_ignores_daylight_saving() {
        let winter = FixedClock(Utc.with_ymd_and_hms(2026, 1, 10, 1, 0, 0).unwrap());
        let summer = FixedClock(Utc.with_ymd_and_hms(2026, 7, 10, 1, 0, 0).unwrap());
        assert_eq!(winter.time_of_day(), "08:00:00");
        assert_eq!(summer.time_of_day(), "08:00:00");
    }

    #[test]
    fn parses_day_keys() {
        assert_eq!(parse_date("01-02-2026"), NaiveDate::from_ymd_opt(2026, 2, 1));
        assert_eq!(parse_date("2026-02-01"), None);
        assert_eq!(parse_date("31-02-2026"), None);
        assert_eq!(parse_date("1-2-2026"), None);
        assert_eq!(parse_date("01-02-26"), None);
        assert_eq!(parse_date("01-02-+2026"), None);
    }
}
