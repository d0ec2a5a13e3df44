use crate::error::{google_calendar_error, AssistantResult};
use chrono::{DateTime, Duration, FixedOffset};

/// IANA zone name sent with every event payload
pub const TIME_ZONE: &str = "Asia/Kolkata";

/// Fixed UTC+5:30 civil offset, no daylight saving
const UTC_OFFSET: &str = "+05:30";

/// Time of day used when the operator gave none
pub const DEFAULT_START_TIME: &str = "09:00";

/// Every event runs for exactly one hour
const EVENT_DURATION_HOURS: i64 = 1;

/// Parse a time string in HH:MM format
pub fn parse_time(time_str: &str) -> Option<(u32, u32)> {
    let parts: Vec<&str> = time_str.split(':').collect();
    if parts.len() != 2 {
        return None;
    }
    let hour = parts[0].parse::<u32>().ok()?;
    let minute = parts[1].parse::<u32>().ok()?;
    if hour > 23 || minute > 59 {
        return None;
    }
    Some((hour, minute))
}

/// Compose the event start instant from a date and an HH:MM time in the
/// fixed civil offset
pub fn compose_start(date: &str, time: &str) -> AssistantResult<DateTime<FixedOffset>> {
    let (hour, minute) = parse_time(time)
        .ok_or_else(|| google_calendar_error(&format!("Invalid time format: {}", time)))?;

    let start = format!("{}T{:02}:{:02}:00{}", date, hour, minute, UTC_OFFSET);
    DateTime::parse_from_rfc3339(&start)
        .map_err(|e| google_calendar_error(&format!("Invalid date or time format: {}", e)))
}

/// End of an event is always one hour after its start
pub fn event_end(start: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    start + Duration::hours(EVENT_DURATION_HOURS)
}
