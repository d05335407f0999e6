use time::{macros::format_description, Date, Duration};

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Parse a `YYYY-MM-DD` query value.
pub fn parse_iso_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
}

/// Monday..=Sunday of the week containing `day`. None when that week runs
/// off either end of the supported calendar.
pub fn week_bounds(day: Date) -> Option<(Date, Date)> {
    let start = day.checked_sub(Duration::days(day.weekday().number_days_from_monday().into()))?;
    Some((start, start.checked_add(Duration::days(6))?))
}
