use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// How a timestamp is shown to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateStyle {
    /// Locale default, used on screen and in text exports.
    DayDateTime,
    /// Full date and time without the weekday, used in spreadsheets.
    DateTime,
}

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn user_offset(offset_minutes: i32) -> UtcOffset {
    UtcOffset::from_whole_seconds(offset_minutes.saturating_mul(60)).unwrap_or(UtcOffset::UTC)
}

/// Formats a stored UTC timestamp in the viewer's offset.
pub(crate) fn format_user_date(value: PrimitiveDateTime, offset: UtcOffset, style: DateStyle) -> String {
    let local = value.assume_utc().to_offset(offset);
    let description = match style {
        DateStyle::DayDateTime => format_description!(
            "[weekday], [day padding:none] [month repr:long] [year], [hour repr:12 padding:none]:[minute] [period]"
        ),
        DateStyle::DateTime => format_description!(
            "[day padding:none] [month repr:long] [year], [hour repr:12 padding:none]:[minute] [period]"
        ),
    };
    local.format(description).unwrap_or_else(|_| local.to_string())
}
