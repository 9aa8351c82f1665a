//! ISO-8601 parsing and formatting for meal timestamps.
//!
//! Timestamps are stored as naive UTC wall-clock values with microsecond
//! precision, which is what a Postgres `TIMESTAMP` column holds.

use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

const NAIVE_FORMATS: &[&[FormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

const OFFSET: &[FormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

const DATE_ONLY: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parse an ISO-8601 date or date-time. A trailing `Z` or `±HH:MM` offset is
/// accepted after a time and dropped; the wall-clock value is kept as given.
pub fn parse_iso8601(input: &str) -> Option<PrimitiveDateTime> {
    // years are four unsigned digits, no surrounding whitespace
    if !input.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let parsed = match strip_offset(input) {
        Some(local) => parse_naive(local)?,
        None => parse_naive(input)
            .or_else(|| Date::parse(input, DATE_ONLY).ok().map(Date::midnight))?,
    };
    if parsed.year() < 1 {
        return None;
    }

    Some(truncate_to_micros(parsed))
}

fn parse_naive(input: &str) -> Option<PrimitiveDateTime> {
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| PrimitiveDateTime::parse(input, fmt).ok())
}

/// The local part of `input` when it ends in a UTC offset.
fn strip_offset(input: &str) -> Option<&str> {
    if let Some(local) = input.strip_suffix('Z') {
        return Some(local);
    }
    let split = input.len().checked_sub(6)?;
    let (local, offset) = (input.get(..split)?, input.get(split..)?);
    UtcOffset::parse(offset, OFFSET).ok().map(|_| local)
}

/// Render like `2024-01-01T12:00:00`, adding `.ffffff` only when the
/// microsecond part is non-zero.
pub fn format_iso8601(dt: &PrimitiveDateTime) -> String {
    let base = format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
        dt.year(),
        u8::from(dt.month()),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second()
    );
    match dt.microsecond() {
        0 => base,
        us => format!("{base}.{us:06}"),
    }
}

pub fn utc_now() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    truncate_to_micros(PrimitiveDateTime::new(now.date(), now.time()))
}

fn truncate_to_micros(dt: PrimitiveDateTime) -> PrimitiveDateTime {
    let micros = dt.microsecond() * 1_000;
    dt.replace_nanosecond(micros).unwrap_or(dt)
}

/// serde adapter for `PrimitiveDateTime` fields.
pub mod iso8601 {
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    pub fn serialize<S: Serializer>(dt: &PrimitiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_iso8601(dt))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<PrimitiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_iso8601(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid ISO-8601 date-time: {raw}")))
    }
}
