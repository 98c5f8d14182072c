use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Duration, OffsetDateTime,
    PrimitiveDateTime,
};

/// Accepts RFC 3339, a space instead of `T`, and naive timestamps (assumed UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let raw = raw.trim();
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(value);
    }

    let normalized = raw.replacen(' ', "T", 1);
    if let Ok(value) = OffsetDateTime::parse(&normalized, &Rfc3339) {
        return Some(value);
    }

    if normalized.len() >= 19 && normalized.as_bytes().get(10) == Some(&b'T') {
        let candidate = format!("{normalized}Z");
        if let Ok(value) = OffsetDateTime::parse(&candidate, &Rfc3339) {
            return Some(value);
        }
    }

    PrimitiveDateTime::parse(
        &normalized,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    )
    .ok()
    .map(PrimitiveDateTime::assume_utc)
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid datetime: {raw}")))
}

pub(crate) fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_timestamp(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}")))
            .map(Some),
        None => Ok(None),
    }
}

/// `Sat Oct 18 2025`, the short date used in quiz captions.
pub(crate) fn format_date_caption(value: OffsetDateTime) -> String {
    value
        .format(&format_description!("[weekday repr:short] [month repr:short] [day] [year]"))
        .unwrap_or_else(|_| value.date().to_string())
}

pub(crate) fn is_older_than(value: OffsetDateTime, now: OffsetDateTime, window: Duration) -> bool {
    now.checked_sub(window).is_some_and(|cutoff| value < cutoff)
}

/// Saturates instead of overflowing for absurd hour counts.
pub(crate) fn window_from_hours(hours: u64) -> Duration {
    Duration::seconds(i64::try_from(hours.saturating_mul(3600)).unwrap_or(i64::MAX))
}
