use serde::{self, Deserialize, Deserializer, Serializer};
use time::{
    OffsetDateTime, PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// Formats an instant the way Clockify accepts it: UTC, whole seconds,
/// `Z` suffix (e.g. `2024-03-01T09:30:00Z`).
pub fn format_clockify_datetime(datetime: &OffsetDateTime) -> Result<String, time::error::Format> {
    let utc = datetime.to_offset(UtcOffset::UTC);
    let utc = utc.replace_nanosecond(0).unwrap_or(utc);
    utc.format(&format_description!(
        "[year]-[month]-[day]T[hour]:[minute]:[second]Z"
    ))
}

// Clockify returns RFC 3339 with a `Z` suffix; older payloads omit the offset
pub fn parse_clockify_datetime(datetime_str: &str) -> Result<OffsetDateTime, String> {
    if let Ok(dt) = OffsetDateTime::parse(datetime_str, &Rfc3339) {
        return Ok(dt);
    }

    // No timezone: assume UTC
    if datetime_str.contains('T') && !datetime_str.contains('+') && !datetime_str.ends_with('Z') {
        let format = if datetime_str.contains('.') {
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]")
        } else {
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]")
        };
        if let Ok(dt) = PrimitiveDateTime::parse(datetime_str, &format) {
            return Ok(dt.assume_utc());
        }
    }

    Err(format!(
        "Failed to parse datetime '{datetime_str}': no matching format"
    ))
}

pub mod clockify_datetime_format {
    use super::{Deserialize, Deserializer, OffsetDateTime, Serializer, serde};

    pub fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted =
            super::format_clockify_datetime(datetime).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let datetime_str = String::deserialize(deserializer)?;
        super::parse_clockify_datetime(&datetime_str).map_err(serde::de::Error::custom)
    }
}

pub mod clockify_datetime_format_option {
    use super::{Deserialize, Deserializer, OffsetDateTime, Serializer, serde};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(datetime: &Option<OffsetDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match datetime {
            Some(dt) => {
                let formatted =
                    super::format_clockify_datetime(dt).map_err(serde::ser::Error::custom)?;
                serializer.serialize_str(&formatted)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) if !s.is_empty() => super::parse_clockify_datetime(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}
