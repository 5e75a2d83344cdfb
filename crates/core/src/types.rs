use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Opaque pass identifier.
pub type PassId = String;

/// Opaque user identifier, as seeded in the store.
pub type UserId = String;

/// Layouts accepted in addition to RFC 3339. These cover what an HTML
/// `datetime-local` input produces, with either `T` or a space between date
/// and time; the wall-clock value is taken as UTC.
const DATETIME_LOCAL_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// A bare date means midnight UTC.
const DATE_ONLY_FORMAT: &str = "%Y-%m-%d";

/// Parse a client-supplied timestamp.
///
/// Accepts RFC 3339 (`2026-10-18T17:00:00Z`, `2026-10-18T17:00:00+05:30`),
/// offset-less `datetime-local` values (`2026-10-18T17:00`, `2026-10-18 17:00`)
/// and bare dates (`2026-10-18`).
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, CoreError> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    for format in DATETIME_LOCAL_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }

    if let Some(midnight) = NaiveDate::parse_from_str(raw, DATE_ONLY_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }

    Err(CoreError::Validation(format!(
        "Invalid timestamp '{raw}'. Expected RFC 3339, YYYY-MM-DD[THH:MM[:SS]] or YYYY-MM-DD"
    )))
}

/// Render a timestamp the way browsers render `Date#toISOString`.
pub fn format_timestamp(ts: &Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for timestamps that arrive from clients.
///
/// Deserializes from any form [`parse_timestamp`] accepts, or from a number
/// of milliseconds since the Unix epoch. Always serializes as RFC 3339.
pub mod lenient_timestamp {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    use super::{format_timestamp, parse_timestamp, Timestamp};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }

    struct TimestampVisitor;

    impl<'de> Visitor<'de> for TimestampVisitor {
        type Value = Timestamp;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an RFC 3339 timestamp, a datetime-local string, or epoch milliseconds")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
            parse_timestamp(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
            Timestamp::from_timestamp_millis(v)
                .ok_or_else(|| E::custom(format!("epoch milliseconds out of range: {v}")))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
            let millis = i64::try_from(v)
                .map_err(|_| E::custom(format!("epoch milliseconds out of range: {v}")))?;
            self.visit_i64(millis)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Timestamp, E> {
            if !v.is_finite() {
                return Err(E::custom("epoch milliseconds must be finite"));
            }
            self.visit_i64(v.trunc() as i64)
        }
    }

    /// The same format for optional timestamps; `None` is `null`.
    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};

        use super::super::{format_timestamp, Timestamp};

        pub fn serialize<S: Serializer>(
            ts: &Option<Timestamp>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match ts {
                Some(ts) => serializer.serialize_str(&format_timestamp(ts)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Timestamp>, D::Error> {
            #[derive(Deserialize)]
            struct Wrapped(
                #[serde(with = "crate::types::lenient_timestamp")] Timestamp,
            );

            Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(ts)| ts))
        }
    }
}
