//! Calendar-date helpers shared by the engine and every storage backend.
//!
//! Dates are stored as ISO 8601 calendar dates (`YYYY-MM-DD`). Readers are
//! lenient: a full ISO date-time is truncated to its date, and blank cells or
//! the literal `None` are read as "no date".

use chrono::{Days, NaiveDate};

pub const ISO_FORMAT: &str = "%Y-%m-%d";

pub fn encode(date: NaiveDate) -> String { date.format(ISO_FORMAT).to_string() }

/// Parse a required date, accepting `YYYY-MM-DD` or an ISO date-time.
pub fn parse(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
  let s = raw.trim();
  let date_part = match s.get(..10) {
    Some(head) if s.len() > 10 && matches!(s.as_bytes()[10], b'T' | b' ') => head,
    _ => s,
  };
  NaiveDate::parse_from_str(date_part, ISO_FORMAT)
}

/// Parse an optional date cell.
pub fn parse_optional(raw: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
  let s = raw.trim();
  if s.is_empty() || s == "None" || s.eq_ignore_ascii_case("null") {
    return Ok(None);
  }
  parse(s).map(Some)
}

/// `date + days`, saturating at the end of the representable calendar.
pub fn add_days(date: NaiveDate, days: u32) -> NaiveDate {
  date
    .checked_add_days(Days::new(u64::from(days)))
    .unwrap_or(NaiveDate::MAX)
}

/// Serde adapter for `Option<NaiveDate>` fields using the lenient reader.
pub mod optional {
  use chrono::NaiveDate;
  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    match value {
      Some(date) => serializer.serialize_str(&super::encode(*date)),
      None => serializer.serialize_none(),
    }
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
  where
    D: Deserializer<'de>,
  {
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
      Some(s) => super::parse_optional(&s).map_err(serde::de::Error::custom),
      None => Ok(None),
    }
  }
}
