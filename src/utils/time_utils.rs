use chrono::{DateTime, Utc};

// Everything is stored as UNIX seconds and displayed
// in UTC, the server timezone never matters.
// chrono formatting reference:
// https://docs.rs/chrono/latest/chrono/format/strftime/index.html
const DATE_FORMAT_STANDARD: &'static str = "%d/%m/%Y %H:%M";
const DATE_FORMAT_LONG: &'static str = "%-d %B %Y";
const DATE_FORMAT_USCOMPACT: &'static str = "%Y-%m-%d";

pub const SECONDS_PER_DAY: i64 = 86400;

pub enum DateFormat {
  Standard,
  Long,
  USCompact,
}

pub fn timestamp_to_date_string(timestamp: i64, format: DateFormat) -> String {
  let format_str = match format {
    DateFormat::Standard => DATE_FORMAT_STANDARD,
    DateFormat::Long => DATE_FORMAT_LONG,
    DateFormat::USCompact => DATE_FORMAT_USCOMPACT,
  };
  // Out of range timestamps can't come from the database
  // in practice, an empty string is good enough for them.
  match DateTime::<Utc>::from_timestamp(timestamp, 0) {
    Some(d) => d.format(format_str).to_string(),
    None => String::new()
  }
}

pub fn current_timestamp() -> i64 {
  Utc::now().timestamp()
}
