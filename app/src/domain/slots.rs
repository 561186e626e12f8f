// foodtruck/src/domain/slots.rs

//! Pickup slots and "open now" status derived from schedules.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::models::Schedule;

pub const SLOT_MINUTES: u32 = 30;
const SLOT_FORMAT: &str = "%-I:%M %p";

/// Times from `start` every thirty minutes while before `end`, plus `end`
/// itself when it falls on the grid.
pub fn pickup_slots(start: NaiveTime, end: NaiveTime) -> Vec<NaiveTime> {
  let start_min = start.num_seconds_from_midnight() / 60;
  let end_min = end.num_seconds_from_midnight() / 60;

  (start_min..=end_min)
    .step_by(SLOT_MINUTES as usize)
    .filter_map(|m| NaiveTime::from_hms_opt(m / 60, m % 60, 0))
    .collect()
}

pub fn format_slot(time: NaiveTime) -> String {
  time.format(SLOT_FORMAT).to_string()
}

/// Parses `h:mm AM/PM` (case-insensitive meridiem).
pub fn parse_slot(raw: &str) -> Option<NaiveTime> {
  NaiveTime::parse_from_str(&raw.trim().to_ascii_uppercase(), "%I:%M %p").ok()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// True when any schedule covers `now` (bounds inclusive).
pub fn is_open(schedules: &[Schedule], now: NaiveDateTime) -> bool {
  schedules
    .iter()
    .any(|s| s.date == now.date() && s.start_time <= now.time() && now.time() <= s.end_time)
}
