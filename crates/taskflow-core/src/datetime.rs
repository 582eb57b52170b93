use chrono::{
  DateTime,
  Datelike,
  Duration,
  Local,
  LocalResult,
  NaiveDate,
  NaiveDateTime,
  NaiveTime,
  TimeZone,
  Utc,
  Weekday
};
use chrono_tz::Tz;
use serde::{
  Deserialize,
  Serialize
};
use tracing::error;

/// Zone used to turn instants into calendar days.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum DayZone {
  #[default]
  Local,
  Named(Tz)
}

impl DayZone {
  /// Resolves a configured IANA id; blank or invalid ids fall back to
  /// the system zone.
  pub fn resolve(
    raw: Option<&str>
  ) -> Self {
    let Some(raw) = raw else {
      return Self::Local;
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
      return Self::Local;
    }

    match trimmed.parse::<Tz>() {
      | Ok(tz) => Self::Named(tz),
      | Err(err) => {
        error!(
          timezone = %trimmed,
          error = %err,
          "invalid timezone id; using local time"
        );
        Self::Local
      }
    }
  }

  #[must_use]
  pub fn day_of(
    &self,
    at: &DateTime<Utc>
  ) -> NaiveDate {
    match self {
      | Self::Local => {
        at.with_timezone(&Local)
          .date_naive()
      }
      | Self::Named(tz) => {
        at.with_timezone(tz).date_naive()
      }
    }
  }

  #[must_use]
  pub fn today(
    &self,
    now: DateTime<Utc>
  ) -> NaiveDate {
    self.day_of(&now)
  }

  /// The UTC instant of local midnight on `day`. Days whose midnight
  /// falls in a DST gap resolve to the first valid instant after it.
  #[must_use]
  pub fn midnight_utc(
    &self,
    day: NaiveDate
  ) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    match self {
      | Self::Local => {
        resolve_local(&Local, naive)
      }
      | Self::Named(tz) => {
        resolve_local(tz, naive)
      }
    }
  }

  /// Interprets a wall-clock time in this zone.
  #[must_use]
  pub fn local_to_utc(
    &self,
    naive: NaiveDateTime
  ) -> DateTime<Utc> {
    match self {
      | Self::Local => {
        resolve_local(&Local, naive)
      }
      | Self::Named(tz) => {
        resolve_local(tz, naive)
      }
    }
  }
}

fn resolve_local<Z: TimeZone>(
  zone: &Z,
  naive: NaiveDateTime
) -> DateTime<Utc> {
  match zone.from_local_datetime(&naive) {
    | LocalResult::Single(dt) => {
      dt.with_timezone(&Utc)
    }
    | LocalResult::Ambiguous(first, _) => {
      first.with_timezone(&Utc)
    }
    | LocalResult::None => {
      let shifted =
        naive + Duration::hours(1);
      zone
        .from_local_datetime(&shifted)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| {
          DateTime::<Utc>::from_naive_utc_and_offset(
            naive, Utc
          )
        })
    }
  }
}

/// A stored due date. The raw text is kept as-is so unparseable
/// values survive a save; they simply never land on a day.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct DueDate(String);

impl DueDate {
  pub fn from_raw(
    raw: impl Into<String>
  ) -> Self {
    Self(raw.into())
  }

  /// Local midnight of `day`, written as an RFC 3339 UTC instant.
  #[must_use]
  pub fn from_local_day(
    day: NaiveDate,
    zone: &DayZone
  ) -> Self {
    Self(
      zone
        .midnight_utc(day)
        .to_rfc3339_opts(
          chrono::SecondsFormat::Millis,
          true
        )
    )
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Calendar day of this due date in `zone`, or `None` when the text
  /// is not a recognised date.
  #[must_use]
  pub fn local_day(
    &self,
    zone: &DayZone
  ) -> Option<NaiveDate> {
    match parse_due_text(&self.0)? {
      | ParsedDue::Instant(at) => {
        Some(zone.day_of(&at))
      }
      | ParsedDue::Wall(naive) => {
        Some(naive.date())
      }
      | ParsedDue::Day(day) => Some(day)
    }
  }

  /// The instant this task falls due. Plain dates count from local
  /// midnight.
  #[must_use]
  pub fn instant(
    &self,
    zone: &DayZone
  ) -> Option<DateTime<Utc>> {
    match parse_due_text(&self.0)? {
      | ParsedDue::Instant(at) => Some(at),
      | ParsedDue::Wall(naive) => {
        Some(zone.local_to_utc(naive))
      }
      | ParsedDue::Day(day) => {
        Some(zone.midnight_utc(day))
      }
    }
  }
}

enum ParsedDue {
  Instant(DateTime<Utc>),
  Wall(NaiveDateTime),
  Day(NaiveDate)
}

fn parse_due_text(
  raw: &str
) -> Option<ParsedDue> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    return None;
  }

  if let Ok(dt) =
    DateTime::parse_from_rfc3339(trimmed)
  {
    return Some(ParsedDue::Instant(
      dt.with_timezone(&Utc)
    ));
  }

  for format in [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M"
  ] {
    if let Ok(naive) =
      NaiveDateTime::parse_from_str(
        trimmed, format
      )
    {
      return Some(ParsedDue::Wall(naive));
    }
  }

  NaiveDate::parse_from_str(
    trimmed, "%Y-%m-%d"
  )
  .ok()
  .map(ParsedDue::Day)
}

/// Parses due-date input typed by a user: `YYYY-MM-DD`, `today`,
/// `tomorrow` or `yesterday`.
pub fn parse_day_input(
  input: &str,
  today: NaiveDate
) -> Option<NaiveDate> {
  let lower =
    input.trim().to_ascii_lowercase();
  match lower.as_str() {
    | "" => None,
    | "today" => Some(today),
    | "tomorrow" => {
      Some(add_days(today, 1))
    }
    | "yesterday" => {
      Some(add_days(today, -1))
    }
    | other => {
      NaiveDate::parse_from_str(
        other, "%Y-%m-%d"
      )
      .ok()
    }
  }
}

pub fn add_days(
  date: NaiveDate,
  days: i64
) -> NaiveDate {
  date
    .checked_add_signed(Duration::days(
      days
    ))
    .unwrap_or(date)
}

pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  add_days(
    first_day_of_month(
      next_year, next_month
    ),
    -1
  )
}

pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

/// Moves `date` by whole months, clamping the day to the target
/// month's length.
pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let mut year = date.year();
  let mut month =
    date.month() as i32 + months;

  while month < 1 {
    month += 12;
    year = year.saturating_sub(1);
  }
  while month > 12 {
    month -= 12;
    year = year.saturating_add(1);
  }

  let month = month as u32;
  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

pub fn start_of_week(
  day: NaiveDate,
  week_start: Weekday
) -> NaiveDate {
  let day_idx = day
    .weekday()
    .num_days_from_monday()
    as i64;
  let start_idx = week_start
    .num_days_from_monday()
    as i64;
  let diff =
    (7 + day_idx - start_idx) % 7;
  add_days(day, -diff)
}

pub fn parse_week_start(
  raw: &str
) -> Weekday {
  if raw
    .trim()
    .eq_ignore_ascii_case("sunday")
  {
    Weekday::Sun
  } else {
    Weekday::Mon
  }
}
