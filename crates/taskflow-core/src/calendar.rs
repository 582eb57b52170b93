use std::collections::BTreeMap;

use chrono::{
  Datelike,
  NaiveDate,
  Weekday
};
use tracing::debug;

use crate::datetime::{
  DayZone,
  add_days,
  first_day_of_month,
  last_day_of_month,
  shift_months,
  start_of_week
};
use crate::task::Task;

pub const MONTH_GRID_CELLS: usize = 42;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum CalendarSpan {
  #[default]
  Month,
  Week
}

impl CalendarSpan {
  pub fn toggled(self) -> Self {
    match self {
      | Self::Month => Self::Week,
      | Self::Week => Self::Month
    }
  }
}

/// Navigation state of one calendar pane.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub struct CalendarNav {
  pub focus: NaiveDate,
  pub span:  CalendarSpan
}

impl CalendarNav {
  pub fn new(today: NaiveDate) -> Self {
    Self {
      focus: today,
      span:  CalendarSpan::Month
    }
  }

  pub fn prev(&mut self) {
    self.focus = match self.span {
      | CalendarSpan::Month => {
        month_start(shift_months(
          month_start(self.focus),
          -1
        ))
      }
      | CalendarSpan::Week => {
        add_days(self.focus, -7)
      }
    };
    debug!(focus = %self.focus, "calendar moved back");
  }

  pub fn next(&mut self) {
    self.focus = match self.span {
      | CalendarSpan::Month => {
        month_start(shift_months(
          month_start(self.focus),
          1
        ))
      }
      | CalendarSpan::Week => {
        add_days(self.focus, 7)
      }
    };
    debug!(focus = %self.focus, "calendar moved forward");
  }

  pub fn today(
    &mut self,
    today: NaiveDate
  ) {
    self.focus = today;
  }

  pub fn toggle_span(&mut self) {
    self.span = self.span.toggled();
  }
}

fn month_start(
  day: NaiveDate
) -> NaiveDate {
  first_day_of_month(
    day.year(),
    day.month()
  )
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
)]
pub struct CalendarCell {
  pub date:        NaiveDate,
  pub in_month:    bool,
  pub task_count:  usize,
  pub is_today:    bool,
  pub is_selected: bool
}

impl CalendarCell {
  pub fn has_tasks(&self) -> bool {
    self.task_count > 0
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
)]
pub struct CalendarGrid {
  pub focus:      NaiveDate,
  pub span:       CalendarSpan,
  pub week_start: Weekday,
  pub cells:      Vec<CalendarCell>
}

impl CalendarGrid {
  pub fn title(&self) -> String {
    match self.span {
      | CalendarSpan::Month => {
        self
          .focus
          .format("%B %Y")
          .to_string()
      }
      | CalendarSpan::Week => {
        let start = start_of_week(
          self.focus,
          self.week_start
        );
        let end = add_days(start, 6);
        format!(
          "{} - {}",
          start.format("%b %d"),
          end.format("%b %d, %Y")
        )
      }
    }
  }

  pub fn labels(
    &self
  ) -> [&'static str; 7] {
    weekday_labels(self.week_start)
  }

  pub fn rows(
    &self
  ) -> impl Iterator<Item = &[CalendarCell]>
  {
    self.cells.chunks(7)
  }
}

pub fn weekday_labels(
  week_start: Weekday
) -> [&'static str; 7] {
  match week_start {
    | Weekday::Sun => {
      [
        "Sun", "Mon", "Tue", "Wed",
        "Thu", "Fri", "Sat"
      ]
    }
    | _ => {
      [
        "Mon", "Tue", "Wed", "Thu",
        "Fri", "Sat", "Sun"
      ]
    }
  }
}

/// Due-task count per local day, over the whole list.
pub fn due_counts(
  tasks: &[Task],
  zone: &DayZone
) -> BTreeMap<NaiveDate, usize> {
  let mut counts = BTreeMap::new();
  for day in tasks
    .iter()
    .filter_map(|task| task.due_day(zone))
  {
    *counts
      .entry(day)
      .or_insert(0_usize) += 1;
  }
  counts
}

/// Six full weeks around the month of `focus`.
pub fn build_month_grid(
  focus: NaiveDate,
  week_start: Weekday,
  tasks: &[Task],
  zone: &DayZone,
  today: NaiveDate,
  selected: Option<NaiveDate>
) -> CalendarGrid {
  let first = month_start(focus);
  let last = last_day_of_month(
    focus.year(),
    focus.month()
  );
  let grid_start =
    start_of_week(first, week_start);
  let counts = due_counts(tasks, zone);

  let cells = (0_i64
    ..MONTH_GRID_CELLS as i64)
    .map(|offset| {
      let date =
        add_days(grid_start, offset);
      make_cell(
        date,
        date >= first && date <= last,
        &counts,
        today,
        selected
      )
    })
    .collect::<Vec<_>>();

  debug!(
    month = %first.format("%Y-%m"),
    grid_start = %grid_start,
    due_days = counts.len(),
    "built month grid"
  );

  CalendarGrid {
    focus,
    span: CalendarSpan::Month,
    week_start,
    cells
  }
}

/// The seven days of the week containing `focus`.
pub fn build_week_row(
  focus: NaiveDate,
  week_start: Weekday,
  tasks: &[Task],
  zone: &DayZone,
  today: NaiveDate,
  selected: Option<NaiveDate>
) -> CalendarGrid {
  let start =
    start_of_week(focus, week_start);
  let counts = due_counts(tasks, zone);
  let cells = (0_i64..7_i64)
    .map(|offset| {
      let date = add_days(start, offset);
      make_cell(
        date,
        date.month() == focus.month(),
        &counts,
        today,
        selected
      )
    })
    .collect();

  CalendarGrid {
    focus,
    span: CalendarSpan::Week,
    week_start,
    cells
  }
}

pub fn build_grid(
  nav: &CalendarNav,
  week_start: Weekday,
  tasks: &[Task],
  zone: &DayZone,
  today: NaiveDate,
  selected: Option<NaiveDate>
) -> CalendarGrid {
  match nav.span {
    | CalendarSpan::Month => {
      build_month_grid(
        nav.focus, week_start, tasks,
        zone, today, selected
      )
    }
    | CalendarSpan::Week => {
      build_week_row(
        nav.focus, week_start, tasks,
        zone, today, selected
      )
    }
  }
}

fn make_cell(
  date: NaiveDate,
  in_month: bool,
  counts: &BTreeMap<NaiveDate, usize>,
  today: NaiveDate,
  selected: Option<NaiveDate>
) -> CalendarCell {
  CalendarCell {
    date,
    in_month,
    task_count: counts
      .get(&date)
      .copied()
      .unwrap_or(0),
    is_today: date == today,
    is_selected: selected == Some(date)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    TimeZone,
    Utc
  };

  use super::*;
  use crate::datetime::DueDate;
  use crate::task::{
    TaskDraft,
    TaskId
  };

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  fn due_task(raw: &str) -> Task {
    let now = Utc
      .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
      .single()
      .expect("valid time");
    let mut task = Task::from_draft(
      TaskDraft::titled("due"),
      TaskId::generate(),
      now,
      &DayZone::Named(chrono_tz::UTC)
    );
    task.due_date =
      Some(DueDate::from_raw(raw));
    task
  }

  fn assert_two_runs(
    grid: &CalendarGrid
  ) {
    let flags: Vec<bool> = grid
      .cells
      .iter()
      .map(|cell| cell.in_month)
      .collect();
    let first_in = flags
      .iter()
      .position(|in_month| *in_month)
      .expect("month has days");
    let last_in = flags
      .iter()
      .rposition(|in_month| *in_month)
      .expect("month has days");
    assert!(
      flags[first_in..=last_in]
        .iter()
        .all(|in_month| *in_month)
    );
    assert!(
      flags[..first_in]
        .iter()
        .all(|in_month| !*in_month)
    );
    assert!(
      flags[last_in + 1..]
        .iter()
        .all(|in_month| !*in_month)
    );
  }

  #[test]
  fn march_2024_grid_layout() {
    let zone = DayZone::Named(chrono_tz::UTC);
    let grid = build_month_grid(
      date(2024, 3, 15),
      Weekday::Mon,
      &[],
      &zone,
      date(2024, 3, 15),
      None
    );

    assert_eq!(grid.cells.len(), 42);
    // 1 March 2024 is a Friday: column 5 of a Monday-first row.
    assert_eq!(
      grid.cells[0].date,
      date(2024, 2, 26)
    );
    assert_eq!(
      grid.cells[4].date,
      date(2024, 3, 1)
    );
    assert!(
      grid.cells[..4]
        .iter()
        .all(|cell| !cell.in_month
          && cell.date.month() == 2)
    );
    assert_eq!(
      grid.cells[34].date,
      date(2024, 3, 31)
    );
    assert_eq!(
      grid.cells[35].date,
      date(2024, 4, 1)
    );
    assert_eq!(
      grid.cells[41].date,
      date(2024, 4, 7)
    );
    assert_eq!(
      grid
        .cells
        .iter()
        .filter(|cell| cell.in_month)
        .count(),
      31
    );
    assert_eq!(grid.title(), "March 2024");
  }

  #[test]
  fn every_month_has_42_cells_and_two_outside_runs() {
    let zone = DayZone::Named(chrono_tz::UTC);
    for year in [2023, 2024, 2026] {
      for month in 1..=12 {
        for week_start in
          [Weekday::Mon, Weekday::Sun]
        {
          let grid = build_month_grid(
            date(year, month, 1),
            week_start,
            &[],
            &zone,
            date(2000, 1, 1),
            None
          );
          assert_eq!(
            grid.cells.len(),
            MONTH_GRID_CELLS
          );
          assert_eq!(
            grid.cells[0].date.weekday(),
            week_start
          );
          assert_two_runs(&grid);
        }
      }
    }
  }

  #[test]
  fn month_starting_on_week_start_has_no_leading_run() {
    // 1 April 2024 is a Monday.
    let grid = build_month_grid(
      date(2024, 4, 10),
      Weekday::Mon,
      &[],
      &DayZone::Named(chrono_tz::UTC),
      date(2024, 4, 10),
      None
    );
    assert!(grid.cells[0].in_month);
    assert_eq!(
      grid.cells[0].date,
      date(2024, 4, 1)
    );
  }

  #[test]
  fn cells_count_tasks_on_their_local_day() {
    let zone = DayZone::Named(
      chrono_tz::Asia::Tokyo
    );
    let tasks = vec![
      due_task("2024-03-15T09:00:00Z"),
      due_task("2024-03-15T16:00:00Z"),
      due_task("2024-03-15"),
      due_task("not a date"),
    ];

    let grid = build_month_grid(
      date(2024, 3, 1),
      Weekday::Mon,
      &tasks,
      &zone,
      date(2024, 3, 15),
      Some(date(2024, 3, 16))
    );

    let cell = |d: NaiveDate| {
      grid
        .cells
        .iter()
        .find(|cell| cell.date == d)
        .cloned()
        .expect("cell in grid")
    };

    let fifteenth = cell(date(2024, 3, 15));
    assert_eq!(fifteenth.task_count, 2);
    assert!(fifteenth.has_tasks());
    assert!(fifteenth.is_today);
    assert!(!fifteenth.is_selected);

    let sixteenth = cell(date(2024, 3, 16));
    assert_eq!(sixteenth.task_count, 1);
    assert!(sixteenth.is_selected);

    assert!(!cell(date(2024, 3, 14)).has_tasks());
    assert_eq!(
      grid
        .cells
        .iter()
        .map(|cell| cell.task_count)
        .sum::<usize>(),
      3
    );
  }

  #[test]
  fn month_navigation_rolls_over_years() {
    let mut nav =
      CalendarNav::new(date(2024, 12, 31));
    nav.next();
    assert_eq!(nav.focus, date(2025, 1, 1));
    nav.prev();
    nav.prev();
    assert_eq!(nav.focus, date(2024, 11, 1));

    let mut nav =
      CalendarNav::new(date(2024, 1, 31));
    nav.prev();
    assert_eq!(nav.focus, date(2023, 12, 1));

    nav.today(date(2026, 10, 14));
    assert_eq!(nav.focus, date(2026, 10, 14));
  }

  #[test]
  fn week_span_moves_by_seven_days() {
    let mut nav =
      CalendarNav::new(date(2024, 2, 28));
    nav.toggle_span();
    assert_eq!(nav.span, CalendarSpan::Week);
    nav.next();
    assert_eq!(nav.focus, date(2024, 3, 6));

    let grid = build_grid(
      &nav,
      Weekday::Mon,
      &[],
      &DayZone::Named(chrono_tz::UTC),
      date(2024, 3, 6),
      None
    );
    assert_eq!(grid.cells.len(), 7);
    assert_eq!(
      grid.cells[0].date,
      date(2024, 3, 4)
    );
    assert_eq!(
      grid.title(),
      "Mar 04 - Mar 10, 2024"
    );
  }

  #[test]
  fn sunday_start_labels() {
    assert_eq!(
      weekday_labels(Weekday::Sun)[0],
      "Sun"
    );
    assert_eq!(
      weekday_labels(Weekday::Mon)[6],
      "Sun"
    );
  }
}
