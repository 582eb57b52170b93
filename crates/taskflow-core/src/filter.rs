use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use tracing::trace;

use crate::datetime::DayZone;
use crate::task::{
  CategoryId,
  Task
};

/// The single status-or-category selector. Only one is active at a
/// time; "no filter" is `None` at the use site.
#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Hash,
)]
pub enum TaskFilter {
  Completed,
  Important,
  DueToday,
  Category(CategoryId)
}

impl TaskFilter {
  pub fn as_key(&self) -> String {
    match self {
      | Self::Completed => {
        "completed".to_string()
      }
      | Self::Important => {
        "important".to_string()
      }
      | Self::DueToday => {
        "today".to_string()
      }
      | Self::Category(id) => {
        format!("category:{id}")
      }
    }
  }

  pub fn matches(
    &self,
    task: &Task,
    today: NaiveDate,
    zone: &DayZone
  ) -> bool {
    match self {
      | Self::Completed => task.completed,
      | Self::Important => task.important,
      | Self::DueToday => {
        task.is_due_on(today, zone)
      }
      | Self::Category(id) => {
        task.category_id.as_ref() == Some(id)
      }
    }
  }
}

impl fmt::Display for TaskFilter {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    f.write_str(&self.as_key())
  }
}

impl FromStr for TaskFilter {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    let trimmed = s.trim();
    match trimmed
      .to_ascii_lowercase()
      .as_str()
    {
      | "completed" | "done" => {
        Ok(Self::Completed)
      }
      | "important" | "starred" => {
        Ok(Self::Important)
      }
      | "today" | "due-today" => {
        Ok(Self::DueToday)
      }
      | _ => {
        let id = trimmed
          .strip_prefix("category:")
          .map(str::trim)
          .filter(|id| !id.is_empty())
          .ok_or_else(|| {
            anyhow!(
              "unknown filter {trimmed:?}; \
               expected completed, \
               important, today or \
               category:<id>"
            )
          })?;
        Ok(Self::Category(
          CategoryId::from(id)
        ))
      }
    }
  }
}

/// Everything the visible list is derived from.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub struct TaskQuery {
  pub text:          String,
  pub filter:        Option<TaskFilter>,
  pub selected_date: Option<NaiveDate>
}

impl TaskQuery {
  /// `needle` is the query text, already lowercased.
  fn matches_with_needle(
    &self,
    task: &Task,
    needle: &str,
    today: NaiveDate,
    zone: &DayZone
  ) -> bool {
    if !task.matches_text(needle) {
      return false;
    }

    if let Some(filter) = &self.filter
      && !filter.matches(task, today, zone)
    {
      return false;
    }

    match self.selected_date {
      | Some(day) => {
        task.is_due_on(day, zone)
      }
      | None => true
    }
  }
}

/// Subsequence of `tasks` satisfying every active predicate, in input
/// order.
pub fn filter_tasks<'a>(
  tasks: &'a [Task],
  query: &TaskQuery,
  today: NaiveDate,
  zone: &DayZone
) -> Vec<&'a Task> {
  let needle = query.text.to_lowercase();
  let out: Vec<&Task> = tasks
    .iter()
    .filter(|task| {
      query.matches_with_needle(
        task, &needle, today, zone
      )
    })
    .collect();

  trace!(
    total = tasks.len(),
    visible = out.len(),
    filter = ?query.filter,
    selected_date = ?query.selected_date,
    "filtered tasks"
  );
  out
}

/// Sidebar badge count: `filter` alone over the full list.
pub fn count_matching(
  tasks: &[Task],
  filter: &TaskFilter,
  today: NaiveDate,
  zone: &DayZone
) -> usize {
  tasks
    .iter()
    .filter(|task| {
      filter.matches(task, today, zone)
    })
    .count()
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum StatusTab {
  #[default]
  All,
  Pending,
  Completed
}

impl StatusTab {
  pub const ALL: [StatusTab; 3] = [
    StatusTab::All,
    StatusTab::Pending,
    StatusTab::Completed
  ];

  pub fn label(self) -> &'static str {
    match self {
      | Self::All => "All",
      | Self::Pending => "Pending",
      | Self::Completed => "Completed"
    }
  }

  pub fn admits(
    self,
    task: &Task
  ) -> bool {
    match self {
      | Self::All => true,
      | Self::Pending => !task.completed,
      | Self::Completed => task.completed
    }
  }

  pub fn apply<'a>(
    self,
    tasks: Vec<&'a Task>
  ) -> Vec<&'a Task> {
    tasks
      .into_iter()
      .filter(|task| self.admits(task))
      .collect()
  }
}

impl FromStr for StatusTab {
  type Err = anyhow::Error;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    match s
      .trim()
      .to_ascii_lowercase()
      .as_str()
    {
      | "all" => Ok(Self::All),
      | "pending" | "open" => {
        Ok(Self::Pending)
      }
      | "completed" | "done" => {
        Ok(Self::Completed)
      }
      | other => Err(anyhow!(
        "unknown tab {other:?}; expected \
         all, pending or completed"
      ))
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{
    DateTime,
    TimeZone,
    Utc
  };

  use super::*;
  use crate::datetime::DueDate;
  use crate::task::TaskId;

  fn zone() -> DayZone {
    DayZone::Named(
      chrono_tz::America::New_York
    )
  }

  fn date(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  fn created() -> DateTime<Utc> {
    Utc
      .with_ymd_and_hms(2024, 3, 1, 0, 0, 0)
      .single()
      .expect("valid time")
  }

  fn task(
    id: &str,
    title: &str,
    description: &str
  ) -> Task {
    Task {
      id:          TaskId::from(id),
      title:       title.to_string(),
      description: description
        .to_string(),
      completed:   false,
      important:   false,
      category_id: None,
      due_date:    None,
      created_at:  created()
    }
  }

  fn sample() -> Vec<Task> {
    let mut a =
      task("a", "Pay rent", "");
    a.due_date = Some(DueDate::from_raw(
      "2024-03-15T09:00:00Z"
    ));
    a.category_id =
      Some(CategoryId::from("1"));

    let mut b = task(
      "b",
      "Gym",
      "leg day, pay locker fee"
    );
    b.important = true;
    b.category_id =
      Some(CategoryId::from("4"));

    let mut c =
      task("c", "Groceries", "milk");
    c.completed = true;
    c.due_date = Some(DueDate::from_raw(
      "2024-03-16T02:00:00Z"
    ));

    let mut d =
      task("d", "PAYROLL review", "");
    d.due_date =
      Some(DueDate::from_raw("garbage"));

    vec![a, b, c, d]
  }

  fn ids(
    tasks: &[&Task]
  ) -> Vec<String> {
    tasks
      .iter()
      .map(|t| t.id.to_string())
      .collect()
  }

  #[test]
  fn empty_query_keeps_everything_in_order() {
    let tasks = sample();
    let out = filter_tasks(
      &tasks,
      &TaskQuery::default(),
      date(2024, 3, 15),
      &zone()
    );
    assert_eq!(
      ids(&out),
      vec!["a", "b", "c", "d"]
    );
  }

  #[test]
  fn text_matches_title_or_description_ignoring_case() {
    let tasks = sample();
    let query = TaskQuery {
      text: "PAY".to_string(),
      ..TaskQuery::default()
    };
    let out = filter_tasks(
      &tasks,
      &query,
      date(2024, 3, 15),
      &zone()
    );
    assert_eq!(
      ids(&out),
      vec!["a", "b", "d"]
    );
    for task in out {
      let hay = format!(
        "{} {}",
        task.title, task.description
      )
      .to_lowercase();
      assert!(hay.contains("pay"));
    }
  }

  #[test]
  fn status_and_category_filters() {
    let tasks = sample();
    let today = date(2024, 3, 15);
    let run = |filter: TaskFilter| {
      let query = TaskQuery {
        filter: Some(filter),
        ..TaskQuery::default()
      };
      ids(&filter_tasks(
        &tasks, &query, today, &zone()
      ))
    };

    assert_eq!(
      run(TaskFilter::Completed),
      vec!["c"]
    );
    assert_eq!(
      run(TaskFilter::Important),
      vec!["b"]
    );
    assert_eq!(
      run(TaskFilter::Category(
        CategoryId::from("4")
      )),
      vec!["b"]
    );
    assert!(
      run(TaskFilter::Category(
        CategoryId::from("99")
      ))
      .is_empty()
    );
  }

  #[test]
  fn due_today_uses_local_days() {
    // c is due 02:00Z on the 16th, which is the evening of the 15th
    // in New York.
    let tasks = sample();
    let query = TaskQuery {
      filter: Some(TaskFilter::DueToday),
      ..TaskQuery::default()
    };
    let out = filter_tasks(
      &tasks,
      &query,
      date(2024, 3, 15),
      &zone()
    );
    assert_eq!(ids(&out), vec!["a", "c"]);
  }

  #[test]
  fn selected_date_and_filter_combine_with_and() {
    let tasks = sample();
    let query = TaskQuery {
      text:          String::new(),
      filter:        Some(
        TaskFilter::Completed
      ),
      selected_date: Some(date(
        2024, 3, 15
      ))
    };
    let out = filter_tasks(
      &tasks,
      &query,
      date(2024, 3, 1),
      &zone()
    );
    assert_eq!(ids(&out), vec!["c"]);
  }

  #[test]
  fn tasks_without_a_usable_due_date_never_match_dates() {
    let tasks = sample();
    for day in [
      date(2024, 3, 15),
      date(2024, 3, 16),
      date(1970, 1, 1)
    ] {
      let query = TaskQuery {
        selected_date: Some(day),
        ..TaskQuery::default()
      };
      let out = filter_tasks(
        &tasks,
        &query,
        day,
        &zone()
      );
      assert!(out.iter().all(|t| {
        t.id.as_str() != "b"
          && t.id.as_str() != "d"
      }));
    }
  }

  #[test]
  fn selected_late_evening_matches_morning_utc_due() {
    let utc = DayZone::Named(chrono_tz::UTC);
    let mut t = task("x", "x", "");
    t.due_date = Some(DueDate::from_raw(
      "2024-03-15T09:00:00Z"
    ));
    let selected_instant = Utc
      .with_ymd_and_hms(
        2024, 3, 15, 23, 0, 0
      )
      .single()
      .expect("valid time");
    let query = TaskQuery {
      selected_date: Some(
        utc.day_of(&selected_instant)
      ),
      ..TaskQuery::default()
    };
    let tasks = vec![t];
    assert_eq!(
      filter_tasks(
        &tasks,
        &query,
        date(2024, 1, 1),
        &utc
      )
      .len(),
      1
    );
  }

  #[test]
  fn counts_ignore_query_and_date() {
    let tasks = sample();
    let today = date(2024, 3, 15);
    assert_eq!(
      count_matching(
        &tasks,
        &TaskFilter::DueToday,
        today,
        &zone()
      ),
      2
    );
    assert_eq!(
      count_matching(
        &tasks,
        &TaskFilter::Category(
          CategoryId::from("1")
        ),
        today,
        &zone()
      ),
      1
    );
  }

  #[test]
  fn tabs_split_pending_and_completed() {
    let tasks = sample();
    let all: Vec<&Task> =
      tasks.iter().collect();
    assert_eq!(
      ids(&StatusTab::Pending
        .apply(all.clone())),
      vec!["a", "b", "d"]
    );
    assert_eq!(
      ids(&StatusTab::Completed
        .apply(all.clone())),
      vec!["c"]
    );
    assert_eq!(
      StatusTab::All.apply(all).len(),
      4
    );
  }

  #[test]
  fn filter_keys_parse_back() {
    for filter in [
      TaskFilter::Completed,
      TaskFilter::Important,
      TaskFilter::DueToday,
      TaskFilter::Category(
        CategoryId::from("3")
      )
    ] {
      let parsed: TaskFilter = filter
        .as_key()
        .parse()
        .expect("parse filter");
      assert_eq!(parsed, filter);
    }
    assert!(
      "category:"
        .parse::<TaskFilter>()
        .is_err()
    );
    assert!(
      "weekly".parse::<TaskFilter>().is_err()
    );
  }
}
