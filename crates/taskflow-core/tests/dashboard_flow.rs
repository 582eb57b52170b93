use chrono::{NaiveDate, TimeZone, Utc};
use taskflow_core::config::TaskflowConfig;
use taskflow_core::dashboard::{Action, CalendarPane, Dashboard};
use taskflow_core::filter::{StatusTab, TaskFilter};
use taskflow_core::kv::{KeyValueStore, MemoryStore};
use taskflow_core::task::{CategoryId, Task, TaskDraft};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn new_york() -> TaskflowConfig {
    TaskflowConfig::from_toml_str(
        r#"
            [calendar]
            timezone = "America/New_York"
        "#,
    )
    .expect("parse config")
}

#[test]
fn actions_persist_and_survive_a_reload() {
    let backend = MemoryStore::new();
    let config = new_york();
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 16, 0, 0).single().expect("valid time");
    let mut dash = Dashboard::from_config(backend.clone(), &config, now);

    let mut gym = TaskDraft::titled("Gym");
    gym.category_id = Some(CategoryId::from("4"));
    gym.due = Some(date(2024, 3, 15));
    dash.apply(Action::Create(gym), now);
    dash.apply(Action::Create(TaskDraft::titled("Read")), now);

    let gym_id = dash.tasks()[1].id.clone();
    dash.apply(Action::ToggleImportant(gym_id.clone()), now);

    let raw = backend.get_item("tasks").expect("read blob").expect("blob written");
    let stored: Vec<Task> = serde_json::from_str(&raw).expect("blob is a task list");
    assert_eq!(stored.as_slice(), dash.tasks());
    assert_eq!(stored[1].due_date.as_ref().map(|d| d.as_str()), Some("2024-03-15T04:00:00.000Z"));

    let reloaded = Dashboard::from_config(backend, &config, now);
    assert_eq!(reloaded.tasks(), dash.tasks());
    let gym = reloaded.store().get(&gym_id).expect("gym survives");
    assert!(gym.important);
    assert_eq!(reloaded.category_for(gym).map(|c| c.name.as_str()), Some("Health"));
}

#[test]
fn late_evening_due_counts_on_the_local_day() {
    // 03:00Z on the 16th is 23:00 on the 15th in New York.
    let blob = r#"[
        {"id":"late","title":"Late call","description":"","completed":false,
         "important":false,"categoryId":null,"dueDate":"2024-03-16T03:00:00.000Z",
         "createdAt":"2024-03-01T00:00:00.000Z"},
        {"id":"none","title":"Someday","description":"","completed":false,
         "important":false,"categoryId":"99","dueDate":null,
         "createdAt":"2024-03-01T00:00:00.000Z"}
    ]"#;
    let backend = MemoryStore::with_item("tasks", blob);
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 18, 0, 0).single().expect("valid time");
    let mut dash = Dashboard::from_config(backend, &new_york(), now);
    let today = dash.today(now);

    dash.apply(Action::SelectDate(date(2024, 3, 15)), now);
    let visible: Vec<&str> = dash.visible_tasks(today).iter().map(|t| t.id.as_str()).collect();
    assert_eq!(visible, vec!["late"]);

    let grid = dash.calendar(CalendarPane::Main, today);
    let cell = grid.cells.iter().find(|c| c.date == date(2024, 3, 15)).expect("cell");
    assert_eq!(cell.task_count, 1);
    assert!(cell.is_selected && cell.is_today);
    assert!(!grid.cells.iter().any(|c| c.date == date(2024, 3, 16) && c.has_tasks()));

    let someday = dash.store().get(&"none".into()).expect("task");
    assert!(dash.category_for(someday).is_none());
    assert_eq!(dash.filter_counts(today).due_today, 1);
}

#[test]
fn overdue_and_combined_filters() {
    let now = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).single().expect("valid time");
    let config = TaskflowConfig::from_toml_str("[calendar]\ntimezone = \"UTC\"\n").expect("parse config");
    let mut dash = Dashboard::from_config(MemoryStore::new(), &config, now);

    let mut past = TaskDraft::titled("Pay invoice");
    past.due = Some(date(2024, 3, 10));
    dash.apply(Action::Create(past), now);
    let mut future = TaskDraft::titled("Pay rent");
    future.due = Some(date(2024, 4, 1));
    dash.apply(Action::Create(future), now);

    let past_task = dash.tasks()[1].clone();
    assert!(dash.is_overdue(&past_task, now));
    assert!(!dash.is_overdue(&dash.tasks()[0], now));

    dash.apply(Action::ToggleCompleted(past_task.id.clone()), now);
    assert!(!dash.is_overdue(&dash.tasks()[1], now));

    let today = dash.today(now);
    dash.apply(Action::SetQuery("PAY".to_string()), now);
    dash.apply(Action::SetFilter(Some(TaskFilter::Completed)), now);
    let visible: Vec<&str> = dash.visible_tasks(today).iter().map(|t| t.title.as_str()).collect();
    assert_eq!(visible, vec!["Pay invoice"]);

    dash.apply(Action::SetTab(StatusTab::Pending), now);
    assert!(dash.visible_tasks(today).is_empty());

    dash.apply(Action::CalendarPrev(CalendarPane::Sidebar), now);
    assert_eq!(dash.nav(CalendarPane::Sidebar).focus, date(2024, 2, 1));
    assert_eq!(dash.calendar(CalendarPane::Sidebar, today).title(), "February 2024");
}
