use std::io::Write;

use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, NaiveDate, Utc};
use taskflow_core::calendar::{CalendarNav, CalendarSpan, build_grid};
use taskflow_core::dashboard::{Action, Dashboard};
use taskflow_core::datetime::parse_day_input;
use taskflow_core::kv::KeyValueStore;
use taskflow_core::task::{CategoryId, TaskDraft, TaskId};
use tracing::{debug, info, instrument, warn};

use crate::cli::{AddArgs, CalendarArgs, Command, EditArgs, ListArgs, parse_month};
use crate::render::{Renderer, short_id};

#[instrument(skip(dash, renderer, out))]
pub fn dispatch<S: KeyValueStore, W: Write>(
    dash: &mut Dashboard<S>,
    renderer: &Renderer,
    command: Command,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    match command {
        Command::List(args) => cmd_list(dash, renderer, args, now, out),
        Command::Add(args) => cmd_add(dash, renderer, args, now, out),
        Command::Edit(args) => cmd_edit(dash, renderer, args, now, out),
        Command::Done { id } => cmd_done(dash, &id, now, out),
        Command::Star { id } => cmd_star(dash, &id, now, out),
        Command::Delete { id } => cmd_delete(dash, &id, now, out),
        Command::Categories => cmd_categories(dash, renderer, now, out),
        Command::Calendar(args) => cmd_calendar(dash, renderer, args, now, out),
    }
}

/// Finds the task whose id equals `prefix`, or failing that the only one
/// starting with it.
pub fn resolve_id<S: KeyValueStore>(dash: &Dashboard<S>, prefix: &str) -> anyhow::Result<TaskId> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        bail!("task id must not be empty");
    }

    if let Some(task) = dash.tasks().iter().find(|t| t.id.as_str() == prefix) {
        return Ok(task.id.clone());
    }

    let mut matches = dash.tasks().iter().filter(|t| t.id.as_str().starts_with(prefix));
    let first = matches.next().ok_or_else(|| anyhow!("no task matches id {prefix:?}"))?;
    let others = matches.count();
    if others > 0 {
        bail!("id prefix {prefix:?} is ambiguous ({} tasks match)", others + 1);
    }
    debug!(prefix, id = %first.id, "resolved id prefix");
    Ok(first.id.clone())
}

fn parse_due(raw: &str, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    parse_day_input(raw, today)
        .ok_or_else(|| anyhow!("invalid due date {raw:?}; expected YYYY-MM-DD, today or tomorrow"))
}

fn check_category<S: KeyValueStore>(dash: &Dashboard<S>, raw: &str) -> CategoryId {
    let id = CategoryId::from(raw);
    if dash.store().category(Some(&id)).is_none() {
        warn!(category = %id, "unknown category id; the task will show no category");
    }
    id
}

fn cmd_list<S: KeyValueStore, W: Write>(
    dash: &mut Dashboard<S>,
    renderer: &Renderer,
    args: ListArgs,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    dash.apply(Action::SetQuery(args.query.unwrap_or_default()), now);
    dash.apply(Action::SetFilter(args.filter), now);
    match args.date {
        Some(day) => dash.apply(Action::SelectDate(day), now),
        None => dash.apply(Action::ClearDate, now),
    }
    dash.apply(Action::SetTab(args.tab), now);

    let today = dash.today(now);
    let visible = dash.visible_tasks(today);
    renderer.task_table(out, &visible, dash, now)
}

fn cmd_add<S: KeyValueStore, W: Write>(
    dash: &mut Dashboard<S>,
    renderer: &Renderer,
    args: AddArgs,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let today = dash.today(now);
    let draft = TaskDraft {
        title: args.title,
        description: args.description.unwrap_or_default(),
        category_id: args.category.as_deref().map(|raw| check_category(dash, raw)),
        due: args.due.as_deref().map(|raw| parse_due(raw, today)).transpose()?,
        important: args.important,
    };
    if !draft.is_submittable() {
        bail!("task title must not be empty");
    }

    dash.apply(Action::Create(draft), now);
    let task = dash.tasks().first().context("created task is missing")?;
    info!(id = %task.id, "created task");
    writeln!(out, "Created task {}.", short_id(task))?;
    renderer.task_info(out, task, dash, now)
}

fn cmd_edit<S: KeyValueStore, W: Write>(
    dash: &mut Dashboard<S>,
    renderer: &Renderer,
    args: EditArgs,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let id = resolve_id(dash, &args.id)?;
    let mut task = dash.store().get(&id).cloned().context("task vanished")?;
    let zone = *dash.zone();
    let today = dash.today(now);

    let mut draft = TaskDraft::from_task(&task, &zone);
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if args.clear_category {
        draft.category_id = None;
    } else if let Some(raw) = args.category.as_deref() {
        draft.category_id = Some(check_category(dash, raw));
    }
    if args.clear_due {
        draft.due = None;
    } else if let Some(raw) = args.due.as_deref() {
        draft.due = Some(parse_due(raw, today)?);
    }
    if !draft.is_submittable() {
        bail!("task title must not be empty");
    }

    task.apply_draft(draft, &zone);
    dash.apply(Action::Update(task), now);

    let task = dash.store().get(&id).context("edited task is missing")?;
    writeln!(out, "Updated task {}.", short_id(task))?;
    renderer.task_info(out, task, dash, now)
}

fn cmd_done<S: KeyValueStore, W: Write>(
    dash: &mut Dashboard<S>,
    prefix: &str,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let id = resolve_id(dash, prefix)?;
    dash.apply(Action::ToggleCompleted(id.clone()), now);
    let task = dash.store().get(&id).context("task vanished")?;
    let state = if task.completed { "completed" } else { "reopened" };
    writeln!(out, "Task {} {state}: {}", short_id(task), task.title)?;
    Ok(())
}

fn cmd_star<S: KeyValueStore, W: Write>(
    dash: &mut Dashboard<S>,
    prefix: &str,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let id = resolve_id(dash, prefix)?;
    dash.apply(Action::ToggleImportant(id.clone()), now);
    let task = dash.store().get(&id).context("task vanished")?;
    let state = if task.important { "marked important" } else { "unmarked" };
    writeln!(out, "Task {} {state}: {}", short_id(task), task.title)?;
    Ok(())
}

fn cmd_delete<S: KeyValueStore, W: Write>(
    dash: &mut Dashboard<S>,
    prefix: &str,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let id = resolve_id(dash, prefix)?;
    let task = dash.store().get(&id).context("task vanished")?;
    let label = format!("{}: {}", short_id(task), task.title);
    dash.apply(Action::Delete(id), now);
    writeln!(out, "Deleted task {label}")?;
    Ok(())
}

fn cmd_categories<S: KeyValueStore, W: Write>(
    dash: &Dashboard<S>,
    renderer: &Renderer,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let counts = dash.filter_counts(dash.today(now));
    renderer.category_table(out, dash.categories(), &counts)
}

fn cmd_calendar<S: KeyValueStore, W: Write>(
    dash: &Dashboard<S>,
    renderer: &Renderer,
    args: CalendarArgs,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()> {
    let today = dash.today(now);
    let mut nav = CalendarNav::new(today);
    if let Some(raw) = args.month.as_deref() {
        nav.focus = parse_month(raw)?;
    }
    if args.week {
        nav.span = CalendarSpan::Week;
    }

    let grid = build_grid(&nav, dash.week_start(), dash.tasks(), dash.zone(), today, None);
    renderer.calendar(out, &grid)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Weekday};
    use taskflow_core::datetime::DayZone;
    use taskflow_core::kv::MemoryStore;
    use taskflow_core::store::{DEFAULT_TASKS_KEY, TaskStore};
    use taskflow_core::task::{Task, seed_categories};

    use super::*;
    use crate::cli::Cli;
    use crate::render::SHORT_ID_LEN;
    use clap::Parser;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).single().expect("valid time")
    }

    fn dashboard() -> Dashboard<MemoryStore> {
        let store = TaskStore::open(MemoryStore::new(), DEFAULT_TASKS_KEY, seed_categories());
        Dashboard::new(store, DayZone::Named(chrono_tz::UTC), Weekday::Mon, now())
    }

    fn run(dash: &mut Dashboard<MemoryStore>, args: &[&str]) -> anyhow::Result<String> {
        let mut argv = vec!["taskflow"];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).map_err(|err| anyhow!("{err}"))?;
        let command = cli.command.context("missing command")?;
        let mut out = Vec::new();
        dispatch(dash, &Renderer::plain(), command, now(), &mut out)?;
        Ok(String::from_utf8(out).expect("utf8 output"))
    }

    fn dashboard_with_ids(ids: &[&str]) -> Dashboard<MemoryStore> {
        let zone = DayZone::Named(chrono_tz::UTC);
        let tasks: Vec<Task> = ids
            .iter()
            .map(|id| Task::from_draft(TaskDraft::titled(*id), TaskId::from(*id), now(), &zone))
            .collect();
        let blob = serde_json::to_string(&tasks).expect("serialize");
        let store = TaskStore::open(
            MemoryStore::with_item(DEFAULT_TASKS_KEY, &blob),
            DEFAULT_TASKS_KEY,
            seed_categories(),
        );
        Dashboard::new(store, zone, Weekday::Mon, now())
    }

    #[test]
    fn prefixes_resolve_when_unique() {
        let dash = dashboard_with_ids(&["abc123", "abd456", "ab"]);

        assert_eq!(resolve_id(&dash, "abc").expect("unique").as_str(), "abc123");
        assert_eq!(resolve_id(&dash, "ab").expect("exact wins").as_str(), "ab");
        assert!(resolve_id(&dash, "a").is_err());
        assert!(resolve_id(&dash, "zzz").is_err());
        assert!(resolve_id(&dash, " ").is_err());
    }

    #[test]
    fn add_then_list_with_filters() {
        let mut dash = dashboard();
        run(&mut dash, &["add", "Buy milk", "--category", "3", "--due", "today"]).expect("add");
        run(&mut dash, &["add", "Pay rent", "--important", "--due", "2024-04-01"]).expect("add");

        let listed = run(&mut dash, &["list", "--filter", "today"]).expect("list");
        assert!(listed.contains("Buy milk"));
        assert!(listed.contains("Shopping"));
        assert!(!listed.contains("Pay rent"));
        assert!(listed.ends_with("1 task\n"));

        let listed = run(&mut dash, &["list", "--query", "RENT"]).expect("list");
        assert!(listed.contains("Pay rent"));
        assert!(!listed.contains("Buy milk"));

        let listed = run(&mut dash, &["list", "--tab", "completed"]).expect("list");
        assert_eq!(listed, "No tasks found.\n");
    }

    #[test]
    fn edit_done_star_and_delete() {
        let mut dash = dashboard();
        run(&mut dash, &["add", "Draft", "--due", "tomorrow", "--category", "1"]).expect("add");
        let id = dash.tasks()[0].id.to_string();

        run(&mut dash, &["edit", &id[..6], "--title", "Final", "--clear-due", "--clear-category"])
            .expect("edit");
        let task = &dash.tasks()[0];
        assert_eq!(task.title, "Final");
        assert_eq!(task.due_date, None);
        assert_eq!(task.category_id, None);

        let out = run(&mut dash, &["done", &id]).expect("done");
        assert!(out.contains("completed"));
        assert!(dash.tasks()[0].completed);

        run(&mut dash, &["star", &id]).expect("star");
        assert!(dash.tasks()[0].important);

        assert!(run(&mut dash, &["edit", &id, "--title", "  "]).is_err());

        let out = run(&mut dash, &["delete", &id]).expect("delete");
        assert_eq!(out, format!("Deleted task {}: Final\n", &id[..SHORT_ID_LEN]));
        assert!(dash.tasks().is_empty());
    }

    #[test]
    fn bad_due_input_is_an_error() {
        let mut dash = dashboard();
        let err = run(&mut dash, &["add", "x", "--due", "someday"]).expect_err("bad due");
        assert!(err.to_string().contains("invalid due date"));
        assert!(dash.tasks().is_empty());
    }

    #[test]
    fn calendar_marks_today_and_due_days() {
        let mut dash = dashboard();
        run(&mut dash, &["add", "a", "--due", "2024-03-20"]).expect("add");

        let out = run(&mut dash, &["calendar", "--month", "2024-03"]).expect("calendar");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0].trim(), "March 2024");
        assert!(lines[1].trim_start().starts_with("Mon"));
        assert_eq!(lines.len(), 2 + 6 + 1);
        assert!(out.contains("[15]"));
        assert!(out.contains(" 20 *"));
        assert!(out.ends_with("1 due this month\n"));

        let week = run(&mut dash, &["calendar", "--week"]).expect("week");
        assert_eq!(week.lines().count(), 2 + 1 + 1);
    }

    #[test]
    fn categories_show_counts() {
        let mut dash = dashboard();
        run(&mut dash, &["add", "gym", "--category", "4"]).expect("add");
        let out = run(&mut dash, &["categories"]).expect("categories");
        let health = out.lines().find(|l| l.contains("Health")).expect("health row");
        assert!(health.ends_with('1'));
    }
}
