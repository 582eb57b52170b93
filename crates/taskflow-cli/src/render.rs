use std::io::Write;

use chrono::{DateTime, Datelike, Utc};
use taskflow_core::calendar::{CalendarCell, CalendarGrid, CalendarSpan};
use taskflow_core::dashboard::{Dashboard, FilterCounts};
use taskflow_core::datetime::DayZone;
use taskflow_core::kv::KeyValueStore;
use taskflow_core::task::{Category, Task};
use unicode_width::UnicodeWidthStr;

pub const SHORT_ID_LEN: usize = 8;

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    #[tracing::instrument(skip_all, fields(count = tasks.len()))]
    pub fn task_table<S: KeyValueStore, W: Write>(
        &self,
        out: &mut W,
        tasks: &[&Task],
        dash: &Dashboard<S>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        if tasks.is_empty() {
            writeln!(out, "No tasks found.")?;
            return Ok(());
        }

        let headers = vec![
            "ID".to_string(),
            "Done".to_string(),
            "!".to_string(),
            "Due".to_string(),
            "Category".to_string(),
            "Title".to_string(),
        ];

        let rows = tasks
            .iter()
            .map(|task| {
                let id = self.paint(short_id(task), "33");
                let done = if task.completed { "[x]" } else { "[ ]" }.to_string();
                let important = if task.important { self.paint("*", "33") } else { String::new() };

                let due = due_label(task, dash.zone());
                let due = if dash.is_overdue(task, now) {
                    self.paint(&due, "31")
                } else {
                    due
                };

                let category = dash.category_for(task).map(|c| c.name.clone()).unwrap_or_default();
                let title = if task.completed {
                    self.paint(&task.title, "2")
                } else {
                    task.title.clone()
                };

                vec![id, done, important, due, category, title]
            })
            .collect();

        write_table(&mut *out, headers, rows)?;
        writeln!(out, "{} task{}", tasks.len(), if tasks.len() == 1 { "" } else { "s" })?;
        Ok(())
    }

    pub fn task_info<S: KeyValueStore, W: Write>(
        &self,
        out: &mut W,
        task: &Task,
        dash: &Dashboard<S>,
        now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        writeln!(out, "id          {}", task.id)?;
        writeln!(out, "title       {}", task.title)?;
        if !task.description.is_empty() {
            writeln!(out, "description {}", task.description)?;
        }
        writeln!(out, "completed   {}", yes_no(task.completed))?;
        writeln!(out, "important   {}", yes_no(task.important))?;
        if let Some(category) = dash.category_for(task) {
            writeln!(out, "category    {}", category.name)?;
        }
        if task.due_date.is_some() {
            let overdue = if dash.is_overdue(task, now) { " (overdue)" } else { "" };
            writeln!(out, "due         {}{overdue}", due_label(task, dash.zone()))?;
        }
        writeln!(out, "created     {}", task.created_at.format("%Y-%m-%d %H:%M UTC"))?;
        Ok(())
    }

    pub fn category_table<W: Write>(
        &self,
        out: &mut W,
        categories: &[Category],
        counts: &FilterCounts,
    ) -> anyhow::Result<()> {
        let headers = vec![
            "ID".to_string(),
            "Name".to_string(),
            "Color".to_string(),
            "Tasks".to_string(),
        ];
        let rows = categories
            .iter()
            .map(|category| {
                let count = counts
                    .categories
                    .iter()
                    .find(|(id, _)| id == &category.id)
                    .map(|(_, count)| *count)
                    .unwrap_or(0);
                vec![
                    category.id.to_string(),
                    category.name.clone(),
                    category.color.clone(),
                    count.to_string(),
                ]
            })
            .collect();
        write_table(out, headers, rows)
    }

    /// Day cells are five columns wide: today is bracketed and a trailing
    /// `*` marks days with due tasks.
    pub fn calendar<W: Write>(&self, out: &mut W, grid: &CalendarGrid) -> anyhow::Result<()> {
        let width = 5 * 7;
        writeln!(out, "{:^width$}", grid.title())?;

        for label in grid.labels() {
            write!(out, "{label:^5}")?;
        }
        writeln!(out)?;

        for row in grid.rows() {
            let line = row.iter().map(|cell| self.calendar_cell(cell)).collect::<String>();
            writeln!(out, "{}", line.trim_end())?;
        }

        let due: usize = grid.cells.iter().filter(|c| c.in_month).map(|c| c.task_count).sum();
        let span = match grid.span {
            CalendarSpan::Month => "month",
            CalendarSpan::Week => "week",
        };
        writeln!(out, "{due} due this {span}")?;
        Ok(())
    }

    fn calendar_cell(&self, cell: &CalendarCell) -> String {
        let (open, close) = if cell.is_today { ('[', ']') } else { (' ', ' ') };
        let marker = if cell.has_tasks() { '*' } else { ' ' };
        let text = format!("{open}{:>2}{close}{marker}", cell.date.day());
        if cell.in_month { text } else { self.paint(&text, "2") }
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

pub fn short_id(task: &Task) -> &str {
    let id = task.id.as_str();
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}

/// Local due day, or the stored text when it has none.
fn due_label(task: &Task, zone: &DayZone) -> String {
    match (&task.due_date, task.due_day(zone)) {
        (_, Some(day)) => day.format("%Y-%m-%d").to_string(),
        (Some(raw), None) => raw.as_str().to_string(),
        (None, None) => String::new(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn write_table<W: Write>(
    writer: &mut W,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    let column_count = headers.len();
    let mut widths = vec![0usize; column_count];

    for (idx, header) in headers.iter().enumerate() {
        widths[idx] = widths[idx].max(UnicodeWidthStr::width(header.as_str()));
    }

    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(UnicodeWidthStr::width(strip_ansi(cell).as_str()));
        }
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, &width)| {
            let padding = width.saturating_sub(UnicodeWidthStr::width(header.as_str()));
            format!("{header}{} ", " ".repeat(padding))
        })
        .collect::<String>();
    writeln!(writer, "{}", header_line.trim_end())?;

    let rule = widths.iter().map(|&width| format!("{:-<width$} ", "")).collect::<String>();
    writeln!(writer, "{}", rule.trim_end())?;

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| {
                let visible_width = UnicodeWidthStr::width(strip_ansi(cell).as_str());
                let padding = width.saturating_sub(visible_width);
                format!("{cell}{} ", " ".repeat(padding))
            })
            .collect::<String>();
        writeln!(writer, "{}", line.trim_end())?;
    }

    Ok(())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}
