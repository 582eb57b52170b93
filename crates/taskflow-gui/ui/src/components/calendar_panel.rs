use chrono::Datelike;
use taskflow_core::calendar::{
  CalendarCell,
  CalendarGrid,
  CalendarSpan
};
use taskflow_core::dashboard::{
  Action,
  CalendarPane
};
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct CalendarPanelProps {
  pub grid:      CalendarGrid,
  pub pane:      CalendarPane,
  /// Compact sidebar rendering without today/span controls.
  #[prop_or_default]
  pub mini:      bool,
  pub on_action: Callback<Action>
}

#[function_component(CalendarPanel)]
pub fn calendar_panel(
  props: &CalendarPanelProps
) -> Html {
  let pane = props.pane;
  let nav_button =
    |label: &'static str,
     title: &'static str,
     action: Action| {
      let on_action =
        props.on_action.clone();
      html! {
          <button
              class="btn ghost small"
              title={title}
              onclick={move |_| on_action.emit(action.clone())}
          >
              { label }
          </button>
      }
    };

  let span_label = match props.grid.span
  {
    | CalendarSpan::Month => "Week view",
    | CalendarSpan::Week => "Month view"
  };
  let controls = if props.mini {
    html! {}
  } else {
    html! {
        <>
            { nav_button("Today", "Jump to today", Action::CalendarToday(pane)) }
            { nav_button(span_label, "Toggle month or week", Action::ToggleCalendarSpan(pane)) }
        </>
    }
  };

  html! {
      <div class={classes!("calendar", props.mini.then_some("mini"))}>
          <div class="calendar-header">
              { nav_button("‹", "Previous", Action::CalendarPrev(pane)) }
              <span class="calendar-title">{ props.grid.title() }</span>
              { nav_button("›", "Next", Action::CalendarNext(pane)) }
              { controls }
          </div>
          <div class="calendar-grid">
              {
                  for props.grid.labels().iter().map(|label| html! {
                      <div class="weekday">{ *label }</div>
                  })
              }
              {
                  for props.grid.cells.iter().map(|cell| {
                      day_cell(cell, props.mini, &props.on_action)
                  })
              }
          </div>
      </div>
  }
}

fn day_cell(
  cell: &CalendarCell,
  mini: bool,
  on_action: &Callback<Action>
) -> Html {
  let class = classes!(
    "day",
    (!cell.in_month).then_some("outside"),
    cell.is_today.then_some("today"),
    cell.is_selected.then_some("selected"),
    cell.has_tasks().then_some("has-tasks")
  );
  let on_action = on_action.clone();
  let date = cell.date;
  let marker = if !cell.has_tasks() {
    html! {}
  } else if mini {
    html! { <span class="dot"></span> }
  } else {
    let noun = if cell.task_count == 1 {
      "task"
    } else {
      "tasks"
    };
    html! {
        <span class="task-count">{ format!("{} {noun}", cell.task_count) }</span>
    }
  };

  html! {
      <button
          class={class}
          onclick={move |_| on_action.emit(Action::SelectDate(date))}
      >
          <span class="day-number">{ date.day() }</span>
          { marker }
      </button>
  }
}
