use taskflow_core::dashboard::Action;
use taskflow_core::datetime::DayZone;
use taskflow_core::task::{
  Category,
  Task,
  TaskId
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
pub struct TaskCardProps {
  pub task:      Task,
  pub category:  Option<Category>,
  pub overdue:   bool,
  pub zone:      DayZone,
  pub on_action: Callback<Action>
}

/// Left-border accent: completion wins over importance, importance over
/// lateness.
pub fn accent_class(
  task: &Task,
  overdue: bool
) -> &'static str {
  if task.completed {
    "accent-done"
  } else if task.important {
    "accent-important"
  } else if overdue {
    "accent-overdue"
  } else {
    "accent-none"
  }
}

pub fn due_badge_label(
  task: &Task,
  zone: &DayZone
) -> Option<String> {
  let due = task.due_date.as_ref()?;
  Some(match due.local_day(zone) {
    | Some(day) => {
      day.format("%B %-d, %Y").to_string()
    }
    | None => due.as_str().to_string()
  })
}

#[function_component(TaskCard)]
pub fn task_card(
  props: &TaskCardProps
) -> Html {
  let task = &props.task;
  let emit = |make: fn(TaskId) -> Action| {
    let on_action =
      props.on_action.clone();
    let id = task.id.clone();
    move |_: yew::MouseEvent| {
      on_action.emit(make(id.clone()))
    }
  };

  let card_class = classes!(
    "card",
    accent_class(task, props.overdue),
    task.completed.then_some("done")
  );
  let star_class = if task.important {
    "icon-btn star on"
  } else {
    "icon-btn star"
  };
  let due_label =
    due_badge_label(task, &props.zone);

  html! {
      <div class={card_class}>
          <button
              class="icon-btn check"
              title="Toggle completed"
              onclick={emit(Action::ToggleCompleted)}
          >
              { if task.completed { "✓" } else { "○" } }
          </button>
          <div class="card-body">
              <div class="card-title-row">
                  <h3 class="card-title">{ &task.title }</h3>
                  <div class="card-actions">
                      <button class={star_class} title="Toggle important" onclick={emit(Action::ToggleImportant)}>
                          { "★" }
                      </button>
                      <button class="icon-btn" title="Edit" onclick={emit(Action::BeginEdit)}>
                          { "Edit" }
                      </button>
                      <button class="icon-btn danger" title="Delete" onclick={emit(Action::Delete)}>
                          { "Delete" }
                      </button>
                  </div>
              </div>
              {
                  if task.description.is_empty() {
                      html! {}
                  } else {
                      html! { <p class="card-description">{ &task.description }</p> }
                  }
              }
              <div class="badges">
                  {
                      match &props.category {
                          Some(category) => html! {
                              <span class="badge">
                                  <span class="swatch" style={format!("background:{};", category.color)}></span>
                                  { category.name.clone() }
                              </span>
                          },
                          None => html! {},
                      }
                  }
                  {
                      match due_label {
                          Some(label) => html! {
                              <span class={classes!("badge", props.overdue.then_some("overdue"))}>
                                  { label }
                              </span>
                          },
                          None => html! {},
                      }
                  }
              </div>
          </div>
      </div>
  }
}
