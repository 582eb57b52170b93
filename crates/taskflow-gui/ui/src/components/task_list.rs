use chrono::{
  DateTime,
  Utc
};
use taskflow_core::dashboard::{
  Action,
  ListLayout
};
use taskflow_core::datetime::DayZone;
use taskflow_core::task::{
  Category,
  Task,
  TaskDraft,
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

use super::{
  TaskCard,
  TaskForm
};

#[derive(Properties, PartialEq)]
pub struct TaskListProps {
  pub tasks:      Vec<Task>,
  pub categories: Vec<Category>,
  pub layout:     ListLayout,
  pub editing:    Option<TaskId>,
  pub now:        DateTime<Utc>,
  pub zone:       DayZone,
  pub on_action:  Callback<Action>
}

#[function_component(TaskList)]
pub fn task_list(
  props: &TaskListProps
) -> Html {
  if props.tasks.is_empty() {
    return html! {
        <div class="empty-state">
            <div class="empty-icon">{ "✓" }</div>
            <h3>{ "No tasks found" }</h3>
            <p>{ "Add a task or change the filters." }</p>
        </div>
    };
  }

  let layout_class = match props.layout
  {
    | ListLayout::List => "layout-list",
    | ListLayout::Grid => "layout-grid"
  };

  html! {
      <div class={classes!("task-list", layout_class)}>
          {
              for props.tasks.iter().map(|task| {
                  let category = props
                      .categories
                      .iter()
                      .find(|c| task.category_id.as_ref() == Some(&c.id))
                      .cloned();
                  if props.editing.as_ref() == Some(&task.id) {
                      edit_form(task, props)
                  } else {
                      html! {
                          <TaskCard
                              key={task.id.to_string()}
                              task={task.clone()}
                              category={category}
                              overdue={task.is_overdue(props.now, &props.zone)}
                              zone={props.zone}
                              on_action={props.on_action.clone()}
                          />
                      }
                  }
              })
          }
      </div>
  }
}

fn edit_form(
  task: &Task,
  props: &TaskListProps
) -> Html {
  let zone = props.zone;
  let on_submit = {
    let on_action =
      props.on_action.clone();
    let original = task.clone();
    Callback::from(
      move |draft: TaskDraft| {
        let mut edited =
          original.clone();
        edited.apply_draft(draft, &zone);
        on_action
          .emit(Action::Update(edited));
      }
    )
  };
  let on_cancel = {
    let on_action =
      props.on_action.clone();
    Callback::from(move |()| {
      on_action.emit(Action::CancelEdit)
    })
  };

  html! {
      <div key={task.id.to_string()} class="card editing">
          <TaskForm
              initial={TaskDraft::from_task(task, &zone)}
              categories={props.categories.clone()}
              heading="Edit task"
              submit_label="Save"
              on_submit={on_submit}
              on_cancel={on_cancel}
          />
      </div>
  }
}
