use taskflow_core::dashboard::{
  Action,
  ListLayout,
  WorkspaceView
};
use taskflow_core::filter::TaskFilter;
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement
};
use yew::{
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
  pub query:         String,
  pub active_filter: Option<TaskFilter>,
  pub layout:        ListLayout,
  pub view:          WorkspaceView,
  pub on_action:     Callback<Action>
}

#[function_component(Header)]
pub fn header(
  props: &HeaderProps
) -> Html {
  let on_toggle_view = {
    let on_action =
      props.on_action.clone();
    move |_| {
      on_action.emit(Action::ToggleView)
    }
  };
  let on_toggle_layout = {
    let on_action =
      props.on_action.clone();
    move |_| {
      on_action
        .emit(Action::ToggleLayout)
    }
  };
  let on_add = {
    let on_action =
      props.on_action.clone();
    move |_| {
      on_action
        .emit(Action::OpenCreateForm)
    }
  };
  let on_search = {
    let on_action =
      props.on_action.clone();
    move |e: yew::InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_action.emit(Action::SetQuery(
        input.value()
      ));
    }
  };
  let on_filter = {
    let on_action =
      props.on_action.clone();
    move |e: yew::Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      let filter = select
        .value()
        .parse::<TaskFilter>()
        .ok();
      on_action
        .emit(Action::SetFilter(filter));
    }
  };

  let view_label = match props.view {
    | WorkspaceView::Tasks => "Calendar",
    | WorkspaceView::Calendar => "Tasks"
  };
  let layout_label = match props.layout
  {
    | ListLayout::List => "Grid",
    | ListLayout::Grid => "List"
  };
  let selected_key = props
    .active_filter
    .as_ref()
    .map(TaskFilter::as_key)
    .unwrap_or_default();
  let option =
    |key: &str, label: &str| {
      html! {
          <option value={key.to_string()} selected={selected_key == key}>{ label }</option>
      }
    };

  html! {
      <header class="app-header">
          <div class="header-row">
              <h1 class="brand">{ "Taskflow" }</h1>
              <div class="header-actions">
                  <button class="btn ghost" title="Switch view" onclick={on_toggle_view}>
                      { view_label }
                  </button>
                  <button class="btn ghost" title="Switch layout" onclick={on_toggle_layout}>
                      { layout_label }
                  </button>
                  <button class="btn primary" onclick={on_add}>{ "+ Add task" }</button>
              </div>
          </div>
          <div class="header-row">
              <input
                  class="search"
                  type="search"
                  placeholder="Search tasks..."
                  value={props.query.clone()}
                  oninput={on_search}
              />
              <select class="filter-select" onchange={on_filter}>
                  { option("", "All tasks") }
                  { option("completed", "Completed") }
                  { option("important", "Important") }
                  { option("today", "Due today") }
              </select>
          </div>
      </header>
  }
}
