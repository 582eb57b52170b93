mod state;
mod storage;

use chrono::Utc;
use gloo::timers::callback::Interval;
use taskflow_core::dashboard::{
  Action,
  CalendarPane,
  WorkspaceView
};
use taskflow_core::task::TaskDraft;
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_effect_with,
  use_reducer,
  use_state
};

use crate::components::{
  CalendarPanel,
  FilterSidebar,
  Header,
  StatusTabs,
  TaskForm,
  TaskList
};
use state::AppState;

const CLOCK_REFRESH_MS: u32 = 60_000;

#[function_component(App)]
pub fn app() -> Html {
  let state = use_reducer(AppState::load);
  let now = use_state(Utc::now);

  {
    let now = now.clone();
    use_effect_with((), move |_| {
      let interval = Interval::new(
        CLOCK_REFRESH_MS,
        move || now.set(Utc::now())
      );
      move || drop(interval)
    });
  }

  let on_action = {
    let state = state.clone();
    Callback::from(
      move |action: Action| {
        state.dispatch(action)
      }
    )
  };

  let dash = &state.dash;
  let now = *now;
  let today = dash.today(now);
  let query = dash.query();

  let selected_date_header =
    match query.selected_date {
      | Some(day) => {
        let on_clear = {
          let on_action =
            on_action.clone();
          move |_| {
            on_action
              .emit(Action::ClearDate)
          }
        };
        html! {
            <div class="date-header">
                <h2>{ day.format("%B %-d, %Y").to_string() }</h2>
                <button class="btn ghost small" onclick={on_clear}>{ "Clear date" }</button>
            </div>
        }
      }
      | None => html! {}
    };

  let main = match dash.view() {
    | WorkspaceView::Tasks => {
      let visible = dash
        .visible_tasks(today)
        .into_iter()
        .cloned()
        .collect::<Vec<_>>();
      html! {
          <>
              { selected_date_header }
              <StatusTabs active={dash.tab()} on_action={on_action.clone()} />
              <TaskList
                  tasks={visible}
                  categories={dash.categories().to_vec()}
                  layout={dash.layout()}
                  editing={dash.editing().cloned()}
                  now={now}
                  zone={*dash.zone()}
                  on_action={on_action.clone()}
              />
          </>
      }
    }
    | WorkspaceView::Calendar => {
      html! {
          <div class="panel">
              <div class="header">{ "Calendar" }</div>
              <CalendarPanel
                  grid={dash.calendar(CalendarPane::Main, today)}
                  pane={CalendarPane::Main}
                  on_action={on_action.clone()}
              />
          </div>
      }
    }
  };

  let create_dialog = if dash
    .is_create_form_open()
  {
    let on_submit = {
      let on_action = on_action.clone();
      Callback::from(move |draft: TaskDraft| {
        on_action
          .emit(Action::Create(draft))
      })
    };
    let on_cancel = {
      let on_action = on_action.clone();
      Callback::from(move |()| {
        on_action
          .emit(Action::CloseCreateForm)
      })
    };
    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <TaskForm
                    initial={dash.create_form_defaults()}
                    categories={dash.categories().to_vec()}
                    heading="Add task"
                    submit_label="Add task"
                    on_submit={on_submit}
                    on_cancel={on_cancel}
                />
            </div>
        </div>
    }
  } else {
    html! {}
  };

  html! {
      <div class="app">
          <Header
              query={query.text.clone()}
              active_filter={query.filter.clone()}
              layout={dash.layout()}
              view={dash.view()}
              on_action={on_action.clone()}
          />
          <div class="workspace">
              <aside class="sidebar">
                  <FilterSidebar
                      categories={dash.categories().to_vec()}
                      counts={dash.filter_counts(today)}
                      active_filter={query.filter.clone()}
                      has_selected_date={query.selected_date.is_some()}
                      on_action={on_action.clone()}
                  />
                  <div class="panel">
                      <div class="header">{ "Mini calendar" }</div>
                      <CalendarPanel
                          grid={dash.calendar(CalendarPane::Sidebar, today)}
                          pane={CalendarPane::Sidebar}
                          mini={true}
                          on_action={on_action.clone()}
                      />
                  </div>
              </aside>
              <main class="content">{ main }</main>
          </div>
          { create_dialog }
      </div>
  }
}
