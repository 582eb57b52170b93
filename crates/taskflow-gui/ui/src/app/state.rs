use std::rc::Rc;

use chrono::Utc;
use taskflow_core::config::TaskflowConfig;
use taskflow_core::dashboard::{
  Action,
  Dashboard
};
use yew::Reducible;

use super::storage::{
  BrowserStorage,
  load_list_layout,
  load_workspace_view,
  save_list_layout,
  save_workspace_view
};

const TASKFLOW_CONFIG_TOML: &str =
  include_str!(
    "../../assets/taskflow.toml"
  );

/// Reducer state: the dashboard, rebuilt on every dispatched action.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
  pub dash: Dashboard<BrowserStorage>
}

impl AppState {
  pub fn load() -> Self {
    let config =
      TaskflowConfig::from_toml_or_default(
        TASKFLOW_CONFIG_TOML
      );
    let dash = Dashboard::from_config(
      BrowserStorage,
      &config,
      Utc::now()
    )
    .with_layout(
      load_list_layout(),
      load_workspace_view()
    );
    Self { dash }
  }
}

impl Reducible for AppState {
  type Action = Action;

  fn reduce(
    self: Rc<Self>,
    action: Self::Action
  ) -> Rc<Self> {
    let mut next =
      Rc::unwrap_or_clone(self);
    let layout = next.dash.layout();
    let view = next.dash.view();

    next.dash.apply(action, Utc::now());

    if next.dash.layout() != layout {
      save_list_layout(
        next.dash.layout()
      );
    }
    if next.dash.view() != view {
      save_workspace_view(
        next.dash.view()
      );
    }
    Rc::new(next)
  }
}
