use taskflow_core::dashboard::Action;
use taskflow_core::filter::StatusTab;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct StatusTabsProps {
  pub active:    StatusTab,
  pub on_action: Callback<Action>
}

#[function_component(StatusTabs)]
pub fn status_tabs(
  props: &StatusTabsProps
) -> Html {
  html! {
      <div class="tabs" role="tablist">
          {
              for StatusTab::ALL.iter().copied().map(|tab| {
                  let class = if tab == props.active { "tab active" } else { "tab" };
                  let on_action = props.on_action.clone();
                  html! {
                      <button
                          class={class}
                          role="tab"
                          onclick={move |_| on_action.emit(Action::SetTab(tab))}
                      >
                          { tab.label() }
                      </button>
                  }
              })
          }
      </div>
  }
}
