use taskflow_core::dashboard::{
  Action,
  FilterCounts
};
use taskflow_core::filter::TaskFilter;
use taskflow_core::task::Category;
use yew::{
  Callback,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterSidebarProps {
  pub categories:        Vec<Category>,
  pub counts:            FilterCounts,
  pub active_filter:     Option<TaskFilter>,
  pub has_selected_date: bool,
  pub on_action:         Callback<Action>
}

#[function_component(FilterSidebar)]
pub fn filter_sidebar(
  props: &FilterSidebarProps
) -> Html {
  let make_item =
    |filter: Option<TaskFilter>,
     label: Html| {
      let active = match &filter {
        | None => {
          props.active_filter.is_none()
            && !props.has_selected_date
        }
        | Some(_) => {
          props.active_filter == filter
        }
      };
      let class = if active {
        "item active"
      } else {
        "item"
      };
      let count = props
        .counts
        .for_filter(filter.as_ref());
      let on_action =
        props.on_action.clone();
      html! {
          <button
              class={class}
              onclick={move |_| on_action.emit(Action::ChooseSidebarFilter(filter.clone()))}
          >
              { label }
              <span class="count">{ count }</span>
          </button>
      }
    };

  html! {
      <>
          <div class="panel">
              <div class="header">{ "Filters" }</div>
              { make_item(None, html! { "All tasks" }) }
              { make_item(Some(TaskFilter::DueToday), html! { "Today" }) }
              { make_item(Some(TaskFilter::Important), html! { "Important" }) }
              { make_item(Some(TaskFilter::Completed), html! { "Completed" }) }
          </div>
          <div class="panel">
              <div class="header">{ "Categories" }</div>
              {
                  for props.categories.iter().map(|category| {
                      let style = format!("background:{};", category.color);
                      make_item(
                          Some(TaskFilter::Category(category.id.clone())),
                          html! {
                              <>
                                  <span class="swatch" style={style}></span>
                                  { category.name.clone() }
                              </>
                          },
                      )
                  })
              }
          </div>
      </>
  }
}
