use chrono::NaiveDate;
use taskflow_core::task::{
  Category,
  CategoryId,
  TaskDraft
};
use web_sys::{
  HtmlInputElement,
  HtmlSelectElement,
  HtmlTextAreaElement
};
use yew::{
  AttrValue,
  Callback,
  Html,
  Properties,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  pub initial:      TaskDraft,
  pub categories:   Vec<Category>,
  pub heading:      AttrValue,
  pub submit_label: AttrValue,
  pub on_submit:    Callback<TaskDraft>,
  pub on_cancel:    Callback<()>
}

pub fn date_field_value(
  day: Option<NaiveDate>
) -> String {
  day
    .map(|day| {
      day.format("%Y-%m-%d").to_string()
    })
    .unwrap_or_default()
}

pub fn parse_date_field(
  raw: &str
) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(
    raw.trim(),
    "%Y-%m-%d"
  )
  .ok()
}

pub fn parse_category_field(
  raw: &str
) -> Option<CategoryId> {
  let trimmed = raw.trim();
  (!trimmed.is_empty())
    .then(|| CategoryId::from(trimmed))
}

#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let title = use_state(|| {
    props.initial.title.clone()
  });
  let description = use_state(|| {
    props.initial.description.clone()
  });
  let category = use_state(|| {
    props
      .initial
      .category_id
      .as_ref()
      .map(CategoryId::to_string)
      .unwrap_or_default()
  });
  let due = use_state(|| {
    date_field_value(props.initial.due)
  });
  let important =
    use_state(|| props.initial.important);
  let show_error = use_state(|| false);

  let on_title = {
    let title = title.clone();
    move |e: yew::InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      title.set(input.value());
    }
  };
  let on_description = {
    let description =
      description.clone();
    move |e: yew::InputEvent| {
      let input: HtmlTextAreaElement =
        e.target_unchecked_into();
      description.set(input.value());
    }
  };
  let on_category = {
    let category = category.clone();
    move |e: yew::Event| {
      let select: HtmlSelectElement =
        e.target_unchecked_into();
      category.set(select.value());
    }
  };
  let on_due = {
    let due = due.clone();
    move |e: yew::Event| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      due.set(input.value());
    }
  };
  let on_important = {
    let important = important.clone();
    move |_| important.set(!*important)
  };
  let on_cancel = {
    let on_cancel =
      props.on_cancel.clone();
    move |_| on_cancel.emit(())
  };

  let onsubmit = {
    let title = title.clone();
    let description =
      description.clone();
    let category = category.clone();
    let due = due.clone();
    let important = important.clone();
    let show_error = show_error.clone();
    let on_submit =
      props.on_submit.clone();
    move |e: yew::SubmitEvent| {
      e.prevent_default();
      let draft = TaskDraft {
        title:       (*title).clone(),
        description: (*description)
          .clone(),
        category_id:
          parse_category_field(
            &category
          ),
        due:         parse_date_field(&due),
        important:   *important
      };
      if !draft.is_submittable() {
        show_error.set(true);
        return;
      }
      show_error.set(false);
      on_submit.emit(draft);
    }
  };

  html! {
      <form class="task-form" onsubmit={onsubmit}>
          <h3 class="form-heading">{ props.heading.clone() }</h3>
          <label class="field">
              <span>{ "Title" }</span>
              <input type="text" value={(*title).clone()} oninput={on_title} placeholder="What needs doing?" />
          </label>
          {
              if *show_error {
                  html! { <div class="field-error">{ "Title is required" }</div> }
              } else {
                  html! {}
              }
          }
          <label class="field">
              <span>{ "Description" }</span>
              <textarea value={(*description).clone()} oninput={on_description} rows="3" />
          </label>
          <div class="field-row">
              <label class="field">
                  <span>{ "Category" }</span>
                  <select onchange={on_category}>
                      <option value="" selected={category.is_empty()}>{ "None" }</option>
                      {
                          for props.categories.iter().map(|c| {
                              let id = c.id.to_string();
                              html! {
                                  <option value={id.clone()} selected={*category == id}>{ c.name.clone() }</option>
                              }
                          })
                      }
                  </select>
              </label>
              <label class="field">
                  <span>{ "Due date" }</span>
                  <input type="date" value={(*due).clone()} onchange={on_due} />
              </label>
          </div>
          <label class="field inline">
              <input type="checkbox" checked={*important} onclick={on_important} />
              <span>{ "Important" }</span>
          </label>
          <div class="form-actions">
              <button type="button" class="btn ghost" onclick={on_cancel}>{ "Cancel" }</button>
              <button type="submit" class="btn primary">{ props.submit_label.clone() }</button>
          </div>
      </form>
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn date_field_round_trips_iso_days() {
    let day = NaiveDate::from_ymd_opt(2024, 3, 5)
      .expect("valid date");
    assert_eq!(
      date_field_value(Some(day)),
      "2024-03-05"
    );
    assert_eq!(date_field_value(None), "");
    assert_eq!(
      parse_date_field("2024-03-05"),
      Some(day)
    );
    assert_eq!(parse_date_field(""), None);
  }

  #[test]
  fn blank_category_means_none() {
    assert_eq!(parse_category_field("  "), None);
    assert_eq!(
      parse_category_field("3"),
      Some(CategoryId::from("3"))
    );
  }
}
