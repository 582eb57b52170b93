//! Owned view state for a task workspace.
//!
//! [`Dashboard`] holds the [`TaskStore`] together with every piece of
//! filter, layout and calendar state a front end renders from.
//! [`Dashboard::apply`] is the only way to change it.

use chrono::{
  DateTime,
  NaiveDate,
  Utc,
  Weekday
};
use tracing::{
  debug,
  info,
  warn
};

use crate::calendar::{
  CalendarGrid,
  CalendarNav,
  build_grid
};
use crate::config::TaskflowConfig;
use crate::datetime::DayZone;
use crate::filter::{
  StatusTab,
  TaskFilter,
  TaskQuery,
  count_matching,
  filter_tasks
};
use crate::kv::KeyValueStore;
use crate::store::TaskStore;
use crate::task::{
  Category,
  CategoryId,
  Task,
  TaskDraft,
  TaskId
};

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum ListLayout {
  #[default]
  List,
  Grid
}

impl ListLayout {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::List => "list",
      | Self::Grid => "grid"
    }
  }

  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    match raw.trim() {
      | "list" => Some(Self::List),
      | "grid" => Some(Self::Grid),
      | _ => None
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      | Self::List => Self::Grid,
      | Self::Grid => Self::List
    }
  }
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum WorkspaceView {
  #[default]
  Tasks,
  Calendar
}

impl WorkspaceView {
  pub fn as_key(self) -> &'static str {
    match self {
      | Self::Tasks => "tasks",
      | Self::Calendar => "calendar"
    }
  }

  pub fn from_key(
    raw: &str
  ) -> Option<Self> {
    match raw.trim() {
      | "tasks" => Some(Self::Tasks),
      | "calendar" => {
        Some(Self::Calendar)
      }
      | _ => None
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      | Self::Tasks => Self::Calendar,
      | Self::Calendar => Self::Tasks
    }
  }
}

/// Which of the two independent calendars an action targets.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
)]
pub enum CalendarPane {
  Main,
  Sidebar
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  OpenCreateForm,
  CloseCreateForm,
  Create(TaskDraft),
  BeginEdit(TaskId),
  CancelEdit,
  Update(Task),
  Delete(TaskId),
  ToggleCompleted(TaskId),
  ToggleImportant(TaskId),
  SetQuery(String),
  /// Toolbar dropdown: changes the filter only.
  SetFilter(Option<TaskFilter>),
  /// Sidebar entry: changes the filter and clears the selected date.
  ChooseSidebarFilter(Option<TaskFilter>),
  SelectDate(NaiveDate),
  ClearDate,
  SetTab(StatusTab),
  ToggleLayout,
  ToggleView,
  CalendarPrev(CalendarPane),
  CalendarNext(CalendarPane),
  CalendarToday(CalendarPane),
  ToggleCalendarSpan(CalendarPane)
}

/// Sidebar badge counts over the full list.
#[derive(
  Debug,
  Clone,
  Default,
  PartialEq,
  Eq,
)]
pub struct FilterCounts {
  pub total:      usize,
  pub completed:  usize,
  pub important:  usize,
  pub due_today:  usize,
  pub categories: Vec<(CategoryId, usize)>
}

impl FilterCounts {
  pub fn for_filter(
    &self,
    filter: Option<&TaskFilter>
  ) -> usize {
    match filter {
      | None => self.total,
      | Some(TaskFilter::Completed) => {
        self.completed
      }
      | Some(TaskFilter::Important) => {
        self.important
      }
      | Some(TaskFilter::DueToday) => {
        self.due_today
      }
      | Some(TaskFilter::Category(
        id
      )) => {
        self
          .categories
          .iter()
          .find(|(cid, _)| cid == id)
          .map(|(_, count)| *count)
          .unwrap_or(0)
      }
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard<S> {
  store:            TaskStore<S>,
  query:            TaskQuery,
  tab:              StatusTab,
  layout:           ListLayout,
  view:             WorkspaceView,
  main_calendar:    CalendarNav,
  sidebar_calendar: CalendarNav,
  create_form_open: bool,
  editing:          Option<TaskId>,
  zone:             DayZone,
  week_start:       Weekday
}

impl<S: KeyValueStore> Dashboard<S> {
  pub fn new(
    store: TaskStore<S>,
    zone: DayZone,
    week_start: Weekday,
    now: DateTime<Utc>
  ) -> Self {
    let today = zone.today(now);
    Self {
      store,
      query: TaskQuery::default(),
      tab: StatusTab::default(),
      layout: ListLayout::default(),
      view: WorkspaceView::default(),
      main_calendar: CalendarNav::new(
        today
      ),
      sidebar_calendar:
        CalendarNav::new(today),
      create_form_open: false,
      editing: None,
      zone,
      week_start
    }
  }

  /// Opens the store named by `config` on `backend`.
  #[tracing::instrument(skip_all)]
  pub fn from_config(
    backend: S,
    config: &TaskflowConfig,
    now: DateTime<Utc>
  ) -> Self {
    let store = TaskStore::open(
      backend,
      config.tasks_key(),
      config.categories()
    );
    let dashboard = Self::new(
      store,
      config.zone(),
      config.week_start(),
      now
    );
    info!(
      tasks = dashboard.store.tasks().len(),
      zone = ?dashboard.zone,
      week_start = ?dashboard.week_start,
      "dashboard ready"
    );
    dashboard
  }

  pub fn with_layout(
    mut self,
    layout: ListLayout,
    view: WorkspaceView
  ) -> Self {
    self.layout = layout;
    self.view = view;
    self
  }

  pub fn apply(
    &mut self,
    action: Action,
    now: DateTime<Utc>
  ) {
    debug!(action = ?action, "applying action");
    match action {
      | Action::OpenCreateForm => {
        self.create_form_open = true;
      }
      | Action::CloseCreateForm => {
        self.create_form_open = false;
      }
      | Action::Create(draft) => {
        if !draft.is_submittable() {
          warn!("ignoring task draft with a blank title");
          return;
        }
        self.store.create(
          draft, now, &self.zone
        );
        self.create_form_open = false;
      }
      | Action::BeginEdit(id) => {
        if self.store.get(&id).is_some()
        {
          self.editing = Some(id);
        } else {
          debug!(id = %id, "edit target not found");
        }
      }
      | Action::CancelEdit => {
        self.editing = None;
      }
      | Action::Update(task) => {
        if task.title.trim().is_empty() {
          warn!(id = %task.id, "ignoring edit with a blank title");
          return;
        }
        self.store.update(task);
        self.editing = None;
      }
      | Action::Delete(id) => {
        if self.editing.as_ref()
          == Some(&id)
        {
          self.editing = None;
        }
        self.store.delete(&id);
      }
      | Action::ToggleCompleted(id) => {
        self.store.toggle_completed(&id);
      }
      | Action::ToggleImportant(id) => {
        self.store.toggle_important(&id);
      }
      | Action::SetQuery(text) => {
        self.query.text = text;
      }
      | Action::SetFilter(filter) => {
        self.query.filter = filter;
      }
      | Action::ChooseSidebarFilter(
        filter
      ) => {
        self.query.filter = filter;
        self.query.selected_date = None;
      }
      | Action::SelectDate(day) => {
        self.query.selected_date =
          Some(day);
        self.view = WorkspaceView::Tasks;
      }
      | Action::ClearDate => {
        self.query.selected_date = None;
      }
      | Action::SetTab(tab) => {
        self.tab = tab;
      }
      | Action::ToggleLayout => {
        self.layout =
          self.layout.toggled();
      }
      | Action::ToggleView => {
        self.view = self.view.toggled();
      }
      | Action::CalendarPrev(pane) => {
        self.nav_mut(pane).prev();
      }
      | Action::CalendarNext(pane) => {
        self.nav_mut(pane).next();
      }
      | Action::CalendarToday(pane) => {
        let today = self.zone.today(now);
        self.nav_mut(pane).today(today);
      }
      | Action::ToggleCalendarSpan(
        pane
      ) => {
        self.nav_mut(pane).toggle_span();
      }
    }
  }

  fn nav_mut(
    &mut self,
    pane: CalendarPane
  ) -> &mut CalendarNav {
    match pane {
      | CalendarPane::Main => {
        &mut self.main_calendar
      }
      | CalendarPane::Sidebar => {
        &mut self.sidebar_calendar
      }
    }
  }

  pub fn nav(
    &self,
    pane: CalendarPane
  ) -> &CalendarNav {
    match pane {
      | CalendarPane::Main => {
        &self.main_calendar
      }
      | CalendarPane::Sidebar => {
        &self.sidebar_calendar
      }
    }
  }

  pub fn store(&self) -> &TaskStore<S> {
    &self.store
  }

  pub fn tasks(&self) -> &[Task] {
    self.store.tasks()
  }

  pub fn categories(&self) -> &[Category] {
    self.store.categories()
  }

  pub fn query(&self) -> &TaskQuery {
    &self.query
  }

  pub fn tab(&self) -> StatusTab {
    self.tab
  }

  pub fn layout(&self) -> ListLayout {
    self.layout
  }

  pub fn view(&self) -> WorkspaceView {
    self.view
  }

  pub fn is_create_form_open(
    &self
  ) -> bool {
    self.create_form_open
  }

  pub fn editing(
    &self
  ) -> Option<&TaskId> {
    self.editing.as_ref()
  }

  pub fn zone(&self) -> &DayZone {
    &self.zone
  }

  pub fn week_start(&self) -> Weekday {
    self.week_start
  }

  pub fn today(
    &self,
    now: DateTime<Utc>
  ) -> NaiveDate {
    self.zone.today(now)
  }

  /// The filter pipeline alone, before the status tab.
  pub fn filtered_tasks(
    &self,
    today: NaiveDate
  ) -> Vec<&Task> {
    filter_tasks(
      self.store.tasks(),
      &self.query,
      today,
      &self.zone
    )
  }

  pub fn visible_tasks(
    &self,
    today: NaiveDate
  ) -> Vec<&Task> {
    self
      .tab
      .apply(self.filtered_tasks(today))
  }

  pub fn filter_counts(
    &self,
    today: NaiveDate
  ) -> FilterCounts {
    let tasks = self.store.tasks();
    let count = |filter: &TaskFilter| {
      count_matching(
        tasks, filter, today, &self.zone
      )
    };
    FilterCounts {
      total:      tasks.len(),
      completed:  count(
        &TaskFilter::Completed
      ),
      important:  count(
        &TaskFilter::Important
      ),
      due_today:  count(
        &TaskFilter::DueToday
      ),
      categories: self
        .store
        .categories()
        .iter()
        .map(|category| {
          (
            category.id.clone(),
            count(&TaskFilter::Category(
              category.id.clone()
            ))
          )
        })
        .collect()
    }
  }

  pub fn calendar(
    &self,
    pane: CalendarPane,
    today: NaiveDate
  ) -> CalendarGrid {
    build_grid(
      self.nav(pane),
      self.week_start,
      self.store.tasks(),
      &self.zone,
      today,
      self.query.selected_date
    )
  }

  pub fn category_for(
    &self,
    task: &Task
  ) -> Option<&Category> {
    self
      .store
      .category(task.category_id.as_ref())
  }

  /// Blank draft for the create form, due on the selected date if any.
  pub fn create_form_defaults(
    &self
  ) -> TaskDraft {
    TaskDraft {
      due: self.query.selected_date,
      ..TaskDraft::default()
    }
  }

  pub fn is_overdue(
    &self,
    task: &Task,
    now: DateTime<Utc>
  ) -> bool {
    task.is_overdue(now, &self.zone)
  }
}
