mod calendar_panel;
mod filter_sidebar;
mod header;
mod status_tabs;
mod task_card;
mod task_form;
mod task_list;

pub use calendar_panel::CalendarPanel;
pub use filter_sidebar::FilterSidebar;
pub use header::Header;
pub use status_tabs::StatusTabs;
pub use task_card::TaskCard;
pub use task_form::TaskForm;
pub use task_list::TaskList;
