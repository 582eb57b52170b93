use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::Weekday;
use serde::{
  Deserialize,
  Serialize
};
use tracing::{
  error,
  info,
  warn
};

use crate::datetime::{
  DayZone,
  parse_week_start
};
use crate::store::DEFAULT_TASKS_KEY;
use crate::task::{
  Category,
  CategoryId,
  seed_categories
};

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct TaskflowConfig {
  #[serde(default = "default_version")]
  pub version:    u32,
  #[serde(default)]
  pub storage:    StorageConfig,
  #[serde(default)]
  pub calendar:   CalendarConfig,
  #[serde(default = "seed_category_configs")]
  pub categories: Vec<CategoryConfig>
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct StorageConfig {
  #[serde(default = "default_tasks_key")]
  pub tasks_key: String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct CalendarConfig {
  #[serde(default = "default_week_start")]
  pub week_start: String,
  /// IANA zone id. Empty means the system's local time.
  #[serde(default)]
  pub timezone:   String
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Serialize,
  Deserialize,
)]
pub struct CategoryConfig {
  pub id:    String,
  pub name:  String,
  #[serde(default = "default_category_color")]
  pub color: String
}

fn default_version() -> u32 {
  1
}

fn default_tasks_key() -> String {
  DEFAULT_TASKS_KEY.to_string()
}

fn default_week_start() -> String {
  "monday".to_string()
}

fn default_category_color() -> String {
  "#64748b".to_string()
}

fn seed_category_configs()
-> Vec<CategoryConfig> {
  seed_categories()
    .into_iter()
    .map(|category| {
      CategoryConfig {
        id:    category.id.to_string(),
        name:  category.name,
        color: category.color
      }
    })
    .collect()
}

impl Default for StorageConfig {
  fn default() -> Self {
    Self {
      tasks_key: default_tasks_key()
    }
  }
}

impl Default for CalendarConfig {
  fn default() -> Self {
    Self {
      week_start: default_week_start(),
      timezone:   String::new()
    }
  }
}

impl Default for TaskflowConfig {
  fn default() -> Self {
    Self {
      version:    default_version(),
      storage:    StorageConfig::default(),
      calendar:   CalendarConfig::default(),
      categories: seed_category_configs()
    }
  }
}

impl TaskflowConfig {
  /// Parses and sanitizes a TOML document.
  pub fn from_toml_str(
    text: &str
  ) -> anyhow::Result<Self> {
    let mut config =
      toml::from_str::<Self>(text)
        .context(
          "failed parsing taskflow \
           config"
        )?;
    config.sanitize();
    Ok(config)
  }

  /// Like [`Self::from_toml_str`], but a broken document logs an error and
  /// yields the defaults.
  pub fn from_toml_or_default(
    text: &str
  ) -> Self {
    match Self::from_toml_str(text) {
      | Ok(config) => {
        info!(
          version = config.version,
          tasks_key = %config.storage.tasks_key,
          week_start = %config.calendar.week_start,
          timezone = %config.calendar.timezone,
          categories = config.categories.len(),
          "loaded taskflow config"
        );
        config
      }
      | Err(error) => {
        let message = format!("{error:#}");
        error!(error = %message, "invalid taskflow config; using defaults");
        Self::default()
      }
    }
  }

  #[tracing::instrument]
  pub fn load_file(
    path: &Path
  ) -> anyhow::Result<Self> {
    let text =
      fs::read_to_string(path)
        .with_context(|| {
          format!(
            "failed to read {}",
            path.display()
          )
        })?;
    Ok(Self::from_toml_or_default(
      &text
    ))
  }

  pub fn sanitize(&mut self) {
    if self
      .storage
      .tasks_key
      .trim()
      .is_empty()
    {
      self.storage.tasks_key =
        default_tasks_key();
    }

    let week_start = self
      .calendar
      .week_start
      .trim()
      .to_ascii_lowercase();
    if week_start != "monday"
      && week_start != "sunday"
    {
      if !week_start.is_empty() {
        warn!(week_start = %self.calendar.week_start, "unknown week start; using monday");
      }
      self.calendar.week_start =
        default_week_start();
    } else {
      self.calendar.week_start =
        week_start;
    }

    self.calendar.timezone = self
      .calendar
      .timezone
      .trim()
      .to_string();

    self.categories.retain(|category| {
      let keep = !category
        .id
        .trim()
        .is_empty()
        && !category
          .name
          .trim()
          .is_empty();
      if !keep {
        warn!(id = %category.id, name = %category.name, "dropping category without id or name");
      }
      keep
    });

    if self.categories.is_empty() {
      self.categories =
        seed_category_configs();
    }
  }

  pub fn tasks_key(&self) -> &str {
    &self.storage.tasks_key
  }

  pub fn week_start(&self) -> Weekday {
    parse_week_start(
      &self.calendar.week_start
    )
  }

  pub fn zone(&self) -> DayZone {
    let raw = self.calendar.timezone.as_str();
    DayZone::resolve(
      (!raw.is_empty()).then_some(raw)
    )
  }

  pub fn categories(
    &self
  ) -> Vec<Category> {
    self
      .categories
      .iter()
      .map(|category| {
        Category {
          id:    CategoryId::from(
            category.id.as_str()
          ),
          name:  category
            .name
            .trim()
            .to_string(),
          color: category.color.clone()
        }
      })
      .collect()
  }
}
