//! String key-value persistence seam.
//!
//! The browser front end backs this with `window.localStorage`; the CLI
//! with a JSON file. [`MemoryStore`] serves tests and scratch sessions.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

pub trait KeyValueStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>>;

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()>;
}

/// In-memory store. Clones share the same map, so a test can keep a
/// handle and inspect what a [`crate::store::TaskStore`] wrote.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryStore {
  items: Rc<RefCell<BTreeMap<String, String>>>
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_item(
    key: &str,
    value: &str
  ) -> Self {
    let store = Self::default();
    store
      .items
      .borrow_mut()
      .insert(key.to_string(), value.to_string());
    store
  }

  pub fn snapshot(
    &self
  ) -> BTreeMap<String, String> {
    self.items.borrow().clone()
  }
}

impl KeyValueStore for MemoryStore {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    Ok(self.items.borrow().get(key).cloned())
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    self
      .items
      .borrow_mut()
      .insert(key.to_string(), value.to_string());
    Ok(())
  }
}
