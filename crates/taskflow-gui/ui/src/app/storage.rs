use anyhow::anyhow;
use taskflow_core::dashboard::{
  ListLayout,
  WorkspaceView
};
use taskflow_core::kv::KeyValueStore;

pub const LAYOUT_STORAGE_KEY: &str =
  "taskflow.layout";
pub const VIEW_STORAGE_KEY: &str =
  "taskflow.view";

/// `window.localStorage` behind the key-value seam.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct BrowserStorage;

fn local_storage()
-> anyhow::Result<web_sys::Storage> {
  web_sys::window()
    .ok_or_else(|| {
      anyhow!("no browser window")
    })?
    .local_storage()
    .map_err(|err| {
      anyhow!(
        "localStorage access denied: \
         {err:?}"
      )
    })?
    .ok_or_else(|| {
      anyhow!(
        "localStorage is unavailable"
      )
    })
}

impl KeyValueStore for BrowserStorage {
  fn get_item(
    &self,
    key: &str
  ) -> anyhow::Result<Option<String>> {
    local_storage()?
      .get_item(key)
      .map_err(|err| {
        anyhow!(
          "failed reading {key}: {err:?}"
        )
      })
  }

  fn set_item(
    &mut self,
    key: &str,
    value: &str
  ) -> anyhow::Result<()> {
    local_storage()?
      .set_item(key, value)
      .map_err(|err| {
        anyhow!(
          "failed writing {key}: {err:?}"
        )
      })
  }
}

fn load_key(key: &str) -> Option<String> {
  match BrowserStorage.get_item(key) {
    | Ok(value) => value,
    | Err(error) => {
      tracing::warn!(key, error = %error, "failed loading ui preference");
      None
    }
  }
}

fn save_key(key: &str, value: &str) {
  let mut storage = BrowserStorage;
  if let Err(error) =
    storage.set_item(key, value)
  {
    tracing::warn!(key, error = %error, "failed saving ui preference");
  }
}

pub fn load_list_layout() -> ListLayout {
  load_key(LAYOUT_STORAGE_KEY)
    .as_deref()
    .and_then(ListLayout::from_key)
    .unwrap_or_default()
}

pub fn save_list_layout(
  layout: ListLayout
) {
  save_key(
    LAYOUT_STORAGE_KEY,
    layout.as_key()
  );
}

pub fn load_workspace_view()
-> WorkspaceView {
  load_key(VIEW_STORAGE_KEY)
    .as_deref()
    .and_then(WorkspaceView::from_key)
    .unwrap_or_default()
}

pub fn save_workspace_view(
  view: WorkspaceView
) {
  save_key(
    VIEW_STORAGE_KEY,
    view.as_key()
  );
}
