/// Browser surfaces the reconciler drives
///
/// `browser::BrowserHost` implements these over the WebExtension APIs; the
/// tests implement them in memory. Futures are not `Send`: everything runs
/// on the page's single thread.
use serde_json::Value;

use crate::error::HostError;
use crate::tab_data::TabInfo;

/// `storage.local`
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError>;
}

/// `tabs`
#[allow(async_fn_in_trait)]
pub trait TabHost {
    /// All tabs, or only those whose URL matches `pattern`
    async fn query(&self, pattern: Option<&str>) -> Result<Vec<TabInfo>, HostError>;

    async fn get_tab(&self, tab_id: i32) -> Result<TabInfo, HostError>;

    async fn set_muted(&self, tab_id: i32, muted: bool) -> Result<(), HostError>;
}

/// `browserAction` and `menus`
#[allow(async_fn_in_trait)]
pub trait ActionSurface {
    async fn set_title(&self, tab_id: i32, title: &str) -> Result<(), HostError>;

    async fn set_icon(&self, tab_id: i32, path: &str) -> Result<(), HostError>;

    async fn create_menu(&self, menu_id: &str, title: &str) -> Result<(), HostError>;

    async fn update_menu(&self, menu_id: &str, title: &str) -> Result<(), HostError>;
}
