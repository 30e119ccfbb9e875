/// WebExtension bindings: the host traits over `bridge.js`, and the
/// listeners that feed the event queue
use log::warn;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::error::HostError;
use crate::events::{Event, EventQueue};
use crate::host::{ActionSurface, KeyValueStore, TabHost};
use crate::storage::StorageChanges;
use crate::tab_data::{TabChange, TabInfo};

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryTabs(pattern: Option<String>) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setTabMuted(tab_id: i32, muted: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn setActionTitle(tab_id: i32, title: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn setActionIcon(tab_id: i32, path: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn createMenu(menu_id: &str, title: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn updateMenu(menu_id: &str, title: &str) -> Result<(), JsValue>;

    fn onTabUpdated(callback: &Closure<dyn FnMut(JsValue, JsValue)>);

    fn onActionClicked(callback: &Closure<dyn FnMut(JsValue)>);

    fn onMenuShown(callback: &Closure<dyn FnMut(JsValue)>);

    fn onMenuClicked(callback: &Closure<dyn FnMut(String, JsValue)>);

    fn onStorageChanged(callback: &Closure<dyn FnMut(JsValue, String)>);
}

/// The live browser
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHost;

impl KeyValueStore for BrowserHost {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        decode_stored(getStorage(key).await?)
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        let value_js = value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?;
        setStorage(key, value_js).await?;
        Ok(())
    }
}

impl TabHost for BrowserHost {
    async fn query(&self, pattern: Option<&str>) -> Result<Vec<TabInfo>, HostError> {
        let tabs_js = queryTabs(pattern.map(str::to_string)).await?;
        Ok(serde_wasm_bindgen::from_value(tabs_js)?)
    }

    async fn get_tab(&self, tab_id: i32) -> Result<TabInfo, HostError> {
        let tab_js = getTab(tab_id).await?;
        Ok(serde_wasm_bindgen::from_value(tab_js)?)
    }

    async fn set_muted(&self, tab_id: i32, muted: bool) -> Result<(), HostError> {
        setTabMuted(tab_id, muted).await?;
        Ok(())
    }
}

impl ActionSurface for BrowserHost {
    async fn set_title(&self, tab_id: i32, title: &str) -> Result<(), HostError> {
        setActionTitle(tab_id, title).await?;
        Ok(())
    }

    async fn set_icon(&self, tab_id: i32, path: &str) -> Result<(), HostError> {
        setActionIcon(tab_id, path).await?;
        Ok(())
    }

    async fn create_menu(&self, menu_id: &str, title: &str) -> Result<(), HostError> {
        createMenu(menu_id, title).await?;
        Ok(())
    }

    async fn update_menu(&self, menu_id: &str, title: &str) -> Result<(), HostError> {
        updateMenu(menu_id, title).await?;
        Ok(())
    }
}

/// A stored value; a missing key comes back from the bridge as `undefined`
fn decode_stored(value_js: JsValue) -> Result<Option<Value>, HostError> {
    Ok(serde_wasm_bindgen::from_value(value_js)?)
}

fn decode_tab(tab_js: JsValue) -> Option<TabInfo> {
    serde_wasm_bindgen::from_value(tab_js)
        .map_err(|e| warn!("Ignoring tab event with unexpected shape: {}", e))
        .ok()
}

fn decode_changes(changes_js: JsValue) -> Option<StorageChanges> {
    serde_wasm_bindgen::from_value(changes_js)
        .map_err(|e| warn!("Ignoring storage change with unexpected shape: {}", e))
        .ok()
}

/// Register every browser listener. Each one only decodes its arguments and
/// pushes an `Event`; the closures live as long as the background page.
pub fn install_listeners(queue: &EventQueue) {
    let tab_updated = {
        let queue = queue.clone();
        Closure::wrap(Box::new(move |change_js: JsValue, tab_js: JsValue| {
            let change: TabChange = match serde_wasm_bindgen::from_value(change_js) {
                Ok(change) => change,
                Err(e) => {
                    warn!("Ignoring tab change with unexpected shape: {}", e);
                    return;
                }
            };
            if let Some(tab) = decode_tab(tab_js) {
                queue.push(Event::TabUpdated { tab, change });
            }
        }) as Box<dyn FnMut(JsValue, JsValue)>)
    };
    onTabUpdated(&tab_updated);
    tab_updated.forget();

    let action_clicked = {
        let queue = queue.clone();
        Closure::wrap(Box::new(move |tab_js: JsValue| {
            if let Some(tab) = decode_tab(tab_js) {
                queue.push(Event::ActionClicked(tab));
            }
        }) as Box<dyn FnMut(JsValue)>)
    };
    onActionClicked(&action_clicked);
    action_clicked.forget();

    let menu_shown = {
        let queue = queue.clone();
        Closure::wrap(Box::new(move |tab_js: JsValue| {
            if let Some(tab) = decode_tab(tab_js) {
                queue.push(Event::MenuShown(tab));
            }
        }) as Box<dyn FnMut(JsValue)>)
    };
    onMenuShown(&menu_shown);
    menu_shown.forget();

    let menu_clicked = {
        let queue = queue.clone();
        Closure::wrap(Box::new(move |menu_item_id: String, tab_js: JsValue| {
            if let Some(tab) = decode_tab(tab_js) {
                queue.push(Event::MenuClicked { menu_item_id, tab });
            }
        }) as Box<dyn FnMut(String, JsValue)>)
    };
    onMenuClicked(&menu_clicked);
    menu_clicked.forget();

    let storage_changed = {
        let queue = queue.clone();
        Closure::wrap(Box::new(move |changes_js: JsValue, area: String| {
            if let Some(changes) = decode_changes(changes_js) {
                queue.push(Event::StorageChanged { area, changes });
            }
        }) as Box<dyn FnMut(JsValue, String)>)
    };
    onStorageChanged(&storage_changed);
    storage_changed.forget();
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use serde_json::json;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn parse(text: &str) -> JsValue {
        js_sys::JSON::parse(text).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_decode_firefox_tab() {
        let tab_js = parse(
            r#"{
                "id": 42,
                "index": 3,
                "windowId": 1,
                "active": true,
                "audible": true,
                "title": "A video",
                "url": "https://a.example/watch?v=1",
                "mutedInfo": {"muted": true, "reason": "user"},
                "incognito": false
            }"#,
        );

        let tab = decode_tab(tab_js).unwrap();

        assert_eq!(tab.id, 42);
        assert!(tab.is_muted());
        assert_eq!(tab.domain(), Some("a.example".to_string()));
    }

    #[wasm_bindgen_test]
    fn test_decode_tab_without_url() {
        let tab = decode_tab(parse(r#"{"id": 7, "mutedInfo": {"muted": false}}"#)).unwrap();

        assert_eq!(tab.url, None);
        assert_eq!(tab.domain(), None);
    }

    #[wasm_bindgen_test]
    fn test_decode_tab_rejects_wrong_shape() {
        assert_eq!(decode_tab(JsValue::from_str("not a tab")), None);
        assert_eq!(decode_tab(JsValue::UNDEFINED), None);
    }

    #[wasm_bindgen_test]
    fn test_decode_storage_changes() {
        let changes_js = parse(
            r#"{
                "mutedDomains": {"oldValue": ["a.example"], "newValue": ["a.example", "b.example"]},
                "settings": {"oldValue": {"resyncOnExternalChange": false}}
            }"#,
        );

        let changes = decode_changes(changes_js).unwrap();

        let muted = &changes["mutedDomains"];
        assert_eq!(muted.old_value, Some(json!(["a.example"])));
        assert_eq!(muted.new_value, Some(json!(["a.example", "b.example"])));
        assert_eq!(changes["settings"].new_value, None);
    }

    #[wasm_bindgen_test]
    fn test_decode_removed_key_with_undefined_new_value() {
        let changes_js = parse(r#"{"mutedDomains": {"oldValue": ["a.example"]}}"#);
        let change_js = js_sys::Reflect::get(&changes_js, &JsValue::from_str("mutedDomains")).unwrap();
        js_sys::Reflect::set(&change_js, &JsValue::from_str("newValue"), &JsValue::UNDEFINED).unwrap();

        let changes = decode_changes(changes_js).unwrap();

        assert_eq!(changes["mutedDomains"].old_value, Some(json!(["a.example"])));
        assert_eq!(changes["mutedDomains"].new_value, None);
    }

    #[wasm_bindgen_test]
    fn test_decode_stored_value() {
        assert_eq!(decode_stored(JsValue::UNDEFINED).unwrap(), None);
        assert_eq!(decode_stored(JsValue::NULL).unwrap(), None);
        assert_eq!(
            decode_stored(parse(r#"["a.example"]"#)).unwrap(),
            Some(json!(["a.example"]))
        );
    }
}
