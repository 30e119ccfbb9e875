/// Data structures for Site Mute
use serde::{Deserialize, Serialize};

use crate::domain::domain_of;

/// Mute state the browser reports for a tab
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MutedInfo {
    pub muted: bool,
}

/// Information about a browser tab
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: i32,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub muted_info: MutedInfo,
}

impl TabInfo {
    #[cfg(test)]
    pub fn new(id: i32, url: &str, muted: bool) -> TabInfo {
        TabInfo {
            id,
            url: Some(url.to_string()),
            muted_info: MutedInfo { muted },
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted_info.muted
    }

    /// Domain of the tab's URL, `None` when the tab is exempt
    pub fn domain(&self) -> Option<String> {
        self.url.as_deref().and_then(domain_of)
    }
}

/// The part of a `tabs.onUpdated` change record we act on
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabChange {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub muted_info: Option<MutedInfo>,
}

impl TabChange {
    pub fn is_load_complete(&self) -> bool {
        self.status.as_deref() == Some("complete")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_info_creation() {
        let tab = TabInfo::new(1, "https://a.example/x", true);

        assert_eq!(tab.id, 1);
        assert_eq!(tab.url.as_deref(), Some("https://a.example/x"));
        assert!(tab.is_muted());
        assert_eq!(tab.domain(), Some("a.example".to_string()));
    }

    #[test]
    fn test_tab_without_url_has_no_domain() {
        let tab: TabInfo = serde_json::from_str(r#"{"id": 7}"#).unwrap();

        assert_eq!(tab.url, None);
        assert!(!tab.is_muted());
        assert_eq!(tab.domain(), None);
    }

    #[test]
    fn test_deserialize_browser_tab() {
        let json = r#"{
            "id": 42,
            "index": 3,
            "url": "https://a.example/watch",
            "title": "Video",
            "active": true,
            "mutedInfo": { "muted": true, "reason": "user" }
        }"#;

        let tab: TabInfo = serde_json::from_str(json).unwrap();

        assert_eq!(tab.id, 42);
        assert!(tab.is_muted());
        assert_eq!(tab.domain(), Some("a.example".to_string()));
    }

    #[test]
    fn test_deserialize_change_info() {
        let loaded: TabChange = serde_json::from_str(r#"{"status": "complete"}"#).unwrap();
        assert!(loaded.is_load_complete());
        assert_eq!(loaded.muted_info, None);

        let loading: TabChange = serde_json::from_str(r#"{"status": "loading"}"#).unwrap();
        assert!(!loading.is_load_complete());

        let muted: TabChange = serde_json::from_str(r#"{"mutedInfo": {"muted": false}}"#).unwrap();
        assert!(!muted.is_load_complete());
        assert_eq!(muted.muted_info, Some(MutedInfo { muted: false }));
    }
}
