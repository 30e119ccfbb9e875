/// Extension configuration and indicator constants
use serde::{Deserialize, Serialize};

pub const MUTE_ICON: &str = "icons/mute.svg";
pub const UNMUTE_ICON: &str = "icons/unmute.svg";
pub const MUTE_TITLE: &str = "Mute Site";
pub const UNMUTE_TITLE: &str = "Unmute Site";
pub const MENU_ID: &str = "mute-site";
pub const STORAGE_KEY: &str = "mutedDomains";
pub const SETTINGS_KEY: &str = "settings";
pub const STORAGE_AREA: &str = "local";

/// Icon and title shown on the browser action for a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub title: &'static str,
    pub icon: &'static str,
}

impl Indicator {
    /// A muted site offers "Unmute", an audible one offers "Mute"
    pub fn for_state(muted: bool) -> Indicator {
        if muted {
            Indicator {
                title: UNMUTE_TITLE,
                icon: MUTE_ICON,
            }
        } else {
            Indicator {
                title: MUTE_TITLE,
                icon: UNMUTE_ICON,
            }
        }
    }
}

/// Fixed wiring: where state lives and what the menu entry is called
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub storage_key: String,
    pub settings_key: String,
    pub menu_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_key: STORAGE_KEY.to_string(),
            settings_key: SETTINGS_KEY.to_string(),
            menu_id: MENU_ID.to_string(),
        }
    }
}

/// User preferences, stored under `Config::settings_key`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// Reconcile every open tab when the muted list is changed in storage
    /// by something other than this reconciler (sync, the options page).
    pub resync_on_external_change: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_for_state() {
        let muted = Indicator::for_state(true);
        assert_eq!(muted.title, "Unmute Site");
        assert_eq!(muted.icon, "icons/mute.svg");

        let unmuted = Indicator::for_state(false);
        assert_eq!(unmuted.title, "Mute Site");
        assert_eq!(unmuted.icon, "icons/unmute.svg");
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.storage_key, "mutedDomains");
        assert_eq!(config.settings_key, "settings");
        assert_eq!(config.menu_id, "mute-site");
    }

    #[test]
    fn test_settings_default_when_fields_missing() {
        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert!(!settings.resync_on_external_change);

        let settings: Settings = serde_json::from_str(r#"{"resyncOnExternalChange": true}"#).unwrap();
        assert!(settings.resync_on_external_change);
    }
}
