/// Domain-scoped mute reconciliation
///
/// A tab's desired mute flag is `domain ∈ muted`. Every handler observes
/// the actual flag, computes the desired one, and issues at most one
/// `set_muted` call to close the gap. Tabs without a domain are left alone.
use log::{debug, error, info, warn};

use crate::config::{Config, Indicator, Settings};
use crate::domain::match_pattern;
use crate::host::{ActionSurface, KeyValueStore, TabHost};
use crate::muted_set::MutedDomains;
use crate::storage::{DomainStateStore, StorageChanges, decode_settings_change};
use crate::tab_data::TabInfo;

/// What `reconcile_tab` did to one tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// The tab has no domain
    Skipped,
    /// Actual flag already matched the desired one
    InSync,
    /// One update was issued and succeeded
    Corrected,
    /// One update was issued and failed
    Failed,
}

/// Outcome of muting or unmuting every tab of a domain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub updated: usize,
    pub failed: usize,
}

pub struct Reconciler<H> {
    host: H,
    config: Config,
    settings: Settings,
    store: DomainStateStore,
    muted: MutedDomains,
}

impl<H> Reconciler<H>
where
    H: TabHost + ActionSurface + KeyValueStore,
{
    pub fn new(host: H, config: Config, settings: Settings) -> Self {
        let store = DomainStateStore::new(&config.storage_key);
        Reconciler {
            host,
            config,
            settings,
            store,
            muted: MutedDomains::new(),
        }
    }

    #[cfg(test)]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn muted(&self) -> &MutedDomains {
        &self.muted
    }

    #[cfg(test)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[cfg(test)]
    pub fn is_muted(&self, domain: &str) -> bool {
        self.muted.contains(domain)
    }

    /// Replace the cache with whatever storage currently holds
    pub async fn load(&mut self) {
        self.muted = self.store.load(&self.host).await;
    }

    /// Load state, install the context menu, and bring every open tab in line
    pub async fn startup(&mut self) -> usize {
        self.load().await;

        match self.host.create_menu(&self.config.menu_id, Indicator::for_state(false).title).await {
            Ok(()) => info!("Context menu created successfully"),
            Err(e) => error!("Error creating menu item: {}", e),
        }

        let corrected = self.reconcile_all().await;
        info!("Extension initialized, corrected {} tab(s)", corrected);
        corrected
    }

    /// Reconcile and refresh the indicator of every open tab
    pub async fn reconcile_all(&self) -> usize {
        let tabs = match self.host.query(None).await {
            Ok(tabs) => tabs,
            Err(e) => {
                error!("Error listing tabs: {}", e);
                return 0;
            }
        };

        let mut corrected = 0;
        for tab in &tabs {
            self.refresh_indicator(tab).await;
            if self.reconcile_tab(tab).await == Reconciled::Corrected {
                corrected += 1;
            }
        }
        corrected
    }

    /// Flip the mute preference of the tab's domain and apply it to every
    /// tab on that domain. Returns `None` when the tab has no domain.
    pub async fn toggle_domain(&mut self, tab: &TabInfo) -> Option<SweepReport> {
        let Some(domain) = tab.domain() else {
            debug!("Tab {} has no domain, nothing to toggle", tab.id);
            return None;
        };

        let now_muted = !self.muted.contains(&domain);
        let report = self.set_domain_muted(&domain, now_muted).await;
        self.refresh_indicator(tab).await;

        info!("Toggled mute for {}. New state: {}", domain, now_muted);
        Some(report)
    }

    /// Record and persist the preference for `domain`, then mute or unmute
    /// every open tab on it. The write goes out first so any other
    /// reconciler sees the new list before it sees the tab changes. Tab
    /// failures are logged and do not stop the sweep.
    pub async fn set_domain_muted(&mut self, domain: &str, muted: bool) -> SweepReport {
        self.muted.set(domain, muted);
        self.store.save(&self.host, &self.muted).await;

        let mut report = SweepReport::default();
        let pattern = match_pattern(domain);
        let tabs = match self.host.query(Some(pattern.as_str())).await {
            Ok(tabs) => tabs,
            Err(e) => {
                error!("Error finding tabs for {}: {}", domain, e);
                return report;
            }
        };

        for tab in tabs.iter().filter(|t| t.domain().as_deref() == Some(domain)) {
            match self.host.set_muted(tab.id, muted).await {
                Ok(()) => report.updated += 1,
                Err(e) => {
                    warn!("Error setting mute={} on tab {} ({}): {}", muted, tab.id, domain, e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Issue at most one update so the tab's flag matches its domain's state
    pub async fn reconcile_tab(&self, tab: &TabInfo) -> Reconciled {
        let Some(domain) = tab.domain() else {
            debug!("Skipping tab {} without a domain", tab.id);
            return Reconciled::Skipped;
        };

        let desired = self.muted.contains(&domain);
        if tab.is_muted() == desired {
            return Reconciled::InSync;
        }

        match self.host.set_muted(tab.id, desired).await {
            Ok(()) => {
                info!("Set mute={} on tab {} ({}) to match stored preference", desired, tab.id, domain);
                Reconciled::Corrected
            }
            Err(e) => {
                warn!("Error setting mute={} on tab {} ({}): {}", desired, tab.id, domain, e);
                Reconciled::Failed
            }
        }
    }

    /// The tab's mute flag was changed by something else; put it back if it
    /// now disagrees with the stored preference for its domain.
    pub async fn handle_mute_changed(&self, tab_id: i32) -> Reconciled {
        match self.host.get_tab(tab_id).await {
            Ok(tab) => self.reconcile_tab(&tab).await,
            Err(e) => {
                warn!("Error looking up tab {}: {}", tab_id, e);
                Reconciled::Failed
            }
        }
    }

    /// Point the browser action's icon and title at the tab's domain state
    pub async fn refresh_indicator(&self, tab: &TabInfo) {
        let Some(domain) = tab.domain() else {
            return;
        };

        let indicator = Indicator::for_state(self.muted.contains(&domain));

        if let Err(e) = self.host.set_title(tab.id, indicator.title).await {
            debug!("Error setting action title on tab {}: {}", tab.id, e);
        }
        if let Err(e) = self.host.set_icon(tab.id, indicator.icon).await {
            debug!("Error setting action icon on tab {}: {}", tab.id, e);
        }
    }

    /// Relabel the context-menu entry for the tab it is about to open on
    pub async fn refresh_menu(&self, tab: &TabInfo) {
        let Some(domain) = tab.domain() else {
            return;
        };

        let title = Indicator::for_state(self.muted.contains(&domain)).title;
        match self.host.update_menu(&self.config.menu_id, title).await {
            Ok(()) => debug!("Updated context menu for {}", domain),
            Err(e) => error!("Error updating context menu: {}", e),
        }
    }

    pub fn is_own_menu(&self, menu_item_id: &str) -> bool {
        menu_item_id == self.config.menu_id
    }

    /// Adopt values written to storage by someone else
    ///
    /// The muted list is overwritten and never re-saved. Open tabs are only
    /// reconciled against it when `resync_on_external_change` is set and the
    /// list differs from the cache, so the echo of our own save is a no-op.
    pub async fn handle_storage_change(&mut self, area: &str, changes: &StorageChanges) {
        if let Some(settings) = decode_settings_change(area, &self.config.settings_key, changes) {
            info!("Settings updated in storage: {:?}", settings);
            self.settings = settings;
        }

        if let Some(domains) = self.store.decode_change(area, changes) {
            info!("Muted domains updated in storage: {:?}", domains.as_slice());
            let changed = domains != self.muted;
            self.muted = domains;

            if changed && self.settings.resync_on_external_change {
                let corrected = self.reconcile_all().await;
                info!("Resynced open tabs, corrected {} tab(s)", corrected);
            }
        }
    }
}
