/// Browser events and the queue that serializes their handling
///
/// Host listeners only push into the queue. A single consumer drains it and
/// runs each handler to completion before taking the next event, so no two
/// handlers ever interleave at an await point.
use futures::StreamExt;
use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};
use log::{debug, warn};

use crate::host::{ActionSurface, KeyValueStore, TabHost};
use crate::reconciler::Reconciler;
use crate::storage::StorageChanges;
use crate::tab_data::{TabChange, TabInfo};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Background page came up
    Startup,
    /// `tabs.onUpdated`
    TabUpdated { tab: TabInfo, change: TabChange },
    /// `browserAction.onClicked`
    ActionClicked(TabInfo),
    /// `menus.onShown`
    MenuShown(TabInfo),
    /// `menus.onClicked`
    MenuClicked { menu_item_id: String, tab: TabInfo },
    /// `storage.onChanged`
    StorageChanged { area: String, changes: StorageChanges },
}

/// Producer side, cloned into every listener
#[derive(Debug, Clone)]
pub struct EventQueue {
    sender: UnboundedSender<Event>,
}

pub type EventReceiver = UnboundedReceiver<Event>;

pub fn channel() -> (EventQueue, EventReceiver) {
    let (sender, receiver) = unbounded();
    (EventQueue { sender }, receiver)
}

impl EventQueue {
    pub fn push(&self, event: Event) {
        if let Err(e) = self.sender.unbounded_send(event) {
            warn!("Dropping event, handler loop is gone: {:?}", e.into_inner());
        }
    }
}

/// Drain the queue until every producer is dropped
pub async fn run<H>(reconciler: &mut Reconciler<H>, mut events: EventReceiver)
where
    H: TabHost + ActionSurface + KeyValueStore,
{
    while let Some(event) = events.next().await {
        dispatch(reconciler, event).await;
    }
}

pub async fn dispatch<H>(reconciler: &mut Reconciler<H>, event: Event)
where
    H: TabHost + ActionSurface + KeyValueStore,
{
    match event {
        Event::Startup => {
            reconciler.startup().await;
        }
        Event::TabUpdated { tab, change } => {
            if change.is_load_complete() {
                reconciler.refresh_indicator(&tab).await;
                reconciler.reconcile_tab(&tab).await;
            } else if let Some(info) = change.muted_info {
                debug!("Tab {} reported muted={}", tab.id, info.muted);
                reconciler.handle_mute_changed(tab.id).await;
            }
        }
        Event::ActionClicked(tab) => {
            reconciler.toggle_domain(&tab).await;
        }
        Event::MenuShown(tab) => {
            reconciler.refresh_menu(&tab).await;
        }
        Event::MenuClicked { menu_item_id, tab } => {
            if reconciler.is_own_menu(&menu_item_id) {
                reconciler.toggle_domain(&tab).await;
            }
        }
        Event::StorageChanged { area, changes } => {
            reconciler.handle_storage_change(&area, &changes).await;
        }
    }
}
