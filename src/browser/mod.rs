/// Seam between the coordinator and the extension APIs.
///
/// The coordinator only talks to the browser through [`Browser`], so its
/// state machine runs the same against Chrome and against a test double.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::messages::Message;
use crate::presenter::IconState;

#[cfg(target_arch = "wasm32")]
pub mod chrome;

/// Browser-assigned tab identifier. Unique while the tab lives, may be reused.
pub type TabId = i32;

/// The slice of a browser tab the coordinator cares about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    #[serde(default)]
    pub id: Option<TabId>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl Tab {
    pub fn new(id: TabId, url: &str, active: bool) -> Tab {
        Tab {
            id: Some(id),
            url: Some(url.to_string()),
            active,
        }
    }
}

/// Outcome of a fire-and-forget send to a tab.
///
/// A tab without a live content script is the normal case (page still
/// loading, restricted page, closed tab), so it is a variant, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    ReceiverAbsent(String),
}

/// System notifications the coordinator may raise
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Activated,
    RestrictedPage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("browser API call failed: {0}")]
pub struct BrowserError(pub String);

#[async_trait(?Send)]
pub trait Browser {
    /// All open tabs across windows.
    async fn query_tabs(&self) -> Result<Vec<Tab>, BrowserError>;

    async fn get_tab(&self, tab_id: TabId) -> Result<Tab, BrowserError>;

    /// The active tab of the window the user last focused.
    async fn focused_tab(&self) -> Result<Option<Tab>, BrowserError>;

    /// Apply badge color/text, enabled flag and tooltip to one tab's icon.
    async fn apply_icon(&self, tab_id: TabId, icon: &IconState) -> Result<(), BrowserError>;

    async fn send_to_tab(&self, tab_id: TabId, message: Message) -> Delivery;

    async fn notify(&self, notice: Notice) -> Result<(), BrowserError>;
}
