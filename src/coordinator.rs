/// Background coordinator: owns tab activation state and reacts to browser
/// events and tab messages.
///
/// All state lives in `registry` and `focused`. Icon updates and message
/// sends that follow a registry change are best-effort and may complete in
/// any order; only the registry is authoritative.
use std::cell::{Cell, RefCell};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::browser::{Browser, Delivery, Notice, Tab, TabId};
use crate::images::random::{RandomImageError, encode_random};
use crate::images::seeding::{BundledAssets, SeedReport, seed_default_images};
use crate::images::{ImageBackend, ImageStore};
use crate::messages::{Message, RandomImageResponse};
use crate::presenter::present;
use crate::registry::{Activation, TabRegistry};
use crate::restricted::is_restricted_url;

/// Why `runtime.onInstalled` fired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallReason {
    Install,
    Update,
    ChromeUpdate,
    SharedModuleUpdate,
}

/// What an icon click did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Activated,
    Deactivated,
    Restricted,
    Ignored,
}

pub struct Coordinator<B, S, A, R> {
    browser: B,
    images: ImageStore<S>,
    assets: A,
    rng: RefCell<R>,
    registry: RefCell<TabRegistry>,
    focused: Cell<Option<TabId>>,
}

impl<B, S, A, R> Coordinator<B, S, A, R>
where
    B: Browser,
    S: ImageBackend,
    A: BundledAssets,
    R: Rng,
{
    pub fn new(browser: B, images: ImageStore<S>, assets: A, rng: R) -> Self {
        Coordinator {
            browser,
            images,
            assets,
            rng: RefCell::new(rng),
            registry: RefCell::new(TabRegistry::new()),
            focused: Cell::new(None),
        }
    }

    pub fn activation(&self, tab_id: TabId) -> Activation {
        self.registry.borrow().state(tab_id)
    }

    pub fn focused_tab(&self) -> Option<TabId> {
        self.focused.get()
    }

    /// Fresh process: every tab is inactive, so repaint them all and
    /// remember which tab has focus.
    pub async fn on_startup(&self) {
        let tabs = match self.browser.query_tabs().await {
            Ok(tabs) => tabs,
            Err(e) => {
                log::error!("Could not list tabs on startup: {}", e);
                return;
            }
        };

        match self.browser.focused_tab().await {
            Ok(tab) => self.focused.set(tab.and_then(|t| t.id)),
            Err(e) => log::warn!("Could not find the focused tab: {}", e),
        }

        for tab in &tabs {
            self.refresh_icon(tab).await;
        }
        log::info!("Coordinator started, {} tabs synchronized", tabs.len());
    }

    pub async fn on_icon_clicked(&self, tab: Tab) -> ClickOutcome {
        let Some(tab_id) = tab.id else {
            return ClickOutcome::Ignored;
        };

        if is_restricted_url(tab.url.as_deref()) {
            log::info!("Tab {} is a restricted page, not activating", tab_id);
            self.refresh_icon(&tab).await;
            self.notify(Notice::RestrictedPage).await;
            return ClickOutcome::Restricted;
        }

        let next = self.registry.borrow_mut().toggle(tab_id);
        self.focused.set(Some(tab_id));

        match next {
            Activation::Active => {
                self.deactivate_others(tab_id).await;
                futures::join!(
                    self.apply_icon(tab_id, next, false),
                    self.deliver(tab_id, Message::Activate),
                    self.notify(Notice::Activated),
                );
                ClickOutcome::Activated
            }
            Activation::Inactive => {
                futures::join!(
                    self.apply_icon(tab_id, next, false),
                    self.deliver(tab_id, Message::Deactivate),
                );
                ClickOutcome::Deactivated
            }
        }
    }

    /// Message from a tab's content script. Returns the reply for round-trip
    /// messages.
    pub async fn on_message(
        &self,
        message: Message,
        sender: Option<TabId>,
    ) -> Option<RandomImageResponse> {
        match (message, sender) {
            (Message::Deactivate, Some(tab_id)) => {
                self.deactivate(tab_id).await;
                None
            }
            (Message::GetRandomImage, _) => Some(self.random_image().await),
            (message, sender) => {
                log::debug!("Ignoring {:?} from {:?}", message, sender);
                None
            }
        }
    }

    pub fn on_tab_removed(&self, tab_id: TabId) {
        self.registry.borrow_mut().remove(tab_id);
        if self.focused.get() == Some(tab_id) {
            self.focused.set(None);
        }
    }

    /// Focus moved to `tab_id`. Any other tab showing the overlay loses it.
    pub async fn on_tab_activated(&self, tab_id: TabId) {
        self.focused.set(Some(tab_id));
        self.deactivate_others(tab_id).await;

        match self.browser.get_tab(tab_id).await {
            Ok(tab) => self.refresh_icon(&tab).await,
            Err(e) => log::debug!("Could not read tab {}: {}", tab_id, e),
        }
    }

    /// Navigation or load finished; the URL may have changed.
    pub async fn on_tab_updated(&self, tab: Tab) {
        self.refresh_icon(&tab).await;
    }

    /// Seed the image library on first install only.
    pub async fn on_installed(&self, reason: InstallReason, now: f64) -> Option<SeedReport> {
        if reason != InstallReason::Install {
            log::info!("Extension {:?}, keeping existing images", reason);
            return None;
        }

        let report = match seed_default_images(&self.images, &self.assets, now).await {
            Ok(report) => report,
            Err(e) => {
                log::error!("Default image seeding failed: {}", e);
                return None;
            }
        };

        match self.images.count().await {
            Ok(0) => log::warn!("No images were persisted during seeding"),
            Ok(count) => log::info!("{} images in store after seeding", count),
            Err(e) => log::error!("Could not verify seeded images: {}", e),
        }
        Some(report)
    }

    pub async fn random_image(&self) -> RandomImageResponse {
        let outcome = match self.images.get_all().await {
            Ok(records) => encode_random(&records, &mut *self.rng.borrow_mut()),
            Err(e) => Err(RandomImageError::Store(e)),
        };

        match outcome {
            Ok(data_url) => RandomImageResponse::found(data_url),
            Err(e) => {
                log::error!("Random image request failed: {}", e);
                RandomImageResponse::failed(e.to_string())
            }
        }
    }

    async fn deactivate(&self, tab_id: TabId) {
        self.registry
            .borrow_mut()
            .set(tab_id, Activation::Inactive);

        futures::join!(
            self.apply_icon(tab_id, Activation::Inactive, false),
            self.deliver(tab_id, Message::Deactivate),
        );
    }

    /// At most one tab shows the overlay; bring down every active tab but `keep`.
    async fn deactivate_others(&self, keep: TabId) {
        let others: Vec<TabId> = self
            .registry
            .borrow()
            .active_tabs()
            .into_iter()
            .filter(|id| *id != keep)
            .collect();

        for other in others {
            log::info!("Tab {} no longer in front, deactivating", other);
            self.deactivate(other).await;
        }
    }

    async fn refresh_icon(&self, tab: &Tab) {
        let Some(tab_id) = tab.id else {
            return;
        };
        let activation = self.activation(tab_id);
        self.apply_icon(tab_id, activation, is_restricted_url(tab.url.as_deref()))
            .await;
    }

    async fn apply_icon(&self, tab_id: TabId, activation: Activation, restricted: bool) {
        let icon = present(activation, restricted);
        if let Err(e) = self.browser.apply_icon(tab_id, &icon).await {
            log::debug!("Could not update icon for tab {}: {}", tab_id, e);
        }
    }

    async fn deliver(&self, tab_id: TabId, message: Message) {
        match self.browser.send_to_tab(tab_id, message).await {
            Delivery::Delivered => {}
            Delivery::ReceiverAbsent(reason) => {
                log::debug!("Could not send {:?} to tab {}: {}", message, tab_id, reason);
            }
        }
    }

    async fn notify(&self, notice: Notice) {
        if let Err(e) = self.browser.notify(notice).await {
            log::debug!("Could not show {:?} notification: {}", notice, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use async_trait::async_trait;
    use futures::executor::block_on;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::browser::BrowserError;
    use crate::images::backend::memory::MemoryBackend;
    use crate::images::seeding::DEFAULT_IMAGE_COUNT;
    use crate::images::seeding::test_support::FakeAssets;
    use crate::images::test_support::new_image;
    use crate::presenter::{ACTIVE_COLOR, INACTIVE_COLOR, IconState, RESTRICTED_BADGE};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Icon(TabId, IconState),
        Send(TabId, Message),
        Notify(Notice),
    }

    /// Records every browser call; only tabs in `listening` have a content script.
    #[derive(Default)]
    struct FakeBrowser {
        tabs: RefCell<Vec<Tab>>,
        listening: RefCell<HashSet<TabId>>,
        calls: RefCell<Vec<Call>>,
        /// Active tab of the last focused window; first active tab when unset
        focused_window_tab: Cell<Option<TabId>>,
    }

    impl FakeBrowser {
        fn with_tabs(tabs: Vec<Tab>) -> Self {
            let listening = tabs.iter().filter_map(|t| t.id).collect();
            FakeBrowser {
                tabs: RefCell::new(tabs),
                listening: RefCell::new(listening),
                calls: RefCell::new(Vec::new()),
                focused_window_tab: Cell::new(None),
            }
        }
    }

    #[async_trait(?Send)]
    impl Browser for FakeBrowser {
        async fn query_tabs(&self) -> Result<Vec<Tab>, BrowserError> {
            Ok(self.tabs.borrow().clone())
        }

        async fn get_tab(&self, tab_id: TabId) -> Result<Tab, BrowserError> {
            self.tabs
                .borrow()
                .iter()
                .find(|t| t.id == Some(tab_id))
                .cloned()
                .ok_or_else(|| BrowserError(format!("No tab with id: {}", tab_id)))
        }

        async fn focused_tab(&self) -> Result<Option<Tab>, BrowserError> {
            let tabs = self.tabs.borrow();
            let tab = match self.focused_window_tab.get() {
                Some(id) => tabs.iter().find(|t| t.id == Some(id)),
                None => tabs.iter().find(|t| t.active),
            };
            Ok(tab.cloned())
        }

        async fn apply_icon(&self, tab_id: TabId, icon: &IconState) -> Result<(), BrowserError> {
            self.calls.borrow_mut().push(Call::Icon(tab_id, icon.clone()));
            Ok(())
        }

        async fn send_to_tab(&self, tab_id: TabId, message: Message) -> Delivery {
            self.calls.borrow_mut().push(Call::Send(tab_id, message));
            if self.listening.borrow().contains(&tab_id) {
                Delivery::Delivered
            } else {
                Delivery::ReceiverAbsent("Receiving end does not exist.".to_string())
            }
        }

        async fn notify(&self, notice: Notice) -> Result<(), BrowserError> {
            self.calls.borrow_mut().push(Call::Notify(notice));
            Ok(())
        }
    }

    type TestCoordinator = Coordinator<FakeBrowser, MemoryBackend, FakeAssets, StdRng>;

    fn coordinator(tabs: Vec<Tab>) -> TestCoordinator {
        Coordinator::new(
            FakeBrowser::with_tabs(tabs),
            ImageStore::new(MemoryBackend::new()),
            FakeAssets::default(),
            StdRng::seed_from_u64(42),
        )
    }

    fn calls(c: &TestCoordinator) -> Vec<Call> {
        c.browser.calls.borrow_mut().drain(..).collect()
    }

    fn touched_tabs(calls: &[Call]) -> HashSet<TabId> {
        calls
            .iter()
            .filter_map(|call| match call {
                Call::Icon(id, _) | Call::Send(id, _) => Some(*id),
                Call::Notify(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_click_activates_then_deactivates() {
        let c = coordinator(vec![Tab::new(1, "https://example.com", true)]);

        block_on(async {
            let before = c.activation(1);

            assert_eq!(c.on_icon_clicked(Tab::new(1, "https://example.com", true)).await, ClickOutcome::Activated);
            assert_eq!(c.activation(1), Activation::Active);
            let first = calls(&c);
            assert!(first.contains(&Call::Send(1, Message::Activate)));
            assert!(first.contains(&Call::Notify(Notice::Activated)));
            assert!(first.contains(&Call::Icon(1, present(Activation::Active, false))));

            assert_eq!(c.on_icon_clicked(Tab::new(1, "https://example.com", true)).await, ClickOutcome::Deactivated);
            assert_eq!(c.activation(1), before);
            let second = calls(&c);
            assert!(second.contains(&Call::Send(1, Message::Deactivate)));
            assert!(!second.iter().any(|call| matches!(call, Call::Notify(_))));
        });
    }

    #[test]
    fn test_click_without_content_script_still_activates() {
        let c = coordinator(vec![]);

        let outcome = block_on(c.on_icon_clicked(Tab::new(5, "https://example.com", true)));

        assert_eq!(outcome, ClickOutcome::Activated);
        assert_eq!(c.activation(5), Activation::Active);
    }

    #[test]
    fn test_click_on_restricted_page_only_notifies() {
        let c = coordinator(vec![Tab::new(2, "chrome://settings", true)]);

        let outcome = block_on(c.on_icon_clicked(Tab::new(2, "chrome://settings", true)));

        assert_eq!(outcome, ClickOutcome::Restricted);
        assert_eq!(c.activation(2), Activation::Inactive);
        let calls = calls(&c);
        assert!(calls.contains(&Call::Notify(Notice::RestrictedPage)));
        assert!(!calls.iter().any(|call| matches!(call, Call::Send(..))));
    }

    #[test]
    fn test_click_without_tab_id_is_ignored() {
        let c = coordinator(vec![]);
        let tab = Tab { id: None, url: None, active: true };

        assert_eq!(block_on(c.on_icon_clicked(tab)), ClickOutcome::Ignored);
        assert!(calls(&c).is_empty());
    }

    #[test]
    fn test_escape_from_tab_deactivates_and_echoes() {
        let c = coordinator(vec![Tab::new(3, "https://example.com", true)]);

        block_on(async {
            c.on_icon_clicked(Tab::new(3, "https://example.com", true)).await;
            calls(&c);

            let reply = c.on_message(Message::Deactivate, Some(3)).await;

            assert_eq!(reply, None);
            assert_eq!(c.activation(3), Activation::Inactive);
            let calls = calls(&c);
            assert!(calls.contains(&Call::Send(3, Message::Deactivate)));
            assert!(calls.contains(&Call::Icon(3, present(Activation::Inactive, false))));
        });
    }

    #[test]
    fn test_tab_switch_deactivates_previous_only() {
        let c = coordinator(vec![
            Tab::new(10, "https://a.example", true),
            Tab::new(11, "https://b.example", false),
            Tab::new(12, "https://c.example", false),
        ]);

        block_on(async {
            c.on_icon_clicked(Tab::new(10, "https://a.example", true)).await;
            calls(&c);

            c.on_tab_activated(11).await;

            assert_eq!(c.activation(10), Activation::Inactive);
            assert_eq!(c.focused_tab(), Some(11));
            let calls = calls(&c);
            assert!(calls.contains(&Call::Send(10, Message::Deactivate)));
            assert!(calls.contains(&Call::Icon(11, present(Activation::Inactive, false))));
            assert_eq!(touched_tabs(&calls), HashSet::from([10, 11]));
        });
    }

    #[test]
    fn test_click_in_second_window_deactivates_first() {
        let c = coordinator(vec![
            Tab::new(1, "https://a.example", true),
            Tab::new(2, "https://b.example", true),
            Tab::new(3, "https://c.example", false),
        ]);

        block_on(async {
            c.on_icon_clicked(Tab::new(1, "https://a.example", true)).await;
            calls(&c);

            // no onActivated fires when the click lands in another window
            assert_eq!(c.on_icon_clicked(Tab::new(2, "https://b.example", true)).await, ClickOutcome::Activated);
            assert_eq!(c.activation(1), Activation::Inactive);
            assert_eq!(c.activation(2), Activation::Active);
            let calls_after_click = calls(&c);
            assert!(calls_after_click.contains(&Call::Send(1, Message::Deactivate)));
            assert!(calls_after_click.contains(&Call::Icon(1, present(Activation::Inactive, false))));

            c.on_tab_activated(3).await;
            assert_eq!(c.activation(1), Activation::Inactive);
            assert_eq!(c.activation(2), Activation::Inactive);
        });
    }

    #[test]
    fn test_tab_switch_deactivates_every_other_active_tab() {
        let c = coordinator(vec![
            Tab::new(1, "https://a.example", false),
            Tab::new(2, "https://b.example", false),
        ]);

        block_on(async {
            c.on_icon_clicked(Tab::new(1, "https://a.example", true)).await;
            // the overlay was already up on tab 2 when focus moved elsewhere
            c.registry.borrow_mut().set(2, Activation::Active);
            c.focused.set(Some(1));
            calls(&c);

            c.on_tab_activated(3).await;

            assert!(c.registry.borrow().active_tabs().is_empty());
            let calls = calls(&c);
            assert!(calls.contains(&Call::Send(1, Message::Deactivate)));
            assert!(calls.contains(&Call::Send(2, Message::Deactivate)));
        });
    }

    #[test]
    fn test_tab_switch_from_inactive_tab_sends_nothing() {
        let c = coordinator(vec![
            Tab::new(20, "https://a.example", true),
            Tab::new(21, "https://b.example", false),
        ]);

        block_on(async {
            c.on_startup().await;
            calls(&c);

            c.on_tab_activated(21).await;

            let calls = calls(&c);
            assert_eq!(calls, vec![Call::Icon(21, present(Activation::Inactive, false))]);
        });
    }

    #[test]
    fn test_tab_switch_to_restricted_page_disables_icon() {
        let c = coordinator(vec![Tab::new(30, "chrome://extensions", false)]);

        block_on(c.on_tab_activated(30));

        let calls = calls(&c);
        match &calls[..] {
            [Call::Icon(30, icon)] => {
                assert!(!icon.enabled);
                assert_eq!(icon.badge_text, RESTRICTED_BADGE);
            }
            other => panic!("unexpected calls: {:?}", other),
        }
    }

    #[test]
    fn test_tab_removed_clears_state() {
        let c = coordinator(vec![Tab::new(4, "https://example.com", true)]);

        block_on(c.on_icon_clicked(Tab::new(4, "https://example.com", true)));
        c.on_tab_removed(4);

        assert_eq!(c.activation(4), Activation::Inactive);
        assert_eq!(c.focused_tab(), None);
    }

    #[test]
    fn test_navigation_recomputes_icon() {
        let c = coordinator(vec![]);

        block_on(async {
            c.on_tab_updated(Tab::new(6, "chrome://newtab", true)).await;
            c.on_tab_updated(Tab::new(6, "https://example.com", true)).await;
        });

        let calls = calls(&c);
        assert_eq!(calls.len(), 2);
        assert!(matches!(&calls[0], Call::Icon(6, icon) if !icon.enabled));
        assert!(matches!(&calls[1], Call::Icon(6, icon) if icon.enabled && icon.badge_color == INACTIVE_COLOR));
    }

    #[test]
    fn test_startup_repaints_every_tab_inactive() {
        let c = coordinator(vec![
            Tab::new(1, "https://a.example", false),
            Tab::new(2, "chrome://settings", true),
            Tab { id: None, url: None, active: false },
        ]);

        block_on(c.on_startup());

        assert_eq!(c.focused_tab(), Some(2));
        let calls = calls(&c);
        assert_eq!(calls.len(), 2);
        assert!(calls.contains(&Call::Icon(1, present(Activation::Inactive, false))));
        assert!(calls.contains(&Call::Icon(2, present(Activation::Inactive, true))));
        assert!(!calls.iter().any(|call| matches!(call, Call::Icon(_, icon) if icon.badge_color == ACTIVE_COLOR)));
    }

    #[test]
    fn test_startup_focus_comes_from_last_focused_window() {
        let c = coordinator(vec![
            Tab::new(1, "https://a.example", true),
            Tab::new(2, "https://b.example", true),
        ]);
        c.browser.focused_window_tab.set(Some(2));

        block_on(c.on_startup());

        assert_eq!(c.focused_tab(), Some(2));
    }

    #[test]
    fn test_install_seeds_once() {
        let c = coordinator(vec![]);

        block_on(async {
            let report = c.on_installed(InstallReason::Install, 0.0).await.unwrap();
            assert_eq!(report.loaded, DEFAULT_IMAGE_COUNT);

            let again = c.on_installed(InstallReason::Install, 0.0).await.unwrap();
            assert!(again.skipped);
            assert_eq!(c.images.count().await.unwrap(), DEFAULT_IMAGE_COUNT);
        });
    }

    #[test]
    fn test_update_does_not_seed() {
        let c = coordinator(vec![]);

        block_on(async {
            assert_eq!(c.on_installed(InstallReason::Update, 0.0).await, None);
            assert_eq!(c.images.count().await.unwrap(), 0);
        });
    }

    #[test]
    fn test_random_image_empty_store_fails() {
        let c = coordinator(vec![]);

        let reply = block_on(c.on_message(Message::GetRandomImage, Some(1))).unwrap();

        assert!(!reply.success);
        assert_eq!(reply.error.as_deref(), Some("No images available"));
    }

    #[test]
    fn test_random_image_store_failure_is_structured() {
        let c = coordinator(vec![]);
        c.images.backend().fail_with("IndexedDB unavailable");

        let reply = block_on(c.random_image());

        assert!(!reply.success);
        assert!(reply.error.unwrap().contains("IndexedDB unavailable"));
    }

    #[test]
    fn test_uploaded_image_is_served() {
        let c = coordinator(vec![]);

        block_on(async {
            c.on_installed(InstallReason::Install, 0.0).await;
            let max_before = c.images.get_all().await.unwrap().iter().map(|r| r.order).max();

            let uploaded = c.images.save(new_image("x", false)).await.unwrap();
            assert!(uploaded.is_enabled);
            assert!(!uploaded.is_default);
            assert_eq!(Some(uploaded.order), max_before.map(|m| m + 1));

            // disable and re-enable: X is again the only enabled custom image
            assert!(!c.images.toggle_enabled("x").await.unwrap());
            assert!(c.images.toggle_enabled("x").await.unwrap());

            let expected = crate::images::random::to_data_url(&uploaded.blob);
            for _ in 0..10 {
                let reply = c.random_image().await;
                assert_eq!(reply.data_url.as_deref(), Some(expected.as_str()));
            }
        });
    }

    #[test]
    fn test_activate_from_tab_is_ignored() {
        let c = coordinator(vec![]);

        assert_eq!(block_on(c.on_message(Message::Activate, Some(1))), None);
        assert_eq!(c.activation(1), Activation::Inactive);
    }

    #[test]
    fn test_install_reason_wire_format() {
        let reason: InstallReason = serde_json::from_str(r#""chrome_update""#).unwrap();
        assert_eq!(reason, InstallReason::ChromeUpdate);
    }
}
