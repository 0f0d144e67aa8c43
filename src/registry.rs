/// Volatile per-tab activation state owned by the background coordinator.
///
/// Lives only as long as the background process. A restarted worker starts
/// with an empty registry and every tab reads as inactive.
use std::collections::HashMap;

use crate::browser::TabId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Inactive,
    Active,
}

impl Activation {
    pub fn is_active(self) -> bool {
        self == Activation::Active
    }
}

#[derive(Debug, Default)]
pub struct TabRegistry {
    entries: HashMap<TabId, bool>,
}

impl TabRegistry {
    pub fn new() -> Self {
        TabRegistry {
            entries: HashMap::new(),
        }
    }

    pub fn state(&self, tab_id: TabId) -> Activation {
        match self.entries.get(&tab_id) {
            Some(true) => Activation::Active,
            _ => Activation::Inactive,
        }
    }

    pub fn is_active(&self, tab_id: TabId) -> bool {
        self.state(tab_id).is_active()
    }

    pub fn set(&mut self, tab_id: TabId, activation: Activation) {
        self.entries.insert(tab_id, activation.is_active());
    }

    /// Flip the tab's state and return the new one.
    pub fn toggle(&mut self, tab_id: TabId) -> Activation {
        let next = match self.state(tab_id) {
            Activation::Active => Activation::Inactive,
            Activation::Inactive => Activation::Active,
        };
        self.set(tab_id, next);
        next
    }

    /// Forget the tab entirely (tab closed).
    pub fn remove(&mut self, tab_id: TabId) {
        self.entries.remove(&tab_id);
    }

    pub fn active_tabs(&self) -> Vec<TabId> {
        let mut ids: Vec<TabId> = self
            .entries
            .iter()
            .filter(|(_, active)| **active)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
