use chrono::{DateTime, Local, Utc};

use crate::error::StoreError;
use crate::metrics::current_streak;
use crate::models::{ActionId, EcoAction, EcoLogEntry, NewEcoAction};

/// The user's catalog and history. Dashboards read through this trait and
/// request every mutation through it; they never hold the data themselves.
pub trait UserStore {
    fn list_actions(&self) -> Result<Vec<EcoAction>, StoreError>;
    fn load_action(&self, id: &ActionId) -> Result<Option<EcoAction>, StoreError>;
    /// Log entries, oldest first.
    fn list_logs(&self) -> Result<Vec<EcoLogEntry>, StoreError>;
    fn streak(&self) -> Result<u32, StoreError>;

    /// Add a catalog action with a caller-chosen id.
    fn insert_action(&mut self, action: EcoAction) -> Result<(), StoreError>;
    /// Append one log entry for `action`. The action need not be in the catalog.
    fn add_action(
        &mut self,
        action: &EcoAction,
        date: DateTime<Utc>,
    ) -> Result<EcoLogEntry, StoreError>;
    /// Drop an action from the catalog. Existing log entries are kept.
    fn remove_action(&mut self, id: &ActionId) -> Result<Option<EcoAction>, StoreError>;
    /// Add a user-created action under a freshly generated id.
    fn add_custom_action(&mut self, action: NewEcoAction) -> Result<EcoAction, StoreError>;
}

/// Source of "now" for streak calculation.
pub type Clock = fn() -> DateTime<Local>;

/// In-process store used by hosts without their own persistence, and by tests.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    actions: Vec<EcoAction>,
    logs: Vec<EcoLogEntry>,
    clock: Clock,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            actions: Vec::new(),
            logs: Vec::new(),
            clock: Local::now,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actions(actions: Vec<EcoAction>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for action in actions {
            store.insert_action(action)?;
        }
        Ok(store)
    }

    /// Seed history, e.g. restored by the host.
    pub fn with_logs(mut self, logs: Vec<EcoLogEntry>) -> Self {
        self.logs = logs;
        self
    }

    /// Replace the wall clock the streak is measured against.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }
}

impl UserStore for MemoryStore {
    fn list_actions(&self) -> Result<Vec<EcoAction>, StoreError> {
        Ok(self.actions.clone())
    }

    fn load_action(&self, id: &ActionId) -> Result<Option<EcoAction>, StoreError> {
        Ok(self.actions.iter().find(|a| &a.id == id).cloned())
    }

    fn list_logs(&self) -> Result<Vec<EcoLogEntry>, StoreError> {
        Ok(self.logs.clone())
    }

    fn streak(&self) -> Result<u32, StoreError> {
        Ok(current_streak(&self.logs, &(self.clock)()))
    }

    fn insert_action(&mut self, action: EcoAction) -> Result<(), StoreError> {
        if self.actions.iter().any(|a| a.id == action.id) {
            return Err(StoreError::DuplicateAction(action.id.0));
        }
        self.actions.push(action);
        Ok(())
    }

    fn add_action(
        &mut self,
        action: &EcoAction,
        date: DateTime<Utc>,
    ) -> Result<EcoLogEntry, StoreError> {
        let entry = EcoLogEntry::snapshot(action, date);
        self.logs.push(entry.clone());
        tracing::debug!(action_id = %action.id, %date, logs = self.logs.len(), "logged action");
        Ok(entry)
    }

    fn remove_action(&mut self, id: &ActionId) -> Result<Option<EcoAction>, StoreError> {
        let index = self.actions.iter().position(|a| &a.id == id);
        let removed = index.map(|index| self.actions.remove(index));
        tracing::debug!(action_id = %id, removed = removed.is_some(), "remove action");
        Ok(removed)
    }

    fn add_custom_action(&mut self, action: NewEcoAction) -> Result<EcoAction, StoreError> {
        let action = action.with_id(ActionId::generate("custom"));
        self.actions.push(action.clone());
        tracing::debug!(action_id = %action.id, name = %action.name, "added custom action");
        Ok(action)
    }
}
