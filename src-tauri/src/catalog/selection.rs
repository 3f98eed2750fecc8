use serde::{Deserialize, Serialize};

use super::types::CascadeLevel;

/// Values currently chosen in the five dropdowns.
///
/// A level can only hold a value while every level above it is set, and
/// changing a level clears everything below it in the same update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionState {
    pub subject: Option<String>,
    pub level: Option<String>,
    pub period: Option<String>,
    pub week: Option<String>,
    pub session: Option<String>,
}

impl SelectionState {
    pub fn get(&self, level: CascadeLevel) -> Option<&str> {
        self.slot(level).as_deref()
    }

    /// Choose `value` at `level`, clearing every deeper level.
    ///
    /// An empty (or whitespace-only) value unsets the level. Returns `false`
    /// and leaves the state untouched when a parent level is still unset.
    pub fn select(&mut self, level: CascadeLevel, value: Option<String>) -> bool {
        if !self.parents_set(level) {
            return false;
        }

        let value = value.filter(|v| !v.trim().is_empty());
        *self.slot_mut(level) = value;
        for child in level.children() {
            *self.slot_mut(*child) = None;
        }
        true
    }

    pub fn parents_set(&self, level: CascadeLevel) -> bool {
        level.parents().iter().all(|p| self.get(*p).is_some())
    }

    pub fn is_complete(&self) -> bool {
        CascadeLevel::ALL.iter().all(|l| self.get(*l).is_some())
    }

    pub fn clear(&mut self) {
        *self = SelectionState::default();
    }

    fn slot(&self, level: CascadeLevel) -> &Option<String> {
        match level {
            CascadeLevel::Subject => &self.subject,
            CascadeLevel::Level => &self.level,
            CascadeLevel::Period => &self.period,
            CascadeLevel::Week => &self.week,
            CascadeLevel::Session => &self.session,
        }
    }

    fn slot_mut(&mut self, level: CascadeLevel) -> &mut Option<String> {
        match level {
            CascadeLevel::Subject => &mut self.subject,
            CascadeLevel::Level => &mut self.level,
            CascadeLevel::Period => &mut self.period,
            CascadeLevel::Week => &mut self.week,
            CascadeLevel::Session => &mut self.session,
        }
    }
}
