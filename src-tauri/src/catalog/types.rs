use serde::{Deserialize, Serialize};

use crate::api::lenient_string;

/// One lesson in the backend catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LessonRecord {
    pub id: i64,
    pub title: String,
    #[serde(deserialize_with = "lenient_string")]
    pub subject: String,
    #[serde(deserialize_with = "lenient_string")]
    pub level: String,
    #[serde(deserialize_with = "lenient_string")]
    pub period: String,
    #[serde(deserialize_with = "lenient_string")]
    pub week: String,
    #[serde(deserialize_with = "lenient_string")]
    pub session: String,
}

impl LessonRecord {
    /// The categorical value this record carries at the given cascade level.
    pub fn value_at(&self, level: CascadeLevel) -> &str {
        match level {
            CascadeLevel::Subject => &self.subject,
            CascadeLevel::Level => &self.level,
            CascadeLevel::Period => &self.period,
            CascadeLevel::Week => &self.week,
            CascadeLevel::Session => &self.session,
        }
    }
}

/// The five dependent dropdowns, outermost first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CascadeLevel {
    Subject,
    Level,
    Period,
    Week,
    Session,
}

impl CascadeLevel {
    pub const ALL: [CascadeLevel; 5] = [
        CascadeLevel::Subject,
        CascadeLevel::Level,
        CascadeLevel::Period,
        CascadeLevel::Week,
        CascadeLevel::Session,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Levels that must be chosen before this one.
    pub fn parents(self) -> &'static [CascadeLevel] {
        &Self::ALL[..self.index()]
    }

    /// Levels invalidated when this one changes.
    pub fn children(self) -> &'static [CascadeLevel] {
        &Self::ALL[self.index() + 1..]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CascadeLevel::Subject => "subject",
            CascadeLevel::Level => "level",
            CascadeLevel::Period => "period",
            CascadeLevel::Week => "week",
            CascadeLevel::Session => "session",
        }
    }
}

impl std::fmt::Display for CascadeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
