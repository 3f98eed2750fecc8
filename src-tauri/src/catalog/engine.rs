use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;

use super::selection::SelectionState;
use super::types::{CascadeLevel, LessonRecord};

/// Immutable snapshot of the backend lesson list.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<LessonRecord>,
}

/// Option lists for every dropdown, outermost first.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct CascadeOptions {
    pub subjects: Vec<String>,
    pub levels: Vec<String>,
    pub periods: Vec<String>,
    pub weeks: Vec<String>,
    pub sessions: Vec<String>,
}

impl CascadeOptions {
    pub fn for_level(&self, level: CascadeLevel) -> &[String] {
        match level {
            CascadeLevel::Subject => &self.subjects,
            CascadeLevel::Level => &self.levels,
            CascadeLevel::Period => &self.periods,
            CascadeLevel::Week => &self.weeks,
            CascadeLevel::Session => &self.sessions,
        }
    }
}

/// Outcome of matching a selection against the catalog.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// At least one level is still unset.
    Incomplete,
    /// All five levels are set but no lesson carries that combination.
    NotFound,
    Resolved { record: LessonRecord },
    /// The catalog holds several lessons for the same combination.
    Ambiguous { ids: Vec<i64> },
}

impl Resolution {
    pub fn record(&self) -> Option<&LessonRecord> {
        match self {
            Resolution::Resolved { record } => Some(record),
            _ => None,
        }
    }
}

impl Catalog {
    pub fn new(records: Vec<LessonRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[LessonRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct values offered at `level` given the current selection.
    ///
    /// Empty until every parent level is chosen. Sessions are ordered by their
    /// numeric value, every other level lexically.
    pub fn options(&self, level: CascadeLevel, selection: &SelectionState) -> Vec<String> {
        if !selection.parents_set(level) {
            return Vec::new();
        }

        let distinct: BTreeSet<&str> = self
            .records
            .iter()
            .filter(|r| matches_parents(r, level, selection))
            .map(|r| r.value_at(level))
            .collect();

        let mut values: Vec<String> = distinct.into_iter().map(str::to_string).collect();
        if level == CascadeLevel::Session {
            values.sort_by(|a, b| compare_sessions(a, b));
        }
        values
    }

    pub fn cascade(&self, selection: &SelectionState) -> CascadeOptions {
        CascadeOptions {
            subjects: self.options(CascadeLevel::Subject, selection),
            levels: self.options(CascadeLevel::Level, selection),
            periods: self.options(CascadeLevel::Period, selection),
            weeks: self.options(CascadeLevel::Week, selection),
            sessions: self.options(CascadeLevel::Session, selection),
        }
    }

    /// Find the single lesson matching all five selections.
    pub fn resolve(&self, selection: &SelectionState) -> Resolution {
        if !selection.is_complete() {
            return Resolution::Incomplete;
        }

        let matches: Vec<&LessonRecord> = self
            .records
            .iter()
            .filter(|r| {
                CascadeLevel::ALL
                    .iter()
                    .all(|l| selection.get(*l) == Some(r.value_at(*l)))
            })
            .collect();

        match matches.as_slice() {
            [] => Resolution::NotFound,
            [record] => Resolution::Resolved {
                record: (*record).clone(),
            },
            many => Resolution::Ambiguous {
                ids: many.iter().map(|r| r.id).collect(),
            },
        }
    }

    pub fn find(&self, id: i64) -> Option<&LessonRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

fn matches_parents(record: &LessonRecord, level: CascadeLevel, selection: &SelectionState) -> bool {
    level
        .parents()
        .iter()
        .all(|p| selection.get(*p) == Some(record.value_at(*p)))
}

/// Numeric labels first in ascending order, anything unparsable after them.
fn compare_sessions(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(id: i64, subject: &str, level: &str, period: &str, week: &str, session: &str) -> LessonRecord {
        LessonRecord {
            id,
            title: format!("Lesson {}", id),
            subject: subject.into(),
            level: level.into(),
            period: period.into(),
            week: week.into(),
            session: session.into(),
        }
    }

    fn select_all(values: &[(CascadeLevel, &str)]) -> SelectionState {
        let mut sel = SelectionState::default();
        for (level, value) in values {
            assert!(sel.select(*level, Some(value.to_string())));
        }
        sel
    }

    #[test]
    fn test_subjects_distinct_and_sorted() {
        let catalog = Catalog::new(vec![
            lesson(1, "Physique", "6", "P1", "S1", "1"),
            lesson(2, "Math", "6", "P1", "S1", "1"),
            lesson(3, "Math", "5", "P1", "S1", "2"),
            lesson(4, "Arabe", "6", "P2", "S1", "1"),
        ]);
        let options = catalog.cascade(&SelectionState::default());
        assert_eq!(options.subjects, vec!["Arabe", "Math", "Physique"]);
        assert!(options.levels.is_empty());
        assert!(options.sessions.is_empty());
    }

    #[test]
    fn test_levels_narrow_by_subject() {
        let catalog = Catalog::new(vec![
            lesson(1, "Math", "6", "P1", "S1", "1"),
            lesson(2, "Math", "5", "P1", "S1", "1"),
            lesson(3, "Physique", "4", "P1", "S1", "1"),
        ]);
        let sel = select_all(&[(CascadeLevel::Subject, "Math")]);
        assert_eq!(catalog.options(CascadeLevel::Level, &sel), vec!["5", "6"]);
        assert!(catalog.options(CascadeLevel::Period, &sel).is_empty());
    }

    #[test]
    fn test_sessions_sort_numerically() {
        let catalog = Catalog::new(vec![
            lesson(1, "Math", "6", "P1", "S1", "2"),
            lesson(2, "Math", "6", "P1", "S1", "10"),
            lesson(3, "Math", "6", "P1", "S1", "1"),
        ]);
        let sel = select_all(&[
            (CascadeLevel::Subject, "Math"),
            (CascadeLevel::Level, "6"),
            (CascadeLevel::Period, "P1"),
            (CascadeLevel::Week, "S1"),
        ]);
        assert_eq!(catalog.options(CascadeLevel::Session, &sel), vec!["1", "2", "10"]);
    }

    #[test]
    fn test_unparsable_sessions_sort_last() {
        assert_eq!(compare_sessions("3", "bilan"), Ordering::Less);
        assert_eq!(compare_sessions("bilan", "12"), Ordering::Greater);
        assert_eq!(compare_sessions("a", "b"), Ordering::Less);
        assert_eq!(compare_sessions(" 4", "10"), Ordering::Less);
    }

    #[test]
    fn test_resolve_single_record() {
        let catalog = Catalog::new(vec![lesson(1, "Math", "6", "P1", "S1", "1")]);
        let mut sel = SelectionState::default();
        for (level, value) in CascadeLevel::ALL.iter().zip(["Math", "6", "P1", "S1"]) {
            sel.select(*level, Some(value.into()));
            assert_eq!(catalog.resolve(&sel), Resolution::Incomplete);
        }
        sel.select(CascadeLevel::Session, Some("1".into()));
        let resolution = catalog.resolve(&sel);
        assert_eq!(resolution.record().map(|r| r.id), Some(1));
    }

    #[test]
    fn test_resolve_not_found() {
        let catalog = Catalog::new(vec![lesson(1, "Math", "6", "P1", "S1", "1")]);
        let sel = select_all(&[
            (CascadeLevel::Subject, "Math"),
            (CascadeLevel::Level, "6"),
            (CascadeLevel::Period, "P1"),
            (CascadeLevel::Week, "S1"),
            (CascadeLevel::Session, "9"),
        ]);
        assert_eq!(catalog.resolve(&sel), Resolution::NotFound);
    }

    #[test]
    fn test_duplicate_tuple_is_ambiguous() {
        let catalog = Catalog::new(vec![
            lesson(4, "Math", "6", "P1", "S1", "1"),
            lesson(9, "Math", "6", "P1", "S1", "1"),
        ]);
        let sel = select_all(&[
            (CascadeLevel::Subject, "Math"),
            (CascadeLevel::Level, "6"),
            (CascadeLevel::Period, "P1"),
            (CascadeLevel::Week, "S1"),
            (CascadeLevel::Session, "1"),
        ]);
        let resolution = catalog.resolve(&sel);
        assert_eq!(resolution, Resolution::Ambiguous { ids: vec![4, 9] });
        assert!(resolution.record().is_none());
    }

    #[test]
    fn test_empty_catalog_degrades_to_empty_lists() {
        let catalog = Catalog::default();
        assert_eq!(catalog.cascade(&SelectionState::default()), CascadeOptions::default());
        assert!(catalog.is_empty());
    }
}
