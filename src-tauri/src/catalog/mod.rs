//! Lesson catalog and the cascading dropdown derivation.
//!
//! The catalog is a flat list of lessons. Each dropdown (subject, level,
//! period, week, session) offers the distinct values left after filtering by
//! every dropdown above it; once all five are chosen the selection resolves to
//! a single lesson.
//!
//! # Example
//!
//! ```ignore
//! use lessonkit_tauri::catalog::{Catalog, CascadeLevel, SelectionState};
//!
//! let catalog = Catalog::new(records);
//! let mut selection = SelectionState::default();
//! selection.select(CascadeLevel::Subject, Some("Math".into()));
//!
//! let options = catalog.cascade(&selection);
//! println!("levels for Math: {:?}", options.levels);
//! ```

mod engine;
mod selection;
mod types;

pub use engine::{CascadeOptions, Catalog, Resolution};
pub use selection::SelectionState;
pub use types::{CascadeLevel, LessonRecord};
