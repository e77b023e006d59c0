//! Shared test utilities for `TutorTracker`.
//!
//! This module provides common helper functions for setting up an in-memory
//! store and creating test students and lessons with sensible defaults.

use crate::{
    config::TableNames,
    core::{lessons, students},
    entities::{Lesson, LessonDraft, Student, StudentDraft},
    errors::Result,
    store::MemoryStore,
};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

/// Installs a tracing subscriber that writes through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory store with the default tables.
/// This is the standard setup for all repository tests.
#[must_use]
pub fn setup_test_store() -> (MemoryStore, TableNames) {
    init_test_tracing();
    let tables = TableNames::default();
    let store = MemoryStore::with_tables(&[tables.students.as_str(), tables.lessons.as_str()]);
    (store, tables)
}

/// Fixed date used by test lessons.
#[must_use]
pub fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap_or_default()
}

/// An unsaved student with only a name.
#[must_use]
pub fn test_student(name: &str) -> Student {
    Student {
        id: format!("rec{}", name.replace(' ', "")),
        name: name.to_string(),
        ..Default::default()
    }
}

/// An unsaved one-hour lesson with no amounts.
#[must_use]
pub fn test_lesson(student_id: &str) -> Lesson {
    Lesson {
        id: "recLessonTest".to_string(),
        student_id: student_id.to_string(),
        date: test_date(),
        duration_minutes: 60,
        ..Default::default()
    }
}

/// A one-hour lesson draft on the test date with no amounts.
#[must_use]
pub fn test_lesson_draft(student_id: &str) -> LessonDraft {
    LessonDraft::new(student_id, test_date())
}

/// Creates a student with just a name.
pub async fn create_test_student(store: &MemoryStore, tables: &TableNames, name: &str) -> Result<Student> {
    students::create_student(store, tables, &StudentDraft::named(name)).await
}

/// Creates a one-hour lesson with the given amounts.
pub async fn create_test_lesson(
    store: &MemoryStore,
    tables: &TableNames,
    student_id: &str,
    amount_due: Option<f64>,
    amount_paid: Option<f64>,
) -> Result<Lesson> {
    let draft = LessonDraft {
        amount_due,
        amount_paid,
        ..test_lesson_draft(student_id)
    };
    lessons::create_lesson(store, tables, &draft).await
}
