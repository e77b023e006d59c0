//! Lesson business logic - Handles all lesson-related operations.
//!
//! Provides functions for listing, creating, updating and deleting lessons in the
//! tabular-data service. Lists are returned newest first.

use crate::{
    config::TableNames,
    entities::{Lesson, LessonDraft, LessonListing},
    errors::Result,
    mapper::{self, lesson_field},
    store::{ListQuery, RecordStore},
};
use std::collections::HashMap;
use tracing::info;

fn newest_first() -> ListQuery {
    ListQuery::default().sort_desc(lesson_field::DATE)
}

/// Retrieves every lesson, newest first.
pub async fn get_all_lessons<S: RecordStore>(store: &S, tables: &TableNames) -> Result<Vec<Lesson>> {
    store
        .list(&tables.lessons, &newest_first())
        .await?
        .iter()
        .map(mapper::lesson_from_record)
        .collect()
}

/// Retrieves the lessons belonging to one student, newest first.
///
/// The service has no filter on link ids, so the full table is listed and
/// filtered here.
pub async fn get_lessons_for_student<S: RecordStore>(
    store: &S,
    tables: &TableNames,
    student_id: &str,
) -> Result<Vec<Lesson>> {
    let lessons = get_all_lessons(store, tables).await?;
    Ok(lessons
        .into_iter()
        .filter(|lesson| lesson.student_id == student_id)
        .collect())
}

/// Finds a lesson by its record id.
pub async fn get_lesson_by_id<S: RecordStore>(store: &S, tables: &TableNames, lesson_id: &str) -> Result<Lesson> {
    let record = store.get(&tables.lessons, lesson_id).await?;
    mapper::lesson_from_record(&record)
}

/// Retrieves every lesson joined with its student's name, newest first.
pub async fn get_lessons_with_students<S: RecordStore>(
    store: &S,
    tables: &TableNames,
) -> Result<Vec<LessonListing>> {
    let lessons = get_all_lessons(store, tables).await?;
    let names: HashMap<String, String> = crate::core::students::get_all_students_without_lessons(store, tables)
        .await?
        .into_iter()
        .map(|student| (student.id, student.name))
        .collect();

    Ok(lessons
        .into_iter()
        .map(|lesson| {
            let student_name = names.get(&lesson.student_id).cloned();
            LessonListing { lesson, student_name }
        })
        .collect())
}

/// Returns the `limit` most recent lessons with student names, for the dashboard.
pub async fn get_recent_lessons<S: RecordStore>(
    store: &S,
    tables: &TableNames,
    limit: usize,
) -> Result<Vec<LessonListing>> {
    let mut listings = get_lessons_with_students(store, tables).await?;
    listings.truncate(limit);
    Ok(listings)
}

/// Creates a new lesson after validating the draft.
pub async fn create_lesson<S: RecordStore>(store: &S, tables: &TableNames, draft: &LessonDraft) -> Result<Lesson> {
    draft.validate()?;
    let record = store.create(&tables.lessons, mapper::lesson_fields(draft)).await?;
    let lesson = mapper::lesson_from_record(&record)?;
    info!(lesson_id = %lesson.id, student_id = %lesson.student_id, "Created lesson");
    Ok(lesson)
}

/// Replaces a lesson's writable fields with those in `draft`.
pub async fn update_lesson<S: RecordStore>(
    store: &S,
    tables: &TableNames,
    lesson_id: &str,
    draft: &LessonDraft,
) -> Result<Lesson> {
    draft.validate()?;
    let record = store
        .update(&tables.lessons, lesson_id, mapper::lesson_fields(draft))
        .await?;
    info!(lesson_id, "Updated lesson");
    mapper::lesson_from_record(&record)
}

/// Deletes a lesson.
pub async fn delete_lesson<S: RecordStore>(store: &S, tables: &TableNames, lesson_id: &str) -> Result<()> {
    store.delete(&tables.lessons, lesson_id).await?;
    info!(lesson_id, "Deleted lesson");
    Ok(())
}
