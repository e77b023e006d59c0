//! Student business logic - Handles all student-related operations.
//!
//! Students are read together with their lessons: the lessons table is listed
//! once and each lesson is attached to the student it links to. Creating or
//! updating a student never touches the lessons table.

use crate::{
    config::TableNames,
    core::lessons,
    entities::{Lesson, Student, StudentDraft},
    errors::Result,
    mapper::{self, student_field},
    store::{ListQuery, RecordStore},
};
use std::collections::HashMap;
use tracing::info;

/// Retrieves all students ordered by name, without loading their lessons.
pub async fn get_all_students_without_lessons<S: RecordStore>(
    store: &S,
    tables: &TableNames,
) -> Result<Vec<Student>> {
    store
        .list(&tables.students, &ListQuery::default().sort_asc(student_field::NAME))
        .await?
        .iter()
        .map(mapper::student_from_record)
        .collect()
}

/// Retrieves all students ordered by name, each with their lessons attached (newest first).
pub async fn get_all_students<S: RecordStore>(store: &S, tables: &TableNames) -> Result<Vec<Student>> {
    let mut students = get_all_students_without_lessons(store, tables).await?;

    let mut by_student: HashMap<String, Vec<Lesson>> = HashMap::new();
    for lesson in lessons::get_all_lessons(store, tables).await? {
        by_student.entry(lesson.student_id.clone()).or_default().push(lesson);
    }
    for student in &mut students {
        student.lessons = by_student.remove(&student.id).unwrap_or_default();
    }

    tracing::debug!(count = students.len(), "Fetched students with lessons");
    Ok(students)
}

/// Finds a student by record id and attaches their lessons.
pub async fn get_student_by_id<S: RecordStore>(store: &S, tables: &TableNames, student_id: &str) -> Result<Student> {
    let record = store.get(&tables.students, student_id).await?;
    let mut student = mapper::student_from_record(&record)?;
    student.lessons = lessons::get_lessons_for_student(store, tables, student_id).await?;
    Ok(student)
}

/// Creates a new student after validating the draft.
pub async fn create_student<S: RecordStore>(store: &S, tables: &TableNames, draft: &StudentDraft) -> Result<Student> {
    draft.validate()?;
    let record = store
        .create(&tables.students, mapper::student_fields(draft))
        .await?;
    let student = mapper::student_from_record(&record)?;
    info!(student_id = %student.id, "Created student");
    Ok(student)
}

/// Replaces a student's writable fields with those in `draft`.
///
/// The returned student has no lessons attached; refetch with
/// [`get_student_by_id`] to see them.
pub async fn update_student<S: RecordStore>(
    store: &S,
    tables: &TableNames,
    student_id: &str,
    draft: &StudentDraft,
) -> Result<Student> {
    draft.validate()?;
    let record = store
        .update(&tables.students, student_id, mapper::student_fields(draft))
        .await?;
    info!(student_id, "Updated student");
    mapper::student_from_record(&record)
}

/// Deletes a student. Their lessons are left in place; the service decides
/// what happens to the dangling links.
pub async fn delete_student<S: RecordStore>(store: &S, tables: &TableNames, student_id: &str) -> Result<()> {
    store.delete(&tables.students, student_id).await?;
    info!(student_id, "Deleted student");
    Ok(())
}
