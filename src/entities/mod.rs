//! Entity module - Typed records for the two tables in the tabular-data service.
//! Each entity has a read model (with the service-assigned id) and a draft
//! carrying only the fields the client is allowed to write.

/// Lessons, their drafts and list rows
pub mod lesson;
/// Students and their drafts
pub mod student;

pub use lesson::{Lesson, LessonDraft, LessonListing};
pub use student::{Student, StudentDraft};
