//! Student entity - A person being tutored.
//!
//! Only the name is required. Lessons are attached at read time by the
//! repository and are never written back as part of the student record.

use super::lesson::Lesson;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Student as read from the `Students` table
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Record id assigned by the tabular-data service
    pub id: String,
    /// Full name of the student
    pub name: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// School grade, free text (e.g. "Grade 10")
    pub grade: Option<String>,
    /// Parent or guardian name
    pub guardian_name: Option<String>,
    /// Parent or guardian phone number
    pub guardian_phone: Option<String>,
    /// Lessons belonging to this student, newest first
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Writable fields of a student, used for both create and update
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    /// Full name of the student
    pub name: String,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone number
    pub phone: Option<String>,
    /// School grade
    pub grade: Option<String>,
    /// Parent or guardian name
    pub guardian_name: Option<String>,
    /// Parent or guardian phone number
    pub guardian_phone: Option<String>,
}

impl StudentDraft {
    /// Creates a draft holding just a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Checks that the name is present, returning a validation error otherwise.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation {
                message: "Student name cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl From<&Student> for StudentDraft {
    fn from(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            email: student.email.clone(),
            phone: student.phone.clone(),
            grade: student.grade.clone(),
            guardian_name: student.guardian_name.clone(),
            guardian_phone: student.guardian_phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_name() {
        let draft = StudentDraft::named("   ");
        assert!(matches!(draft.validate(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_validate_accepts_name_only() {
        assert!(StudentDraft::named("Thandi Mokoena").validate().is_ok());
    }

    #[test]
    fn test_draft_from_student_drops_lessons() {
        let student = Student {
            id: "recStudent1".to_string(),
            name: "Thandi Mokoena".to_string(),
            grade: Some("Grade 11".to_string()),
            lessons: vec![Lesson::default()],
            ..Default::default()
        };
        let draft = StudentDraft::from(&student);
        assert_eq!(draft.name, "Thandi Mokoena");
        assert_eq!(draft.grade.as_deref(), Some("Grade 11"));
    }
}
