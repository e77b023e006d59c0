//! Lesson entity - A single tutoring session and what was charged for it.
//!
//! Each lesson references its student by id, carries the date and duration,
//! and optionally the amount due and amount paid. The legacy `is_paid` flag is
//! only consulted when no amount due has been recorded.

use crate::{
    core::payment::{self, PaymentSummary},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Lesson as read from the `Lessons` table
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Record id assigned by the tabular-data service
    pub id: String,
    /// Record id of the owning student
    pub student_id: String,
    /// Calendar date the lesson took place
    pub date: NaiveDate,
    /// Length of the lesson in minutes, always positive
    pub duration_minutes: u32,
    /// Subject covered (e.g. "Maths")
    pub subject: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Amount charged for the lesson
    pub amount_due: Option<f64>,
    /// Amount received so far; may exceed `amount_due`
    pub amount_paid: Option<f64>,
    /// Legacy paid flag from before amounts were tracked
    pub is_paid: bool,
    /// Short display code computed by the service; read-only
    pub reference: Option<String>,
}

impl Lesson {
    /// Classifies this lesson's payment state.
    #[must_use]
    pub fn payment(&self) -> PaymentSummary {
        payment::assess_payment(self.amount_due, self.amount_paid, self.is_paid)
    }
}

/// Writable fields of a lesson. There is deliberately no `reference` field:
/// the service computes it and rejects writes to it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LessonDraft {
    /// Record id of the owning student
    pub student_id: String,
    /// Calendar date the lesson took place
    pub date: NaiveDate,
    /// Length of the lesson in minutes
    pub duration_minutes: u32,
    /// Subject covered
    pub subject: Option<String>,
    /// Free-form notes
    pub notes: Option<String>,
    /// Amount charged
    pub amount_due: Option<f64>,
    /// Amount received
    pub amount_paid: Option<f64>,
    /// Legacy paid flag
    pub is_paid: bool,
}

/// Default lesson length offered for new lessons
pub const DEFAULT_DURATION_MINUTES: u32 = 60;

impl LessonDraft {
    /// Creates a draft for a lesson of the default length with no amounts set.
    #[must_use]
    pub fn new(student_id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            student_id: student_id.into(),
            date,
            duration_minutes: DEFAULT_DURATION_MINUTES,
            subject: None,
            notes: None,
            amount_due: None,
            amount_paid: None,
            is_paid: false,
        }
    }

    /// Checks required fields and amount bounds.
    ///
    /// Overpayment (`amount_paid > amount_due`) is accepted.
    pub fn validate(&self) -> Result<()> {
        if self.student_id.trim().is_empty() {
            return Err(Error::Validation {
                message: "A lesson must belong to a student".to_string(),
            });
        }
        if self.duration_minutes == 0 {
            return Err(Error::Validation {
                message: "Lesson duration must be at least one minute".to_string(),
            });
        }
        for amount in [self.amount_due, self.amount_paid].into_iter().flatten() {
            if !amount.is_finite() || amount < 0.0 {
                return Err(Error::InvalidAmount { amount });
            }
        }
        Ok(())
    }
}

impl From<&Lesson> for LessonDraft {
    fn from(lesson: &Lesson) -> Self {
        Self {
            student_id: lesson.student_id.clone(),
            date: lesson.date,
            duration_minutes: lesson.duration_minutes,
            subject: lesson.subject.clone(),
            notes: lesson.notes.clone(),
            amount_due: lesson.amount_due,
            amount_paid: lesson.amount_paid,
            is_paid: lesson.is_paid,
        }
    }
}

/// A lesson together with its owner's name, for lists that span all students
#[derive(Clone, Debug, PartialEq)]
pub struct LessonListing {
    /// The lesson itself
    pub lesson: Lesson,
    /// Owning student's name, `None` when the student could not be found
    pub student_name: Option<String>,
}

impl LessonListing {
    /// Name to show for the owning student.
    #[must_use]
    pub fn display_student_name(&self) -> &str {
        self.student_name.as_deref().unwrap_or("Unknown Student")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap_or_default()
    }

    #[test]
    fn test_new_draft_uses_default_duration() {
        let draft = LessonDraft::new("recStudent1", date());
        assert_eq!(draft.duration_minutes, 60);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_student() {
        let draft = LessonDraft::new("", date());
        assert!(matches!(draft.validate(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let mut draft = LessonDraft::new("recStudent1", date());
        draft.duration_minutes = 0;
        assert!(matches!(draft.validate(), Err(Error::Validation { .. })));
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut draft = LessonDraft::new("recStudent1", date());
        draft.amount_paid = Some(-5.0);
        assert!(matches!(draft.validate(), Err(Error::InvalidAmount { .. })));
    }

    #[test]
    fn test_validate_accepts_overpayment() {
        let mut draft = LessonDraft::new("recStudent1", date());
        draft.amount_due = Some(50.0);
        draft.amount_paid = Some(60.0);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_draft_from_lesson_keeps_amounts() {
        let lesson = Lesson {
            id: "recLesson1".to_string(),
            student_id: "recStudent1".to_string(),
            date: date(),
            duration_minutes: 90,
            amount_due: Some(300.0),
            amount_paid: Some(150.0),
            reference: Some("L-0042".to_string()),
            ..Default::default()
        };
        let draft = LessonDraft::from(&lesson);
        assert_eq!(draft.duration_minutes, 90);
        assert_eq!(draft.amount_due, Some(300.0));
        assert_eq!(draft.amount_paid, Some(150.0));
    }

    #[test]
    fn test_listing_falls_back_to_unknown_student() {
        let listing = LessonListing {
            lesson: Lesson::default(),
            student_name: None,
        };
        assert_eq!(listing.display_student_name(), "Unknown Student");
    }
}
