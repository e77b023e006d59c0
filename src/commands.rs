//! Argument handling for the add and edit commands.
//!
//! Write commands take their fields as `key=value` pairs, e.g.
//! `subject=Mathematics due=300`. An empty value (`email=`) clears an optional
//! field. Keys are matched case-insensitively. The resulting drafts are
//! validated by the repository functions, not here.

use crate::{
    entities::{LessonDraft, StudentDraft},
    errors::{Error, Result},
};
use chrono::NaiveDate;

/// Keys accepted by `add-student` and `edit-student`
pub const STUDENT_KEYS: &[&str] = &["name", "email", "phone", "grade", "guardian", "guardian-phone"];

/// Keys accepted by `add-lesson` and `edit-lesson`
pub const LESSON_KEYS: &[&str] = &[
    "student", "date", "duration", "subject", "notes", "due", "paid", "is-paid",
];

fn split_pair(arg: &str) -> Result<(String, &str)> {
    let Some((key, value)) = arg.split_once('=') else {
        return Err(Error::Validation {
            message: format!("Expected key=value, got '{arg}'"),
        });
    };
    Ok((key.trim().to_lowercase(), value))
}

fn unknown_key(key: &str, allowed: &[&str]) -> Error {
    Error::Validation {
        message: format!("Unknown field '{key}'. Use one of: {}", allowed.join(", ")),
    }
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn amount(key: &str, value: &str) -> Result<Option<f64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse::<f64>().map(Some).map_err(|_| Error::Validation {
        message: format!("'{key}' must be a number (got '{value}')"),
    })
}

fn flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" | "" => Ok(false),
        other => Err(Error::Validation {
            message: format!("'{key}' must be yes or no (got '{other}')"),
        }),
    }
}

/// Parses a calendar date written as `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| Error::Validation {
        message: format!("Dates must look like 2025-03-14 (got '{value}')"),
    })
}

/// Applies `key=value` arguments to a student draft.
pub fn apply_student_args(draft: &mut StudentDraft, args: &[String]) -> Result<()> {
    for arg in args {
        let (key, value) = split_pair(arg)?;
        match key.as_str() {
            "name" => draft.name = value.trim().to_string(),
            "email" => draft.email = optional_text(value),
            "phone" => draft.phone = optional_text(value),
            "grade" => draft.grade = optional_text(value),
            "guardian" => draft.guardian_name = optional_text(value),
            "guardian-phone" => draft.guardian_phone = optional_text(value),
            other => return Err(unknown_key(other, STUDENT_KEYS)),
        }
    }
    Ok(())
}

/// Applies `key=value` arguments to a lesson draft.
pub fn apply_lesson_args(draft: &mut LessonDraft, args: &[String]) -> Result<()> {
    for arg in args {
        let (key, value) = split_pair(arg)?;
        match key.as_str() {
            "student" => draft.student_id = value.trim().to_string(),
            "date" => draft.date = parse_date(value)?,
            "duration" => {
                draft.duration_minutes = value.trim().parse().map_err(|_| Error::Validation {
                    message: format!("'duration' must be a whole number of minutes (got '{value}')"),
                })?;
            }
            "subject" => draft.subject = optional_text(value),
            "notes" => draft.notes = optional_text(value),
            "due" => draft.amount_due = amount(&key, value)?,
            "paid" => draft.amount_paid = amount(&key, value)?,
            "is-paid" => draft.is_paid = flag(&key, value)?,
            other => return Err(unknown_key(other, LESSON_KEYS)),
        }
    }
    Ok(())
}
