//! Mapping between service records and typed entities.
//!
//! Reads are strict about required fields (a missing student name or lesson
//! date/duration/student link is an `Error::Mapping`) and lenient about money:
//! an amount that cannot be read as a number is treated as absent. Writes never
//! include the read-only lesson reference.

use crate::{
    entities::{Lesson, LessonDraft, Student, StudentDraft},
    errors::{Error, Result},
    store::{Fields, Record},
};
use chrono::{DateTime, NaiveDate};
use serde_json::{Value, json};
use tracing::warn;

/// Field names in the students table
pub mod student_field {
    /// Full name (primary field)
    pub const NAME: &str = "Name";
    /// Contact email
    pub const EMAIL: &str = "Email";
    /// Contact phone
    pub const PHONE: &str = "Phone";
    /// School grade
    pub const GRADE: &str = "Grade";
    /// Guardian name
    pub const GUARDIAN_NAME: &str = "Guardian Name";
    /// Guardian phone
    pub const GUARDIAN_PHONE: &str = "Guardian Phone";
}

/// Field names in the lessons table
pub mod lesson_field {
    /// Link to the owning student (list of record ids)
    pub const STUDENT: &str = "Student";
    /// Lesson date
    pub const DATE: &str = "Date";
    /// Duration in minutes
    pub const DURATION: &str = "Duration";
    /// Subject
    pub const SUBJECT: &str = "Subject";
    /// Notes
    pub const NOTES: &str = "Notes";
    /// Amount charged
    pub const AMOUNT_DUE: &str = "Amount Due";
    /// Amount received
    pub const AMOUNT_PAID: &str = "Amount Paid";
    /// Legacy paid checkbox
    pub const IS_PAID: &str = "Is Paid";
    /// Computed display code, read-only
    pub const REFERENCE: &str = "Reference";
}

const DATE_FORMAT: &str = "%Y-%m-%d";

fn mapping_error(record: &Record, field: &str, reason: &str) -> Error {
    Error::Mapping {
        record_id: record.id.clone(),
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn optional_text(record: &Record, field: &str) -> Option<String> {
    match record.field(field)? {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn required_text(record: &Record, field: &str) -> Result<String> {
    optional_text(record, field).ok_or_else(|| mapping_error(record, field, "is missing"))
}

/// Reads a number or numeric string. Anything else is `None`.
fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

fn optional_amount(record: &Record, field: &str) -> Option<f64> {
    let value = record.field(field)?;
    if let Value::String(text) = value {
        if text.trim().is_empty() {
            return None;
        }
    }
    let amount = number_value(value);
    if amount.is_none() {
        warn!(record_id = %record.id, field, %value, "Ignoring non-numeric amount");
    }
    amount
}

fn required_duration(record: &Record) -> Result<u32> {
    let field = lesson_field::DURATION;
    let value = record
        .field(field)
        .ok_or_else(|| mapping_error(record, field, "is missing"))?;
    let minutes = number_value(value)
        .ok_or_else(|| mapping_error(record, field, "is not a number"))?;

    if minutes < 1.0 || minutes.fract() != 0.0 || minutes > f64::from(u32::MAX) {
        return Err(mapping_error(record, field, "must be a positive whole number of minutes"));
    }
    // Cast safety: checked above to be a whole number within u32 range
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Ok(minutes as u32)
}

/// Parses `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

fn required_date(record: &Record) -> Result<NaiveDate> {
    let field = lesson_field::DATE;
    let text = required_text(record, field)?;
    parse_date(&text).ok_or_else(|| mapping_error(record, field, "is not a valid date"))
}

/// The link field holds a list of record ids; the first is the owner.
fn required_student_link(record: &Record) -> Result<String> {
    let field = lesson_field::STUDENT;
    let id = match record.field(field) {
        Some(Value::Array(ids)) => ids.iter().find_map(Value::as_str).map(str::to_string),
        Some(Value::String(id)) if !id.trim().is_empty() => Some(id.clone()),
        _ => None,
    };
    id.ok_or_else(|| mapping_error(record, field, "is missing"))
}

fn flag(record: &Record, field: &str) -> bool {
    match record.field(field) {
        Some(Value::Bool(value)) => *value,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}

/// Maps a students-table record to a `Student` with no lessons attached.
pub fn student_from_record(record: &Record) -> Result<Student> {
    Ok(Student {
        id: record.id.clone(),
        name: required_text(record, student_field::NAME)?,
        email: optional_text(record, student_field::EMAIL),
        phone: optional_text(record, student_field::PHONE),
        grade: optional_text(record, student_field::GRADE),
        guardian_name: optional_text(record, student_field::GUARDIAN_NAME),
        guardian_phone: optional_text(record, student_field::GUARDIAN_PHONE),
        lessons: Vec::new(),
    })
}

/// Maps a lessons-table record to a `Lesson`.
pub fn lesson_from_record(record: &Record) -> Result<Lesson> {
    Ok(Lesson {
        id: record.id.clone(),
        student_id: required_student_link(record)?,
        date: required_date(record)?,
        duration_minutes: required_duration(record)?,
        subject: optional_text(record, lesson_field::SUBJECT),
        notes: optional_text(record, lesson_field::NOTES),
        amount_due: optional_amount(record, lesson_field::AMOUNT_DUE),
        amount_paid: optional_amount(record, lesson_field::AMOUNT_PAID),
        is_paid: flag(record, lesson_field::IS_PAID),
        reference: optional_text(record, lesson_field::REFERENCE),
    })
}

fn text_or_null(value: Option<&String>) -> Value {
    value
        .filter(|text| !text.trim().is_empty())
        .map_or(Value::Null, |text| Value::String(text.clone()))
}

fn amount_or_null(value: Option<f64>) -> Value {
    value.map_or(Value::Null, |amount| json!(amount))
}

/// Fields written when creating or updating a student.
#[must_use]
pub fn student_fields(draft: &StudentDraft) -> Fields {
    let mut fields = Fields::new();
    fields.insert(student_field::NAME.to_string(), json!(draft.name.trim()));
    fields.insert(student_field::EMAIL.to_string(), text_or_null(draft.email.as_ref()));
    fields.insert(student_field::PHONE.to_string(), text_or_null(draft.phone.as_ref()));
    fields.insert(student_field::GRADE.to_string(), text_or_null(draft.grade.as_ref()));
    fields.insert(
        student_field::GUARDIAN_NAME.to_string(),
        text_or_null(draft.guardian_name.as_ref()),
    );
    fields.insert(
        student_field::GUARDIAN_PHONE.to_string(),
        text_or_null(draft.guardian_phone.as_ref()),
    );
    fields
}

/// Fields written when creating or updating a lesson. The reference is never included.
#[must_use]
pub fn lesson_fields(draft: &LessonDraft) -> Fields {
    let mut fields = Fields::new();
    fields.insert(lesson_field::STUDENT.to_string(), json!([draft.student_id]));
    fields.insert(
        lesson_field::DATE.to_string(),
        json!(draft.date.format(DATE_FORMAT).to_string()),
    );
    fields.insert(lesson_field::DURATION.to_string(), json!(draft.duration_minutes));
    fields.insert(lesson_field::SUBJECT.to_string(), text_or_null(draft.subject.as_ref()));
    fields.insert(lesson_field::NOTES.to_string(), text_or_null(draft.notes.as_ref()));
    fields.insert(lesson_field::AMOUNT_DUE.to_string(), amount_or_null(draft.amount_due));
    fields.insert(lesson_field::AMOUNT_PAID.to_string(), amount_or_null(draft.amount_paid));
    fields.insert(lesson_field::IS_PAID.to_string(), json!(draft.is_paid));
    fields
}
