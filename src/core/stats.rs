//! Aggregate statistics for the dashboard and per-student summaries.
//!
//! The calculators are pure; `fetch_dashboard_stats` is the one entry point that
//! talks to the store, loading both tables and handing them to `calculate_stats`.

use crate::{
    config::TableNames,
    core::{lessons, students},
    entities::{Lesson, Student},
    errors::Result,
    store::RecordStore,
};

/// Totals shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DashboardStats {
    /// Number of students
    pub total_students: usize,
    /// Number of lessons across all students
    pub total_lessons: usize,
    /// Lessons classified `Unpaid` or legacy-unpaid
    pub unpaid_lessons: usize,
    /// Sum of every lesson's amount paid
    pub total_revenue: f64,
}

/// Money totals for one student, as shown on the student list and detail views.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StudentSummary {
    /// Number of lessons for the student
    pub total_lessons: usize,
    /// `Σ(amount_due - amount_paid)`; negative when the student has overpaid
    pub outstanding_balance: f64,
    /// Sum of amounts paid
    pub total_revenue: f64,
}

fn amount(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

// Summing from +0.0 keeps empty totals from coming out as -0.0.
fn total(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0, |acc, value| acc + value)
}

/// Computes dashboard totals. Empty inputs give all zeros.
#[must_use]
pub fn calculate_stats(students: &[Student], lessons: &[Lesson]) -> DashboardStats {
    DashboardStats {
        total_students: students.len(),
        total_lessons: lessons.len(),
        unpaid_lessons: lessons
            .iter()
            .filter(|lesson| lesson.payment().status.is_unpaid())
            .count(),
        total_revenue: total(lessons.iter().map(|lesson| amount(lesson.amount_paid))),
    }
}

/// Computes the balance and revenue for a student's attached lessons.
#[must_use]
pub fn summarize_student(student: &Student) -> StudentSummary {
    let lessons = &student.lessons;
    StudentSummary {
        total_lessons: lessons.len(),
        outstanding_balance: total(
            lessons
                .iter()
                .map(|lesson| amount(lesson.amount_due) - amount(lesson.amount_paid)),
        ),
        total_revenue: total(lessons.iter().map(|lesson| amount(lesson.amount_paid))),
    }
}

/// Loads every student and lesson and computes the dashboard totals.
///
/// # Arguments
/// * `store` - Tabular-data service
/// * `tables` - Table names to read from
pub async fn fetch_dashboard_stats<S: RecordStore>(store: &S, tables: &TableNames) -> Result<DashboardStats> {
    let students = students::get_all_students_without_lessons(store, tables).await?;
    let lessons = lessons::get_all_lessons(store, tables).await?;
    let stats = calculate_stats(&students, &lessons);
    tracing::debug!(?stats, "Computed dashboard stats");
    Ok(stats)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::{core::payment::format_amount, test_utils::*};

    fn lesson(amount_due: Option<f64>, amount_paid: Option<f64>, is_paid: bool) -> Lesson {
        Lesson {
            amount_due,
            amount_paid,
            is_paid,
            ..test_lesson("recStudent1")
        }
    }

    #[test]
    fn test_empty_collections_give_zero_totals() {
        let stats = calculate_stats(&[], &[]);
        assert_eq!(stats, DashboardStats::default());
        assert!(stats.total_revenue.is_sign_positive());
        assert_eq!(format_amount("R", stats.total_revenue), "R0.00");

        let summary = summarize_student(&test_student("Ayesha"));
        assert!(summary.outstanding_balance.is_sign_positive());
        assert_eq!(format_amount("R", summary.outstanding_balance), "R0.00");
        assert_eq!(format_amount("R", summary.total_revenue), "R0.00");
    }

    #[test]
    fn test_total_revenue_treats_missing_as_zero() {
        let lessons = vec![
            lesson(None, Some(10.0), false),
            lesson(None, None, false),
            lesson(None, Some(5.50), false),
        ];
        let stats = calculate_stats(&[], &lessons);
        assert_eq!(stats.total_revenue, 15.50);
    }

    #[test]
    fn test_unpaid_count_includes_legacy_unpaid_only() {
        let students = vec![test_student("Ayesha"), test_student("Johan")];
        let lessons = vec![
            lesson(Some(100.0), Some(0.0), false), // unpaid
            lesson(Some(100.0), Some(40.0), false), // outstanding
            lesson(Some(100.0), Some(100.0), false), // paid
            lesson(None, None, false),              // legacy unpaid
            lesson(None, None, true),               // legacy paid
        ];

        let stats = calculate_stats(&students, &lessons);

        assert_eq!(stats.total_students, 2);
        assert_eq!(stats.total_lessons, 5);
        assert_eq!(stats.unpaid_lessons, 2);
        assert_eq!(stats.total_revenue, 140.0);
    }

    #[test]
    fn test_summarize_student() {
        let mut student = test_student("Ayesha");
        student.lessons = vec![
            lesson(Some(200.0), Some(50.0), false),
            lesson(Some(100.0), None, false),
            lesson(None, Some(20.0), true),
        ];

        let summary = summarize_student(&student);

        assert_eq!(summary.total_lessons, 3);
        assert_eq!(summary.outstanding_balance, 230.0);
        assert_eq!(summary.total_revenue, 70.0);
    }

    #[test]
    fn test_summarize_student_overpaid_goes_negative() {
        let mut student = test_student("Johan");
        student.lessons = vec![lesson(Some(50.0), Some(60.0), false)];

        assert_eq!(summarize_student(&student).outstanding_balance, -10.0);
    }

    #[tokio::test]
    async fn test_fetch_dashboard_stats() -> Result<()> {
        let (store, tables) = setup_test_store();
        let student = create_test_student(&store, &tables, "Ayesha").await?;
        create_test_lesson(&store, &tables, &student.id, Some(100.0), Some(25.0)).await?;
        create_test_lesson(&store, &tables, &student.id, Some(80.0), None).await?;

        let stats = fetch_dashboard_stats(&store, &tables).await?;

        assert_eq!(stats.total_students, 1);
        assert_eq!(stats.total_lessons, 2);
        assert_eq!(stats.unpaid_lessons, 1);
        assert_eq!(stats.total_revenue, 25.0);
        Ok(())
    }
}
