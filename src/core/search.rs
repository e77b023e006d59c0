//! Search filtering for the student and lesson lists.

use crate::entities::{LessonListing, Student};

fn contains_term(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|value| value.to_lowercase().contains(needle))
}

/// Students whose name or email contains `term`, ignoring case.
/// A blank term matches everyone.
#[must_use]
pub fn filter_students<'a>(students: &'a [Student], term: &str) -> Vec<&'a Student> {
    let needle = term.trim().to_lowercase();
    students
        .iter()
        .filter(|student| {
            needle.is_empty()
                || contains_term(Some(&student.name), &needle)
                || contains_term(student.email.as_deref(), &needle)
        })
        .collect()
}

/// Lessons whose student name or subject contains `term`, ignoring case.
/// A blank term matches everything.
#[must_use]
pub fn filter_lessons<'a>(listings: &'a [LessonListing], term: &str) -> Vec<&'a LessonListing> {
    let needle = term.trim().to_lowercase();
    listings
        .iter()
        .filter(|listing| {
            needle.is_empty()
                || contains_term(Some(listing.display_student_name()), &needle)
                || contains_term(listing.lesson.subject.as_deref(), &needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_filter_students_by_name_or_email() {
        let mut ayesha = test_student("Ayesha Patel");
        ayesha.email = Some("ayesha@example.com".to_string());
        let mut johan = test_student("Johan Botha");
        johan.email = Some("jb@school.example".to_string());
        let students = vec![ayesha, johan];

        let by_name = filter_students(&students, "PATEL");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Ayesha Patel");

        let by_email = filter_students(&students, "school");
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "Johan Botha");

        assert_eq!(filter_students(&students, "  ").len(), 2);
        assert!(filter_students(&students, "nobody").is_empty());
    }

    #[test]
    fn test_filter_lessons_by_student_or_subject() {
        let mut maths = test_lesson("recA");
        maths.subject = Some("Mathematics".to_string());
        let science = test_lesson("recB");
        let listings = vec![
            LessonListing {
                lesson: maths,
                student_name: Some("Ayesha".to_string()),
            },
            LessonListing {
                lesson: science,
                student_name: None,
            },
        ];

        assert_eq!(filter_lessons(&listings, "math").len(), 1);
        assert_eq!(filter_lessons(&listings, "ayesha").len(), 1);
        assert_eq!(filter_lessons(&listings, "").len(), 2);
        assert!(filter_lessons(&listings, "physics").is_empty());
    }

    #[test]
    fn test_filter_lessons_matches_unknown_student_label() {
        let listings = vec![
            LessonListing {
                lesson: test_lesson("recGone"),
                student_name: None,
            },
            LessonListing {
                lesson: test_lesson("recA"),
                student_name: Some("Ayesha".to_string()),
            },
        ];

        let found = filter_lessons(&listings, "unknown");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].lesson.student_id, "recGone");
    }
}
