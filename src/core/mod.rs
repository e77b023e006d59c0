//! Core business logic - framework-agnostic student, lesson, payment and stats operations.
//!
//! Repository functions are generic over [`crate::store::RecordStore`], so the
//! same code runs against the hosted service and the in-memory store.

/// Lesson repository operations
pub mod lessons;
/// Payment status classification and amount formatting
pub mod payment;
/// Search filtering for list views
pub mod search;
/// Dashboard totals and per-student summaries
pub mod stats;
/// Student repository operations
pub mod students;
