//! Read-only views over the pass collection.
//!
//! Every view is a filter that keeps the collection's insertion order.

use crate::pass::{Pass, PassStatus};
use crate::types::Timestamp;

/// Which passes a listing should return.
#[derive(Debug, Clone, PartialEq)]
pub enum PassFilter {
    All,
    Pending,
    ByStudent(String),
    /// Approved and not yet back through the gate.
    Active,
    /// Out past the expected return time, evaluated at the given instant.
    Late(Timestamp),
}

impl PassFilter {
    pub fn matches(&self, pass: &Pass) -> bool {
        match self {
            Self::All => true,
            Self::Pending => pass.status == PassStatus::Pending,
            Self::ByStudent(student_id) => pass.student_id == *student_id,
            Self::Active => pass.is_active(),
            Self::Late(now) => pass.is_late_at(*now),
        }
    }

    /// Keep only the matching passes.
    pub fn apply(&self, passes: Vec<Pass>) -> Vec<Pass> {
        passes.into_iter().filter(|p| self.matches(p)).collect()
    }

    /// Short label used in log fields.
    pub fn name(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pending => "pending",
            Self::ByStudent(_) => "student",
            Self::Active => "active",
            Self::Late(_) => "late",
        }
    }
}
