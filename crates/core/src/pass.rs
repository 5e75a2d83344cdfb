//! Gate pass model and lifecycle rules.
//!
//! A pass moves `pending -> {approved, rejected}` on a moderator decision,
//! then an approved pass is scanned out (`exit_time`) and back in
//! (`entry_time`). Lateness is never stored as a state of its own; it is
//! recomputed from the clock on every query or location report.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{lenient_timestamp, PassId, Timestamp};

/// Message returned when an exit scan hits a pass that is not approved.
pub const MSG_NOT_APPROVED: &str = "Pass is not approved";

/// Message returned when an entry scan hits a pass with no recorded exit.
pub const MSG_NOT_EXITED: &str = "Student has not exited yet";

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PassStatus {
    /// Awaiting a moderator decision.
    Pending,
    Approved,
    Rejected,
}

impl PassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for PassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PassStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(CoreError::Validation(format!(
                "Invalid status '{other}'. Must be one of: pending, approved, rejected"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Last reported position of a student who is out past their return time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// When the device took the reading (client supplied).
    #[serde(with = "lenient_timestamp")]
    pub timestamp: Timestamp,
    pub is_late: bool,
}

/// A single gate pass with its approval and timing history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pass {
    pub id: PassId,
    pub student_id: String,
    pub student_name: String,
    pub reason: String,
    pub destination: String,
    #[serde(with = "lenient_timestamp")]
    pub expected_return: Timestamp,
    pub status: PassStatus,
    #[serde(with = "lenient_timestamp")]
    pub requested_at: Timestamp,
    #[serde(default)]
    pub moderator_remarks: String,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(
        default,
        with = "lenient_timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub approved_at: Option<Timestamp>,
    #[serde(default, with = "lenient_timestamp::option")]
    pub exit_time: Option<Timestamp>,
    #[serde(default, with = "lenient_timestamp::option")]
    pub entry_time: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Request facts supplied by the student when asking for a pass.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPass {
    pub student_id: String,
    pub student_name: String,
    pub reason: String,
    pub destination: String,
    #[serde(with = "lenient_timestamp")]
    pub expected_return: Timestamp,
}

/// A moderator's ruling on a pass.
#[derive(Debug, Clone)]
pub struct Decision {
    pub status: PassStatus,
    pub remarks: Option<String>,
    pub moderator_name: String,
}

/// A moderator's ruling as sent by the client, status still unchecked.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    pub status: String,
    pub remarks: Option<String>,
    pub moderator_name: String,
}

impl TryFrom<DecisionRequest> for Decision {
    type Error = CoreError;

    fn try_from(request: DecisionRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            status: request.status.parse()?,
            remarks: request.remarks,
            moderator_name: request.moderator_name,
        })
    }
}

/// A position ping from the student's device.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(with = "lenient_timestamp")]
    pub timestamp: Timestamp,
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

impl Pass {
    /// Build a freshly requested pass. Every lifecycle field starts empty.
    pub fn new(id: PassId, input: NewPass, now: Timestamp) -> Self {
        Self {
            id,
            student_id: input.student_id,
            student_name: input.student_name,
            reason: input.reason,
            destination: input.destination,
            expected_return: input.expected_return,
            status: PassStatus::Pending,
            requested_at: now,
            moderator_remarks: String::new(),
            approved_by: None,
            approved_at: None,
            exit_time: None,
            entry_time: None,
            location: None,
        }
    }

    /// Apply a moderator decision.
    ///
    /// Status, remarks, approver and decision time change together. An
    /// already decided pass is simply overwritten.
    pub fn decide(&mut self, decision: Decision, now: Timestamp) {
        self.status = decision.status;
        self.moderator_remarks = decision.remarks.unwrap_or_default();
        self.approved_by = Some(decision.moderator_name);
        self.approved_at = Some(now);
    }

    /// Record the gate exit scan. Re-scanning overwrites the exit time.
    pub fn record_exit(&mut self, now: Timestamp) -> Result<(), CoreError> {
        if self.status != PassStatus::Approved {
            return Err(CoreError::InvalidState(MSG_NOT_APPROVED.into()));
        }
        self.exit_time = Some(now);
        Ok(())
    }

    /// Record the gate entry scan. Re-scanning overwrites the entry time.
    pub fn record_entry(&mut self, now: Timestamp) -> Result<(), CoreError> {
        if self.exit_time.is_none() {
            return Err(CoreError::InvalidState(MSG_NOT_EXITED.into()));
        }
        self.entry_time = Some(now);
        Ok(())
    }

    /// Approved and the student has not come back in yet.
    pub fn is_active(&self) -> bool {
        self.status == PassStatus::Approved && self.entry_time.is_none()
    }

    /// Out through the gate, not back, and past the expected return time.
    pub fn is_late_at(&self, now: Timestamp) -> bool {
        self.is_active() && self.exit_time.is_some() && now > self.expected_return
    }

    /// Store a location ping if the student is currently late.
    ///
    /// Returns `false` and leaves the pass untouched otherwise; callers are
    /// expected to report periodically and ignore the no-op.
    pub fn report_location(&mut self, report: LocationReport, now: Timestamp) -> bool {
        if !self.is_late_at(now) {
            return false;
        }
        self.location = Some(Location {
            latitude: report.latitude,
            longitude: report.longitude,
            timestamp: report.timestamp,
            is_late: true,
        });
        true
    }
}
