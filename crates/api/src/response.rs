//! Response envelopes for API handlers.
//!
//! Every body carries a `success` flag, which the browser client checks
//! before reading the payload. Error bodies are built in [`crate::error`].

use gatepass_core::access::UserProfile;
use gatepass_core::pass::Pass;
use serde::Serialize;

/// `{ "success": true, "pass": ... }`
#[derive(Debug, Serialize)]
pub struct PassResponse {
    pub success: bool,
    pub pass: Pass,
}

impl PassResponse {
    pub fn ok(pass: Pass) -> Self {
        Self {
            success: true,
            pass,
        }
    }
}

/// `{ "success": true, "passes": [...] }`
#[derive(Debug, Serialize)]
pub struct PassListResponse {
    pub success: bool,
    pub passes: Vec<Pass>,
}

impl PassListResponse {
    pub fn ok(passes: Vec<Pass>) -> Self {
        Self {
            success: true,
            passes,
        }
    }
}

/// Outcome of a location report. `success` is false when the student is not
/// late; that is a normal answer, not an error.
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass: Option<Pass>,
}

/// `{ "success": true, "user": {...} }`
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: UserProfile,
}
