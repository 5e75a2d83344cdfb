//! Pass identifier generation.

use uuid::Uuid;

use crate::types::PassId;

/// Generate an identifier that `is_taken` reports as unused.
///
/// UUIDv7 values are time-ordered, so ids sort roughly by creation time the
/// same way the legacy `Date.now()`-prefixed ids did. The `is_taken` check
/// keeps the store-wide uniqueness guarantee even for ids imported from
/// elsewhere.
pub fn generate_pass_id(is_taken: impl Fn(&str) -> bool) -> PassId {
    loop {
        let id = Uuid::now_v7().simple().to_string();
        if !is_taken(&id) {
            return id;
        }
    }
}
