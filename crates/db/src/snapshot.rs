//! The persisted document: every user and every pass.

use gatepass_core::access::User;
use gatepass_core::pass::Pass;
use gatepass_core::roles::is_known_role;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub passes: Vec<Pass>,
}

impl Snapshot {
    pub fn find_pass(&self, id: &str) -> Option<&Pass> {
        self.passes.iter().find(|p| p.id == id)
    }

    pub fn find_pass_mut(&mut self, id: &str) -> Option<&mut Pass> {
        self.passes.iter_mut().find(|p| p.id == id)
    }

    pub fn contains_pass(&self, id: &str) -> bool {
        self.find_pass(id).is_some()
    }

    pub fn unknown_role_users(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| !is_known_role(&u.role))
    }
}
