//! Repository layer: every read and write of domain records goes through here.

pub mod pass_repo;
pub mod user_repo;

pub use pass_repo::PassRepo;
pub use user_repo::UserRepo;
