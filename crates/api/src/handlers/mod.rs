pub mod auth;
pub mod passes;
