pub mod error;
pub mod share_repo;
pub mod user_repo;
