pub mod account_repo;
pub mod error;
