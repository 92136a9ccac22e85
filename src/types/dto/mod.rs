pub mod auth;
pub mod common;
pub mod records;
pub mod user;
