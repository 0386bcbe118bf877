pub mod access;
pub mod movie;
pub mod user;
