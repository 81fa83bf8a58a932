pub mod auth;
pub mod book;
pub mod borrow;
pub mod principal;
