pub mod book;
pub mod borrow;
pub mod principal;

pub use book::PostgresBookRepository;
pub use borrow::PostgresBorrowRepository;
pub use principal::PostgresPrincipalRepository;
