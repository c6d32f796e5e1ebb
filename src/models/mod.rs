//! Data models for Lendly

pub mod book;
pub mod borrow;
pub mod enums;
pub mod penalty;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookShort};
pub use borrow::{Borrow, BorrowDetails};
pub use enums::BorrowStatus;
pub use penalty::Penalty;
pub use user::{User, UserShort};
