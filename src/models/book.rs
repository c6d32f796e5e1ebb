//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Book model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    /// Number of physical copies owned; open borrows count against it
    pub stock: i32,
}

/// Book projection attached to borrow listings
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookShort {
    pub id: i32,
    pub title: String,
}

impl Book {
    /// A copy can be lent while open borrows have not exhausted the stock.
    /// Must be evaluated against a fresh open-borrow count at creation time.
    pub fn has_available_copy(&self, open_borrows: i64) -> bool {
        open_borrows < self.stock as i64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(stock: i32) -> Book {
        Book {
            id: 1,
            title: "The Left Hand of Darkness".to_string(),
            stock,
        }
    }

    #[test]
    fn available_while_open_borrows_below_stock() {
        assert!(book(3).has_available_copy(0));
        assert!(book(3).has_available_copy(2));
    }

    #[test]
    fn unavailable_at_or_above_stock() {
        assert!(!book(3).has_available_copy(3));
        assert!(!book(3).has_available_copy(4));
    }

    #[test]
    fn zero_stock_is_never_available() {
        assert!(!book(0).has_available_copy(0));
    }
}
