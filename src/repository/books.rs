//! Books repository for database operations

use std::collections::HashMap;

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{book::Book, enums::BorrowStatus},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT id, title, stock FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Resolve a set of books, preserving the order of the requested ids.
    /// Fails with NotFound naming the first id that does not resolve.
    pub async fn get_many(&self, ids: &[i32]) -> AppResult<Vec<Book>> {
        let rows = sqlx::query_as::<_, Book>("SELECT id, title, stock FROM books WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        let mut by_id: HashMap<i32, Book> = rows.into_iter().map(|b| (b.id, b)).collect();

        let mut books = Vec::with_capacity(ids.len());
        for id in ids {
            let book = by_id
                .remove(id)
                .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;
            books.push(book);
        }
        Ok(books)
    }

    /// Count open borrows (status Borrowing) referencing a book. Always a
    /// fresh read; stock and open borrows both move over time.
    pub async fn open_borrow_count(&self, book_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM borrows b
            JOIN book_borrow bb ON bb.borrow_id = b.id
            WHERE bb.book_id = $1 AND b.borrow_status_id = $2
            "#,
        )
        .bind(book_id)
        .bind(i16::from(BorrowStatus::Borrowing))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
