//! Borrows repository for database operations

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::BookShort,
        borrow::{Borrow, BorrowStatusShort, UpdateBorrowRequest},
        enums::BorrowStatus,
        user::UserShort,
    },
};

/// Normalized listing filter, date range already resolved
#[derive(Debug, Default)]
pub struct BorrowSearch {
    pub user_id: Option<i32>,
    pub status_id: Option<i16>,
    pub created_between: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

#[derive(Clone)]
pub struct BorrowsRepository {
    pool: Pool<Postgres>,
}

impl BorrowsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get borrow by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Borrow> {
        sqlx::query_as::<_, Borrow>("SELECT * FROM borrows WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", id)))
    }

    /// Search borrows, newest first. Absent filters impose no constraint.
    pub async fn search(&self, search: &BorrowSearch) -> AppResult<Vec<Borrow>> {
        let (from, to) = match search.created_between {
            Some((from, to)) => (Some(from), Some(to)),
            None => (None, None),
        };

        let borrows = sqlx::query_as::<_, Borrow>(
            r#"
            SELECT * FROM borrows
            WHERE ($1::int IS NULL OR user_id = $1)
              AND ($2::smallint IS NULL OR borrow_status_id = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
              AND ($4::timestamptz IS NULL OR created_at <= $4)
            ORDER BY created_at DESC
            "#,
        )
        .bind(search.user_id)
        .bind(search.status_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(borrows)
    }

    /// Borrows owned by one user, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Borrow>> {
        let borrows = sqlx::query_as::<_, Borrow>(
            "SELECT * FROM borrows WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(borrows)
    }

    /// Create a borrow and associate its book set in one transaction, so no
    /// partially-associated borrow is ever observable. The association is a
    /// whole-set replacement (sync semantics, not additive).
    pub async fn create(
        &self,
        user_id: i32,
        due_date: DateTime<Utc>,
        notes: Option<&str>,
        book_ids: &[i32],
    ) -> AppResult<Borrow> {
        let mut tx = self.pool.begin().await?;

        let borrow = sqlx::query_as::<_, Borrow>(
            r#"
            INSERT INTO borrows (user_id, borrow_status_id, due_date, notes)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(i16::from(BorrowStatus::Borrowing))
        .bind(due_date)
        .bind(notes)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM book_borrow WHERE borrow_id = $1")
            .bind(borrow.id)
            .execute(&mut *tx)
            .await?;

        for book_id in book_ids {
            sqlx::query("INSERT INTO book_borrow (borrow_id, book_id) VALUES ($1, $2)")
                .bind(borrow.id)
                .bind(book_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(borrow)
    }

    /// Apply a partial administrative update
    pub async fn update(&self, id: i32, update: &UpdateBorrowRequest) -> AppResult<Borrow> {
        sqlx::query_as::<_, Borrow>(
            r#"
            UPDATE borrows
            SET due_date = COALESCE($1, due_date),
                notes = COALESCE($2, notes),
                borrow_status_id = COALESCE($3, borrow_status_id)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(update.due_date)
        .bind(update.notes.as_deref())
        .bind(update.borrow_status_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", id)))
    }

    /// Transition a borrow to Returned, stamping the return date
    pub async fn mark_returned(
        &self,
        id: i32,
        returned_date: DateTime<Utc>,
    ) -> AppResult<Borrow> {
        sqlx::query_as::<_, Borrow>(
            r#"
            UPDATE borrows
            SET borrow_status_id = $1, returned_date = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(i16::from(BorrowStatus::Returned))
        .bind(returned_date)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Borrow with id {} not found", id)))
    }

    /// Record a late-return penalty for a borrow
    pub async fn create_penalty(&self, borrow_id: i32, amount: Decimal) -> AppResult<()> {
        sqlx::query("INSERT INTO penalties (borrow_id, amount) VALUES ($1, $2)")
            .bind(borrow_id)
            .bind(amount)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Eager-load helpers
    // -----------------------------------------------------------------------

    /// Books associated with each of the given borrows
    pub async fn books_for(&self, borrow_ids: &[i32]) -> AppResult<HashMap<i32, Vec<BookShort>>> {
        if borrow_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT bb.borrow_id, b.id, b.title
            FROM book_borrow bb
            JOIN books b ON b.id = bb.book_id
            WHERE bb.borrow_id = ANY($1)
            ORDER BY b.id
            "#,
        )
        .bind(borrow_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut books: HashMap<i32, Vec<BookShort>> = HashMap::new();
        for row in rows {
            books
                .entry(row.get("borrow_id"))
                .or_default()
                .push(BookShort {
                    id: row.get("id"),
                    title: row.get("title"),
                });
        }
        Ok(books)
    }

    /// Owner projections for each of the given borrows
    pub async fn users_for(&self, borrow_ids: &[i32]) -> AppResult<HashMap<i32, UserShort>> {
        if borrow_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT bo.id as borrow_id, u.id, u.firstname, u.lastname
            FROM borrows bo
            JOIN users u ON u.id = bo.user_id
            WHERE bo.id = ANY($1)
            "#,
        )
        .bind(borrow_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut users = HashMap::new();
        for row in rows {
            users.insert(
                row.get("borrow_id"),
                UserShort {
                    id: row.get("id"),
                    firstname: row.get("firstname"),
                    lastname: row.get("lastname"),
                },
            );
        }
        Ok(users)
    }

    /// Status reference rows, keyed by id
    pub async fn statuses(&self) -> AppResult<HashMap<i16, BorrowStatusShort>> {
        let rows = sqlx::query_as::<_, BorrowStatusShort>(
            "SELECT id, name FROM borrow_statuses ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|s| (s.id, s)).collect())
    }
}
