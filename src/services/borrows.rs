//! Borrowing management service
//!
//! Owns the borrowing lifecycle: stock-based availability at creation,
//! late-fee computation, the Borrowing -> Returned transition, and the
//! filtered listing views.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;

use crate::{
    config::BorrowsConfig,
    error::{AppError, AppResult},
    models::{
        borrow::{Borrow, BorrowDetails, BorrowFilter, CreateBorrowRequest, UpdateBorrowRequest},
        enums::BorrowStatus,
    },
    repository::{borrows::BorrowSearch, Repository},
};

#[derive(Clone)]
pub struct BorrowsService {
    repository: Repository,
    config: BorrowsConfig,
}

impl BorrowsService {
    pub fn new(repository: Repository, config: BorrowsConfig) -> Self {
        Self { repository, config }
    }

    /// Staff listing: all borrows matching the filters, newest first, with
    /// user, books and status eager-loaded and a transient penalty_fee on
    /// every row.
    pub async fn all(&self, filter: &BorrowFilter) -> AppResult<Vec<BorrowDetails>> {
        let search = BorrowSearch {
            user_id: filter.user_id,
            status_id: filter.status_id,
            created_between: filter.created_range(),
        };
        let borrows = self.repository.borrows.search(&search).await?;

        let ids: Vec<i32> = borrows.iter().map(|b| b.id).collect();
        let mut books = self.repository.borrows.books_for(&ids).await?;
        let mut users = self.repository.borrows.users_for(&ids).await?;
        let statuses = self.repository.borrows.statuses().await?;

        let now = Utc::now();
        let details = borrows
            .into_iter()
            .map(|b| {
                let fee = b.penalty_fee(now, self.config.daily_penalty);
                BorrowDetails {
                    user: users.remove(&b.id),
                    books: books.remove(&b.id).unwrap_or_default(),
                    status: statuses.get(&b.borrow_status_id).cloned(),
                    penalty_fee: Some(fee),
                    id: b.id,
                    user_id: b.user_id,
                    borrow_status_id: b.borrow_status_id,
                    created_at: b.created_at,
                    due_date: b.due_date,
                    returned_date: b.returned_date,
                    notes: b.notes,
                }
            })
            .collect();

        Ok(details)
    }

    /// Member listing: the caller's own borrows only, books eager-loaded,
    /// penalty_fee on every row. No cross-user visibility.
    pub async fn my_borrows(&self, user_id: i32) -> AppResult<Vec<BorrowDetails>> {
        let borrows = self.repository.borrows.list_for_user(user_id).await?;

        let ids: Vec<i32> = borrows.iter().map(|b| b.id).collect();
        let mut books = self.repository.borrows.books_for(&ids).await?;

        let now = Utc::now();
        let details = borrows
            .into_iter()
            .map(|b| {
                let fee = b.penalty_fee(now, self.config.daily_penalty);
                BorrowDetails {
                    user: None,
                    books: books.remove(&b.id).unwrap_or_default(),
                    status: None,
                    penalty_fee: Some(fee),
                    id: b.id,
                    user_id: b.user_id,
                    borrow_status_id: b.borrow_status_id,
                    created_at: b.created_at,
                    due_date: b.due_date,
                    returned_date: b.returned_date,
                    notes: b.notes,
                }
            })
            .collect();

        Ok(details)
    }

    /// Single-borrow view with books and status; penalty_fee is attached
    /// only when the computed amount is non-zero.
    pub async fn detail(&self, borrow_id: i32) -> AppResult<BorrowDetails> {
        let borrow = self.repository.borrows.get_by_id(borrow_id).await?;

        let mut books = self.repository.borrows.books_for(&[borrow.id]).await?;
        let statuses = self.repository.borrows.statuses().await?;

        let fee = borrow.penalty_fee(Utc::now(), self.config.daily_penalty);
        let penalty_fee = (fee > Decimal::ZERO).then_some(fee);

        Ok(BorrowDetails {
            user: None,
            books: books.remove(&borrow.id).unwrap_or_default(),
            status: statuses.get(&borrow.borrow_status_id).cloned(),
            penalty_fee,
            id: borrow.id,
            user_id: borrow.user_id,
            borrow_status_id: borrow.borrow_status_id,
            created_at: borrow.created_at,
            due_date: borrow.due_date,
            returned_date: borrow.returned_date,
            notes: borrow.notes,
        })
    }

    /// Create a borrow against one or more books.
    ///
    /// Resolves the user and every book (NotFound on any miss), then checks
    /// availability per book in resolution order; the first exhausted book
    /// aborts the whole request with Conflict and nothing is created. Status
    /// is forced to Borrowing regardless of caller input.
    pub async fn create(&self, request: &CreateBorrowRequest) -> AppResult<Borrow> {
        let user = self.repository.users.get_by_id(request.user_id).await?;
        let books = self.repository.books.get_many(&request.book_ids).await?;

        for book in &books {
            let open = self.repository.books.open_borrow_count(book.id).await?;
            if !book.has_available_copy(open) {
                return Err(AppError::Conflict(format!(
                    "The book with ID '{}' is currently unavailable.",
                    book.id
                )));
            }
        }

        let due_date = request
            .due_date
            .unwrap_or_else(|| Utc::now() + Duration::days(self.config.loan_duration_days));

        let borrow = self
            .repository
            .borrows
            .create(user.id, due_date, request.notes.as_deref(), &request.book_ids)
            .await?;

        tracing::info!(
            borrow_id = borrow.id,
            user_id = user.id,
            books = request.book_ids.len(),
            "Borrow created"
        );

        Ok(borrow)
    }

    /// Narrow administrative update: applies only the allowed partial fields
    /// and performs no availability or transition checks.
    pub async fn update(
        &self,
        borrow_id: i32,
        request: &UpdateBorrowRequest,
    ) -> AppResult<Borrow> {
        self.repository.borrows.update(borrow_id, request).await
    }

    /// Process a return: compute the late fee, record a Penalty when the
    /// fee is positive, and transition the borrow to Returned.
    ///
    /// Returning twice is rejected with Conflict, so at most one Penalty can
    /// ever exist for a borrow.
    pub async fn return_book(&self, borrow_id: i32) -> AppResult<Borrow> {
        let borrow = self.repository.borrows.get_by_id(borrow_id).await?;

        if BorrowStatus::from_id(borrow.borrow_status_id) != Some(BorrowStatus::Borrowing) {
            return Err(AppError::Conflict("Borrow already returned".to_string()));
        }

        let now = Utc::now();
        let fee = borrow.penalty_fee(now, self.config.daily_penalty);

        if fee > Decimal::ZERO {
            self.repository.borrows.create_penalty(borrow.id, fee).await?;
            tracing::info!(borrow_id = borrow.id, %fee, "Late-return penalty recorded");
        }

        self.repository.borrows.mark_returned(borrow.id, now).await
    }
}
