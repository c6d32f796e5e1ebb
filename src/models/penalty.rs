//! Penalty model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Late-return penalty attached to a borrow. Created once at return time
/// when the computed fee is positive; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Penalty {
    pub id: i32,
    pub borrow_id: i32,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}
