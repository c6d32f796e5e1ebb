//! Shared domain enums

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// BorrowStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a borrow. Transitions are forward-only:
/// Borrowing -> Returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[repr(i16)]
pub enum BorrowStatus {
    Borrowing = 1,
    Returned = 2,
}

impl BorrowStatus {
    pub fn from_id(v: i16) -> Option<Self> {
        match v {
            1 => Some(BorrowStatus::Borrowing),
            2 => Some(BorrowStatus::Returned),
            _ => None,
        }
    }
}

impl From<BorrowStatus> for i16 {
    fn from(s: BorrowStatus) -> Self {
        s as i16
    }
}

impl std::fmt::Display for BorrowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BorrowStatus::Borrowing => "Borrowing",
            BorrowStatus::Returned => "Returned",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ids_round_trip() {
        assert_eq!(BorrowStatus::from_id(1), Some(BorrowStatus::Borrowing));
        assert_eq!(BorrowStatus::from_id(2), Some(BorrowStatus::Returned));
        assert_eq!(i16::from(BorrowStatus::Returned), 2);
    }

    #[test]
    fn unknown_status_id_is_rejected() {
        assert_eq!(BorrowStatus::from_id(0), None);
        assert_eq!(BorrowStatus::from_id(99), None);
    }
}
