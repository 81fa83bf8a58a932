use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use crate::book::models::BookId;
use crate::borrow::errors::BorrowError;
use crate::borrow::errors::BorrowIdError;
use crate::principal::models::PrincipalId;

/// Days a borrowed copy may be kept.
pub const LOAN_PERIOD_DAYS: i64 = 7;

/// A single copy lent to a principal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Borrow {
    pub id: BorrowId,
    pub book_id: BookId,
    pub principal_id: PrincipalId,
    pub issued_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
}

impl Borrow {
    pub fn issue(book_id: BookId, principal_id: PrincipalId, now: DateTime<Utc>) -> Self {
        Self {
            id: BorrowId::new(),
            book_id,
            principal_id,
            issued_at: now,
            due_at: now + Duration::days(LOAN_PERIOD_DAYS),
            returned_at: None,
        }
    }

    /// Stamp the record as returned.
    ///
    /// # Errors
    /// * `AlreadyReturned` - The copy was handed back before
    pub fn mark_returned(&mut self, now: DateTime<Utc>) -> Result<(), BorrowError> {
        if self.returned_at.is_some() {
            return Err(BorrowError::AlreadyReturned(self.id.to_string()));
        }
        self.returned_at = Some(now);
        Ok(())
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.returned_at.is_none() && now > self.due_at
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BorrowId(pub Uuid);

impl BorrowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, BorrowIdError> {
        Uuid::parse_str(s)
            .map(BorrowId)
            .map_err(|e| BorrowIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for BorrowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BorrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
