//! Loan records for active borrows

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::member::{MemberId, Role};

/// One active borrow. Immutable once created; dropped when the book comes back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub book_id: BookId,
    pub member_id: MemberId,
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl LoanRecord {
    /// Create a loan starting on `loan_date`, due after the role's loan period
    pub fn new(book_id: BookId, member_id: MemberId, role: Role, loan_date: NaiveDate) -> Self {
        Self {
            book_id,
            member_id,
            loan_date,
            due_date: loan_date + Duration::days(role.loan_duration_days()),
        }
    }

    pub fn matches(&self, book_id: BookId, member_id: MemberId) -> bool {
        self.book_id == book_id && self.member_id == member_id
    }

    /// A loan is overdue from the day after its due date
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        today > self.due_date
    }
}

impl std::fmt::Display for LoanRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Member: {} | Book: {} | Loaned: {} | Due: {}",
            self.member_id, self.book_id, self.loan_date, self.due_date
        )
    }
}
