//! Library members and their borrowing roles

use serde::{Deserialize, Serialize};

use crate::book::BookId;
use crate::error::{LibraryError, Result};
use crate::validation::require_non_blank;

/// Unique identifier for a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u32);

impl std::fmt::Display for MemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Borrowing role, fixed when the member is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Student,
    Professor,
}

impl Role {
    /// Get a human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Professor => "Professor",
        }
    }

    /// Maximum number of books held at once
    pub fn max_books_allowed(&self) -> usize {
        match self {
            Role::Student => 3,
            Role::Professor => 5,
        }
    }

    /// Length of a loan in days
    pub fn loan_duration_days(&self) -> i64 {
        match self {
            Role::Student => 14,
            Role::Professor => 28,
        }
    }

    /// Parse a role from user input (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "student" | "s" => Some(Role::Student),
            "professor" | "p" => Some(Role::Professor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A registered library member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    id: MemberId,
    name: String,
    email: String,
    role: Role,
    #[serde(default)]
    borrowed_book_ids: Vec<BookId>,
}

impl Member {
    pub(crate) fn new(id: MemberId, role: Role, name: &str, email: &str) -> Result<Self> {
        Ok(Self {
            id,
            name: require_non_blank(name, "name")?,
            email: require_non_blank(email, "email")?,
            role,
            borrowed_book_ids: Vec::new(),
        })
    }

    pub fn id(&self) -> MemberId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Books currently held, in borrow order
    pub fn borrowed_book_ids(&self) -> &[BookId] {
        &self.borrowed_book_ids
    }

    pub fn borrowed_count(&self) -> usize {
        self.borrowed_book_ids.len()
    }

    pub fn max_books_allowed(&self) -> usize {
        self.role.max_books_allowed()
    }

    pub fn has_borrowed(&self, book_id: BookId) -> bool {
        self.borrowed_book_ids.contains(&book_id)
    }

    /// Replace contact details; both must be non-blank
    pub(crate) fn set_contact(&mut self, name: &str, email: &str) -> Result<()> {
        let name = require_non_blank(name, "name")?;
        let email = require_non_blank(email, "email")?;
        self.name = name;
        self.email = email;
        Ok(())
    }

    /// Check whether `book_id` could be added to this member's holds
    pub(crate) fn check_can_borrow(&self, book_id: BookId) -> Result<()> {
        if self.borrowed_count() >= self.max_books_allowed() {
            return Err(LibraryError::Conflict(format!(
                "{} has reached the borrow limit of {}",
                self.name,
                self.max_books_allowed()
            )));
        }
        if self.has_borrowed(book_id) {
            return Err(LibraryError::Conflict(format!(
                "{} already holds book {}",
                self.name, book_id
            )));
        }
        Ok(())
    }

    pub(crate) fn push_borrowed(&mut self, book_id: BookId) {
        self.borrowed_book_ids.push(book_id);
    }

    pub(crate) fn remove_borrowed(&mut self, book_id: BookId) -> Result<()> {
        let position = self
            .borrowed_book_ids
            .iter()
            .position(|id| *id == book_id)
            .ok_or_else(|| {
                LibraryError::InvalidState(format!(
                    "book {} is not recorded as borrowed by {}",
                    book_id, self.name
                ))
            })?;
        self.borrowed_book_ids.remove(position);
        Ok(())
    }
}

impl std::fmt::Display for Member {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} (Email: {}) Borrowed: {}/{}",
            self.role,
            self.name,
            self.email,
            self.borrowed_count(),
            self.max_books_allowed()
        )
    }
}
