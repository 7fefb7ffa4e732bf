//! Book domain model
//!
//! A book is a catalogue entry with a fixed number of physical copies.
//! Copies move between *available* and *borrowed*; the catalogue never
//! tracks individual copies, only the counts.

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, Result};
use crate::isbn::normalize_isbn;
use crate::validation::require_non_blank;

/// Unique identifier for a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(pub u32);

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a caller refers to a book: by catalogue id, by any ISBN spelling,
/// or by raw user text that may be either
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookRef {
    Id(BookId),
    Isbn(String),
    /// Matched against the ISBN index first, then read as an id
    Input(String),
}

impl BookRef {
    /// Wrap user input typed at an "id or ISBN" prompt.
    ///
    /// ISBNs of any length are accepted by the catalogue, so a short number
    /// may be either; resolution settles it against the ISBN index.
    pub fn parse(input: &str) -> Self {
        BookRef::Input(input.trim().to_string())
    }
}

impl From<BookId> for BookRef {
    fn from(id: BookId) -> Self {
        BookRef::Id(id)
    }
}

impl std::fmt::Display for BookRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookRef::Id(id) => write!(f, "id {}", id),
            BookRef::Isbn(isbn) => write!(f, "ISBN {}", isbn),
            BookRef::Input(text) => write!(f, "id or ISBN '{}'", text),
        }
    }
}

/// Caller-supplied fields for creating or editing a book
#[derive(Debug, Clone, Default)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Signed so that negative input can be reported instead of wrapping
    pub total_copies: i64,
    pub description: Option<String>,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        isbn: impl Into<String>,
        total_copies: i64,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            isbn: isbn.into(),
            total_copies,
            description: None,
        }
    }

    /// Attach a free-text description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate and normalize into stored form
    pub(crate) fn into_fields(self) -> Result<BookFields> {
        let title = require_non_blank(&self.title, "title")?;
        let author = require_non_blank(&self.author, "author")?;
        require_non_blank(&self.isbn, "isbn")?;
        let isbn = normalize_isbn(&self.isbn);
        if isbn.is_empty() {
            return Err(LibraryError::InvalidArgument(format!(
                "isbn '{}' contains no digits",
                self.isbn.trim()
            )));
        }
        let total_copies = u32::try_from(self.total_copies).map_err(|_| {
            LibraryError::InvalidArgument(format!(
                "total copies must be between 0 and {}, got {}",
                u32::MAX,
                self.total_copies
            ))
        })?;

        Ok(BookFields {
            title,
            author,
            isbn,
            total_copies,
            description: self
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
        })
    }
}

/// Validated book fields
#[derive(Debug, Clone)]
pub(crate) struct BookFields {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub total_copies: u32,
    pub description: String,
}

/// A catalogue entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: String,
    author: String,
    isbn: String,
    total_copies: u32,
    available_copies: u32,
    #[serde(default)]
    description: String,
}

impl Book {
    pub(crate) fn new(id: BookId, fields: BookFields) -> Self {
        Self {
            id,
            title: fields.title,
            author: fields.author,
            isbn: fields.isbn,
            total_copies: fields.total_copies,
            available_copies: fields.total_copies,
            description: fields.description,
        }
    }

    pub fn id(&self) -> BookId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// The normalized ISBN
    pub fn isbn(&self) -> &str {
        &self.isbn
    }

    pub fn total_copies(&self) -> u32 {
        self.total_copies
    }

    pub fn available_copies(&self) -> u32 {
        self.available_copies
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Copies currently out on loan
    pub fn borrowed_copies(&self) -> u32 {
        self.total_copies.saturating_sub(self.available_copies)
    }

    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }

    /// Check that `total_copies` could replace the current total
    pub(crate) fn check_total(&self, total_copies: u32) -> Result<()> {
        let borrowed = self.borrowed_copies();
        if total_copies < borrowed {
            return Err(LibraryError::InvalidArgument(format!(
                "total copies ({}) cannot be less than borrowed copies ({})",
                total_copies, borrowed
            )));
        }
        Ok(())
    }

    /// Replace all editable fields. Callers must run [`Book::check_total`] first.
    pub(crate) fn apply(&mut self, fields: BookFields) {
        let borrowed = self.borrowed_copies();
        self.title = fields.title;
        self.author = fields.author;
        self.isbn = fields.isbn;
        self.total_copies = fields.total_copies;
        self.available_copies = fields.total_copies - borrowed;
        self.description = fields.description;
    }

    pub(crate) fn borrow_copy(&mut self) -> Result<()> {
        if !self.is_available() {
            return Err(LibraryError::Conflict(format!(
                "no copies of '{}' available",
                self.title
            )));
        }
        self.available_copies -= 1;
        Ok(())
    }

    pub(crate) fn return_copy(&mut self) -> Result<()> {
        if self.available_copies >= self.total_copies {
            return Err(LibraryError::InvalidState(format!(
                "all copies of '{}' are already accounted for",
                self.title
            )));
        }
        self.available_copies += 1;
        Ok(())
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} by {} (ISBN: {}) - Available: {}/{}",
            self.title, self.author, self.isbn, self.available_copies, self.total_copies
        )?;
        if !self.description.is_empty() {
            write!(f, " | {}", self.description)?;
        }
        Ok(())
    }
}
