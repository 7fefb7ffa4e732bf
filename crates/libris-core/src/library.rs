//! The library registry: catalogue, membership, and loan bookkeeping
//!
//! [`Library`] is the aggregate root. It is the single owner of every
//! book, member, and loan record, and every mutation goes through it so
//! the cross-entity invariants hold after each call:
//!
//! - `0 <= available <= total` for every book
//! - a member never holds more than their role allows, nor the same book twice
//! - each held book has exactly one matching loan record
//! - the ISBN index maps each book's normalized ISBN to its id, and nothing else
//!
//! Operations check everything they need before mutating anything, so a
//! failed call leaves the library unchanged.

use std::collections::{BTreeMap, HashMap};

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::book::{Book, BookId, BookRef, NewBook};
use crate::error::{LibraryError, Result};
use crate::isbn::{is_valid_isbn, normalize_isbn};
use crate::loan::LoanRecord;
use crate::member::{Member, MemberId, Role};

/// Registry owning all library state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Library {
    books: BTreeMap<BookId, Book>,
    /// Derived from `books`; rebuilt after deserialization
    #[serde(skip)]
    isbn_index: HashMap<String, BookId>,
    members: BTreeMap<MemberId, Member>,
    loans: Vec<LoanRecord>,
    #[serde(default = "first_id")]
    next_book_id: u32,
    #[serde(default = "first_id")]
    next_member_id: u32,
}

fn first_id() -> u32 {
    1
}

impl Default for Library {
    fn default() -> Self {
        Self::new()
    }
}

impl Library {
    /// Create a new empty library
    pub fn new() -> Self {
        Self {
            books: BTreeMap::new(),
            isbn_index: HashMap::new(),
            members: BTreeMap::new(),
            loans: Vec::new(),
            next_book_id: 1,
            next_member_id: 1,
        }
    }

    pub fn next_book_id(&self) -> BookId {
        BookId(self.next_book_id)
    }

    pub fn next_member_id(&self) -> MemberId {
        MemberId(self.next_member_id)
    }

    // ==================== Catalogue ====================

    /// Add a book to the catalogue
    pub fn add_book(&mut self, draft: NewBook) -> Result<&Book> {
        let fields = draft.into_fields()?;
        if let Some(existing) = self.isbn_index.get(&fields.isbn) {
            return Err(LibraryError::DuplicateKey(format!(
                "ISBN {} already belongs to book {}",
                fields.isbn, existing
            )));
        }
        if !is_valid_isbn(&fields.isbn) {
            tracing::warn!("ISBN {} does not have a valid checksum", fields.isbn);
        }

        let id = BookId(self.next_book_id);
        self.next_book_id += 1;
        self.isbn_index.insert(fields.isbn.clone(), id);
        let book = self.books.entry(id).or_insert(Book::new(id, fields));
        tracing::debug!(book_id = %id, isbn = book.isbn(), "Added book");
        Ok(book)
    }

    /// Replace a book's editable fields
    pub fn update_book(&mut self, id: BookId, draft: NewBook) -> Result<&Book> {
        let fields = draft.into_fields()?;
        let book = self
            .books
            .get(&id)
            .ok_or_else(|| LibraryError::NotFound(format!("book {}", id)))?;

        if let Some(owner) = self.isbn_index.get(&fields.isbn) {
            if *owner != id {
                return Err(LibraryError::DuplicateKey(format!(
                    "ISBN {} already belongs to book {}",
                    fields.isbn, owner
                )));
            }
        }
        book.check_total(fields.total_copies)?;

        let old_isbn = book.isbn().to_string();
        self.isbn_index.remove(&old_isbn);
        self.isbn_index.insert(fields.isbn.clone(), id);

        let book = self
            .books
            .get_mut(&id)
            .ok_or_else(|| LibraryError::NotFound(format!("book {}", id)))?;
        book.apply(fields);
        tracing::debug!(book_id = %id, "Updated book");
        Ok(book)
    }

    /// Remove a book. Returns `Ok(false)` if there is no such book.
    pub fn remove_book(&mut self, id: BookId) -> Result<bool> {
        let Some(book) = self.books.get(&id) else {
            return Ok(false);
        };
        if book.borrowed_copies() > 0 {
            return Err(LibraryError::Conflict(format!(
                "cannot remove '{}': {} copies are borrowed",
                book.title(),
                book.borrowed_copies()
            )));
        }
        let isbn = book.isbn().to_string();
        self.isbn_index.remove(&isbn);
        self.books.remove(&id);
        tracing::debug!(book_id = %id, "Removed book");
        Ok(true)
    }

    /// All books, sorted by title (ties keep id order)
    pub fn list_books(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.values().collect();
        books.sort_by(|a, b| a.title().cmp(b.title()));
        books
    }

    /// Books whose title, author, or ISBN contains `query` (case-insensitive)
    pub fn search_books(&self, query: &str) -> Vec<&Book> {
        let needle = query.to_lowercase();
        let mut books: Vec<&Book> = self
            .books
            .values()
            .filter(|book| {
                book.title().to_lowercase().contains(&needle)
                    || book.author().to_lowercase().contains(&needle)
                    || book.isbn().to_lowercase().contains(&needle)
            })
            .collect();
        books.sort_by(|a, b| a.title().cmp(b.title()));
        books
    }

    pub fn find_book(&self, id: BookId) -> Option<&Book> {
        self.books.get(&id)
    }

    /// Look up a book by any spelling of its ISBN
    pub fn find_book_by_isbn(&self, isbn: &str) -> Option<&Book> {
        self.isbn_index
            .get(&normalize_isbn(isbn))
            .and_then(|id| self.books.get(id))
    }

    /// Resolve a reference; free-form input matches an ISBN before an id
    pub fn resolve_book(&self, book_ref: &BookRef) -> Option<&Book> {
        match book_ref {
            BookRef::Id(id) => self.find_book(*id),
            BookRef::Isbn(isbn) => self.find_book_by_isbn(isbn),
            BookRef::Input(text) => self.find_book_by_isbn(text).or_else(|| {
                text.trim()
                    .parse::<u32>()
                    .ok()
                    .and_then(|id| self.find_book(BookId(id)))
            }),
        }
    }

    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    // ==================== Membership ====================

    /// Register a new member with a fixed role
    pub fn add_member(&mut self, role: Role, name: &str, email: &str) -> Result<&Member> {
        let id = MemberId(self.next_member_id);
        let member = Member::new(id, role, name, email)?;
        self.next_member_id += 1;
        tracing::debug!(member_id = %id, role = %role, "Added member");
        Ok(self.members.entry(id).or_insert(member))
    }

    pub fn add_student(&mut self, name: &str, email: &str) -> Result<&Member> {
        self.add_member(Role::Student, name, email)
    }

    pub fn add_professor(&mut self, name: &str, email: &str) -> Result<&Member> {
        self.add_member(Role::Professor, name, email)
    }

    /// Replace a member's name and email. The role cannot change.
    pub fn update_member(&mut self, id: MemberId, name: &str, email: &str) -> Result<&Member> {
        let member = self
            .members
            .get_mut(&id)
            .ok_or_else(|| LibraryError::NotFound(format!("member {}", id)))?;
        member.set_contact(name, email)?;
        tracing::debug!(member_id = %id, "Updated member");
        Ok(member)
    }

    /// Remove a member. Returns `Ok(false)` if there is no such member.
    pub fn remove_member(&mut self, id: MemberId) -> Result<bool> {
        let Some(member) = self.members.get(&id) else {
            return Ok(false);
        };
        if member.borrowed_count() > 0 {
            return Err(LibraryError::Conflict(format!(
                "{} must return {} book(s) before removal",
                member.name(),
                member.borrowed_count()
            )));
        }
        self.members.remove(&id);
        tracing::debug!(member_id = %id, "Removed member");
        Ok(true)
    }

    /// All members, sorted by name (ties keep id order)
    pub fn list_members(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.values().collect();
        members.sort_by(|a, b| a.name().cmp(b.name()));
        members
    }

    pub fn find_member(&self, id: MemberId) -> Option<&Member> {
        self.members.get(&id)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    // ==================== Loans ====================

    /// Lend a book to a member starting today
    pub fn borrow(&mut self, member_id: MemberId, book_ref: &BookRef) -> Result<LoanRecord> {
        self.borrow_on(member_id, book_ref, Local::now().date_naive())
    }

    /// Lend a book to a member starting on `date`
    pub fn borrow_on(
        &mut self,
        member_id: MemberId,
        book_ref: &BookRef,
        date: NaiveDate,
    ) -> Result<LoanRecord> {
        let book_id = self.resolve_book_id(book_ref)?;
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or_else(|| LibraryError::NotFound(format!("member {}", member_id)))?;
        let book = self
            .books
            .get_mut(&book_id)
            .ok_or_else(|| LibraryError::NotFound(format!("book {}", book_id)))?;

        if !book.is_available() {
            return Err(LibraryError::Conflict(format!(
                "no copies of '{}' available",
                book.title()
            )));
        }
        member.check_can_borrow(book_id)?;

        book.borrow_copy()?;
        member.push_borrowed(book_id);
        let loan = LoanRecord::new(book_id, member_id, member.role(), date);
        self.loans.push(loan.clone());
        tracing::debug!(
            member_id = %member_id,
            book_id = %book_id,
            due = %loan.due_date,
            "Borrowed book"
        );
        Ok(loan)
    }

    /// Take a book back from a member, returning the closed loan record
    pub fn return_book(&mut self, member_id: MemberId, book_ref: &BookRef) -> Result<LoanRecord> {
        let book_id = self.resolve_book_id(book_ref)?;
        let member = self
            .members
            .get_mut(&member_id)
            .ok_or_else(|| LibraryError::NotFound(format!("member {}", member_id)))?;
        let book = self
            .books
            .get_mut(&book_id)
            .ok_or_else(|| LibraryError::NotFound(format!("book {}", book_id)))?;

        if !member.has_borrowed(book_id) {
            return Err(LibraryError::InvalidState(format!(
                "book {} is not recorded as borrowed by {}",
                book_id,
                member.name()
            )));
        }
        if book.available_copies() >= book.total_copies() {
            return Err(LibraryError::InvalidState(format!(
                "all copies of '{}' are already accounted for",
                book.title()
            )));
        }
        let position = self
            .loans
            .iter()
            .position(|loan| loan.matches(book_id, member_id))
            .ok_or_else(|| {
                LibraryError::InvalidState(format!(
                    "no loan record for book {} and member {}",
                    book_id, member_id
                ))
            })?;

        member.remove_borrowed(book_id)?;
        book.return_copy()?;
        let loan = self.loans.remove(position);
        tracing::debug!(member_id = %member_id, book_id = %book_id, "Returned book");
        Ok(loan)
    }

    /// Active loans, in the order they were made
    pub fn loans(&self) -> &[LoanRecord] {
        &self.loans
    }

    pub fn loans_for_member(&self, member_id: MemberId) -> Vec<&LoanRecord> {
        self.loans
            .iter()
            .filter(|loan| loan.member_id == member_id)
            .collect()
    }

    /// Loans past their due date as of `today`, earliest due first
    pub fn overdue_loans(&self, today: NaiveDate) -> Vec<&LoanRecord> {
        let mut overdue: Vec<&LoanRecord> = self
            .loans
            .iter()
            .filter(|loan| loan.is_overdue(today))
            .collect();
        overdue.sort_by_key(|loan| loan.due_date);
        overdue
    }

    fn resolve_book_id(&self, book_ref: &BookRef) -> Result<BookId> {
        self.resolve_book(book_ref)
            .map(Book::id)
            .ok_or_else(|| LibraryError::NotFound(format!("book with {}", book_ref)))
    }

    // ==================== Consistency ====================

    /// Raise id counters past the highest ids in use.
    ///
    /// Counters never move backwards, so ids of deleted entities are not
    /// handed out again.
    pub fn sync_counters(&mut self) {
        let book_floor = self.books.keys().next_back().map_or(1, |id| id.0 + 1);
        let member_floor = self.members.keys().next_back().map_or(1, |id| id.0 + 1);
        self.next_book_id = self.next_book_id.max(book_floor);
        self.next_member_id = self.next_member_id.max(member_floor);
    }

    /// Rebuild the ISBN index from the book map
    pub(crate) fn rebuild_isbn_index(&mut self) {
        self.isbn_index = self
            .books
            .values()
            .map(|book| (book.isbn().to_string(), book.id()))
            .collect();
    }

    /// Verify every cross-entity invariant
    pub fn check_invariants(&self) -> Result<()> {
        let corrupt = |msg: String| -> Result<()> { Err(LibraryError::InvalidState(msg)) };

        if self.isbn_index.len() != self.books.len() {
            return corrupt(format!(
                "ISBN index has {} entries for {} books",
                self.isbn_index.len(),
                self.books.len()
            ));
        }
        for (id, book) in &self.books {
            if book.id() != *id {
                return corrupt(format!("book keyed {} carries id {}", id, book.id()));
            }
            if book.available_copies() > book.total_copies() {
                return corrupt(format!("book {} has more available than total copies", id));
            }
            if book.isbn().is_empty() || normalize_isbn(book.isbn()) != book.isbn() {
                return corrupt(format!("book {} has unnormalized ISBN '{}'", id, book.isbn()));
            }
            if self.isbn_index.get(book.isbn()) != Some(id) {
                return corrupt(format!("ISBN index out of step for book {}", id));
            }
            let holders: u32 = self
                .members
                .values()
                .filter(|m| m.has_borrowed(*id))
                .count() as u32;
            if holders != book.borrowed_copies() {
                return corrupt(format!(
                    "book {} has {} borrowed copies but {} holders",
                    id,
                    book.borrowed_copies(),
                    holders
                ));
            }
        }

        for (id, member) in &self.members {
            if member.id() != *id {
                return corrupt(format!("member keyed {} carries id {}", id, member.id()));
            }
            if member.borrowed_count() > member.max_books_allowed() {
                return corrupt(format!("member {} exceeds the borrow limit", id));
            }
            for (i, book_id) in member.borrowed_book_ids().iter().enumerate() {
                if member.borrowed_book_ids()[..i].contains(book_id) {
                    return corrupt(format!("member {} holds book {} twice", id, book_id));
                }
                if !self.books.contains_key(book_id) {
                    return corrupt(format!("member {} holds unknown book {}", id, book_id));
                }
                let records = self
                    .loans
                    .iter()
                    .filter(|loan| loan.matches(*book_id, *id))
                    .count();
                if records != 1 {
                    return corrupt(format!(
                        "member {} holds book {} with {} loan records",
                        id, book_id, records
                    ));
                }
            }
        }

        if let Some(loan) = self.loans.iter().find(|loan| {
            !self
                .members
                .get(&loan.member_id)
                .is_some_and(|m| m.has_borrowed(loan.book_id))
        }) {
            return corrupt(format!(
                "loan record for book {} and member {} has no matching hold",
                loan.book_id, loan.member_id
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn clean_code() -> NewBook {
        NewBook::new("Clean Code", "R. Martin", "9780132350884", 1)
    }

    #[test]
    fn test_add_book_assigns_sequential_ids() {
        let mut library = Library::new();
        let first = library.add_book(clean_code()).unwrap().id();
        let second = library
            .add_book(NewBook::new("Dune", "F. Herbert", "0441013597", 2))
            .unwrap()
            .id();
        assert_eq!(first, BookId(1));
        assert_eq!(second, BookId(2));
        assert_eq!(library.next_book_id(), BookId(3));
    }

    #[test]
    fn test_ids_never_reused() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        assert!(library.remove_book(BookId(1)).unwrap());
        let id = library.add_book(clean_code()).unwrap().id();
        assert_eq!(id, BookId(2));
    }

    #[test]
    fn test_duplicate_isbn_any_format() {
        let mut library = Library::new();
        library
            .add_book(NewBook::new("A", "X", "978-0-13", 1))
            .unwrap();
        let err = library
            .add_book(NewBook::new("B", "Y", "9780 13", 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert_eq!(library.book_count(), 1);
        assert_eq!(library.next_book_id(), BookId(2));
    }

    #[test]
    fn test_update_book_rekeys_isbn() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library
            .update_book(
                BookId(1),
                NewBook::new("Clean Code 2e", "R. Martin", "0-306-40615-2", 3),
            )
            .unwrap();

        assert!(library.find_book_by_isbn("9780132350884").is_none());
        let book = library.find_book_by_isbn("0306406152").unwrap();
        assert_eq!(book.title(), "Clean Code 2e");
        assert_eq!(book.available_copies(), 3);
        library.check_invariants().unwrap();
    }

    #[test]
    fn test_update_book_keeps_own_isbn() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        let book = library
            .update_book(
                BookId(1),
                NewBook::new("Clean Code", "Robert Martin", "978-0132350884", 1),
            )
            .unwrap();
        assert_eq!(book.author(), "Robert Martin");
    }

    #[test]
    fn test_update_book_duplicate_isbn() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library
            .add_book(NewBook::new("Dune", "F. Herbert", "0441013597", 1))
            .unwrap();
        let err = library
            .update_book(BookId(2), NewBook::new("Dune", "F. Herbert", "9780132350884", 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DuplicateKey);
        assert_eq!(library.find_book(BookId(2)).unwrap().isbn(), "0441013597");
        library.check_invariants().unwrap();
    }

    #[test]
    fn test_update_book_not_found() {
        let mut library = Library::new();
        let err = library.update_book(BookId(9), clean_code()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_update_book_total_below_borrowed() {
        let mut library = Library::new();
        library
            .add_book(NewBook::new("Clean Code", "R. Martin", "9780132350884", 2))
            .unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();
        library.add_student("Bob", "bob@x.com").unwrap();
        library.borrow_on(MemberId(1), &BookId(1).into(), today()).unwrap();
        library.borrow_on(MemberId(2), &BookId(1).into(), today()).unwrap();

        let err = library
            .update_book(
                BookId(1),
                NewBook::new("Renamed", "R. Martin", "0306406152", 1),
            )
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        let book = library.find_book(BookId(1)).unwrap();
        assert_eq!(book.title(), "Clean Code");
        assert!(library.find_book_by_isbn("9780132350884").is_some());
        library.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_book() {
        let mut library = Library::new();
        assert!(!library.remove_book(BookId(1)).unwrap());
        library.add_book(clean_code()).unwrap();
        assert!(library.remove_book(BookId(1)).unwrap());
        assert!(library.find_book_by_isbn("9780132350884").is_none());
    }

    #[test]
    fn test_remove_borrowed_book_conflict() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();
        library.borrow_on(MemberId(1), &BookId(1).into(), today()).unwrap();

        let err = library.remove_book(BookId(1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert!(library.find_book(BookId(1)).is_some());
    }

    #[test]
    fn test_list_and_search_sorted_by_title() {
        let mut library = Library::new();
        library
            .add_book(NewBook::new("Refactoring", "M. Fowler", "0201485672", 1))
            .unwrap();
        library.add_book(clean_code()).unwrap();
        library
            .add_book(NewBook::new("Clean Architecture", "R. Martin", "0134494164", 1))
            .unwrap();

        let titles: Vec<&str> = library.list_books().iter().map(|b| b.title()).collect();
        assert_eq!(titles, vec!["Clean Architecture", "Clean Code", "Refactoring"]);

        let titles: Vec<&str> = library
            .search_books("MARTIN")
            .iter()
            .map(|b| b.title())
            .collect();
        assert_eq!(titles, vec!["Clean Architecture", "Clean Code"]);

        assert_eq!(library.search_books("0201").len(), 1);
        assert!(library.search_books("tolkien").is_empty());
    }

    #[test]
    fn test_members() {
        let mut library = Library::new();
        library.add_professor("Turing", "alan@x.com").unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();
        let names: Vec<&str> = library.list_members().iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["Ada", "Turing"]);

        let member = library
            .update_member(MemberId(2), "Ada Lovelace", "ada@lovelace.org")
            .unwrap();
        assert_eq!(member.name(), "Ada Lovelace");
        assert_eq!(member.role(), Role::Student);

        assert_eq!(
            library.update_member(MemberId(7), "X", "x@x").unwrap_err().kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            library.add_student(" ", "x@x").unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(library.next_member_id(), MemberId(3));
    }

    #[test]
    fn test_remove_member_with_loans_conflict() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();
        library.borrow_on(MemberId(1), &BookId(1).into(), today()).unwrap();

        assert_eq!(
            library.remove_member(MemberId(1)).unwrap_err().kind(),
            ErrorKind::Conflict
        );
        library.return_book(MemberId(1), &BookId(1).into()).unwrap();
        assert!(library.remove_member(MemberId(1)).unwrap());
        assert!(!library.remove_member(MemberId(1)).unwrap());
    }

    #[test]
    fn test_borrow_unknown_refs() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();

        let err = library
            .borrow_on(MemberId(5), &BookId(1).into(), today())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = library
            .borrow_on(MemberId(1), &BookRef::Isbn("000".to_string()), today())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(library.loans().is_empty());
    }

    #[test]
    fn test_borrow_limit_is_atomic() {
        let mut library = Library::new();
        for (i, isbn) in ["111", "222", "333", "444"].iter().enumerate() {
            library
                .add_book(NewBook::new(format!("Book {}", i), "A", *isbn, 1))
                .unwrap();
        }
        library.add_student("Ada", "ada@x.com").unwrap();
        for id in 1..=3 {
            library.borrow_on(MemberId(1), &BookId(id).into(), today()).unwrap();
        }
        let err = library
            .borrow_on(MemberId(1), &BookId(4).into(), today())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(library.find_book(BookId(4)).unwrap().available_copies(), 1);
        assert_eq!(library.loans().len(), 3);
        library.check_invariants().unwrap();
    }

    #[test]
    fn test_same_book_twice_rejected() {
        let mut library = Library::new();
        library
            .add_book(NewBook::new("Clean Code", "R. Martin", "9780132350884", 2))
            .unwrap();
        library.add_professor("Turing", "alan@x.com").unwrap();
        library.borrow_on(MemberId(1), &BookId(1).into(), today()).unwrap();
        let err = library
            .borrow_on(MemberId(1), &BookId(1).into(), today())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(library.find_book(BookId(1)).unwrap().available_copies(), 1);
    }

    #[test]
    fn test_professor_loan_duration() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library.add_professor("Turing", "alan@x.com").unwrap();
        let loan = library
            .borrow_on(MemberId(1), &BookId(1).into(), today())
            .unwrap();
        assert_eq!(loan.due_date, today() + chrono::Duration::days(28));
    }

    #[test]
    fn test_return_without_borrow() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();
        let err = library
            .return_book(MemberId(1), &BookId(1).into())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(
            library
                .return_book(MemberId(1), &BookId(3).into())
                .unwrap_err()
                .kind(),
            ErrorKind::NotFound
        );
    }

    #[test]
    fn test_overdue_loans() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library
            .add_book(NewBook::new("Dune", "F. Herbert", "0441013597", 1))
            .unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();
        library.add_professor("Turing", "alan@x.com").unwrap();
        library.borrow_on(MemberId(2), &BookId(2).into(), today()).unwrap();
        library.borrow_on(MemberId(1), &BookId(1).into(), today()).unwrap();

        let later = today() + chrono::Duration::days(20);
        let overdue = library.overdue_loans(later);
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].member_id, MemberId(1));
        assert_eq!(library.loans_for_member(MemberId(2)).len(), 1);
    }

    #[test]
    fn test_sync_counters() {
        let mut library = Library::new();
        library.sync_counters();
        assert_eq!(library.next_book_id(), BookId(1));
        assert_eq!(library.next_member_id(), MemberId(1));

        library.add_book(clean_code()).unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();
        library.add_student("Bob", "bob@x.com").unwrap();
        library.next_book_id = 1;
        library.next_member_id = 1;
        library.sync_counters();
        assert_eq!(library.next_book_id(), BookId(2));
        assert_eq!(library.next_member_id(), MemberId(3));
    }

    #[test]
    fn test_sync_counters_never_lowers() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library
            .add_book(NewBook::new("Dune", "F. Herbert", "0441013597", 1))
            .unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();
        library.add_student("Bob", "bob@x.com").unwrap();
        assert!(library.remove_book(BookId(2)).unwrap());
        assert!(library.remove_member(MemberId(2)).unwrap());

        library.sync_counters();
        assert_eq!(library.next_book_id(), BookId(3));
        assert_eq!(library.next_member_id(), MemberId(3));
        assert_eq!(
            library.add_book(NewBook::new("SICP", "Abelson", "0262510871", 1)).unwrap().id(),
            BookId(3)
        );
    }

    #[test]
    fn test_input_ref_prefers_isbn() {
        let mut library = Library::new();
        library.add_book(NewBook::new("Short", "A", "2", 1)).unwrap();
        library
            .add_book(NewBook::new("Dune", "F. Herbert", "0441013597", 1))
            .unwrap();
        library.add_student("Ada", "ada@x.com").unwrap();

        assert_eq!(library.resolve_book(&BookRef::parse("2")).unwrap().id(), BookId(1));
        assert_eq!(library.resolve_book(&BookRef::parse("1")).unwrap().id(), BookId(1));
        assert_eq!(
            library.resolve_book(&BookRef::parse("0-441-01359-7")).unwrap().id(),
            BookId(2)
        );
        assert!(library.resolve_book(&BookRef::parse("7")).is_none());
        assert!(library.resolve_book(&BookRef::parse("")).is_none());

        let loan = library
            .borrow_on(MemberId(1), &BookRef::parse("2"), today())
            .unwrap();
        assert_eq!(loan.book_id, BookId(1));
        assert_eq!(library.find_book(BookId(2)).unwrap().available_copies(), 1);

        let err = library
            .borrow_on(MemberId(1), &BookRef::parse("Dune"), today())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(err.to_string().contains("'Dune'"));
    }

    #[test]
    fn test_check_invariants_detects_stale_index() {
        let mut library = Library::new();
        library.add_book(clean_code()).unwrap();
        library.isbn_index.clear();
        assert_eq!(
            library.check_invariants().unwrap_err().kind(),
            ErrorKind::InvalidState
        );
        library.rebuild_isbn_index();
        library.check_invariants().unwrap();
    }
}
