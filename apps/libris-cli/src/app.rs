//! Application state and main menu loop

use std::io::{BufRead, Write};

use chrono::Local;
use thiserror::Error;

use libris_core::{
    BookId, BookRef, Library, LibraryError, LibraryStorage, MemberId, NewBook, Role,
};

use crate::menu::MenuChoice;
use crate::prompt::{PromptError, Prompter};

/// Errors surfaced by a menu action
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Prompt(PromptError::Io(err))
    }
}

/// What a menu action did to the library
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Unchanged,
    Changed,
    Exit,
}

/// Main application state
pub struct App<R, W> {
    /// The library being managed
    pub library: Library,
    storage: LibraryStorage,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> App<R, W> {
    /// Create an application over an already loaded library
    pub fn new(library: Library, storage: LibraryStorage, input: R, output: W) -> Self {
        Self {
            library,
            storage,
            prompter: Prompter::new(input, output),
        }
    }

    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Run the menu until the user exits or input closes
    pub fn run(&mut self) -> Result<(), AppError> {
        loop {
            self.print_menu()?;
            let choice = match self.prompter.line("Choose an option: ") {
                Ok(choice) => choice,
                Err(PromptError::Eof) => return self.finish(),
                Err(e) => return Err(e.into()),
            };
            let Some(choice) = MenuChoice::parse(&choice) else {
                writeln!(self.prompter.out(), "Unknown option. Please try again.")?;
                continue;
            };

            match self.dispatch(choice) {
                Ok(Outcome::Exit) => return self.finish(),
                Ok(Outcome::Changed) if choice.is_mutating() => {
                    if let Err(e) = self.persist() {
                        writeln!(self.prompter.out(), "Operation failed: {}", e)?;
                    }
                }
                Ok(_) => {}
                Err(AppError::Prompt(PromptError::Eof)) => return self.finish(),
                Err(AppError::Prompt(e)) => return Err(e.into()),
                Err(AppError::Library(e)) => {
                    tracing::debug!(error = %e, "Menu action failed");
                    writeln!(self.prompter.out(), "Operation failed: {}", e)?;
                }
            }
        }
    }

    fn finish(&mut self) -> Result<(), AppError> {
        self.persist()?;
        writeln!(self.prompter.out(), "Data saved. Goodbye!")?;
        Ok(())
    }

    fn persist(&self) -> Result<(), AppError> {
        self.storage.save(&self.library)?;
        Ok(())
    }

    fn print_menu(&mut self) -> Result<(), AppError> {
        let out = self.prompter.out();
        writeln!(out)?;
        writeln!(out, "=== Library Management ===")?;
        for choice in MenuChoice::ALL {
            writeln!(out, "{}", choice)?;
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice) -> Result<Outcome, AppError> {
        match choice {
            MenuChoice::AddBook => self.add_book(),
            MenuChoice::EditBook => self.edit_book(),
            MenuChoice::DeleteBook => self.delete_book(),
            MenuChoice::ListBooks => self.list_books(),
            MenuChoice::SearchBooks => self.search_books(),
            MenuChoice::AddMember => self.add_member(),
            MenuChoice::EditMember => self.edit_member(),
            MenuChoice::DeleteMember => self.delete_member(),
            MenuChoice::ListMembers => self.list_members(),
            MenuChoice::Borrow => self.borrow(),
            MenuChoice::Return => self.return_book(),
            MenuChoice::ListLoans => self.list_loans(),
            MenuChoice::ListOverdue => self.list_overdue(),
            MenuChoice::SaveAndExit => Ok(Outcome::Exit),
        }
    }

    // ==================== Books ====================

    fn add_book(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Add Book --")?;
        let title = self.prompter.required("Title")?;
        let author = self.prompter.required("Author")?;
        let isbn = self.prompter.required("ISBN")?;
        let total = self.prompter.int("Total copies", 0)?;
        let description = self.prompter.optional("Description (optional)")?;

        let draft = NewBook::new(title, author, isbn, total).with_description(description);
        let id = self.library.add_book(draft)?.id();
        writeln!(self.prompter.out(), "Book added with ID: {}", id)?;
        Ok(Outcome::Changed)
    }

    fn edit_book(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Edit Book --")?;
        let id = self.prompt_book_id()?;
        let Some(book) = self.library.find_book(id).cloned() else {
            writeln!(self.prompter.out(), "Book not found.")?;
            return Ok(Outcome::Unchanged);
        };

        let title = self.prompter.with_default("Title", book.title())?;
        let author = self.prompter.with_default("Author", book.author())?;
        let isbn = self.prompter.with_default("ISBN", book.isbn())?;
        let total = self.prompter.int_with_default(
            "Total copies",
            i64::from(book.total_copies()),
            i64::from(book.borrowed_copies()),
        )?;
        let description = self.prompter.with_default("Description", book.description())?;

        let draft = NewBook::new(title, author, isbn, total).with_description(description);
        self.library.update_book(id, draft)?;
        writeln!(self.prompter.out(), "Book updated.")?;
        Ok(Outcome::Changed)
    }

    fn delete_book(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Delete Book --")?;
        let id = self.prompt_book_id()?;
        if self.library.remove_book(id)? {
            writeln!(self.prompter.out(), "Book removed.")?;
            Ok(Outcome::Changed)
        } else {
            writeln!(self.prompter.out(), "Book not found.")?;
            Ok(Outcome::Unchanged)
        }
    }

    fn list_books(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- All Books --")?;
        let books = self.library.list_books();
        let out = self.prompter.out();
        if books.is_empty() {
            writeln!(out, "No books registered.")?;
        }
        for book in books {
            writeln!(out, "ID: {} | {}", book.id(), book)?;
        }
        Ok(Outcome::Unchanged)
    }

    fn search_books(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Search Books --")?;
        let query = self.prompter.required("Keyword")?;
        let books = self.library.search_books(&query);
        let out = self.prompter.out();
        if books.is_empty() {
            writeln!(out, "No books match your search.")?;
        }
        for book in books {
            writeln!(out, "ID: {} | {}", book.id(), book)?;
        }
        Ok(Outcome::Unchanged)
    }

    // ==================== Members ====================

    fn add_member(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Add Member --")?;
        let kind = self.prompter.required("Type (student/professor)")?;
        let Some(role) = Role::parse(&kind) else {
            writeln!(self.prompter.out(), "Unsupported member type.")?;
            return Ok(Outcome::Unchanged);
        };
        let name = self.prompter.required("Name")?;
        let email = self.prompter.required("Email")?;

        let id = self.library.add_member(role, &name, &email)?.id();
        writeln!(self.prompter.out(), "Member added with ID: {}", id)?;
        Ok(Outcome::Changed)
    }

    fn edit_member(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Edit Member --")?;
        let id = self.prompt_member_id()?;
        let Some(member) = self.library.find_member(id).cloned() else {
            writeln!(self.prompter.out(), "Member not found.")?;
            return Ok(Outcome::Unchanged);
        };

        let name = self.prompter.with_default("Name", member.name())?;
        let email = self.prompter.with_default("Email", member.email())?;
        self.library.update_member(id, &name, &email)?;
        writeln!(self.prompter.out(), "Member updated.")?;
        Ok(Outcome::Changed)
    }

    fn delete_member(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Delete Member --")?;
        let id = self.prompt_member_id()?;
        if self.library.remove_member(id)? {
            writeln!(self.prompter.out(), "Member removed.")?;
            Ok(Outcome::Changed)
        } else {
            writeln!(self.prompter.out(), "Member not found.")?;
            Ok(Outcome::Unchanged)
        }
    }

    fn list_members(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- All Members --")?;
        let members = self.library.list_members();
        let out = self.prompter.out();
        if members.is_empty() {
            writeln!(out, "No members registered.")?;
        }
        for member in members {
            writeln!(out, "ID: {} | {}", member.id(), member)?;
        }
        Ok(Outcome::Unchanged)
    }

    // ==================== Loans ====================

    fn borrow(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Borrow Book --")?;
        let member_id = self.prompt_member_id()?;
        let book_ref = BookRef::parse(&self.prompter.required("Book ID or ISBN")?);
        let loan = self.library.borrow(member_id, &book_ref)?;
        writeln!(
            self.prompter.out(),
            "Book borrowed successfully. Due: {}",
            loan.due_date
        )?;
        Ok(Outcome::Changed)
    }

    fn return_book(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Return Book --")?;
        let member_id = self.prompt_member_id()?;
        let book_ref = BookRef::parse(&self.prompter.required("Book ID or ISBN")?);
        self.library.return_book(member_id, &book_ref)?;
        writeln!(self.prompter.out(), "Book returned. Thank you!")?;
        Ok(Outcome::Changed)
    }

    fn list_loans(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Active Loans --")?;
        let out = self.prompter.out();
        if self.library.loans().is_empty() {
            writeln!(out, "No active loans.")?;
        }
        for loan in self.library.loans() {
            writeln!(out, "{}", loan)?;
        }
        Ok(Outcome::Unchanged)
    }

    fn list_overdue(&mut self) -> Result<Outcome, AppError> {
        writeln!(self.prompter.out(), "-- Overdue Loans --")?;
        let overdue = self.library.overdue_loans(Local::now().date_naive());
        let out = self.prompter.out();
        if overdue.is_empty() {
            writeln!(out, "No overdue loans.")?;
        }
        for loan in overdue {
            writeln!(out, "{}", loan)?;
        }
        Ok(Outcome::Unchanged)
    }

    // ==================== Input helpers ====================

    fn prompt_book_id(&mut self) -> Result<BookId, AppError> {
        Ok(BookId(self.prompt_id("Book ID")?))
    }

    fn prompt_member_id(&mut self) -> Result<MemberId, AppError> {
        Ok(MemberId(self.prompt_id("Member ID")?))
    }

    fn prompt_id(&mut self, label: &str) -> Result<u32, AppError> {
        let value = self.prompter.int(label, 1)?;
        u32::try_from(value).map_err(|_| {
            LibraryError::InvalidArgument(format!("{} {} is out of range", label, value)).into()
        })
    }
}
