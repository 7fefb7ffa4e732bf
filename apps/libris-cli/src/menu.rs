//! Main menu entries

/// One entry of the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddBook,
    EditBook,
    DeleteBook,
    ListBooks,
    SearchBooks,
    AddMember,
    EditMember,
    DeleteMember,
    ListMembers,
    Borrow,
    Return,
    ListLoans,
    ListOverdue,
    SaveAndExit,
}

impl MenuChoice {
    /// All entries in menu order
    pub const ALL: [MenuChoice; 14] = [
        MenuChoice::AddBook,
        MenuChoice::EditBook,
        MenuChoice::DeleteBook,
        MenuChoice::ListBooks,
        MenuChoice::SearchBooks,
        MenuChoice::AddMember,
        MenuChoice::EditMember,
        MenuChoice::DeleteMember,
        MenuChoice::ListMembers,
        MenuChoice::Borrow,
        MenuChoice::Return,
        MenuChoice::ListLoans,
        MenuChoice::ListOverdue,
        MenuChoice::SaveAndExit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::AddBook => "Add book",
            MenuChoice::EditBook => "Edit book",
            MenuChoice::DeleteBook => "Delete book",
            MenuChoice::ListBooks => "List books",
            MenuChoice::SearchBooks => "Search books",
            MenuChoice::AddMember => "Add member",
            MenuChoice::EditMember => "Edit member",
            MenuChoice::DeleteMember => "Delete member",
            MenuChoice::ListMembers => "List members",
            MenuChoice::Borrow => "Borrow book",
            MenuChoice::Return => "Return book",
            MenuChoice::ListLoans => "View active loans",
            MenuChoice::ListOverdue => "View overdue loans",
            MenuChoice::SaveAndExit => "Save & exit",
        }
    }

    /// Menu number shown to the user (1-based)
    pub fn number(&self) -> usize {
        Self::ALL
            .iter()
            .position(|c| c == self)
            .map_or(0, |i| i + 1)
    }

    /// Parse the user's menu selection
    pub fn parse(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i)).copied()
    }

    /// Whether a successful run of this entry changes library state
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            MenuChoice::AddBook
                | MenuChoice::EditBook
                | MenuChoice::DeleteBook
                | MenuChoice::AddMember
                | MenuChoice::EditMember
                | MenuChoice::DeleteMember
                | MenuChoice::Borrow
                | MenuChoice::Return
        )
    }
}

impl std::fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.number(), self.label())
    }
}
