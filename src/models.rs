//! Domain models that mirror the SQLite schema and get passed throughout the
//! console front-end. The intent is that these types stay light-weight data
//! holders so other layers can focus on prompting and persistence logic.

use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone)]
/// The person driving the session. Constructed once at startup, either from
/// the interactive identity query or synthesized for `admin` launches, and
/// never mutated afterwards.
pub struct User {
    /// Given name, used on its own in the goodbye line.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Birth date. Only month and day matter to the welcome message; the year
    /// is kept because it is part of what the user typed.
    pub birthday: NaiveDate,
    /// Whether the admin passphrase matched at identity query time. Gates
    /// entry into the administrator menu.
    pub admin: bool,
}

impl User {
    pub fn new(first_name: &str, last_name: &str, birthday: NaiveDate, admin: bool) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birthday,
            admin,
        }
    }

    /// `First Last`, the form used by the welcome banner and stored on loans
    /// and reservations as the borrower/reserver label.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}

#[derive(Debug, Clone)]
/// In-memory representation of a catalog item, mirroring rows in the `items`
/// table.
pub struct Item {
    /// Primary key from the SQLite store. Kept around even when a view only
    /// needs display information because loan/reservation flows bubble the id
    /// back to the persistence layer.
    pub id: i64,
    /// Title displayed in lists and search results.
    pub title: String,
    /// Author field used both for display and search.
    pub author: String,
    /// ISBN kept as raw text; it is the key users type to pick an item, so we
    /// never normalize it.
    pub isbn: String,
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {} [{}]", self.title, self.author, self.isbn)
    }
}

#[derive(Debug, Clone)]
/// A loan row joined with enough item fields to print a one-line summary
/// without a second query.
pub struct Loan {
    pub id: i64,
    pub item_id: i64,
    pub title: String,
    pub isbn: String,
    /// Full name of the borrower as captured at loan time.
    pub borrower: String,
    pub loaned_on: NaiveDate,
    pub due_on: NaiveDate,
}

impl Loan {
    /// A loan counts as overdue strictly after its due date, not on it.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_on < today
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] - {} (due {})",
            self.title, self.isbn, self.borrower, self.due_on
        )
    }
}

#[derive(Debug, Clone)]
/// A reservation row joined with its item fields, same rationale as [`Loan`].
pub struct Reservation {
    pub id: i64,
    pub item_id: i64,
    pub title: String,
    pub isbn: String,
    /// Full name of the reserver as captured at reservation time.
    pub reserver: String,
    pub reserved_on: NaiveDate,
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] - {} (since {})",
            self.title, self.isbn, self.reserver, self.reserved_on
        )
    }
}
