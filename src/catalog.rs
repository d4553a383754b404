//! The catalog collaborator: every menu operation the session can dispatch
//! lives here as one method that owns its prompting, its queries, and its
//! printed outcome. Domain refusals (unknown ISBN, nothing to return, item
//! already taken) are printed and swallowed so the session loop never has to
//! interpret them; only infrastructure failures bubble out as errors.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{Days, Local, NaiveDate};
use rusqlite::Connection;

use crate::db;
use crate::models::{Item, User};
use crate::ui::Console;

/// How long a loan runs before it is due back.
const LOAN_PERIOD_DAYS: u64 = 28;

/// Inventory, loan, and reservation operations over the SQLite store. The
/// session owns exactly one of these for its lifetime.
pub struct Catalog {
    conn: Connection,
}

impl Catalog {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Give the connection back, mainly so tests can inspect the store after
    /// a session has run against it.
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Client operation 1: list the session user's open loans.
    pub fn show_loans<R: BufRead, W: Write>(
        &mut self,
        io: &mut Console<R, W>,
        user: &User,
    ) -> Result<()> {
        let loans = db::fetch_loans_for(&self.conn, &user.full_name())?;
        if loans.is_empty() {
            return io.line("You have no loans.");
        }
        let today = today();
        io.line("Your loans:")?;
        for loan in loans {
            let marker = if loan.is_overdue(today) { " OVERDUE" } else { "" };
            io.line(&format!("  {loan}{marker}"))?;
        }
        Ok(())
    }

    /// Client operation 2: loan an item by ISBN. A reservation the same user
    /// holds on the item is consumed by the loan; a reservation held by
    /// someone else blocks it.
    pub fn loan_item<R: BufRead, W: Write>(
        &mut self,
        io: &mut Console<R, W>,
        user: &User,
    ) -> Result<()> {
        let Some(item) = self.item_by_isbn_prompt(io, "Give ISBN to loan: ")? else {
            return Ok(());
        };
        if db::find_loan_for_item(&self.conn, item.id)?.is_some() {
            return io.line("That item is already on loan.");
        }

        let reservation = db::find_reservation_for_item(&self.conn, item.id)?;
        if let Some(reservation) = &reservation {
            if reservation.reserver != user.full_name() {
                return io.line("That item is reserved by another patron.");
            }
        }

        let today = today();
        let due = today
            .checked_add_days(Days::new(LOAN_PERIOD_DAYS))
            .context("due date out of range")?;
        let loan = db::create_loan(&self.conn, &item, &user.full_name(), today, due)?;
        if let Some(reservation) = reservation {
            db::delete_reservation(&self.conn, reservation.id)?;
        }
        io.line(&format!("Loaned {}, due back {}.", item.title, loan.due_on))
    }

    /// Client operation 3: return a loaned item by ISBN. Only the borrower's
    /// own loan qualifies.
    pub fn return_item<R: BufRead, W: Write>(
        &mut self,
        io: &mut Console<R, W>,
        user: &User,
    ) -> Result<()> {
        let Some(item) = self.item_by_isbn_prompt(io, "Give ISBN to return: ")? else {
            return Ok(());
        };
        match db::find_loan_for_item(&self.conn, item.id)? {
            Some(loan) if loan.borrower == user.full_name() => {
                db::delete_loan(&self.conn, loan.id)?;
                io.line(&format!("Returned {}.", item.title))
            }
            _ => io.line("You have no loan on that item."),
        }
    }

    /// Client operation 4: list the session user's reservations.
    pub fn show_reservations<R: BufRead, W: Write>(
        &mut self,
        io: &mut Console<R, W>,
        user: &User,
    ) -> Result<()> {
        let reservations = db::fetch_reservations_for(&self.conn, &user.full_name())?;
        if reservations.is_empty() {
            return io.line("You have no reservations.");
        }
        io.line("Your reservations:")?;
        for reservation in reservations {
            io.line(&format!("  {reservation}"))?;
        }
        Ok(())
    }

    /// Client operation 5: reserve an item by ISBN. One reservation per item.
    pub fn reserve_item<R: BufRead, W: Write>(
        &mut self,
        io: &mut Console<R, W>,
        user: &User,
    ) -> Result<()> {
        let Some(item) = self.item_by_isbn_prompt(io, "Give ISBN to reserve: ")? else {
            return Ok(());
        };
        if db::find_reservation_for_item(&self.conn, item.id)?.is_some() {
            return io.line("That item is already reserved.");
        }
        db::create_reservation(&self.conn, &item, &user.full_name(), today())?;
        io.line(&format!("Reserved {}.", item.title))
    }

    /// Client operation 6: cancel the session user's reservation on an item.
    pub fn cancel_reservation<R: BufRead, W: Write>(
        &mut self,
        io: &mut Console<R, W>,
        user: &User,
    ) -> Result<()> {
        let Some(item) = self.item_by_isbn_prompt(io, "Give ISBN to cancel: ")? else {
            return Ok(());
        };
        match db::find_reservation_for_item(&self.conn, item.id)? {
            Some(reservation) if reservation.reserver == user.full_name() => {
                db::delete_reservation(&self.conn, reservation.id)?;
                io.line(&format!("Cancelled reservation on {}.", item.title))
            }
            _ => io.line("You have no reservation on that item."),
        }
    }

    /// Client operation 7: exact ISBN lookup.
    pub fn search_by_isbn<R: BufRead, W: Write>(&mut self, io: &mut Console<R, W>) -> Result<()> {
        let isbn = io.prompt("Give ISBN to search: ")?;
        match db::find_by_isbn(&self.conn, isbn.trim())? {
            Some(item) => io.line(&format!("  {item}")),
            None => io.line("No match"),
        }
    }

    /// Client operation 8: case-insensitive title fragment search.
    pub fn search_by_title<R: BufRead, W: Write>(&mut self, io: &mut Console<R, W>) -> Result<()> {
        let fragment = io.prompt("Give title to search: ")?;
        let items = db::search_by_title(&self.conn, fragment.trim())?;
        if items.is_empty() {
            return io.line("No match");
        }
        for item in items {
            io.line(&format!("  {item}"))?;
        }
        Ok(())
    }

    /// Admin operation 101: add a new inventory item.
    pub fn add_item<R: BufRead, W: Write>(&mut self, io: &mut Console<R, W>) -> Result<()> {
        let title = io.prompt("Give title: ")?;
        let author = io.prompt("Give author: ")?;
        let isbn = io.prompt("Give ISBN: ")?;
        let isbn = isbn.trim();
        if db::find_by_isbn(&self.conn, isbn)?.is_some() {
            return io.line(&format!("An item with ISBN {isbn} already exists."));
        }
        let item = db::create_item(&self.conn, title.trim(), author.trim(), isbn)?;
        io.line(&format!("Added {item}."))
    }

    /// Admin operation 102: remove an item. Loans and reservations on it go
    /// with it via the schema's cascade.
    pub fn remove_item<R: BufRead, W: Write>(&mut self, io: &mut Console<R, W>) -> Result<()> {
        let Some(item) = self.item_by_isbn_prompt(io, "Give ISBN to remove: ")? else {
            return Ok(());
        };
        db::delete_item(&self.conn, item.id)?;
        io.line(&format!("Removed {}.", item.title))
    }

    /// Admin operation 103: every open loan, overdue ones flagged.
    pub fn show_all_loans<R: BufRead, W: Write>(&mut self, io: &mut Console<R, W>) -> Result<()> {
        let loans = db::fetch_all_loans(&self.conn)?;
        if loans.is_empty() {
            return io.line("No loans.");
        }
        let today = today();
        for loan in loans {
            let marker = if loan.is_overdue(today) { " OVERDUE" } else { "" };
            io.line(&format!("  {loan}{marker}"))?;
        }
        Ok(())
    }

    /// Admin operation 104: loans past their due date.
    pub fn show_overdue_loans<R: BufRead, W: Write>(
        &mut self,
        io: &mut Console<R, W>,
    ) -> Result<()> {
        let loans = db::fetch_overdue_loans(&self.conn, today())?;
        if loans.is_empty() {
            return io.line("No overdue loans.");
        }
        for loan in loans {
            io.line(&format!("  {loan}"))?;
        }
        Ok(())
    }

    /// Admin operation 105: every reservation.
    pub fn show_all_reservations<R: BufRead, W: Write>(
        &mut self,
        io: &mut Console<R, W>,
    ) -> Result<()> {
        let reservations = db::fetch_all_reservations(&self.conn)?;
        if reservations.is_empty() {
            return io.line("No reservations.");
        }
        for reservation in reservations {
            io.line(&format!("  {reservation}"))?;
        }
        Ok(())
    }

    /// Admin operation 106: the whole inventory, with loan and reservation
    /// status appended per item.
    pub fn show_all_items<R: BufRead, W: Write>(&mut self, io: &mut Console<R, W>) -> Result<()> {
        let items = db::fetch_all_items(&self.conn)?;
        if items.is_empty() {
            return io.line("The catalog is empty.");
        }
        for item in items {
            let status = if db::find_loan_for_item(&self.conn, item.id)?.is_some() {
                " (on loan)"
            } else if db::find_reservation_for_item(&self.conn, item.id)?.is_some() {
                " (reserved)"
            } else {
                ""
            };
            io.line(&format!("  {item}{status}"))?;
        }
        Ok(())
    }

    /// Prompt for an ISBN and resolve it, printing the refusal on a miss so
    /// each operation only handles the hit.
    fn item_by_isbn_prompt<R: BufRead, W: Write>(
        &mut self,
        io: &mut Console<R, W>,
        label: &str,
    ) -> Result<Option<Item>> {
        let isbn = io.prompt(label)?;
        let isbn = isbn.trim();
        match db::find_by_isbn(&self.conn, isbn)? {
            Some(item) => Ok(Some(item)),
            None => {
                io.line(&format!("No item with ISBN {isbn}."))?;
                Ok(None)
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::db::{
        create_item, create_loan, fetch_all_loans, fetch_reservations_for, find_by_isbn,
        open_catalog,
    };
    use crate::models::User;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(io: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        let (_, out) = io.into_inner();
        String::from_utf8(out).unwrap()
    }

    fn patron() -> User {
        User::new(
            "Ada",
            "Lovelace",
            NaiveDate::from_ymd_opt(1815, 12, 10).unwrap(),
            false,
        )
    }

    fn catalog_with_item() -> Catalog {
        let conn = open_catalog().unwrap();
        create_item(&conn, "Dune", "Frank Herbert", "9780441172719").unwrap();
        Catalog::new(conn)
    }

    #[test]
    fn loan_creates_a_28_day_loan() {
        let mut catalog = catalog_with_item();
        let mut io = console("9780441172719\n");
        catalog.loan_item(&mut io, &patron()).unwrap();

        let loans = fetch_all_loans(&catalog.conn).unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].borrower, "Ada Lovelace");
        assert_eq!(
            loans[0].due_on,
            today().checked_add_days(Days::new(28)).unwrap()
        );
        assert!(output(io).contains("Loaned Dune"));
    }

    #[test]
    fn loaning_an_unknown_isbn_changes_nothing() {
        let mut catalog = catalog_with_item();
        let mut io = console("0000\n");
        catalog.loan_item(&mut io, &patron()).unwrap();

        assert!(fetch_all_loans(&catalog.conn).unwrap().is_empty());
        assert!(output(io).contains("No item with ISBN 0000."));
    }

    #[test]
    fn loaning_a_loaned_item_is_refused() {
        let mut catalog = catalog_with_item();
        let mut io = console("9780441172719\n");
        catalog.loan_item(&mut io, &patron()).unwrap();

        let other = User::new("Grace", "Hopper", patron().birthday, false);
        let mut io = console("9780441172719\n");
        catalog.loan_item(&mut io, &other).unwrap();

        assert_eq!(fetch_all_loans(&catalog.conn).unwrap().len(), 1);
        assert!(output(io).contains("already on loan"));
    }

    #[test]
    fn loan_consumes_the_borrowers_own_reservation() {
        let mut catalog = catalog_with_item();
        let user = patron();

        let mut io = console("9780441172719\n");
        catalog.reserve_item(&mut io, &user).unwrap();
        let mut io = console("9780441172719\n");
        catalog.loan_item(&mut io, &user).unwrap();

        assert!(output(io).contains("Loaned Dune"));
        assert!(fetch_reservations_for(&catalog.conn, "Ada Lovelace")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn anothers_reservation_blocks_the_loan() {
        let mut catalog = catalog_with_item();
        let mut io = console("9780441172719\n");
        catalog.reserve_item(&mut io, &patron()).unwrap();

        let other = User::new("Grace", "Hopper", patron().birthday, false);
        let mut io = console("9780441172719\n");
        catalog.loan_item(&mut io, &other).unwrap();

        assert!(fetch_all_loans(&catalog.conn).unwrap().is_empty());
        assert!(output(io).contains("reserved by another patron"));
    }

    #[test]
    fn return_requires_the_borrowers_own_loan() {
        let mut catalog = catalog_with_item();
        let mut io = console("9780441172719\n");
        catalog.return_item(&mut io, &patron()).unwrap();
        assert!(output(io).contains("You have no loan on that item."));

        let mut io = console("9780441172719\n");
        catalog.loan_item(&mut io, &patron()).unwrap();
        let mut io = console("9780441172719\n");
        catalog.return_item(&mut io, &patron()).unwrap();
        assert!(output(io).contains("Returned Dune."));
        assert!(fetch_all_loans(&catalog.conn).unwrap().is_empty());
    }

    #[test]
    fn overdue_loans_are_flagged_in_listings() {
        let mut catalog = catalog_with_item();
        let item = find_by_isbn(&catalog.conn, "9780441172719").unwrap().unwrap();
        let loaned = today().checked_sub_days(Days::new(40)).unwrap();
        let due = today().checked_sub_days(Days::new(12)).unwrap();
        create_loan(&catalog.conn, &item, "Ada Lovelace", loaned, due).unwrap();

        let mut io = console("");
        catalog.show_loans(&mut io, &patron()).unwrap();
        let text = output(io);
        assert!(text.contains("Dune [9780441172719] - Ada Lovelace"));
        assert!(text.contains("OVERDUE"));

        let mut io = console("");
        catalog.show_all_loans(&mut io).unwrap();
        assert!(output(io).contains("OVERDUE"));
    }

    #[test]
    fn current_loans_carry_no_overdue_marker() {
        let mut catalog = catalog_with_item();
        let mut io = console("9780441172719\n");
        catalog.loan_item(&mut io, &patron()).unwrap();

        let mut io = console("");
        catalog.show_all_loans(&mut io).unwrap();
        assert!(!output(io).contains("OVERDUE"));
    }

    #[test]
    fn isbn_search_reports_hit_and_miss() {
        let mut catalog = catalog_with_item();
        let mut io = console("9780441172719\n");
        catalog.search_by_isbn(&mut io).unwrap();
        assert!(output(io).contains("Dune / Frank Herbert [9780441172719]"));

        let mut io = console("1111\n");
        catalog.search_by_isbn(&mut io).unwrap();
        assert!(output(io).contains("No match"));
    }

    #[test]
    fn add_then_remove_item_round_trips() {
        let conn = open_catalog().unwrap();
        let mut catalog = Catalog::new(conn);

        let mut io = console("Hyperion\nDan Simmons\n9780553283686\n");
        catalog.add_item(&mut io).unwrap();
        assert!(output(io).contains("Added Hyperion"));

        let mut io = console("Hyperion Again\nD. S.\n9780553283686\n");
        catalog.add_item(&mut io).unwrap();
        assert!(output(io).contains("already exists"));

        let mut io = console("9780553283686\n");
        catalog.remove_item(&mut io).unwrap();
        assert!(output(io).contains("Removed Hyperion."));
    }

    #[test]
    fn inventory_listing_shows_status() {
        let mut catalog = catalog_with_item();
        create_item(&catalog.conn, "Hyperion", "Dan Simmons", "9780553283686").unwrap();

        let mut io = console("9780441172719\n");
        catalog.loan_item(&mut io, &patron()).unwrap();

        let mut io = console("");
        catalog.show_all_items(&mut io).unwrap();
        let text = output(io);
        assert!(text.contains("Dune / Frank Herbert [9780441172719] (on loan)"));
        assert!(text.contains("Hyperion / Dan Simmons [9780553283686]"));
    }
}
