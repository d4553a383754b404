use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::connection::{parse_date, DATE_FORMAT};
use crate::models::{Item, Loan};

/// Columns every loan query selects, joined with the item so listings can be
/// printed without a second round-trip.
const LOAN_COLUMNS: &str = "l.id, l.item_id, i.title, i.isbn, l.borrower, l.loaned_on, l.due_on";

fn loan_from_row(row: &Row<'_>) -> rusqlite::Result<Loan> {
    let loaned_on: String = row.get(5)?;
    let due_on: String = row.get(6)?;
    Ok(Loan {
        id: row.get(0)?,
        item_id: row.get(1)?,
        title: row.get(2)?,
        isbn: row.get(3)?,
        borrower: row.get(4)?,
        loaned_on: parse_date(&loaned_on)?,
        due_on: parse_date(&due_on)?,
    })
}

/// Record a loan on an item, returning the hydrated struct so the caller can
/// echo the due date straight back to the user.
pub fn create_loan(
    conn: &Connection,
    item: &Item,
    borrower: &str,
    loaned_on: NaiveDate,
    due_on: NaiveDate,
) -> Result<Loan> {
    conn.execute(
        "INSERT INTO loans (item_id, borrower, loaned_on, due_on) VALUES (?1, ?2, ?3, ?4)",
        params![
            item.id,
            borrower,
            loaned_on.format(DATE_FORMAT).to_string(),
            due_on.format(DATE_FORMAT).to_string()
        ],
    )
    .context("failed to insert loan")?;

    Ok(Loan {
        id: conn.last_insert_rowid(),
        item_id: item.id,
        title: item.title.clone(),
        isbn: item.isbn.clone(),
        borrower: borrower.to_string(),
        loaned_on,
        due_on,
    })
}

/// Close a loan. We surface an explicit error when nothing was deleted so the
/// return flow can show a friendly message instead of silently continuing.
pub fn delete_loan(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM loans WHERE id = ?1", params![id])
        .context("failed to delete loan")?;

    if deleted == 0 {
        Err(anyhow!("Loan not found"))
    } else {
        Ok(())
    }
}

/// Every loan held by one borrower, ordered by due date so the most urgent
/// return is listed first.
pub fn fetch_loans_for(conn: &Connection, borrower: &str) -> Result<Vec<Loan>> {
    let query = format!(
        "SELECT {LOAN_COLUMNS} FROM loans l
         INNER JOIN items i ON i.id = l.item_id
         WHERE l.borrower = ?1
         ORDER BY l.due_on, i.title COLLATE NOCASE"
    );
    let mut stmt = conn.prepare(&query).context("failed to prepare loan query")?;

    let loans = stmt
        .query_map(params![borrower], loan_from_row)
        .context("failed to load loans")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect loans")?;

    Ok(loans)
}

/// Every open loan in the catalog.
pub fn fetch_all_loans(conn: &Connection) -> Result<Vec<Loan>> {
    let query = format!(
        "SELECT {LOAN_COLUMNS} FROM loans l
         INNER JOIN items i ON i.id = l.item_id
         ORDER BY l.due_on, i.title COLLATE NOCASE"
    );
    let mut stmt = conn.prepare(&query).context("failed to prepare loan query")?;

    let loans = stmt
        .query_map([], loan_from_row)
        .context("failed to load loans")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect loans")?;

    Ok(loans)
}

/// Loans whose due date has passed. The text comparison is sound because ISO
/// dates sort chronologically.
pub fn fetch_overdue_loans(conn: &Connection, today: NaiveDate) -> Result<Vec<Loan>> {
    let query = format!(
        "SELECT {LOAN_COLUMNS} FROM loans l
         INNER JOIN items i ON i.id = l.item_id
         WHERE l.due_on < ?1
         ORDER BY l.due_on, i.title COLLATE NOCASE"
    );
    let mut stmt = conn
        .prepare(&query)
        .context("failed to prepare overdue query")?;

    let loans = stmt
        .query_map(params![today.format(DATE_FORMAT).to_string()], loan_from_row)
        .context("failed to load overdue loans")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect overdue loans")?;

    Ok(loans)
}

/// The open loan on a given item, if any. Each copy can be on loan at most
/// once, so a single optional row is enough.
pub fn find_loan_for_item(conn: &Connection, item_id: i64) -> Result<Option<Loan>> {
    let query = format!(
        "SELECT {LOAN_COLUMNS} FROM loans l
         INNER JOIN items i ON i.id = l.item_id
         WHERE l.item_id = ?1"
    );
    conn.query_row(&query, params![item_id], loan_from_row)
        .optional()
        .context("failed to look up loan for item")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_item, delete_item, open_catalog};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn loans_round_trip_with_parsed_dates() {
        let conn = open_catalog().unwrap();
        let item = create_item(&conn, "Dune", "Herbert", "1").unwrap();
        create_loan(&conn, &item, "Ada Lovelace", date(2026, 8, 1), date(2026, 8, 29)).unwrap();

        let loans = fetch_loans_for(&conn, "Ada Lovelace").unwrap();
        assert_eq!(loans.len(), 1);
        assert_eq!(loans[0].due_on, date(2026, 8, 29));
        assert!(fetch_loans_for(&conn, "Somebody Else").unwrap().is_empty());
    }

    #[test]
    fn overdue_listing_excludes_loans_due_today() {
        let conn = open_catalog().unwrap();
        let a = create_item(&conn, "A", "X", "1").unwrap();
        let b = create_item(&conn, "B", "Y", "2").unwrap();
        let today = date(2026, 8, 28);
        create_loan(&conn, &a, "P", date(2026, 7, 1), date(2026, 7, 29)).unwrap();
        create_loan(&conn, &b, "Q", date(2026, 8, 1), today).unwrap();

        let overdue = fetch_overdue_loans(&conn, today).unwrap();
        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].isbn, "1");
    }

    #[test]
    fn deleting_an_item_cascades_its_loans() {
        let conn = open_catalog().unwrap();
        let item = create_item(&conn, "A", "X", "1").unwrap();
        create_loan(&conn, &item, "P", date(2026, 8, 1), date(2026, 8, 29)).unwrap();

        delete_item(&conn, item.id).unwrap();
        assert!(fetch_all_loans(&conn).unwrap().is_empty());
    }
}
