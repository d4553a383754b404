use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::connection::{parse_date, DATE_FORMAT};
use crate::models::{Item, Reservation};

/// Columns every reservation query selects, joined with the item for
/// one-line summaries.
const RESERVATION_COLUMNS: &str = "r.id, r.item_id, i.title, i.isbn, r.reserver, r.reserved_on";

fn reservation_from_row(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    let reserved_on: String = row.get(5)?;
    Ok(Reservation {
        id: row.get(0)?,
        item_id: row.get(1)?,
        title: row.get(2)?,
        isbn: row.get(3)?,
        reserver: row.get(4)?,
        reserved_on: parse_date(&reserved_on)?,
    })
}

/// Record a reservation on an item.
pub fn create_reservation(
    conn: &Connection,
    item: &Item,
    reserver: &str,
    reserved_on: NaiveDate,
) -> Result<Reservation> {
    conn.execute(
        "INSERT INTO reservations (item_id, reserver, reserved_on) VALUES (?1, ?2, ?3)",
        params![item.id, reserver, reserved_on.format(DATE_FORMAT).to_string()],
    )
    .context("failed to insert reservation")?;

    Ok(Reservation {
        id: conn.last_insert_rowid(),
        item_id: item.id,
        title: item.title.clone(),
        isbn: item.isbn.clone(),
        reserver: reserver.to_string(),
        reserved_on,
    })
}

/// Drop a reservation and surface a descriptive error if it never existed.
pub fn delete_reservation(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM reservations WHERE id = ?1", params![id])
        .context("failed to delete reservation")?;

    if deleted == 0 {
        Err(anyhow!("Reservation not found"))
    } else {
        Ok(())
    }
}

/// Every reservation held by one reserver, oldest first.
pub fn fetch_reservations_for(conn: &Connection, reserver: &str) -> Result<Vec<Reservation>> {
    let query = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations r
         INNER JOIN items i ON i.id = r.item_id
         WHERE r.reserver = ?1
         ORDER BY r.reserved_on, i.title COLLATE NOCASE"
    );
    let mut stmt = conn
        .prepare(&query)
        .context("failed to prepare reservation query")?;

    let reservations = stmt
        .query_map(params![reserver], reservation_from_row)
        .context("failed to load reservations")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect reservations")?;

    Ok(reservations)
}

/// Every reservation in the catalog.
pub fn fetch_all_reservations(conn: &Connection) -> Result<Vec<Reservation>> {
    let query = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations r
         INNER JOIN items i ON i.id = r.item_id
         ORDER BY r.reserved_on, i.title COLLATE NOCASE"
    );
    let mut stmt = conn
        .prepare(&query)
        .context("failed to prepare reservation query")?;

    let reservations = stmt
        .query_map([], reservation_from_row)
        .context("failed to load reservations")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect reservations")?;

    Ok(reservations)
}

/// The reservation on a given item, if any. An item holds at most one
/// reservation at a time.
pub fn find_reservation_for_item(conn: &Connection, item_id: i64) -> Result<Option<Reservation>> {
    let query = format!(
        "SELECT {RESERVATION_COLUMNS} FROM reservations r
         INNER JOIN items i ON i.id = r.item_id
         WHERE r.item_id = ?1"
    );
    conn.query_row(&query, params![item_id], reservation_from_row)
        .optional()
        .context("failed to look up reservation for item")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_item, open_catalog};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reservations_round_trip_per_reserver() {
        let conn = open_catalog().unwrap();
        let item = create_item(&conn, "Dune", "Herbert", "1").unwrap();
        let res = create_reservation(&conn, &item, "Ada Lovelace", date(2026, 8, 28)).unwrap();

        assert_eq!(fetch_reservations_for(&conn, "Ada Lovelace").unwrap().len(), 1);
        assert!(find_reservation_for_item(&conn, item.id).unwrap().is_some());

        delete_reservation(&conn, res.id).unwrap();
        assert!(fetch_all_reservations(&conn).unwrap().is_empty());
        assert!(delete_reservation(&conn, res.id).is_err());
    }
}
