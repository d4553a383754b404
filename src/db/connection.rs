use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use rusqlite::{params, Connection};

/// Storage format for every date column. ISO-8601 text keeps lexicographic
/// and chronological order identical, which the overdue query relies on.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Open the in-memory catalog store, run the schema, and return a live
/// connection. The function also toggles `PRAGMA foreign_keys = ON` so the
/// cascade from items to loans and reservations behaves the same during tests
/// and production runs. Nothing survives the process; persistence across runs
/// is out of scope.
pub fn open_catalog() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open catalog store")?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            isbn TEXT NOT NULL UNIQUE
        )",
        [],
    )
    .context("failed to create items table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS loans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id INTEGER NOT NULL,
            borrower TEXT NOT NULL,
            loaned_on TEXT NOT NULL,
            due_on TEXT NOT NULL,
            FOREIGN KEY(item_id) REFERENCES items(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create loans table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS reservations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            item_id INTEGER NOT NULL,
            reserver TEXT NOT NULL,
            reserved_on TEXT NOT NULL,
            FOREIGN KEY(item_id) REFERENCES items(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create reservations table")?;

    Ok(conn)
}

/// Fill the catalog with a fixed synthetic inventory for `test` launches:
/// eight items, two open loans (one already overdue) and one reservation.
/// Deterministic data keeps every listing operation reproducible.
pub fn seed_demo_data(conn: &Connection, today: NaiveDate) -> Result<()> {
    let items: &[(&str, &str, &str)] = &[
        ("The Hobbit", "J.R.R. Tolkien", "9780261103283"),
        ("Dune", "Frank Herbert", "9780441172719"),
        ("Snow Crash", "Neal Stephenson", "9780553380958"),
        ("The Left Hand of Darkness", "Ursula K. Le Guin", "9780441478125"),
        ("Kalevala", "Elias Lönnrot", "9780195385380"),
        ("Seven Brothers", "Aleksis Kivi", "9781843914716"),
        ("The Name of the Rose", "Umberto Eco", "9780544176560"),
        ("Hyperion", "Dan Simmons", "9780553283686"),
    ];

    for (title, author, isbn) in items {
        conn.execute(
            "INSERT INTO items (title, author, isbn) VALUES (?1, ?2, ?3)",
            params![title, author, isbn],
        )
        .context("failed to seed item")?;
    }

    let loan = |isbn: &str, borrower: &str, loaned: NaiveDate, due: NaiveDate| -> Result<()> {
        conn.execute(
            "INSERT INTO loans (item_id, borrower, loaned_on, due_on)
             SELECT id, ?2, ?3, ?4 FROM items WHERE isbn = ?1",
            params![
                isbn,
                borrower,
                loaned.format(DATE_FORMAT).to_string(),
                due.format(DATE_FORMAT).to_string()
            ],
        )
        .context("failed to seed loan")?;
        Ok(())
    };

    let due_soon = today
        .checked_add_days(Days::new(21))
        .context("due date out of range")?;
    let long_ago = today
        .checked_sub_days(Days::new(60))
        .context("loan date out of range")?;
    let past_due = today
        .checked_sub_days(Days::new(32))
        .context("due date out of range")?;

    loan(
        "9780441172719",
        "Maija Meikäläinen",
        today.checked_sub_days(Days::new(7)).context("loan date out of range")?,
        due_soon,
    )?;
    loan("9780553380958", "Matti Meikäläinen", long_ago, past_due)?;

    conn.execute(
        "INSERT INTO reservations (item_id, reserver, reserved_on)
         SELECT id, ?2, ?3 FROM items WHERE isbn = ?1",
        params![
            "9780261103283",
            "Maija Meikäläinen",
            today.format(DATE_FORMAT).to_string()
        ],
    )
    .context("failed to seed reservation")?;

    Ok(())
}

/// Parse a stored ISO date back into `NaiveDate`, surfacing malformed text as
/// a SQLite conversion failure so `query_map` closures can use it directly.
pub(crate) fn parse_date(text: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(err))
    })
}
