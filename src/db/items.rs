use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension};

use crate::models::Item;

/// Insert a new inventory item, returning the hydrated struct so the caller
/// can print a confirmation without re-querying.
pub fn create_item(conn: &Connection, title: &str, author: &str, isbn: &str) -> Result<Item> {
    conn.execute(
        "INSERT INTO items (title, author, isbn) VALUES (?1, ?2, ?3)",
        params![title, author, isbn],
    )
    .map_err(|err| map_unique_constraint(err, isbn))?;

    let id = conn.last_insert_rowid();
    Ok(Item {
        id,
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
    })
}

/// Remove an item row. The schema cascades to `loans` and `reservations`, so
/// we do not have to delete those rows manually.
pub fn delete_item(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM items WHERE id = ?1", params![id])
        .context("failed to delete item")?;

    if deleted == 0 {
        Err(anyhow!("Item not found"))
    } else {
        Ok(())
    }
}

/// Retrieve the whole inventory ordered case-insensitively by title, so
/// mixed-case titles group together in listings.
pub fn fetch_all_items(conn: &Connection) -> Result<Vec<Item>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, title, author, isbn FROM items
             ORDER BY title COLLATE NOCASE, author COLLATE NOCASE",
        )
        .context("failed to prepare item query")?;

    let items = stmt
        .query_map([], |row| {
            Ok(Item {
                id: row.get(0)?,
                title: row.get(1)?,
                author: row.get(2)?,
                isbn: row.get(3)?,
            })
        })
        .context("failed to load items")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect items")?;

    Ok(items)
}

/// Look up one item by its exact ISBN. ISBNs are unique in the schema, so at
/// most one row can match.
pub fn find_by_isbn(conn: &Connection, isbn: &str) -> Result<Option<Item>> {
    conn.query_row(
        "SELECT id, title, author, isbn FROM items WHERE isbn = ?1",
        params![isbn],
        |row| {
            Ok(Item {
                id: row.get(0)?,
                title: row.get(1)?,
                author: row.get(2)?,
                isbn: row.get(3)?,
            })
        },
    )
    .optional()
    .context("failed to look up item by isbn")
}

/// Case-insensitive substring search over titles. SQLite's `LIKE` is already
/// case-insensitive for ASCII, which matches what users expect when typing a
/// fragment of a title. `LIKE` wildcards in the fragment are escaped so a
/// typed `%` or `_` matches itself.
pub fn search_by_title(conn: &Connection, fragment: &str) -> Result<Vec<Item>> {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    let mut stmt = conn
        .prepare(
            "SELECT id, title, author, isbn FROM items
             WHERE title LIKE '%' || ?1 || '%' ESCAPE '\\'
             ORDER BY title COLLATE NOCASE, author COLLATE NOCASE",
        )
        .context("failed to prepare title search")?;

    let items = stmt
        .query_map(params![escaped], |row| {
            Ok(Item {
                id: row.get(0)?,
                title: row.get(1)?,
                author: row.get(2)?,
                isbn: row.get(3)?,
            })
        })
        .context("failed to run title search")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect search results")?;

    Ok(items)
}

/// Coerce SQLite constraint errors into human-readable messages. The only
/// constraint we guard is the uniqueness of ISBNs. The coerced message must
/// stay the outermost layer of the error, so the generic insert context is
/// only attached on the non-constraint branch.
fn map_unique_constraint(err: SqlError, isbn: &str) -> anyhow::Error {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        anyhow!("An item with ISBN {isbn} already exists.")
    } else {
        anyhow::Error::new(err).context("failed to insert item")
    }
}
