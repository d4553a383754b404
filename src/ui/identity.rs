use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};

use super::prompt::Console;
use crate::db::DATE_FORMAT;
use crate::models::User;

/// Ask for the session user's details: first name, last name, birthday, and
/// the admin passphrase. Admin rights are granted iff the passphrase exactly
/// matches `admin_secret`; the secret is a parameter rather than a literal so
/// callers and tests control it.
///
/// There is no retry loop here. A malformed birthday surfaces as an error and
/// aborts startup before any session state exists.
pub fn user_info_query<R: BufRead, W: Write>(
    io: &mut Console<R, W>,
    admin_secret: &str,
) -> Result<User> {
    io.line(">>> WELCOME TO THE LIBRARY")?;
    let first_name = io.prompt("Give your first name: ")?;
    let last_name = io.prompt("Give your last name: ")?;
    let birthday_text = io.prompt("Give your birthday (yyyy-mm-dd): ")?;
    let birthday = NaiveDate::parse_from_str(birthday_text.trim(), DATE_FORMAT)
        .with_context(|| format!("invalid birthday {birthday_text:?}, expected yyyy-mm-dd"))?;
    let passphrase = io.prompt("To activate admin rights enter password: ")?;
    let admin = passphrase == admin_secret;
    io.line("")?;
    io.line("")?;
    Ok(User::new(&first_name, &last_name, birthday, admin))
}

/// Pick the greeting for the welcome banner. Month and day are compared,
/// never the year, so the birthday variant fires every year. A February 29
/// birthday consequently only matches in leap years.
pub fn welcome_greeting(birthday: NaiveDate, today: NaiveDate) -> &'static str {
    if birthday.month() == today.month() && birthday.day() == today.day() {
        "Welcome and Happy Birthday"
    } else {
        "Welcome"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn console(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn matching_passphrase_grants_admin() {
        let mut io = console("Ada\nLovelace\n1815-12-10\nhunter2\n");
        let user = user_info_query(&mut io, "hunter2").unwrap();
        assert!(user.admin);
        assert_eq!(user.full_name(), "Ada Lovelace");
        assert_eq!(user.birthday, date(1815, 12, 10));
    }

    #[test]
    fn passphrase_comparison_is_case_sensitive() {
        let mut io = console("Ada\nLovelace\n1815-12-10\nHunter2\n");
        let user = user_info_query(&mut io, "hunter2").unwrap();
        assert!(!user.admin);
    }

    #[test]
    fn malformed_birthday_is_surfaced() {
        let mut io = console("Ada\nLovelace\n10.12.1815\nhunter2\n");
        let err = user_info_query(&mut io, "hunter2").unwrap_err();
        assert!(err.to_string().contains("invalid birthday"));
    }

    #[test]
    fn greeting_ignores_the_year() {
        let birthday = date(1971, 8, 26);
        assert_eq!(
            welcome_greeting(birthday, date(2026, 8, 26)),
            "Welcome and Happy Birthday"
        );
        assert_eq!(welcome_greeting(birthday, date(2026, 8, 27)), "Welcome");
        assert_eq!(welcome_greeting(birthday, date(2026, 9, 26)), "Welcome");
    }

    #[test]
    fn leap_day_birthday_only_matches_in_leap_years() {
        let birthday = date(2000, 2, 29);
        assert_eq!(
            welcome_greeting(birthday, date(2028, 2, 29)),
            "Welcome and Happy Birthday"
        );
        // 2026 is not a leap year, so no date can match Feb 29.
        assert_eq!(welcome_greeting(birthday, date(2026, 2, 28)), "Welcome");
        assert_eq!(welcome_greeting(birthday, date(2026, 3, 1)), "Welcome");
    }
}
