//! Launch-argument resolution. The process accepts zero or one positional
//! argument; anything else is a typed error the entry point turns into a
//! diagnostic and a non-zero exit. Nothing here touches the console or the
//! store, so the whole table is testable in-process.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::User;
use crate::ui::Mode;

/// Startup misuse, reported before any session state exists.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LaunchError {
    #[error("Too many arguments given!")]
    TooManyArguments,
    #[error("Bad argument given!")]
    BadArgument,
}

/// Where the session's identity comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// Ask the user interactively.
    Query,
    /// `admin` launches skip the query and run as the fixed librarian.
    Librarian,
}

/// Everything `main` needs to know before constructing the session.
#[derive(Debug, PartialEq, Eq)]
pub struct Launch {
    /// The mode the session starts in, fixed for its lifetime.
    pub start_mode: Mode,
    /// Whether to pre-fill the catalog with synthetic data.
    pub seed_demo_data: bool,
    pub identity: IdentitySource,
    /// Announcement printed before anything else, if any.
    pub banner: Option<&'static str>,
}

/// Map the positional arguments (program name already stripped) onto a
/// [`Launch`], refusing more than one argument or an unrecognized one.
pub fn resolve_launch(args: &[String]) -> Result<Launch, LaunchError> {
    if args.len() > 1 {
        return Err(LaunchError::TooManyArguments);
    }
    match args.first().map(String::as_str) {
        None => Ok(Launch {
            start_mode: Mode::Menu,
            seed_demo_data: false,
            identity: IdentitySource::Query,
            banner: None,
        }),
        Some("test") => Ok(Launch {
            start_mode: Mode::Menu,
            seed_demo_data: true,
            identity: IdentitySource::Query,
            banner: Some(">>> IN TEST MODE"),
        }),
        Some("admin") => Ok(Launch {
            start_mode: Mode::Admin,
            seed_demo_data: false,
            identity: IdentitySource::Librarian,
            banner: Some(">>> ADMINISTRATOR MODE"),
        }),
        Some("client") => Ok(Launch {
            start_mode: Mode::Client,
            seed_demo_data: false,
            identity: IdentitySource::Query,
            banner: Some(">>> CLIENT MODE"),
        }),
        Some(_) => Err(LaunchError::BadArgument),
    }
}

/// The synthetic administrator identity used by `admin` launches.
pub fn librarian() -> Result<User> {
    let birthday =
        NaiveDate::from_ymd_opt(1971, 8, 26).context("librarian birthday out of range")?;
    Ok(User::new("The", "Librarian", birthday, true))
}
