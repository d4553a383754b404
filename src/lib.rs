//! Core library surface for the library catalog console application.
//!
//! The public modules exposed here provide an intentionally small API so the
//! `bin` target as well as the tests can reuse the same pieces: the SQLite
//! catalog store, the interactive catalog operations, and the session state
//! machine that drives the menus.
pub mod catalog;
pub mod db;
pub mod launch;
pub mod models;
pub mod ui;

/// Convenience re-exports for the persistence layer, typically used by
/// `main.rs` to bring up the in-memory store.
pub use db::{open_catalog, seed_demo_data};

/// Startup resolution: arguments in, launch plan or typed misuse error out.
pub use launch::{librarian, resolve_launch, IdentitySource, Launch, LaunchError};

/// The domain types other layers manipulate.
pub use models::{Item, Loan, Reservation, User};

/// The interactive pieces: catalog operations, console boundary, and the
/// session state machine.
pub use catalog::Catalog;
pub use ui::{stdio_console, user_info_query, Console, Mode, Session};
