//! The session state machine. Three modes, one access gate, and a flat
//! dispatch table from selection codes to catalog operations. The transition
//! logic is a pure method over the session value so it can be exercised in
//! tests without constructing any I/O.

use std::io::{BufRead, Write};

use anyhow::Result;
use chrono::Local;

use super::identity::welcome_greeting;
use super::menus;
use super::prompt::Console;
use crate::catalog::Catalog;
use crate::models::User;

/// Operating mode of the session; decides which menu is shown and which
/// operations are reachable. Being an enum, no out-of-range mode can exist,
/// so the "unexpected mode" failure class is gone by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Mode-selection menu between client and administrator operations.
    Menu,
    /// Loan, return, reservation, and search operations.
    Client,
    /// Inventory administration and catalog-wide listings.
    Admin,
}

/// What the loop should do after a selection has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Redisplay the (possibly new) current menu.
    Continue,
    /// The access gate refused entry to the admin menu; tell the user, stay
    /// in the mode-selection menu.
    Denied,
    /// Run the dispatch-table operation with this code, then redisplay.
    Execute(u32),
    /// End the session.
    Quit,
}

/// One interactive run: the launch mode (fixed), the active mode, and the
/// identity driving it. The catalog and console are passed into the loop
/// rather than stored so the transition function stays I/O-free.
pub struct Session {
    start_mode: Mode,
    mode: Mode,
    user: User,
}

impl Session {
    /// A session starts in its launch mode and keeps the identity for its
    /// whole lifetime.
    pub fn new(start_mode: Mode, user: User) -> Self {
        Self {
            start_mode,
            mode: start_mode,
            user,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Apply one menu selection to the state machine and report what the
    /// loop should do next.
    ///
    /// The mode-selection menu only ever moves into `Client` or `Admin`;
    /// entering `Admin` requires the identity's admin flag. Selecting zero in
    /// `Client` or `Admin` falls back to the mode-selection menu when the
    /// session was launched there, and ends the session otherwise — a session
    /// launched directly into a mode has no parent menu to return to. Admin
    /// operation codes are offset by 100 so a single flat dispatch table can
    /// tell `add item` apart from `show loans`.
    pub fn apply_selection(&mut self, selection: u32) -> Step {
        match self.mode {
            Mode::Menu => match selection {
                0 => Step::Quit,
                1 => {
                    self.mode = Mode::Client;
                    Step::Continue
                }
                2 if self.user.admin => {
                    self.mode = Mode::Admin;
                    Step::Continue
                }
                2 => Step::Denied,
                // The bounded prompt never yields anything above 2; anything
                // else lands in the dispatch table's unknown arm.
                other => Step::Execute(other),
            },
            Mode::Client => match selection {
                0 if self.start_mode == Mode::Menu => {
                    self.mode = Mode::Menu;
                    Step::Continue
                }
                0 => Step::Quit,
                operation => Step::Execute(operation),
            },
            Mode::Admin => match selection {
                0 if self.start_mode == Mode::Menu => {
                    self.mode = Mode::Menu;
                    Step::Continue
                }
                0 => Step::Quit,
                operation => Step::Execute(operation + 100),
            },
        }
    }

    /// Drive the interactive loop: greet, then show the current mode's menu,
    /// read a bounded selection, apply it, and dispatch until the session
    /// ends. Strictly synchronous; each operation runs to completion before
    /// the next menu is shown.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        catalog: &mut Catalog,
        io: &mut Console<R, W>,
    ) -> Result<()> {
        let today = Local::now().date_naive();
        let greeting = welcome_greeting(self.user.birthday, today);
        io.line(&format!("{greeting} {}!", self.user.full_name()))?;

        loop {
            let has_parent = self.start_mode == Mode::Menu;
            let (menu, max) = match self.mode {
                Mode::Menu => (menus::main_menu(), menus::MAIN_MENU_MAX),
                Mode::Client => (menus::client_menu(has_parent), menus::CLIENT_MENU_MAX),
                Mode::Admin => (menus::admin_menu(has_parent), menus::ADMIN_MENU_MAX),
            };
            io.line(&menu)?;

            let selection = io.read_selection(max, true)?;
            match self.apply_selection(selection) {
                Step::Continue => {}
                Step::Denied => io.line("No access rights!")?,
                Step::Execute(code) => self.dispatch(code, catalog, io)?,
                Step::Quit => break,
            }
        }

        io.line(&format!("Goodbye {}!", self.user.first_name))
    }

    /// The flat selection-to-operation table. Fire-and-forget from the state
    /// machine's point of view: whatever an operation prints is its own
    /// business, and no result flows back into the transitions.
    pub(crate) fn dispatch<R: BufRead, W: Write>(
        &self,
        code: u32,
        catalog: &mut Catalog,
        io: &mut Console<R, W>,
    ) -> Result<()> {
        match code {
            1 => catalog.show_loans(io, &self.user),
            2 => catalog.loan_item(io, &self.user),
            3 => catalog.return_item(io, &self.user),
            4 => catalog.show_reservations(io, &self.user),
            5 => catalog.reserve_item(io, &self.user),
            6 => catalog.cancel_reservation(io, &self.user),
            7 => catalog.search_by_isbn(io),
            8 => catalog.search_by_title(io),
            101 => catalog.add_item(io),
            102 => catalog.remove_item(io),
            103 => catalog.show_all_loans(io),
            104 => catalog.show_overdue_loans(io),
            105 => catalog.show_all_reservations(io),
            106 => catalog.show_all_items(io),
            _ => io.line("Unknown selection"),
        }
    }
}
