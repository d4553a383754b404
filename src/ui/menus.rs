//! Pure menu rendering. Each function only builds text; printing and the
//! selection that follows are the session loop's business, which keeps these
//! trivially assertable in tests.

/// Horizontal rule between menu blocks.
const RULE: &str = "=================================================";

/// Highest valid selection on the main menu.
pub(crate) const MAIN_MENU_MAX: u32 = 2;
/// Highest valid selection on the client menu.
pub(crate) const CLIENT_MENU_MAX: u32 = 8;
/// Highest valid selection on the admin menu.
pub(crate) const ADMIN_MENU_MAX: u32 = 6;

/// The mode-selection menu shown when the session starts without a preset
/// mode.
pub(crate) fn main_menu() -> String {
    format!(
        "{RULE}\n\
         1 - Client menu \t2 - Administrator menu\n\
         0 - Exit\n\
         {RULE}"
    )
}

/// The client operations menu. The zero row reads `Back` only when there is a
/// parent menu to fall back to.
pub(crate) fn client_menu(has_parent_menu: bool) -> String {
    format!(
        "{RULE}{RULE}\n\
         1 - Show loans        \t2 - New loan          \t3 - Return loan\n\
         4 - Show reservations \t5 - Reserve item      \t6 - Cancel reservation\n\
         7 - Search by ISBN    \t8 - Search by title\n\
         {}\n\
         {RULE}{RULE}",
        zero_row(has_parent_menu)
    )
}

/// The administrator operations menu, same zero-row convention.
pub(crate) fn admin_menu(has_parent_menu: bool) -> String {
    format!(
        "{RULE}{RULE}\n\
         1 - Add new item      \t2 - Remove item       \t3 - Show all loans\n\
         4 - Show overdue loans\t5 - Show reservations \t6 - Show all items\n\
         {}\n\
         {RULE}{RULE}",
        zero_row(has_parent_menu)
    )
}

fn zero_row(has_parent_menu: bool) -> &'static str {
    if has_parent_menu {
        "0 - Back"
    } else {
        "0 - Exit"
    }
}
