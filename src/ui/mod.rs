//! Console front-end split across logical submodules: the line-oriented I/O
//! boundary, the pure menu renderers, the identity query, and the session
//! state machine that ties them together.

mod identity;
mod menus;
mod prompt;
mod session;

pub use identity::{user_info_query, welcome_greeting};
pub use prompt::{stdio_console, Console};
pub use session::{Mode, Session, Step};
