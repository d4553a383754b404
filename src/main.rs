//! Binary entry point that glues the SQLite-backed catalog to the console
//! session. The bootstrapping pipeline: resolve the launch arguments, bring
//! up the in-memory store (seeding it for `test` launches), resolve the
//! identity, and drive the menu loop until the user exits.
use std::env;

use chrono::Local;
use library_catalog_manager::{
    librarian, open_catalog, resolve_launch, seed_demo_data, stdio_console, user_info_query,
    Catalog, IdentitySource, Session,
};

/// Passphrase that activates administrator rights in the identity query. A
/// single shared secret is the whole of the access-control story here.
const ADMIN_SECRET: &str = "password";

/// Returning a `Result` bubbles startup misuse and fatal initialization
/// problems to the terminal with a non-zero exit instead of crashing
/// silently; the launch table itself never exits the process.
fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();
    let launch = resolve_launch(&args)?;

    if let Some(banner) = launch.banner {
        println!("{banner}");
    }

    let conn = open_catalog()?;
    if launch.seed_demo_data {
        seed_demo_data(&conn, Local::now().date_naive())?;
    }

    let mut io = stdio_console();
    let user = match launch.identity {
        IdentitySource::Query => user_info_query(&mut io, ADMIN_SECRET)?,
        IdentitySource::Librarian => librarian()?,
    };

    let mut catalog = Catalog::new(conn);
    let mut session = Session::new(launch.start_mode, user);
    session.run(&mut catalog, &mut io)
}
