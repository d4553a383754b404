//! Persistence module split across logical submodules.

mod connection;
mod items;
mod loans;
mod reservations;

pub use connection::{open_catalog, seed_demo_data, DATE_FORMAT};
pub use items::{create_item, delete_item, fetch_all_items, find_by_isbn, search_by_title};
pub use loans::{
    create_loan, delete_loan, fetch_all_loans, fetch_loans_for, fetch_overdue_loans,
    find_loan_for_item,
};
pub use reservations::{
    create_reservation, delete_reservation, fetch_all_reservations, fetch_reservations_for,
    find_reservation_for_item,
};
