//! Order Intake Module
//!
//! The single admission path for employee orders. Checks run in a fixed
//! order — menu, ordering window, duplicates, selections — and the stock
//! decrement plus order insert commit as one transaction. A per-date mutex
//! serializes admissions against each other and against the day lock, so
//! two orders racing for the last unit of stock can never both win.

mod service;

pub use service::{OrderIntake, PlaceOrder};
