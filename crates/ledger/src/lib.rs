//! `stockroom-ledger` — the authoritative entity store and the stock
//! transition engine.
//!
//! The [`Ledger`] owns every entity collection and is the only writer of
//! `Product.in_stock` / `Product.value_on_hand`. Order commands and their
//! dependent product adjustments commit inside a single critical section,
//! so no reader observes an order updated with stock still stale.

pub mod movement;
pub mod store;

pub use movement::{MovementReport, StockOutcome, Transition};
pub use store::Ledger;
