//! `stockroom-sales` — sale orders.

pub mod order;

pub use order::{SaleDraft, SaleLine, SaleOrder, SalePatch, SaleStatus};
