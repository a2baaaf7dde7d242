//! `stockroom-purchasing` — purchase orders.

pub mod order;

pub use order::{PurchaseDraft, PurchaseOrder, PurchasePatch, PurchaseStatus};
