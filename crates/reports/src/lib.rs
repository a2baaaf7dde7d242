//! `stockroom-reports` — read-only financial aggregates.
//!
//! Pure projections over the ledger's cloned collections: recomputed fully
//! on every read, no incremental maintenance, no staleness to manage.

pub mod dashboard;

pub use dashboard::{
    EntityCounts, FinancialSummary, LOW_STOCK_THRESHOLD, MonthlySummary, low_stock, recent_sales,
};
