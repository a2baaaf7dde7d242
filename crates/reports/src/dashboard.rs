//! Dashboard aggregates.
//!
//! Revenue counts only realized sales (`completed`); cost counts only
//! realized purchases (`received`). Pending and cancelled orders contribute
//! nothing, matching the stock rules: money and goods are recognized at the
//! same status boundary.

use chrono::{DateTime, Datelike, Utc};

use stockroom_catalog::Product;
use stockroom_parties::{Customer, Supplier};
use stockroom_purchasing::PurchaseOrder;
use stockroom_sales::SaleOrder;

/// Products at or below this stock level show up in the low-stock listing.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// All-time financial aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialSummary {
    /// Σ `value_on_hand` over the catalog.
    pub total_inventory_value: f64,
    /// Σ `total_amount` over completed sales.
    pub revenue: f64,
    /// Σ `total_amount` over received purchases.
    pub cost: f64,
    /// `revenue - cost`.
    pub gross_profit: f64,
    /// `100 * gross_profit / revenue`; 0 when there is no revenue.
    pub margin_pct: f64,
}

impl FinancialSummary {
    pub fn compute(
        products: &[Product],
        purchases: &[PurchaseOrder],
        sales: &[SaleOrder],
    ) -> Self {
        let total_inventory_value = products.iter().map(|p| p.value_on_hand()).sum();
        let revenue: f64 = sales
            .iter()
            .filter(|s| s.status().is_realized())
            .map(|s| s.total_amount())
            .sum();
        let cost: f64 = purchases
            .iter()
            .filter(|p| p.status().is_realized())
            .map(|p| p.total_amount())
            .sum();
        let gross_profit = revenue - cost;
        let margin_pct = if revenue > 0.0 {
            gross_profit / revenue * 100.0
        } else {
            0.0
        };

        Self {
            total_inventory_value,
            revenue,
            cost,
            gross_profit,
            margin_pct,
        }
    }
}

/// Aggregates for the calendar month of a reference instant.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySummary {
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
}

impl MonthlySummary {
    /// Filter realized orders by calendar month/year of their `date`
    /// against `at` (typically "now", passed in so reads are testable).
    pub fn compute(purchases: &[PurchaseOrder], sales: &[SaleOrder], at: DateTime<Utc>) -> Self {
        let in_month =
            |date: DateTime<Utc>| date.month() == at.month() && date.year() == at.year();

        let revenue: f64 = sales
            .iter()
            .filter(|s| s.status().is_realized() && in_month(s.date()))
            .map(|s| s.total_amount())
            .sum();
        let cost: f64 = purchases
            .iter()
            .filter(|p| p.status().is_realized() && in_month(p.date()))
            .map(|p| p.total_amount())
            .sum();

        Self {
            revenue,
            cost,
            profit: revenue - cost,
        }
    }
}

/// Headline entity counts for the dashboard tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityCounts {
    pub products: usize,
    pub customers: usize,
    pub suppliers: usize,
}

impl EntityCounts {
    pub fn compute(products: &[Product], customers: &[Customer], suppliers: &[Supplier]) -> Self {
        Self {
            products: products.len(),
            customers: customers.len(),
            suppliers: suppliers.len(),
        }
    }
}

/// Products whose stock sits below `threshold`.
pub fn low_stock(products: &[Product], threshold: i64) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.in_stock() < threshold)
        .cloned()
        .collect()
}

/// The most recent `limit` sales, newest first.
pub fn recent_sales(sales: &[SaleOrder], limit: usize) -> Vec<SaleOrder> {
    let mut sorted: Vec<_> = sales.to_vec();
    sorted.sort_by_key(|s| std::cmp::Reverse(s.date()));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use stockroom_catalog::ProductDraft;
    use stockroom_core::{CustomerId, ProductId, PurchaseId, SaleId, SupplierId};
    use stockroom_purchasing::{PurchaseDraft, PurchaseStatus};
    use stockroom_sales::{SaleDraft, SaleLine, SaleStatus};

    fn product(price: f64, in_stock: i64) -> Product {
        Product::create(
            ProductId::new(),
            ProductDraft {
                upc: String::new(),
                name: "Widget".to_string(),
                description: String::new(),
                picture: String::new(),
                supplier_id: None,
                purchase_price: price,
                sales_price: price * 2.0,
                in_stock,
            },
        )
        .unwrap()
    }

    fn purchase(total: f64, status: PurchaseStatus, date: DateTime<Utc>) -> PurchaseOrder {
        PurchaseOrder::create(
            PurchaseId::new(),
            PurchaseDraft {
                supplier_id: SupplierId::new(),
                product_id: ProductId::new(),
                quantity: 1,
                unit_price: total,
                date,
                status,
            },
        )
        .unwrap()
    }

    fn sale(total: f64, status: SaleStatus, date: DateTime<Utc>) -> SaleOrder {
        SaleOrder::create(
            SaleId::new(),
            SaleDraft {
                customer_id: CustomerId::new(),
                lines: vec![SaleLine {
                    product_id: ProductId::new(),
                    quantity: 1,
                    unit_price: total,
                }],
                date,
                status,
            },
        )
        .unwrap()
    }

    fn june(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn only_realized_orders_contribute() {
        let now = june(15);
        let purchases = vec![
            purchase(100.0, PurchaseStatus::Received, now),
            purchase(50.0, PurchaseStatus::Pending, now),
            purchase(25.0, PurchaseStatus::Cancelled, now),
        ];
        let sales = vec![
            sale(300.0, SaleStatus::Completed, now),
            sale(80.0, SaleStatus::Pending, now),
            sale(40.0, SaleStatus::Cancelled, now),
        ];
        let products = vec![product(2.0, 10), product(5.0, 4)];

        let summary = FinancialSummary::compute(&products, &purchases, &sales);
        assert_eq!(summary.total_inventory_value, 40.0);
        assert_eq!(summary.revenue, 300.0);
        assert_eq!(summary.cost, 100.0);
        assert_eq!(summary.gross_profit, 200.0);
        assert!((summary.margin_pct - 200.0 / 300.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn margin_is_zero_without_revenue() {
        let purchases = vec![purchase(100.0, PurchaseStatus::Received, june(1))];
        let summary = FinancialSummary::compute(&[], &purchases, &[]);
        assert_eq!(summary.revenue, 0.0);
        assert_eq!(summary.gross_profit, -100.0);
        assert_eq!(summary.margin_pct, 0.0);
    }

    #[test]
    fn monthly_summary_filters_by_calendar_month() {
        let sales = vec![
            sale(100.0, SaleStatus::Completed, june(3)),
            sale(70.0, SaleStatus::Completed, Utc.with_ymd_and_hms(2024, 5, 31, 23, 0, 0).unwrap()),
            sale(60.0, SaleStatus::Completed, Utc.with_ymd_and_hms(2023, 6, 3, 12, 0, 0).unwrap()),
            sale(50.0, SaleStatus::Pending, june(4)),
        ];
        let purchases = vec![
            purchase(30.0, PurchaseStatus::Received, june(2)),
            purchase(99.0, PurchaseStatus::Received, Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap()),
        ];

        let summary = MonthlySummary::compute(&purchases, &sales, june(15));
        assert_eq!(summary.revenue, 100.0);
        assert_eq!(summary.cost, 30.0);
        assert_eq!(summary.profit, 70.0);
    }

    #[test]
    fn low_stock_uses_strict_threshold() {
        let products = vec![product(1.0, 3), product(1.0, 10), product(1.0, 25)];
        let listing = low_stock(&products, LOW_STOCK_THRESHOLD);
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].in_stock(), 3);
    }

    #[test]
    fn recent_sales_are_newest_first() {
        let sales = vec![
            sale(1.0, SaleStatus::Completed, june(1)),
            sale(2.0, SaleStatus::Completed, june(9)),
            sale(3.0, SaleStatus::Pending, june(5)),
        ];
        let recent = recent_sales(&sales, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].date(), june(9));
        assert_eq!(recent[1].date(), june(5));
    }
}
