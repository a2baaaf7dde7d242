//! The persistence adapter boundary.

use stockroom_catalog::Product;
use stockroom_parties::{BusinessInfo, Customer, Supplier};
use stockroom_purchasing::PurchaseOrder;
use stockroom_sales::SaleOrder;

/// Whole-collection snapshot persistence.
///
/// Each save replaces the durable collection with the given state; loads
/// return the last durable state (empty when nothing was ever saved).
/// Implementations report failures through `anyhow::Result`; the caller
/// decides whether to propagate, fall back or swallow them.
pub trait SnapshotStore: Send + Sync {
    fn save_products(&self, products: &[Product]) -> anyhow::Result<()>;
    fn load_products(&self) -> anyhow::Result<Vec<Product>>;

    fn save_customers(&self, customers: &[Customer]) -> anyhow::Result<()>;
    fn load_customers(&self) -> anyhow::Result<Vec<Customer>>;

    fn save_suppliers(&self, suppliers: &[Supplier]) -> anyhow::Result<()>;
    fn load_suppliers(&self) -> anyhow::Result<Vec<Supplier>>;

    fn save_purchases(&self, purchases: &[PurchaseOrder]) -> anyhow::Result<()>;
    fn load_purchases(&self) -> anyhow::Result<Vec<PurchaseOrder>>;

    fn save_sales(&self, sales: &[SaleOrder]) -> anyhow::Result<()>;
    fn load_sales(&self) -> anyhow::Result<Vec<SaleOrder>>;

    fn save_business_info(&self, info: &BusinessInfo) -> anyhow::Result<()>;
    fn load_business_info(&self) -> anyhow::Result<Option<BusinessInfo>>;
}

/// Collection names shared by the document-oriented backends.
pub(crate) mod collections {
    pub const PRODUCTS: &str = "products";
    pub const CUSTOMERS: &str = "customers";
    pub const SUPPLIERS: &str = "suppliers";
    pub const PURCHASES: &str = "purchases";
    pub const SALES: &str = "sales";
    pub const BUSINESS_INFO: &str = "business_info";
}
