//! Primary-then-fallback snapshot store.

use std::sync::Arc;

use stockroom_catalog::Product;
use stockroom_parties::{BusinessInfo, Customer, Supplier};
use stockroom_purchasing::PurchaseOrder;
use stockroom_sales::SaleOrder;

use crate::snapshot::SnapshotStore;

/// Delegates to a primary backend and degrades to a fallback on failure.
///
/// Exactly one fallback attempt is made per operation; the failure is
/// logged, not propagated, unless the fallback fails too. Reads follow the
/// same order, so after a degraded write the fallback's state is what a
/// degraded read observes.
pub struct FallbackStore {
    primary: Arc<dyn SnapshotStore>,
    fallback: Arc<dyn SnapshotStore>,
}

impl FallbackStore {
    pub fn new(primary: Arc<dyn SnapshotStore>, fallback: Arc<dyn SnapshotStore>) -> Self {
        Self { primary, fallback }
    }
}

macro_rules! delegate_save {
    ($method:ident, $ty:ty, $label:literal) => {
        fn $method(&self, items: $ty) -> anyhow::Result<()> {
            match self.primary.$method(items) {
                Ok(()) => Ok(()),
                Err(err) => {
                    tracing::warn!(
                        collection = $label,
                        error = %err,
                        "primary store save failed; using fallback"
                    );
                    self.fallback.$method(items)
                }
            }
        }
    };
}

macro_rules! delegate_load {
    ($method:ident, $ret:ty, $label:literal) => {
        fn $method(&self) -> anyhow::Result<$ret> {
            match self.primary.$method() {
                Ok(items) => Ok(items),
                Err(err) => {
                    tracing::warn!(
                        collection = $label,
                        error = %err,
                        "primary store load failed; using fallback"
                    );
                    self.fallback.$method()
                }
            }
        }
    };
}

impl SnapshotStore for FallbackStore {
    delegate_save!(save_products, &[Product], "products");
    delegate_load!(load_products, Vec<Product>, "products");

    delegate_save!(save_customers, &[Customer], "customers");
    delegate_load!(load_customers, Vec<Customer>, "customers");

    delegate_save!(save_suppliers, &[Supplier], "suppliers");
    delegate_load!(load_suppliers, Vec<Supplier>, "suppliers");

    delegate_save!(save_purchases, &[PurchaseOrder], "purchases");
    delegate_load!(load_purchases, Vec<PurchaseOrder>, "purchases");

    delegate_save!(save_sales, &[SaleOrder], "sales");
    delegate_load!(load_sales, Vec<SaleOrder>, "sales");

    delegate_save!(save_business_info, &BusinessInfo, "business_info");
    delegate_load!(load_business_info, Option<BusinessInfo>, "business_info");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use stockroom_catalog::ProductDraft;
    use stockroom_core::ProductId;

    /// Backend whose every operation fails, for exercising the fallback path.
    struct BrokenStore;

    macro_rules! broken {
        ($save:ident, $ty:ty, $load:ident, $ret:ty) => {
            fn $save(&self, _items: $ty) -> anyhow::Result<()> {
                Err(anyhow::anyhow!("backend unavailable"))
            }

            fn $load(&self) -> anyhow::Result<$ret> {
                Err(anyhow::anyhow!("backend unavailable"))
            }
        };
    }

    impl SnapshotStore for BrokenStore {
        broken!(save_products, &[Product], load_products, Vec<Product>);
        broken!(save_customers, &[Customer], load_customers, Vec<Customer>);
        broken!(save_suppliers, &[Supplier], load_suppliers, Vec<Supplier>);
        broken!(save_purchases, &[PurchaseOrder], load_purchases, Vec<PurchaseOrder>);
        broken!(save_sales, &[SaleOrder], load_sales, Vec<SaleOrder>);
        broken!(save_business_info, &BusinessInfo, load_business_info, Option<BusinessInfo>);
    }

    fn product() -> Product {
        Product::create(
            ProductId::new(),
            ProductDraft {
                upc: String::new(),
                name: "Widget".to_string(),
                description: String::new(),
                picture: String::new(),
                supplier_id: None,
                purchase_price: 1.0,
                sales_price: 2.0,
                in_stock: 3,
            },
        )
        .unwrap()
    }

    #[test]
    fn healthy_primary_is_used_directly() {
        let primary = Arc::new(MemoryStore::new());
        let fallback = Arc::new(MemoryStore::new());
        let store = FallbackStore::new(primary.clone(), fallback.clone());

        store.save_products(&[product()]).unwrap();

        assert_eq!(primary.load_products().unwrap().len(), 1);
        assert!(fallback.load_products().unwrap().is_empty());
    }

    #[test]
    fn failed_primary_degrades_to_fallback() {
        let fallback = Arc::new(MemoryStore::new());
        let store = FallbackStore::new(Arc::new(BrokenStore), fallback.clone());

        let item = product();
        store.save_products(&[item.clone()]).unwrap();

        assert_eq!(fallback.load_products().unwrap(), vec![item.clone()]);
        assert_eq!(store.load_products().unwrap(), vec![item]);
    }

    #[test]
    fn error_surfaces_only_when_both_fail() {
        let store = FallbackStore::new(Arc::new(BrokenStore), Arc::new(BrokenStore));
        assert!(store.save_products(&[product()]).is_err());
        assert!(store.load_products().is_err());
    }
}
