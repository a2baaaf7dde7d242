//! The `Ledger` store: authoritative owner of every entity collection.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use stockroom_catalog::{Product, ProductDraft, ProductPatch};
use stockroom_core::{
    CustomerId, DomainError, DomainResult, ProductId, PurchaseId, SaleId, SupplierId,
};
use stockroom_parties::{BusinessInfo, Customer, PartyDraft, PartyPatch, Supplier};
use stockroom_purchasing::{PurchaseDraft, PurchaseOrder, PurchasePatch};
use stockroom_sales::{SaleDraft, SaleOrder, SalePatch};
use stockroom_storage::SnapshotStore;

use crate::movement::{self, MovementReport, StockOutcome};

#[derive(Default)]
struct LedgerState {
    products: HashMap<ProductId, Product>,
    customers: HashMap<CustomerId, Customer>,
    suppliers: HashMap<SupplierId, Supplier>,
    purchases: HashMap<PurchaseId, PurchaseOrder>,
    sales: HashMap<SaleId, SaleOrder>,
    business_info: BusinessInfo,
}

impl LedgerState {
    fn product_list(&self) -> Vec<Product> {
        let mut items: Vec<_> = self.products.values().cloned().collect();
        items.sort_by_key(|p| *p.id_typed().as_uuid());
        items
    }

    fn customer_list(&self) -> Vec<Customer> {
        let mut items: Vec<_> = self.customers.values().cloned().collect();
        items.sort_by_key(|c| *c.id_typed().as_uuid());
        items
    }

    fn supplier_list(&self) -> Vec<Supplier> {
        let mut items: Vec<_> = self.suppliers.values().cloned().collect();
        items.sort_by_key(|s| *s.id_typed().as_uuid());
        items
    }

    fn purchase_list(&self) -> Vec<PurchaseOrder> {
        let mut items: Vec<_> = self.purchases.values().cloned().collect();
        items.sort_by_key(|p| *p.id_typed().as_uuid());
        items
    }

    fn sale_list(&self) -> Vec<SaleOrder> {
        let mut items: Vec<_> = self.sales.values().cloned().collect();
        items.sort_by_key(|s| *s.id_typed().as_uuid());
        items
    }
}

/// The entity store.
///
/// All mutation commands are defined here; callers hold the ledger by
/// reference (or `Arc`) rather than through any ambient singleton. Each
/// command runs inside one write-lock critical section: an order write and
/// its dependent product adjustments commit together, so no reader observes
/// the order updated while stock is still stale.
///
/// Persistence is optional and fire-and-forget: after a commit the affected
/// collections are pushed to the snapshot store, failures are logged and
/// in-memory state is never rolled back.
pub struct Ledger {
    state: RwLock<LedgerState>,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl Ledger {
    /// Empty ledger with no persistence.
    pub fn new() -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            store: None,
        }
    }

    /// Empty ledger that persists through `store`.
    pub fn with_store(store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            state: RwLock::new(LedgerState::default()),
            store: Some(store),
        }
    }

    /// Hydrate a ledger from `store`, then keep persisting through it.
    ///
    /// A collection that fails to load is logged and starts empty; the
    /// ledger itself always constructs.
    pub fn load(store: Arc<dyn SnapshotStore>) -> Self {
        let mut state = LedgerState::default();

        match store.load_products() {
            Ok(items) => {
                state.products = items.into_iter().map(|p| (p.id_typed(), p)).collect();
            }
            Err(err) => tracing::error!(error = %err, "failed to load products; starting empty"),
        }
        match store.load_customers() {
            Ok(items) => {
                state.customers = items.into_iter().map(|c| (c.id_typed(), c)).collect();
            }
            Err(err) => tracing::error!(error = %err, "failed to load customers; starting empty"),
        }
        match store.load_suppliers() {
            Ok(items) => {
                state.suppliers = items.into_iter().map(|s| (s.id_typed(), s)).collect();
            }
            Err(err) => tracing::error!(error = %err, "failed to load suppliers; starting empty"),
        }
        match store.load_purchases() {
            Ok(items) => {
                state.purchases = items.into_iter().map(|p| (p.id_typed(), p)).collect();
            }
            Err(err) => tracing::error!(error = %err, "failed to load purchases; starting empty"),
        }
        match store.load_sales() {
            Ok(items) => {
                state.sales = items.into_iter().map(|s| (s.id_typed(), s)).collect();
            }
            Err(err) => tracing::error!(error = %err, "failed to load sales; starting empty"),
        }
        match store.load_business_info() {
            Ok(Some(info)) => state.business_info = info,
            Ok(None) => {}
            Err(err) => {
                tracing::error!(error = %err, "failed to load business info; starting empty");
            }
        }

        Self {
            state: RwLock::new(state),
            store: Some(store),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, LedgerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, LedgerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Push one collection snapshot, swallowing failures after logging.
    /// In-memory state stays committed either way.
    fn persist(&self, what: &str, save: impl FnOnce(&dyn SnapshotStore) -> anyhow::Result<()>) {
        if let Some(store) = &self.store {
            if let Err(err) = save(store.as_ref()) {
                tracing::error!(
                    collection = what,
                    error = %err,
                    "failed to persist snapshot; in-memory state retained"
                );
            }
        }
    }

    fn log_movement(&self, report: &MovementReport) {
        for outcome in &report.outcomes {
            match outcome {
                StockOutcome::AppliedWithFloor {
                    product_id,
                    requested,
                    applied,
                } => tracing::warn!(
                    %product_id,
                    requested,
                    applied,
                    "stock decrement floored at zero"
                ),
                StockOutcome::SkippedMissingReference { product_id } => tracing::warn!(
                    %product_id,
                    "order references a missing product; line skipped"
                ),
                StockOutcome::Applied { .. } => {}
            }
        }
    }

    // ------------------------------------------------------------------
    // Products
    // ------------------------------------------------------------------

    pub fn add_product(&self, draft: ProductDraft) -> DomainResult<Product> {
        let mut state = self.write();
        let product = Product::create(ProductId::new(), draft)?;
        state.products.insert(product.id_typed(), product.clone());
        let products = state.product_list();
        drop(state);

        self.persist("products", |s| s.save_products(&products));
        Ok(product)
    }

    pub fn update_product(&self, id: ProductId, patch: ProductPatch) -> DomainResult<Product> {
        let mut state = self.write();
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(DomainError::not_found)?;
        product.apply_patch(patch)?;
        let product = product.clone();
        let products = state.product_list();
        drop(state);

        self.persist("products", |s| s.save_products(&products));
        Ok(product)
    }

    /// Remove a product. Historical orders referencing it are left as-is;
    /// their lines simply stop resolving.
    pub fn delete_product(&self, id: ProductId) -> DomainResult<()> {
        let mut state = self.write();
        state
            .products
            .remove(&id)
            .ok_or_else(DomainError::not_found)?;
        let products = state.product_list();
        drop(state);

        self.persist("products", |s| s.save_products(&products));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Customers / suppliers
    // ------------------------------------------------------------------

    pub fn add_customer(&self, draft: PartyDraft) -> DomainResult<Customer> {
        let mut state = self.write();
        let customer = Customer::create(CustomerId::new(), draft)?;
        state.customers.insert(customer.id_typed(), customer.clone());
        let customers = state.customer_list();
        drop(state);

        self.persist("customers", |s| s.save_customers(&customers));
        Ok(customer)
    }

    pub fn update_customer(&self, id: CustomerId, patch: PartyPatch) -> DomainResult<Customer> {
        let mut state = self.write();
        let customer = state
            .customers
            .get_mut(&id)
            .ok_or_else(DomainError::not_found)?;
        customer.apply_patch(patch)?;
        let customer = customer.clone();
        let customers = state.customer_list();
        drop(state);

        self.persist("customers", |s| s.save_customers(&customers));
        Ok(customer)
    }

    pub fn delete_customer(&self, id: CustomerId) -> DomainResult<()> {
        let mut state = self.write();
        state
            .customers
            .remove(&id)
            .ok_or_else(DomainError::not_found)?;
        let customers = state.customer_list();
        drop(state);

        self.persist("customers", |s| s.save_customers(&customers));
        Ok(())
    }

    pub fn add_supplier(&self, draft: PartyDraft) -> DomainResult<Supplier> {
        let mut state = self.write();
        let supplier = Supplier::create(SupplierId::new(), draft)?;
        state.suppliers.insert(supplier.id_typed(), supplier.clone());
        let suppliers = state.supplier_list();
        drop(state);

        self.persist("suppliers", |s| s.save_suppliers(&suppliers));
        Ok(supplier)
    }

    pub fn update_supplier(&self, id: SupplierId, patch: PartyPatch) -> DomainResult<Supplier> {
        let mut state = self.write();
        let supplier = state
            .suppliers
            .get_mut(&id)
            .ok_or_else(DomainError::not_found)?;
        supplier.apply_patch(patch)?;
        let supplier = supplier.clone();
        let suppliers = state.supplier_list();
        drop(state);

        self.persist("suppliers", |s| s.save_suppliers(&suppliers));
        Ok(supplier)
    }

    pub fn delete_supplier(&self, id: SupplierId) -> DomainResult<()> {
        let mut state = self.write();
        state
            .suppliers
            .remove(&id)
            .ok_or_else(DomainError::not_found)?;
        let suppliers = state.supplier_list();
        drop(state);

        self.persist("suppliers", |s| s.save_suppliers(&suppliers));
        Ok(())
    }

    // ------------------------------------------------------------------
    // Purchase orders
    // ------------------------------------------------------------------

    /// Create a purchase order. A draft arriving already `received` credits
    /// the product's stock in the same commit.
    pub fn add_purchase(
        &self,
        draft: PurchaseDraft,
    ) -> DomainResult<(PurchaseOrder, MovementReport)> {
        let mut guard = self.write();
        let state = &mut *guard;

        let order = PurchaseOrder::create(PurchaseId::new(), draft)?;
        let transition = movement::classify(false, order.status().is_realized());
        let report = movement::apply_purchase_transition(
            &mut state.products,
            transition,
            order.product_id(),
            order.quantity(),
        );
        state.purchases.insert(order.id_typed(), order.clone());

        let purchases = state.purchase_list();
        let products = state.product_list();
        drop(guard);

        self.log_movement(&report);
        self.persist("purchases", |s| s.save_purchases(&purchases));
        if !report.is_empty() {
            self.persist("products", |s| s.save_products(&products));
        }
        Ok((order, report))
    }

    /// Merge a patch into a purchase order, then apply at most one stock
    /// adjustment pass based on the stored-vs-new status comparison. The
    /// merged record's quantity drives the adjustment in both directions.
    pub fn update_purchase(
        &self,
        id: PurchaseId,
        patch: PurchasePatch,
    ) -> DomainResult<(PurchaseOrder, MovementReport)> {
        let mut guard = self.write();
        let state = &mut *guard;

        let order = state
            .purchases
            .get_mut(&id)
            .ok_or_else(DomainError::not_found)?;
        let was_realized = order.status().is_realized();
        order.apply_patch(patch)?;
        let now_realized = order.status().is_realized();
        let order = order.clone();

        let transition = movement::classify(was_realized, now_realized);
        let report = movement::apply_purchase_transition(
            &mut state.products,
            transition,
            order.product_id(),
            order.quantity(),
        );

        let purchases = state.purchase_list();
        let products = state.product_list();
        drop(guard);

        self.log_movement(&report);
        self.persist("purchases", |s| s.save_purchases(&purchases));
        if !report.is_empty() {
            self.persist("products", |s| s.save_products(&products));
        }
        Ok((order, report))
    }

    // ------------------------------------------------------------------
    // Sale orders
    // ------------------------------------------------------------------

    /// Create a sale order. A draft arriving already `completed` debits each
    /// line's product in the same commit, flooring at zero.
    pub fn add_sale(&self, draft: SaleDraft) -> DomainResult<(SaleOrder, MovementReport)> {
        let mut guard = self.write();
        let state = &mut *guard;

        let order = SaleOrder::create(SaleId::new(), draft)?;
        let transition = movement::classify(false, order.status().is_realized());
        let report =
            movement::apply_sale_transition(&mut state.products, transition, order.lines());
        state.sales.insert(order.id_typed(), order.clone());

        let sales = state.sale_list();
        let products = state.product_list();
        drop(guard);

        self.log_movement(&report);
        self.persist("sales", |s| s.save_sales(&sales));
        if !report.is_empty() {
            self.persist("products", |s| s.save_products(&products));
        }
        Ok((order, report))
    }

    /// Merge a patch into a sale order, then apply at most one stock
    /// adjustment pass based on the stored-vs-new status comparison.
    ///
    /// Editing lines of an order that stays realized moves no stock: only
    /// status transitions are evaluated, never quantity deltas. This
    /// mirrors the system being modeled and is a known looseness.
    pub fn update_sale(&self, id: SaleId, patch: SalePatch) -> DomainResult<(SaleOrder, MovementReport)> {
        let mut guard = self.write();
        let state = &mut *guard;

        let order = state.sales.get_mut(&id).ok_or_else(DomainError::not_found)?;
        let was_realized = order.status().is_realized();
        order.apply_patch(patch)?;
        let now_realized = order.status().is_realized();
        let order = order.clone();

        let transition = movement::classify(was_realized, now_realized);
        let report =
            movement::apply_sale_transition(&mut state.products, transition, order.lines());

        let sales = state.sale_list();
        let products = state.product_list();
        drop(guard);

        self.log_movement(&report);
        self.persist("sales", |s| s.save_sales(&sales));
        if !report.is_empty() {
            self.persist("products", |s| s.save_products(&products));
        }
        Ok((order, report))
    }

    // ------------------------------------------------------------------
    // Business info
    // ------------------------------------------------------------------

    /// Replace the business record wholesale.
    pub fn update_business_info(&self, info: BusinessInfo) {
        let mut state = self.write();
        state.business_info = info.clone();
        drop(state);

        self.persist("business_info", |s| s.save_business_info(&info));
    }

    // ------------------------------------------------------------------
    // Read model (cloned snapshots)
    // ------------------------------------------------------------------

    pub fn products(&self) -> Vec<Product> {
        self.read().product_list()
    }

    pub fn product(&self, id: ProductId) -> Option<Product> {
        self.read().products.get(&id).cloned()
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.read().customer_list()
    }

    pub fn customer(&self, id: CustomerId) -> Option<Customer> {
        self.read().customers.get(&id).cloned()
    }

    pub fn suppliers(&self) -> Vec<Supplier> {
        self.read().supplier_list()
    }

    pub fn supplier(&self, id: SupplierId) -> Option<Supplier> {
        self.read().suppliers.get(&id).cloned()
    }

    pub fn purchases(&self) -> Vec<PurchaseOrder> {
        self.read().purchase_list()
    }

    pub fn purchase(&self, id: PurchaseId) -> Option<PurchaseOrder> {
        self.read().purchases.get(&id).cloned()
    }

    pub fn sales(&self) -> Vec<SaleOrder> {
        self.read().sale_list()
    }

    pub fn sale(&self, id: SaleId) -> Option<SaleOrder> {
        self.read().sales.get(&id).cloned()
    }

    pub fn business_info(&self) -> BusinessInfo {
        self.read().business_info.clone()
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
