//! In-memory snapshot store for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;

use stockroom_catalog::Product;
use stockroom_parties::{BusinessInfo, Customer, Supplier};
use stockroom_purchasing::PurchaseOrder;
use stockroom_sales::SaleOrder;

use crate::snapshot::{SnapshotStore, collections};

/// Keeps each collection as a serialized JSON blob, exercising the same
/// encode/decode path as the durable backends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn save<T: Serialize>(&self, collection: &str, items: &T) -> anyhow::Result<()> {
        let blob = serde_json::to_string(items)
            .with_context(|| format!("failed to encode {collection}"))?;
        let mut map = self
            .inner
            .write()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        map.insert(collection.to_string(), blob);
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, collection: &str) -> anyhow::Result<Option<T>> {
        let map = self
            .inner
            .read()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        match map.get(collection) {
            Some(blob) => {
                let items = serde_json::from_str(blob)
                    .with_context(|| format!("failed to decode {collection}"))?;
                Ok(Some(items))
            }
            None => Ok(None),
        }
    }

    fn load_list<T: DeserializeOwned>(&self, collection: &str) -> anyhow::Result<Vec<T>> {
        Ok(self.load(collection)?.unwrap_or_default())
    }
}

impl SnapshotStore for MemoryStore {
    fn save_products(&self, products: &[Product]) -> anyhow::Result<()> {
        self.save(collections::PRODUCTS, &products)
    }

    fn load_products(&self) -> anyhow::Result<Vec<Product>> {
        self.load_list(collections::PRODUCTS)
    }

    fn save_customers(&self, customers: &[Customer]) -> anyhow::Result<()> {
        self.save(collections::CUSTOMERS, &customers)
    }

    fn load_customers(&self) -> anyhow::Result<Vec<Customer>> {
        self.load_list(collections::CUSTOMERS)
    }

    fn save_suppliers(&self, suppliers: &[Supplier]) -> anyhow::Result<()> {
        self.save(collections::SUPPLIERS, &suppliers)
    }

    fn load_suppliers(&self) -> anyhow::Result<Vec<Supplier>> {
        self.load_list(collections::SUPPLIERS)
    }

    fn save_purchases(&self, purchases: &[PurchaseOrder]) -> anyhow::Result<()> {
        self.save(collections::PURCHASES, &purchases)
    }

    fn load_purchases(&self) -> anyhow::Result<Vec<PurchaseOrder>> {
        self.load_list(collections::PURCHASES)
    }

    fn save_sales(&self, sales: &[SaleOrder]) -> anyhow::Result<()> {
        self.save(collections::SALES, &sales)
    }

    fn load_sales(&self) -> anyhow::Result<Vec<SaleOrder>> {
        self.load_list(collections::SALES)
    }

    fn save_business_info(&self, info: &BusinessInfo) -> anyhow::Result<()> {
        self.save(collections::BUSINESS_INFO, info)
    }

    fn load_business_info(&self) -> anyhow::Result<Option<BusinessInfo>> {
        self.load(collections::BUSINESS_INFO)
    }
}
