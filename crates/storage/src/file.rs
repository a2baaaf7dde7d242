//! JSON-file snapshot store: the local key-value fallback.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;

use stockroom_catalog::Product;
use stockroom_parties::{BusinessInfo, Customer, Supplier};
use stockroom_purchasing::PurchaseOrder;
use stockroom_sales::SaleOrder;

use crate::snapshot::{SnapshotStore, collections};

/// One JSON file per collection under a data directory.
///
/// Writes replace the file wholesale (snapshot semantics); a collection
/// whose file does not exist loads as empty.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, collection: &str) -> PathBuf {
        self.dir.join(format!("{collection}.json"))
    }

    fn save<T: Serialize>(&self, collection: &str, items: &T) -> anyhow::Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create data directory {:?}", self.dir))?;
        let blob = serde_json::to_string_pretty(items)
            .with_context(|| format!("failed to encode {collection}"))?;
        let path = self.path_for(collection);
        fs::write(&path, blob).with_context(|| format!("failed to write {path:?}"))?;
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, collection: &str) -> anyhow::Result<Option<T>> {
        let path = self.path_for(collection);
        if !path.exists() {
            return Ok(None);
        }
        let blob = fs::read_to_string(&path).with_context(|| format!("failed to read {path:?}"))?;
        let items =
            serde_json::from_str(&blob).with_context(|| format!("failed to decode {path:?}"))?;
        Ok(Some(items))
    }

    fn load_list<T: DeserializeOwned>(&self, collection: &str) -> anyhow::Result<Vec<T>> {
        Ok(self.load(collection)?.unwrap_or_default())
    }
}

impl SnapshotStore for JsonFileStore {
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
