//! SQLite-backed snapshot store: the relational backend.
//!
//! Collections are stored as JSON documents in a single `records` table
//! keyed by `(collection, id)`. Each save replaces the collection's rows in
//! one transaction, keeping the durable snapshot consistent with the
//! in-memory commit that produced it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection, Row, SqliteConnection};
use tokio::runtime::Runtime;

use stockroom_catalog::Product;
use stockroom_parties::{BusinessInfo, Customer, Supplier};
use stockroom_purchasing::PurchaseOrder;
use stockroom_sales::SaleOrder;

use crate::snapshot::{SnapshotStore, collections};

const SINGLETON_ID: &str = "singleton";

/// Snapshot store over a SQLite database file.
///
/// The public API is synchronous; each call runs on a one-off runtime so
/// the store can be used from non-async callers (the ledger's persistence
/// hook is synchronous by design).
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    async fn connect(&self) -> anyhow::Result<SqliteConnection> {
        if let Some(parent) = self.db_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create database directory {parent:?}"))?;
        }

        let mut conn = SqliteConnectOptions::new()
            .filename(&self.db_path)
            .create_if_missing(true)
            .connect()
            .await
            .with_context(|| format!("failed to open SQLite database at {:?}", self.db_path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                collection TEXT NOT NULL,
                id         TEXT NOT NULL,
                data       TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            )
            "#,
        )
        .execute(&mut conn)
        .await
        .context("failed to create records table")?;

        Ok(conn)
    }

    fn save_rows(&self, collection: &str, rows: Vec<(String, String)>) -> anyhow::Result<()> {
        let rt = Runtime::new().context("failed to create runtime for snapshot save")?;
        rt.block_on(async {
            let mut conn = self.connect().await?;
            let mut tx = conn.begin().await.context("failed to begin transaction")?;

            sqlx::query("DELETE FROM records WHERE collection = ?1")
                .bind(collection)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to clear collection {collection}"))?;

            let now = Utc::now().to_rfc3339();
            for (id, data) in rows {
                sqlx::query(
                    "INSERT INTO records (collection, id, data, updated_at) VALUES (?1, ?2, ?3, ?4)",
                )
                .bind(collection)
                .bind(id)
                .bind(data)
                .bind(&now)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to insert into collection {collection}"))?;
            }

            tx.commit().await.context("failed to commit snapshot")
        })
    }

    fn load_rows(&self, collection: &str) -> anyhow::Result<Vec<String>> {
        let rt = Runtime::new().context("failed to create runtime for snapshot load")?;
        rt.block_on(async {
            let mut conn = self.connect().await?;
            let rows = sqlx::query("SELECT data FROM records WHERE collection = ?1 ORDER BY id")
                .bind(collection)
                .fetch_all(&mut conn)
                .await
                .with_context(|| format!("failed to read collection {collection}"))?;

            Ok(rows.iter().map(|row| row.get::<String, _>("data")).collect())
        })
    }

    fn save_collection<T: Serialize>(
        &self,
        collection: &str,
        items: &[T],
        id_of: impl Fn(&T) -> String,
    ) -> anyhow::Result<()> {
        let rows = items
            .iter()
            .map(|item| {
                let data = serde_json::to_string(item)
                    .with_context(|| format!("failed to encode {collection} record"))?;
                Ok((id_of(item), data))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        self.save_rows(collection, rows)
    }

    fn load_collection<T: DeserializeOwned>(&self, collection: &str) -> anyhow::Result<Vec<T>> {
        self.load_rows(collection)?
            .iter()
            .map(|data| {
                serde_json::from_str(data)
                    .with_context(|| format!("failed to decode {collection} record"))
            })
            .collect()
    }
}

impl SnapshotStore for SqliteStore {
    fn save_products(&self, products: &[Product]) -> anyhow::Result<()> {
        self.save_collection(collections::PRODUCTS, products, |p| p.id_typed().to_string())
    }

    fn load_products(&self) -> anyhow::Result<Vec<Product>> {
        self.load_collection(collections::PRODUCTS)
    }

    fn save_customers(&self, customers: &[Customer]) -> anyhow::Result<()> {
        self.save_collection(collections::CUSTOMERS, customers, |c| {
            c.id_typed().to_string()
        })
    }

    fn load_customers(&self) -> anyhow::Result<Vec<Customer>> {
        self.load_collection(collections::CUSTOMERS)
    }

    fn save_suppliers(&self, suppliers: &[Supplier]) -> anyhow::Result<()> {
        self.save_collection(collections::SUPPLIERS, suppliers, |s| {
            s.id_typed().to_string()
        })
    }

    fn load_suppliers(&self) -> anyhow::Result<Vec<Supplier>> {
        self.load_collection(collections::SUPPLIERS)
    }

    fn save_purchases(&self, purchases: &[PurchaseOrder]) -> anyhow::Result<()> {
        self.save_collection(collections::PURCHASES, purchases, |p| {
            p.id_typed().to_string()
        })
    }

    fn load_purchases(&self) -> anyhow::Result<Vec<PurchaseOrder>> {
        self.load_collection(collections::PURCHASES)
    }

    fn save_sales(&self, sales: &[SaleOrder]) -> anyhow::Result<()> {
        self.save_collection(collections::SALES, sales, |s| s.id_typed().to_string())
    }

    fn load_sales(&self) -> anyhow::Result<Vec<SaleOrder>> {
        self.load_collection(collections::SALES)
    }

    fn save_business_info(&self, info: &BusinessInfo) -> anyhow::Result<()> {
        let data = serde_json::to_string(info).context("failed to encode business info")?;
        self.save_rows(
            collections::BUSINESS_INFO,
            vec![(SINGLETON_ID.to_string(), data)],
        )
    }

    fn load_business_info(&self) -> anyhow::Result<Option<BusinessInfo>> {
        let rows = self.load_rows(collections::BUSINESS_INFO)?;
        match rows.first() {
            Some(data) => {
                let info = serde_json::from_str(data).context("failed to decode business info")?;
                Ok(Some(info))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockroom_catalog::ProductDraft;
    use stockroom_core::ProductId;

    fn temp_db() -> PathBuf {
        std::env::temp_dir().join(format!("stockroom-sqlite-{}.db", uuid::Uuid::now_v7()))
    }

    fn product(name: &str, in_stock: i64) -> Product {
        Product::create(
            ProductId::new(),
            ProductDraft {
                upc: String::new(),
                name: name.to_string(),
                description: String::new(),
                picture: String::new(),
                supplier_id: None,
                purchase_price: 8.5,
                sales_price: 19.99,
                in_stock,
            },
        )
        .unwrap()
    }

    #[test]
    fn round_trips_products() {
        let path = temp_db();
        let store = SqliteStore::new(&path);

        let items = vec![product("Case", 150), product("Speaker", 40)];
        store.save_products(&items).unwrap();

        let mut loaded = store.load_products().unwrap();
        loaded.sort_by_key(|p| *p.id_typed().as_uuid());
        let mut expected = items;
        expected.sort_by_key(|p| *p.id_typed().as_uuid());
        assert_eq!(loaded, expected);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_replaces_collection_rows() {
        let path = temp_db();
        let store = SqliteStore::new(&path);

        store.save_products(&[product("A", 1), product("B", 2)]).unwrap();
        store.save_products(&[product("C", 3)]).unwrap();

        let loaded = store.load_products().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name(), "C");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn business_info_is_a_singleton_row() {
        let path = temp_db();
        let store = SqliteStore::new(&path);

        assert_eq!(store.load_business_info().unwrap(), None);

        let info = BusinessInfo {
            name: "Corner Shop".to_string(),
            tax_id: "12-3456789".to_string(),
            ..BusinessInfo::default()
        };
        store.save_business_info(&info).unwrap();
        store.save_business_info(&info).unwrap();

        assert_eq!(store.load_business_info().unwrap(), Some(info));
        let _ = fs::remove_file(path);
    }
}
