use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ProductId, SupplierId};

/// Entity: catalog product.
///
/// `value_on_hand` is derived (`purchase_price * in_stock`) and recomputed
/// inside every mutator, so the struct is never observable with a stale
/// valuation. It cannot be set from a draft or a patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    upc: String,
    name: String,
    description: String,
    picture: String,
    supplier_id: Option<SupplierId>,
    purchase_price: f64,
    sales_price: f64,
    in_stock: i64,
    value_on_hand: f64,
}

/// Input for creating a product. Excludes `id` and `value_on_hand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub upc: String,
    pub name: String,
    pub description: String,
    pub picture: String,
    pub supplier_id: Option<SupplierId>,
    pub purchase_price: f64,
    pub sales_price: f64,
    pub in_stock: i64,
}

/// Partial update for a product. `None` keeps the existing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    pub upc: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub picture: Option<String>,
    pub supplier_id: Option<Option<SupplierId>>,
    pub purchase_price: Option<f64>,
    pub sales_price: Option<f64>,
    pub in_stock: Option<i64>,
}

fn validate_price(label: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{label} must be a non-negative number"
        )));
    }
    Ok(())
}

impl Product {
    pub fn create(id: ProductId, draft: ProductDraft) -> DomainResult<Self> {
        if draft.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        validate_price("purchase price", draft.purchase_price)?;
        validate_price("sales price", draft.sales_price)?;
        if draft.in_stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }

        let mut product = Self {
            id,
            upc: draft.upc,
            name: draft.name,
            description: draft.description,
            picture: draft.picture,
            supplier_id: draft.supplier_id,
            purchase_price: draft.purchase_price,
            sales_price: draft.sales_price,
            in_stock: draft.in_stock,
            value_on_hand: 0.0,
        };
        product.revalue();
        Ok(product)
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn upc(&self) -> &str {
        &self.upc
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn picture(&self) -> &str {
        &self.picture
    }

    pub fn supplier_id(&self) -> Option<SupplierId> {
        self.supplier_id
    }

    pub fn purchase_price(&self) -> f64 {
        self.purchase_price
    }

    pub fn sales_price(&self) -> f64 {
        self.sales_price
    }

    pub fn in_stock(&self) -> i64 {
        self.in_stock
    }

    /// Monetary valuation of current stock: `purchase_price * in_stock`.
    pub fn value_on_hand(&self) -> f64 {
        self.value_on_hand
    }

    /// Merge a partial update, then recompute the valuation.
    pub fn apply_patch(&mut self, patch: ProductPatch) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(DomainError::validation("name cannot be empty"));
            }
        }
        if let Some(price) = patch.purchase_price {
            validate_price("purchase price", price)?;
        }
        if let Some(price) = patch.sales_price {
            validate_price("sales price", price)?;
        }
        if let Some(stock) = patch.in_stock {
            if stock < 0 {
                return Err(DomainError::validation("stock cannot be negative"));
            }
        }

        if let Some(upc) = patch.upc {
            self.upc = upc;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(picture) = patch.picture {
            self.picture = picture;
        }
        if let Some(supplier_id) = patch.supplier_id {
            self.supplier_id = supplier_id;
        }
        if let Some(price) = patch.purchase_price {
            self.purchase_price = price;
        }
        if let Some(price) = patch.sales_price {
            self.sales_price = price;
        }
        if let Some(stock) = patch.in_stock {
            self.in_stock = stock;
        }

        self.revalue();
        Ok(())
    }

    /// Adjust stock by `delta`, flooring the result at zero.
    ///
    /// Returns the delta actually applied; a caller comparing it against the
    /// requested delta can detect floor saturation. The valuation is
    /// recomputed before returning.
    pub fn adjust_stock(&mut self, delta: i64) -> i64 {
        let target = self.in_stock.saturating_add(delta);
        let clamped = target.max(0);
        let applied = clamped - self.in_stock;
        self.in_stock = clamped;
        self.revalue();
        applied
    }

    fn revalue(&mut self) {
        self.value_on_hand = self.purchase_price * self.in_stock as f64;
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
