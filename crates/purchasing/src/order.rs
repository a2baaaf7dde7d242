use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, Entity, ProductId, PurchaseId, SupplierId};

/// Purchase order status lifecycle.
///
/// `Received` is the realized state: the goods have physically arrived and
/// stock has been (or is about to be) credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurchaseStatus {
    Pending,
    Received,
    Cancelled,
}

impl PurchaseStatus {
    /// Whether this status denotes a physical movement of goods.
    pub fn is_realized(self) -> bool {
        self == PurchaseStatus::Received
    }
}

/// Entity: purchase order for exactly one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOrder {
    id: PurchaseId,
    supplier_id: SupplierId,
    product_id: ProductId,
    quantity: i64,
    unit_price: f64,
    total_amount: f64,
    date: DateTime<Utc>,
    status: PurchaseStatus,
}

/// Input for creating a purchase order. Excludes `id` and `total_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseDraft {
    pub supplier_id: SupplierId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: f64,
    pub date: DateTime<Utc>,
    pub status: PurchaseStatus,
}

/// Partial update for a purchase order. `None` keeps the existing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchasePatch {
    pub supplier_id: Option<SupplierId>,
    pub product_id: Option<ProductId>,
    pub quantity: Option<i64>,
    pub unit_price: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<PurchaseStatus>,
}

fn validate_quantity(quantity: i64) -> DomainResult<()> {
    if quantity <= 0 {
        return Err(DomainError::validation("quantity must be positive"));
    }
    Ok(())
}

fn validate_unit_price(unit_price: f64) -> DomainResult<()> {
    if !unit_price.is_finite() || unit_price < 0.0 {
        return Err(DomainError::validation(
            "unit price must be a non-negative number",
        ));
    }
    Ok(())
}

impl PurchaseOrder {
    /// Create a purchase order; `total_amount` is fixed here and is not
    /// recomputed by later edits.
    pub fn create(id: PurchaseId, draft: PurchaseDraft) -> DomainResult<Self> {
        validate_quantity(draft.quantity)?;
        validate_unit_price(draft.unit_price)?;

        Ok(Self {
            id,
            supplier_id: draft.supplier_id,
            product_id: draft.product_id,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            total_amount: draft.quantity as f64 * draft.unit_price,
            date: draft.date,
            status: draft.status,
        })
    }

    pub fn id_typed(&self) -> PurchaseId {
        self.id
    }

    pub fn supplier_id(&self) -> SupplierId {
        self.supplier_id
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn status(&self) -> PurchaseStatus {
        self.status
    }

    /// Merge a partial update. `total_amount` keeps its creation-time value
    /// even when quantity or unit price change.
    pub fn apply_patch(&mut self, patch: PurchasePatch) -> DomainResult<()> {
        if let Some(quantity) = patch.quantity {
            validate_quantity(quantity)?;
        }
        if let Some(unit_price) = patch.unit_price {
            validate_unit_price(unit_price)?;
        }

        if let Some(supplier_id) = patch.supplier_id {
            self.supplier_id = supplier_id;
        }
        if let Some(product_id) = patch.product_id {
            self.product_id = product_id;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        Ok(())
    }
}

impl Entity for PurchaseOrder {
    type Id = PurchaseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(quantity: i64, unit_price: f64) -> PurchaseDraft {
        PurchaseDraft {
            supplier_id: SupplierId::new(),
            product_id: ProductId::new(),
            quantity,
            unit_price,
            date: Utc::now(),
            status: PurchaseStatus::Pending,
        }
    }

    #[test]
    fn total_amount_is_fixed_at_creation() {
        let mut order = PurchaseOrder::create(PurchaseId::new(), draft(10, 4.5)).unwrap();
        assert_eq!(order.total_amount(), 45.0);

        order
            .apply_patch(PurchasePatch {
                quantity: Some(20),
                ..PurchasePatch::default()
            })
            .unwrap();
        assert_eq!(order.quantity(), 20);
        assert_eq!(order.total_amount(), 45.0);
    }

    #[test]
    fn create_rejects_non_positive_quantity() {
        let err = PurchaseOrder::create(PurchaseId::new(), draft(0, 4.5)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn patch_rejects_negative_unit_price() {
        let mut order = PurchaseOrder::create(PurchaseId::new(), draft(10, 4.5)).unwrap();
        let err = order
            .apply_patch(PurchasePatch {
                unit_price: Some(-1.0),
                ..PurchasePatch::default()
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn only_received_is_realized() {
        assert!(PurchaseStatus::Received.is_realized());
        assert!(!PurchaseStatus::Pending.is_realized());
        assert!(!PurchaseStatus::Cancelled.is_realized());
    }

    #[test]
    fn status_uses_lowercase_wire_form() {
        let json = serde_json::to_string(&PurchaseStatus::Received).unwrap();
        assert_eq!(json, "\"received\"");
    }
}
