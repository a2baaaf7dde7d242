use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{CustomerId, DomainError, DomainResult, Entity, ProductId, SaleId};

/// Sale order status lifecycle.
///
/// `Completed` is the realized state: the goods have physically left stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Completed,
    Cancelled,
}

impl SaleStatus {
    /// Whether this status denotes a physical movement of goods.
    pub fn is_realized(self) -> bool {
        self == SaleStatus::Completed
    }
}

/// Order line: product, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleLine {
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price: f64,
}

impl SaleLine {
    pub fn subtotal(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Entity: sale order with one or more lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleOrder {
    id: SaleId,
    customer_id: CustomerId,
    lines: Vec<SaleLine>,
    total_amount: f64,
    date: DateTime<Utc>,
    status: SaleStatus,
}

/// Input for creating a sale order. Excludes `id` and `total_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleDraft {
    pub customer_id: CustomerId,
    pub lines: Vec<SaleLine>,
    pub date: DateTime<Utc>,
    pub status: SaleStatus,
}

/// Partial update for a sale order. `None` keeps the existing value.
///
/// Replacing `lines` recomputes `total_amount`; all other edits keep it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalePatch {
    pub customer_id: Option<CustomerId>,
    pub lines: Option<Vec<SaleLine>>,
    pub date: Option<DateTime<Utc>>,
    pub status: Option<SaleStatus>,
}

fn validate_lines(lines: &[SaleLine]) -> DomainResult<()> {
    if lines.is_empty() {
        return Err(DomainError::validation("sale requires at least one line"));
    }
    for line in lines {
        if line.quantity <= 0 {
            return Err(DomainError::validation("line quantity must be positive"));
        }
        if !line.unit_price.is_finite() || line.unit_price < 0.0 {
            return Err(DomainError::validation(
                "line unit price must be a non-negative number",
            ));
        }
    }
    Ok(())
}

fn sum_lines(lines: &[SaleLine]) -> f64 {
    lines.iter().map(SaleLine::subtotal).sum()
}

impl SaleOrder {
    pub fn create(id: SaleId, draft: SaleDraft) -> DomainResult<Self> {
        validate_lines(&draft.lines)?;

        let total_amount = sum_lines(&draft.lines);
        Ok(Self {
            id,
            customer_id: draft.customer_id,
            lines: draft.lines,
            total_amount,
            date: draft.date,
            status: draft.status,
        })
    }

    pub fn id_typed(&self) -> SaleId {
        self.id
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn lines(&self) -> &[SaleLine] {
        &self.lines
    }

    pub fn total_amount(&self) -> f64 {
        self.total_amount
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn status(&self) -> SaleStatus {
        self.status
    }

    /// Merge a partial update, recomputing `total_amount` when the line set
    /// is replaced.
    pub fn apply_patch(&mut self, patch: SalePatch) -> DomainResult<()> {
        if let Some(lines) = &patch.lines {
            validate_lines(lines)?;
        }

        if let Some(customer_id) = patch.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(lines) = patch.lines {
            self.total_amount = sum_lines(&lines);
            self.lines = lines;
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

impl Entity for SaleOrder {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
