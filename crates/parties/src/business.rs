use serde::{Deserialize, Serialize};

/// Singleton business record used for document rendering (invoices,
/// receipts). Replaced wholesale; carries no stock behavior.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessInfo {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    pub email: String,
    pub website: String,
    pub tax_id: String,
    pub logo: String,
}
