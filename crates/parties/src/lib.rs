//! `stockroom-parties` — customers, suppliers and the business record.

pub mod business;
pub mod party;

pub use business::BusinessInfo;
pub use party::{ContactInfo, Customer, PartyDraft, PartyPatch, Supplier};
