use serde::{Deserialize, Serialize};

use stockroom_core::{CustomerId, DomainError, DomainResult, Entity, SupplierId};

/// Contact information for a customer or supplier.
///
/// Fields may be empty; only the party name is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Input for registering a customer or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyDraft {
    pub name: String,
    pub contact: ContactInfo,
}

/// Partial update for a customer or supplier. `None` keeps the existing value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyPatch {
    pub name: Option<String>,
    pub contact: Option<ContactInfo>,
}

macro_rules! impl_party {
    ($t:ident, $id:ident) => {
        /// Entity: flat contact record. No behavioral invariants beyond
        /// identity uniqueness.
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub struct $t {
            id: $id,
            name: String,
            contact: ContactInfo,
        }

        impl $t {
            pub fn create(id: $id, draft: PartyDraft) -> DomainResult<Self> {
                if draft.name.trim().is_empty() {
                    return Err(DomainError::validation("name cannot be empty"));
                }
                Ok(Self {
                    id,
                    name: draft.name,
                    contact: draft.contact,
                })
            }

            pub fn id_typed(&self) -> $id {
                self.id
            }

            pub fn name(&self) -> &str {
                &self.name
            }

            pub fn contact(&self) -> &ContactInfo {
                &self.contact
            }

            /// Merge a partial update.
            pub fn apply_patch(&mut self, patch: PartyPatch) -> DomainResult<()> {
                if let Some(name) = &patch.name {
                    if name.trim().is_empty() {
                        return Err(DomainError::validation("name cannot be empty"));
                    }
                }
                if let Some(name) = patch.name {
                    self.name = name;
                }
                if let Some(contact) = patch.contact {
                    self.contact = contact;
                }
                Ok(())
            }
        }

        impl Entity for $t {
            type Id = $id;

            fn id(&self) -> &Self::Id {
                &self.id
            }
        }
    };
}

impl_party!(Customer, CustomerId);
impl_party!(Supplier, SupplierId);

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str) -> PartyDraft {
        PartyDraft {
            name: name.to_string(),
            contact: ContactInfo {
                email: "orders@techdist.com".to_string(),
                phone: "(555) 987-6543".to_string(),
                address: "789 Industrial Blvd".to_string(),
                city: "Chicago".to_string(),
                state: "IL".to_string(),
                zip_code: "60601".to_string(),
            },
        }
    }

    #[test]
    fn create_rejects_blank_name() {
        let err = Customer::create(CustomerId::new(), draft("  ")).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn patch_merges_name_and_keeps_contact() {
        let mut supplier = Supplier::create(SupplierId::new(), draft("Tech Distributors")).unwrap();
        supplier
            .apply_patch(PartyPatch {
                name: Some("Tech Distributors Inc".to_string()),
                contact: None,
            })
            .unwrap();
        assert_eq!(supplier.name(), "Tech Distributors Inc");
        assert_eq!(supplier.contact().city, "Chicago");
    }

    #[test]
    fn patch_replaces_contact_wholesale() {
        let mut customer = Customer::create(CustomerId::new(), draft("John Smith")).unwrap();
        customer
            .apply_patch(PartyPatch {
                name: None,
                contact: Some(ContactInfo::default()),
            })
            .unwrap();
        assert_eq!(customer.contact().email, "");
    }

    #[test]
    fn identity_survives_edits() {
        let mut customer = Customer::create(CustomerId::new(), draft("John Smith")).unwrap();
        let original = customer.clone();
        customer
            .apply_patch(PartyPatch {
                name: Some("John A. Smith".to_string()),
                contact: None,
            })
            .unwrap();
        assert!(customer.same_identity(&original));
        assert_ne!(customer, original);
    }
}
