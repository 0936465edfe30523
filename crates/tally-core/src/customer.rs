//! # Customers
//!
//! Customer records are denormalized counters kept up to date by sales.
//! A sale matches an existing customer by case-insensitive name; there is
//! no other deduplication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ids::new_id;
use crate::money::Money;
use crate::state::{Collection, LedgerState};
use crate::types::Customer;
use crate::validation::{normalize_text, validate_name, validate_text};

/// Contact details the user can edit on a customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPatch {
    pub name: Option<String>,
    pub contact: Option<Option<String>>,
    pub email: Option<Option<String>>,
}

impl LedgerState {
    /// Records a sale against the customer with this name, creating the
    /// customer on first purchase.
    ///
    /// A contact on the sale fills in a missing contact on the customer;
    /// it never overwrites one.
    pub(crate) fn upsert_customer(
        &mut self,
        name: &str,
        contact: Option<&str>,
        spent: Money,
        at: DateTime<Utc>,
    ) -> String {
        if let Some(customer) = self.customers.iter_mut().find(|c| c.matches_name(name)) {
            customer.purchase_count += 1;
            customer.total_spent_cents += spent.cents();
            customer.last_purchase_at = Some(at);
            if customer.contact.is_none() {
                customer.contact = contact.map(str::to_string);
            }
            let id = customer.id.clone();
            self.touch(Collection::Customers);
            return id;
        }

        let customer = Customer {
            id: new_id(),
            name: name.trim().to_string(),
            contact: contact.map(str::to_string),
            email: None,
            purchase_count: 1,
            total_spent_cents: spent.cents(),
            last_purchase_at: Some(at),
        };
        let id = customer.id.clone();
        self.customers.insert(0, customer);
        self.touch(Collection::Customers);
        id
    }

    /// Edits a customer's name or contact details.
    pub fn update_customer(&mut self, id: &str, patch: CustomerPatch) -> CoreResult<Customer> {
        let index = self
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))?;

        if let Some(name) = &patch.name {
            validate_name("customer name", name)?;
        }
        if let Some(contact) = &patch.contact {
            validate_text("contact", contact.as_deref())?;
        }
        if let Some(email) = &patch.email {
            validate_text("email", email.as_deref())?;
        }

        let customer = &mut self.customers[index];
        if let Some(name) = patch.name {
            customer.name = name.trim().to_string();
        }
        if let Some(contact) = patch.contact {
            customer.contact = normalize_text(contact);
        }
        if let Some(email) = patch.email {
            customer.email = normalize_text(email);
        }

        let updated = customer.clone();
        self.touch(Collection::Customers);
        Ok(updated)
    }

    /// Removes a customer record. Sales and loans keep the name they carry.
    pub fn remove_customer(&mut self, id: &str) -> CoreResult<Customer> {
        let index = self
            .customers
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::CustomerNotFound(id.to_string()))?;

        let removed = self.customers.remove(index);
        self.touch(Collection::Customers);
        Ok(removed)
    }

    /// Customer with this name (case-insensitive), if any.
    pub fn customer_by_name(&self, name: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.matches_name(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LedgerConfig;
    use crate::ids::now;

    #[test]
    fn test_upsert_matches_case_insensitive() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        let first = ledger.upsert_customer("Ana Souza", None, Money::from_cents(5000), now());
        let second = ledger.upsert_customer("ANA SOUZA", Some("11 99999-0000"), Money::from_cents(2500), now());

        assert_eq!(first, second);
        assert_eq!(ledger.customers().len(), 1);
        let customer = &ledger.customers()[0];
        assert_eq!(customer.purchase_count, 2);
        assert_eq!(customer.total_spent_cents, 7500);
        assert_eq!(customer.contact.as_deref(), Some("11 99999-0000"));
    }

    #[test]
    fn test_upsert_keeps_existing_contact() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        ledger.upsert_customer("Bruno", Some("first"), Money::from_cents(100), now());
        ledger.upsert_customer("bruno", Some("second"), Money::from_cents(100), now());
        assert_eq!(ledger.customers()[0].contact.as_deref(), Some("first"));
    }

    #[test]
    fn test_update_and_remove_customer() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        let id = ledger.upsert_customer("Carla", None, Money::from_cents(100), now());

        let updated = ledger
            .update_customer(
                &id,
                CustomerPatch {
                    email: Some(Some("carla@example.com".into())),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.email.as_deref(), Some("carla@example.com"));

        ledger.remove_customer(&id).unwrap();
        assert!(ledger.customer_by_name("carla").is_none());
        assert!(matches!(
            ledger.update_customer(&id, CustomerPatch::default()),
            Err(CoreError::CustomerNotFound(_))
        ));
    }
}
