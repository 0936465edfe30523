//! # Purchases
//!
//! Restocking purchases propagate into two other ledgers:
//!
//! ```text
//! create_purchase
//!     │
//!     ├──► Products: +quantity for every line with a product id
//!     │              (free-text lines have no inventory effect)
//!     │
//!     └──► Cash: one outflow movement, amount = purchase total,
//!                channel from the payment method, linked to the purchase
//!
//! remove_purchase
//!     │
//!     └──► Cash: linked movements removed too (stock is not rolled back)
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ids::{new_id, now};
use crate::money::Money;
use crate::state::{Collection, LedgerState};
use crate::types::{MovementLink, MovementType, PaymentMethod, Purchase, PurchaseItem};
use crate::validation::{
    normalize_text, validate_line_count, validate_name, validate_price_cents, validate_quantity,
    validate_text,
};

/// One line of a purchase as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseLine {
    /// Catalog product to restock. `None` for uncataloged goods.
    pub product_id: Option<String>,
    /// Required when `product_id` is `None`; ignored otherwise.
    pub product_name: Option<String>,
    pub quantity: i64,
    pub unit_cost_cents: i64,
}

/// Input for a new purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewPurchase {
    pub supplier: String,
    pub items: Vec<PurchaseLine>,
    #[ts(as = "String")]
    pub purchase_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

impl LedgerState {
    /// Records a purchase, restocks the catalog and books the cash outflow.
    pub fn create_purchase(&mut self, input: NewPurchase) -> CoreResult<Purchase> {
        validate_name("supplier", &input.supplier)?;
        validate_text("notes", input.notes.as_deref())?;
        validate_line_count("purchase items", input.items.len())?;

        let mut items = Vec::with_capacity(input.items.len());
        for line in &input.items {
            validate_quantity(line.quantity)?;
            validate_price_cents("unit cost", line.unit_cost_cents)?;

            let product_name = match &line.product_id {
                Some(product_id) => self
                    .product(product_id)
                    .map(|p| p.name.clone())
                    .ok_or_else(|| CoreError::ProductNotFound(product_id.clone()))?,
                None => {
                    let name = line.product_name.as_deref().unwrap_or_default();
                    validate_name("product name", name)?;
                    name.trim().to_string()
                }
            };

            items.push(PurchaseItem {
                product_id: line.product_id.clone(),
                product_name,
                quantity: line.quantity,
                unit_cost_cents: line.unit_cost_cents,
            });
        }

        let total: Money = items.iter().map(PurchaseItem::subtotal).sum();
        let purchase = Purchase {
            id: new_id(),
            supplier: input.supplier.trim().to_string(),
            items,
            total_cents: total.cents(),
            purchase_date: input.purchase_date,
            payment_method: input.payment_method,
            notes: normalize_text(input.notes),
            created_at: now(),
        };

        for item in &purchase.items {
            if let Some(product_id) = &item.product_id {
                self.adjust_stock(product_id, item.quantity);
            }
        }
        self.push_movement(
            MovementType::purchase_outflow(purchase.payment_method),
            &format!("Purchase from {}", purchase.supplier),
            total,
            purchase.purchase_date,
            Some(MovementLink::Purchase(purchase.id.clone())),
            None,
        );
        self.purchases.insert(0, purchase.clone());

        self.touch(Collection::Purchases);
        self.touch(Collection::Products);
        Ok(purchase)
    }

    /// Removes a purchase and every cash movement linked to it.
    ///
    /// Returns the removed purchase and how many movements went with it.
    pub fn remove_purchase(&mut self, purchase_id: &str) -> CoreResult<(Purchase, usize)> {
        let index = self
            .purchases
            .iter()
            .position(|p| p.id == purchase_id)
            .ok_or_else(|| CoreError::PurchaseNotFound(purchase_id.to_string()))?;

        let removed = self.purchases.remove(index);
        let before = self.cash_movements.len();
        self.cash_movements
            .retain(|m| !m.is_linked_to_purchase(purchase_id));
        let cascaded = before - self.cash_movements.len();

        self.touch(Collection::Purchases);
        if cascaded > 0 {
            self.touch(Collection::CashMovements);
        }
        Ok((removed, cascaded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cash::NewMovement;
    use crate::payment::PaymentInput;
    use crate::sale::tests::{day, new_sale, stocked_ledger};
    use crate::sale::SaleLine;
    use crate::types::{Channel, Direction};

    fn restock(product_id: &str, quantity: i64, method: PaymentMethod) -> NewPurchase {
        NewPurchase {
            supplier: "Atacado Central".into(),
            items: vec![
                PurchaseLine {
                    product_id: Some(product_id.to_string()),
                    product_name: None,
                    quantity,
                    unit_cost_cents: 8000,
                },
                PurchaseLine {
                    product_id: None,
                    product_name: Some("Gift bags".into()),
                    quantity: 50,
                    unit_cost_cents: 20,
                },
            ],
            purchase_date: day(2026, 2, 1),
            payment_method: method,
            notes: None,
        }
    }

    #[test]
    fn test_purchase_restocks_and_books_outflow() {
        let (mut ledger, jacket, _) = stocked_ledger();
        let purchase = ledger
            .create_purchase(restock(&jacket, 5, PaymentMethod::InstantTransfer))
            .unwrap();

        assert_eq!(purchase.total_cents, 5 * 8000 + 50 * 20);
        assert_eq!(purchase.items[0].product_name, "Denim jacket");
        assert_eq!(ledger.product(&jacket).unwrap().quantity, 15);

        assert_eq!(ledger.cash_movements().len(), 1);
        let movement = &ledger.cash_movements()[0];
        assert_eq!(movement.movement_type, MovementType::PurchaseOutflowTransfer);
        assert_eq!(movement.channel, Channel::Electronic);
        assert_eq!(movement.direction, Direction::Outflow);
        assert_eq!(movement.amount_cents, purchase.total_cents);
        assert!(movement.is_linked_to_purchase(&purchase.id));
    }

    #[test]
    fn test_non_transfer_purchase_uses_physical_cash() {
        let (mut ledger, jacket, _) = stocked_ledger();
        ledger
            .create_purchase(restock(&jacket, 1, PaymentMethod::Card))
            .unwrap();
        assert_eq!(ledger.cash_movements()[0].channel, Channel::PhysicalCash);
    }

    #[test]
    fn test_uncataloged_line_needs_a_name() {
        let (mut ledger, jacket, _) = stocked_ledger();
        let mut input = restock(&jacket, 1, PaymentMethod::Cash);
        input.items[1].product_name = None;

        assert!(ledger.create_purchase(input).is_err());
        assert_eq!(ledger.product(&jacket).unwrap().quantity, 10);
        assert!(ledger.cash_movements().is_empty());
    }

    #[test]
    fn test_unknown_product_in_purchase() {
        let (mut ledger, _, _) = stocked_ledger();
        let result = ledger.create_purchase(restock("ghost", 1, PaymentMethod::Cash));
        assert!(matches!(result, Err(CoreError::ProductNotFound(_))));
    }

    #[test]
    fn test_remove_purchase_cascades_to_linked_movement_only() {
        let (mut ledger, jacket, _) = stocked_ledger();
        let purchase = ledger
            .create_purchase(restock(&jacket, 5, PaymentMethod::Cash))
            .unwrap();
        ledger
            .record_movement(NewMovement {
                movement_type: MovementType::AdjustmentInCash,
                description: "Float".into(),
                amount_cents: 5000,
                date: day(2026, 2, 1),
                sale_id: None,
                notes: None,
            })
            .unwrap();
        ledger.take_dirty();

        let (_, cascaded) = ledger.remove_purchase(&purchase.id).unwrap();
        assert_eq!(cascaded, 1);
        assert!(ledger.purchases().is_empty());
        assert_eq!(ledger.cash_movements().len(), 1);
        assert_eq!(ledger.cash_movements()[0].description, "Float");
        // Stock is not rolled back
        assert_eq!(ledger.product(&jacket).unwrap().quantity, 15);
        assert_eq!(
            ledger.dirty(),
            vec![Collection::CashMovements, Collection::Purchases]
        );
    }

    #[test]
    fn test_removing_sale_linked_movement_leaves_sale() {
        let (mut ledger, jacket, _) = stocked_ledger();
        let sale = ledger
            .create_sale(new_sale(
                vec![SaleLine::new(&jacket, 1)],
                "Ana",
                PaymentMethod::Card,
                1,
                day(2026, 2, 1),
            ))
            .unwrap();
        ledger
            .register_sale_payment(&sale.id, PaymentInput::new(5000, day(2026, 2, 2)))
            .unwrap();
        let movement = ledger
            .record_movement(NewMovement {
                movement_type: MovementType::SaleProceedsCash,
                description: "Ana, first part".into(),
                amount_cents: 5000,
                date: day(2026, 2, 2),
                sale_id: Some(sale.id.clone()),
                notes: None,
            })
            .unwrap();

        let before = ledger.sale(&sale.id).unwrap().clone();
        ledger.remove_movement(&movement.id).unwrap();
        assert_eq!(ledger.sale(&sale.id).unwrap(), &before);
    }

    #[test]
    fn test_remove_missing_purchase() {
        let (mut ledger, _, _) = stocked_ledger();
        assert!(matches!(
            ledger.remove_purchase("nope"),
            Err(CoreError::PurchaseNotFound(_))
        ));
    }
}
