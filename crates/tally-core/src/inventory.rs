//! # Inventory
//!
//! Product catalog intents and stock queries.
//!
//! Stock moves in three places:
//! - sales decrement it (floored at zero, see `sale`)
//! - purchases increment it for cataloged lines (see `purchase`)
//! - direct edits set it (here)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::ids::{new_id, now};
use crate::state::{Collection, LedgerState};
use crate::types::{Category, Product};
use crate::validation::{
    normalize_text, validate_name, validate_price_cents, validate_stock_level, validate_text,
};

/// Input for a new catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    pub cost_cents: i64,
    pub price_cents: i64,
    pub quantity: i64,
    pub supplier: Option<String>,
    #[ts(as = "String")]
    pub acquired_on: NaiveDate,
    pub notes: Option<String>,
}

/// Partial update: `None` leaves a field unchanged.
///
/// Optional text fields use `Some(None)` to clear them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<Category>,
    pub cost_cents: Option<i64>,
    pub price_cents: Option<i64>,
    pub quantity: Option<i64>,
    pub supplier: Option<Option<String>>,
    #[ts(as = "Option<String>")]
    pub acquired_on: Option<NaiveDate>,
    pub notes: Option<Option<String>>,
}

impl LedgerState {
    /// Adds a product to the front of the catalog.
    pub fn add_product(&mut self, input: NewProduct) -> CoreResult<Product> {
        validate_name("product name", &input.name)?;
        validate_text("description", input.description.as_deref())?;
        validate_text("supplier", input.supplier.as_deref())?;
        validate_text("notes", input.notes.as_deref())?;
        validate_price_cents("cost price", input.cost_cents)?;
        validate_price_cents("sale price", input.price_cents)?;
        validate_stock_level(input.quantity)?;

        let product = Product {
            id: new_id(),
            name: input.name.trim().to_string(),
            description: normalize_text(input.description),
            category: input.category,
            cost_cents: input.cost_cents,
            price_cents: input.price_cents,
            quantity: input.quantity,
            supplier: normalize_text(input.supplier),
            acquired_on: input.acquired_on,
            notes: normalize_text(input.notes),
            created_at: now(),
        };

        self.products.insert(0, product.clone());
        self.touch(Collection::Products);
        Ok(product)
    }

    /// Applies a partial update to a product.
    ///
    /// Past sales keep their snapshot of name and price.
    pub fn update_product(&mut self, id: &str, patch: ProductPatch) -> CoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        if let Some(name) = &patch.name {
            validate_name("product name", name)?;
        }
        if let Some(description) = &patch.description {
            validate_text("description", description.as_deref())?;
        }
        if let Some(supplier) = &patch.supplier {
            validate_text("supplier", supplier.as_deref())?;
        }
        if let Some(notes) = &patch.notes {
            validate_text("notes", notes.as_deref())?;
        }
        if let Some(cost) = patch.cost_cents {
            validate_price_cents("cost price", cost)?;
        }
        if let Some(price) = patch.price_cents {
            validate_price_cents("sale price", price)?;
        }
        if let Some(quantity) = patch.quantity {
            validate_stock_level(quantity)?;
        }

        let product = &mut self.products[index];
        if let Some(name) = patch.name {
            product.name = name.trim().to_string();
        }
        if let Some(description) = patch.description {
            product.description = normalize_text(description);
        }
        if let Some(category) = patch.category {
            product.category = category;
        }
        if let Some(cost) = patch.cost_cents {
            product.cost_cents = cost;
        }
        if let Some(price) = patch.price_cents {
            product.price_cents = price;
        }
        if let Some(quantity) = patch.quantity {
            product.quantity = quantity;
        }
        if let Some(supplier) = patch.supplier {
            product.supplier = normalize_text(supplier);
        }
        if let Some(acquired_on) = patch.acquired_on {
            product.acquired_on = acquired_on;
        }
        if let Some(notes) = patch.notes {
            product.notes = normalize_text(notes);
        }

        let updated = product.clone();
        self.touch(Collection::Products);
        Ok(updated)
    }

    /// Removes a product. Sales that reference it keep their snapshot.
    pub fn remove_product(&mut self, id: &str) -> CoreResult<Product> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| CoreError::ProductNotFound(id.to_string()))?;

        let removed = self.products.remove(index);
        self.touch(Collection::Products);
        Ok(removed)
    }

    /// Pre-check for a sale line: is there enough on hand?
    ///
    /// ## Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use tally_core::{Category, CoreError, LedgerConfig, LedgerState};
    /// use tally_core::inventory::NewProduct;
    ///
    /// let mut ledger = LedgerState::new(LedgerConfig::default());
    /// let jacket = ledger.add_product(NewProduct {
    ///     name: "Denim jacket".into(),
    ///     description: None,
    ///     category: Category::Clothing,
    ///     cost_cents: 8000,
    ///     price_cents: 15000,
    ///     quantity: 3,
    ///     supplier: None,
    ///     acquired_on: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
    ///     notes: None,
    /// }).unwrap();
    ///
    /// assert!(ledger.check_stock(&jacket.id, 3).is_ok());
    /// assert!(matches!(
    ///     ledger.check_stock(&jacket.id, 5),
    ///     Err(CoreError::InsufficientStock { available: 3, requested: 5, .. })
    /// ));
    /// ```
    pub fn check_stock(&self, product_id: &str, quantity: i64) -> CoreResult<()> {
        let product = self
            .product(product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        if !product.can_sell(quantity) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.quantity,
                requested: quantity,
            });
        }
        Ok(())
    }

    /// Products running low (above zero, at or below the threshold).
    pub fn low_stock_products(&self) -> Vec<&Product> {
        let threshold = self.config.low_stock_threshold;
        self.products
            .iter()
            .filter(|p| p.is_low_stock(threshold))
            .collect()
    }

    pub fn out_of_stock_products(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_out_of_stock()).collect()
    }

    /// Adds (or with a negative delta, removes) stock, flooring at zero.
    ///
    /// Unknown ids are skipped; callers resolve ids first.
    pub(crate) fn adjust_stock(&mut self, product_id: &str, delta: i64) {
        if let Some(product) = self.products.iter_mut().find(|p| p.id == product_id) {
            product.quantity = (product.quantity + delta).max(0);
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::LedgerConfig;

    pub(crate) fn jacket(quantity: i64) -> NewProduct {
        NewProduct {
            name: "Denim jacket".into(),
            description: Some("Blue, size M".into()),
            category: Category::Clothing,
            cost_cents: 8000,
            price_cents: 15000,
            quantity,
            supplier: Some("Atacado Central".into()),
            acquired_on: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            notes: None,
        }
    }

    pub(crate) fn phone_case(quantity: i64) -> NewProduct {
        NewProduct {
            name: "Phone case".into(),
            description: None,
            category: Category::Electronics,
            cost_cents: 1000,
            price_cents: 3500,
            quantity,
            supplier: None,
            acquired_on: NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
            notes: None,
        }
    }

    #[test]
    fn test_add_product_newest_first() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        let first = ledger.add_product(jacket(5)).unwrap();
        let second = ledger.add_product(phone_case(10)).unwrap();

        assert_eq!(ledger.products()[0].id, second.id);
        assert_eq!(ledger.products()[1].id, first.id);
        assert_eq!(ledger.dirty(), vec![Collection::Products]);
    }

    #[test]
    fn test_add_product_rejects_bad_input() {
        let mut ledger = LedgerState::new(LedgerConfig::default());

        let mut input = jacket(5);
        input.name = "  ".into();
        assert!(matches!(ledger.add_product(input), Err(CoreError::Validation(_))));

        let mut input = jacket(5);
        input.quantity = -1;
        assert!(ledger.add_product(input).is_err());
        assert!(ledger.products().is_empty());
        assert!(ledger.dirty().is_empty());
    }

    #[test]
    fn test_update_product_patch() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        let product = ledger.add_product(jacket(5)).unwrap();

        let updated = ledger
            .update_product(
                &product.id,
                ProductPatch {
                    price_cents: Some(16000),
                    supplier: Some(None),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.price_cents, 16000);
        assert_eq!(updated.supplier, None);
        assert_eq!(updated.name, "Denim jacket");
        assert_eq!(updated.quantity, 5);
    }

    #[test]
    fn test_update_unknown_product() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        let err = ledger
            .update_product("missing", ProductPatch::default())
            .unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(_)));
    }

    #[test]
    fn test_invalid_patch_leaves_product_untouched() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        let product = ledger.add_product(jacket(5)).unwrap();

        let result = ledger.update_product(
            &product.id,
            ProductPatch {
                price_cents: Some(20000),
                cost_cents: Some(-5),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert_eq!(ledger.product(&product.id).unwrap().price_cents, 15000);
    }

    #[test]
    fn test_stock_lists() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        ledger.add_product(jacket(2)).unwrap();
        ledger.add_product(phone_case(0)).unwrap();
        let mut plenty = jacket(40);
        plenty.name = "Scarf".into();
        ledger.add_product(plenty).unwrap();

        let low: Vec<&str> = ledger.low_stock_products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(low, vec!["Denim jacket"]);
        let out: Vec<&str> = ledger.out_of_stock_products().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(out, vec!["Phone case"]);
    }

    #[test]
    fn test_adjust_stock_floors_at_zero() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        let product = ledger.add_product(jacket(2)).unwrap();

        ledger.adjust_stock(&product.id, -5);
        assert_eq!(ledger.product(&product.id).unwrap().quantity, 0);

        ledger.adjust_stock(&product.id, 4);
        assert_eq!(ledger.product(&product.id).unwrap().quantity, 4);
    }

    #[test]
    fn test_remove_product() {
        let mut ledger = LedgerState::new(LedgerConfig::default());
        let product = ledger.add_product(jacket(2)).unwrap();
        ledger.remove_product(&product.id).unwrap();
        assert!(ledger.products().is_empty());
        assert!(matches!(
            ledger.remove_product(&product.id),
            Err(CoreError::ProductNotFound(_))
        ));
    }
}
