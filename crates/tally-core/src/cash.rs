//! # Cash Ledger
//!
//! Two independent channels, electronic and physical cash. Each movement's
//! channel and direction come from its [`MovementType`]; nobody sets them
//! directly.
//!
//! ## Balances
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  for each channel:                                                      │
//! │      balance = Σ inflows − Σ outflows   (movements of that channel)     │
//! │                                                                         │
//! │  total = electronic + physical cash                                     │
//! │                                                                         │
//! │  No running balance is stored; every read is a full scan.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::ids::{new_id, now};
use crate::money::Money;
use crate::state::{Collection, LedgerState};
use crate::types::{CashMovement, Channel, Direction, MovementLink, MovementType};
use crate::validation::{normalize_text, validate_name, validate_positive_amount, validate_text};

// =============================================================================
// Inputs and Aggregates
// =============================================================================

/// Input for a manual cash movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    pub movement_type: MovementType,
    pub description: String,
    pub amount_cents: i64,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Sale this money came from. Only for sale-proceeds types.
    pub sale_id: Option<String>,
    pub notes: Option<String>,
}

/// Cash position, recomputed from every movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CashBalances {
    pub electronic_cents: i64,
    pub physical_cash_cents: i64,
    pub total_cents: i64,
    /// All inflows, both channels.
    pub inflow_cents: i64,
    /// All outflows, both channels.
    pub outflow_cents: i64,
}

impl CashBalances {
    /// Folds a list of movements into channel balances.
    pub fn from_movements<'a>(movements: impl IntoIterator<Item = &'a CashMovement>) -> Self {
        let mut electronic = Money::zero();
        let mut physical = Money::zero();
        let mut inflow = Money::zero();
        let mut outflow = Money::zero();

        for movement in movements {
            match movement.channel {
                Channel::Electronic => electronic += movement.signed_amount(),
                Channel::PhysicalCash => physical += movement.signed_amount(),
            }
            match movement.direction {
                Direction::Inflow => inflow += movement.amount(),
                Direction::Outflow => outflow += movement.amount(),
            }
        }

        CashBalances {
            electronic_cents: electronic.cents(),
            physical_cash_cents: physical.cents(),
            total_cents: (electronic + physical).cents(),
            inflow_cents: inflow.cents(),
            outflow_cents: outflow.cents(),
        }
    }

    pub fn balance(&self, channel: Channel) -> Money {
        match channel {
            Channel::Electronic => Money::from_cents(self.electronic_cents),
            Channel::PhysicalCash => Money::from_cents(self.physical_cash_cents),
        }
    }

    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Cash Intents
// =============================================================================

impl LedgerState {
    /// Records a movement entered by the user.
    ///
    /// ## Errors
    /// - `Validation` for a blank description, non-positive amount, or a
    ///   sale link on a type that is not sale proceeds
    /// - `SaleNotFound` when linking to an unknown sale
    pub fn record_movement(&mut self, input: NewMovement) -> CoreResult<CashMovement> {
        validate_name("description", &input.description)?;
        validate_positive_amount("amount", input.amount_cents)?;
        validate_text("notes", input.notes.as_deref())?;

        let link = match input.sale_id {
            Some(sale_id) => {
                if !input.movement_type.is_sale_proceeds() {
                    return Err(ValidationError::NotAllowed {
                        field: "sale link".to_string(),
                        reason: format!("{} cannot reference a sale", input.movement_type.label()),
                    }
                    .into());
                }
                if self.sale(&sale_id).is_none() {
                    return Err(CoreError::SaleNotFound(sale_id));
                }
                Some(MovementLink::Sale(sale_id))
            }
            None => None,
        };

        Ok(self.push_movement(
            input.movement_type,
            input.description.trim(),
            Money::from_cents(input.amount_cents),
            input.date,
            link,
            normalize_text(input.notes),
        ))
    }

    /// Deletes a movement. Whatever it linked to is left alone.
    pub fn remove_movement(&mut self, movement_id: &str) -> CoreResult<CashMovement> {
        let index = self
            .cash_movements
            .iter()
            .position(|m| m.id == movement_id)
            .ok_or_else(|| CoreError::MovementNotFound(movement_id.to_string()))?;

        let removed = self.cash_movements.remove(index);
        self.touch(Collection::CashMovements);
        Ok(removed)
    }

    /// Current balances per channel.
    pub fn cash_balances(&self) -> CashBalances {
        CashBalances::from_movements(&self.cash_movements)
    }

    /// Movements narrowed by channel and/or direction (`None` = any).
    pub fn movements_filtered(
        &self,
        channel: Option<Channel>,
        direction: Option<Direction>,
    ) -> Vec<&CashMovement> {
        self.cash_movements
            .iter()
            .filter(|m| channel.map_or(true, |c| m.channel == c))
            .filter(|m| direction.map_or(true, |d| m.direction == d))
            .collect()
    }

    /// Builds a movement with channel and direction taken from its type and
    /// puts it at the front of the ledger.
    pub(crate) fn push_movement(
        &mut self,
        movement_type: MovementType,
        description: &str,
        amount: Money,
        date: NaiveDate,
        link: Option<MovementLink>,
        notes: Option<String>,
    ) -> CashMovement {
        let movement = CashMovement {
            id: new_id(),
            movement_type,
            channel: movement_type.channel(),
            direction: movement_type.direction(),
            description: description.to_string(),
            amount_cents: amount.cents(),
            date,
            link,
            notes,
            created_at: now(),
        };
        self.cash_movements.insert(0, movement.clone());
        self.touch(Collection::CashMovements);
        movement
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
