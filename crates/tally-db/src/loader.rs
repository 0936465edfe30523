//! # Ledger Loading and Saving
//!
//! ```text
//!   collections table ──load──► payload text ──migrate──► LedgerState
//!                                                 │
//!                                                 └─► warn! per dropped record
//!
//!   LedgerState ──take_dirty──► [Collection] ──collection_json──► save_all
//!                                                      (one transaction)
//! ```

use std::collections::BTreeMap;

use tally_core::migrate::migrate_collections;
use tally_core::{Collection, LedgerConfig, LedgerState};
use tracing::{info, warn};

use crate::error::DbResult;
use crate::pool::Database;

/// Reads every collection, migrates its records and builds the state.
///
/// Records that cannot be migrated are logged and left out; the stored
/// payload is only rewritten the next time that collection changes.
pub async fn load_state(db: &Database, config: LedgerConfig) -> DbResult<LedgerState> {
    let repo = db.collections();
    let mut payloads: BTreeMap<Collection, String> = BTreeMap::new();
    for collection in Collection::ALL {
        if let Some(payload) = repo.load(collection.key()).await? {
            payloads.insert(collection, payload);
        }
    }

    let (collections, report) = migrate_collections(&config, |c| payloads.remove(&c));

    for collection in &report.discarded {
        warn!(
            collection = %collection,
            "Stored payload is not a list; collection starts empty"
        );
    }
    for (collection, dropped) in &report.dropped {
        warn!(
            collection = %collection,
            index = dropped.index,
            id = dropped.id.as_deref().unwrap_or("-"),
            reason = %dropped.error,
            "Dropping unreadable record"
        );
    }

    info!(
        products = collections.products.len(),
        sales = collections.sales.len(),
        loans = collections.loans.len(),
        movements = collections.cash_movements.len(),
        purchases = collections.purchases.len(),
        goals = collections.goals.len(),
        customers = collections.customers.len(),
        dropped = report.dropped.len(),
        "Ledger loaded"
    );

    Ok(LedgerState::from_collections(config, collections))
}

/// Writes the given collections of `state` in one transaction.
pub async fn save_collections(
    db: &Database,
    state: &LedgerState,
    collections: &[Collection],
) -> DbResult<()> {
    if collections.is_empty() {
        return Ok(());
    }

    let mut entries = Vec::with_capacity(collections.len());
    for collection in collections {
        entries.push((collection.key(), state.collection_json(*collection)?));
    }
    db.collections().save_all(&entries).await
}
