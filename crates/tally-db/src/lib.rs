//! # tally-db: Persistence Layer for Tally
//!
//! Stores the ledger collections in SQLite and hosts [`LedgerSession`], the
//! controller that applies engine intents and writes back what changed.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Tally Data Flow                                │
//! │                                                                         │
//! │  UI action (register payment)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     tally-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │ LedgerSession │    │   Database    │    │  Migrations  │    │    │
//! │  │   │ (session.rs)  │───►│   (pool.rs)   │    │  (embedded)  │    │    │
//! │  │   │               │    │               │    │              │    │    │
//! │  │   │ LedgerState   │    │ SqlitePool    │    │ 001_collec-  │    │    │
//! │  │   │ dirty set     │    │ Collection-   │    │ tions.sql    │    │    │
//! │  │   │               │    │ Repository    │    │              │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     SQLite Database                             │    │
//! │  │   collections(key, payload JSON, updated_at)                    │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - File and environment configuration
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded schema migrations
//! - [`repository`] - Collection payload storage
//! - [`loader`] - Load with record migration, save changed collections
//! - [`session`] - Intent application and write-back
//! - [`error`] - Database error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tally_db::{AppConfig, Database, LedgerSession};
//!
//! let config = AppConfig::load_or_default(None);
//! let db = Database::new(config.db_config()).await?;
//! let mut session = LedgerSession::open(db, config.ledger).await?;
//!
//! let sale = session.create_sale(new_sale).await?;
//! let dashboard = session.state().dashboard(today);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod loader;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod session;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::AppConfig;
pub use error::{DbError, DbResult};
pub use loader::{load_state, save_collections};
pub use pool::{Database, DbConfig};
pub use repository::CollectionRepository;
pub use session::LedgerSession;
