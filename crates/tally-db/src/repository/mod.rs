//! # Repository Module
//!
//! Database access behind small, SQL-owning types.
//!
//! ## Collection Store
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  LedgerSession / loader                                                 │
//! │       │                                                                 │
//! │       │  db.collections().load("sales")                                 │
//! │       ▼                                                                 │
//! │  CollectionRepository                                                   │
//! │  ├── load(key)            → Option<String>                              │
//! │  ├── save(key, payload)   → upsert                                      │
//! │  ├── save_all(&[..])      → one transaction                             │
//! │  ├── remove(key)                                                        │
//! │  └── keys()                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  collections (key TEXT PK, payload TEXT, updated_at TEXT)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Payloads are opaque text here; parsing and record migration happen in
//! [`crate::loader`].

pub mod collection;

pub use collection::CollectionRepository;
