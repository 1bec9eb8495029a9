//! # Repository Module
//!
//! Repository implementations for Stockroom.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().list(&query)                                    │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── list(&self, &ProductQuery)                                        │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── create(&self, &ProductDraft)                                      │
//! │  ├── update(&self, &ProductUpdate)                                     │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL text + Vec<SqlValue>                                      │
//! │       ▼                                                                 │
//! │  Arc<dyn QueryExecutor>  (SQLite or MySQL, same SQL)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CategoryRepository`](category::CategoryRepository) - Category listing and seeding
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD and filtered listing

pub mod category;
pub mod product;
