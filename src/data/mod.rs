//! Data layer: core types and loading.
//!
//! Architecture:
//! ```text
//!  Employment.csv  innovation.csv  Senior_Management.csv  Entrepreneurship.csv
//!        │               │                  │                      │
//!        └───────────────┴────────┬─────────┴──────────────────────┘
//!                                 ▼
//!                           ┌──────────┐
//!                           │  loader   │  parse file → Dataset, tag Source
//!                           └──────────┘
//!                                 │  concat (column union)
//!                                 ▼
//!                           ┌──────────┐
//!                           │ Dataset   │  immutable Vec<Record>
//!                           └──────────┘
//!                                 │  &Dataset
//!                                 ▼
//!                            query layer
//! ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub(crate) mod fixtures;
