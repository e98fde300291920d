//! Categorized transactions and where they are stored.
//!
//! This module contains:
//! - The `Transaction` model and the `NewTransaction` builder
//! - The raw `TransactionRow` and how it is reshaped into a `Transaction`
//! - The `TransactionStore` trait and its SQLite implementation

mod core;
mod store;

pub use core::{
    NewTransaction, Transaction, UNDEFINED_CATEGORY, create_transaction_table,
};
pub use store::{SQLiteTransactionStore, TransactionStore};
