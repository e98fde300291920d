//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::database_id::TransactionId;

/// The category name given to transactions whose stored category is missing.
pub const UNDEFINED_CATEGORY: &str = "undefined";

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income that has been assigned a spending category.
///
/// Negative amounts are expenses, positive amounts are income or credits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: f64,
    /// The spending category, e.g. "food", "housing".
    ///
    /// Categories are open labels chosen by the classifier, not a closed set.
    pub category: String,
    /// When the transaction happened.
    ///
    /// `None` if the stored date could not be read.
    pub date: Option<Date>,
}

impl Transaction {
    /// Create a new transaction to be inserted into a store.
    ///
    /// Shortcut for [NewTransaction] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> NewTransaction {
        NewTransaction {
            amount,
            date,
            description: description.to_owned(),
            category: None,
            confidence: None,
        }
    }
}

/// A builder for transactions that have not been stored yet.
#[derive(Debug, PartialEq, Clone)]
pub struct NewTransaction {
    /// The monetary amount of the transaction.
    ///
    /// Positive values represent income/credits, negative values represent
    /// expenses/debits.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// A human-readable description of the transaction, e.g. "Starbucks coffee".
    pub description: String,
    /// The category predicted by the classifier.
    pub category: Option<String>,
    /// The classifier's confidence in `category` as a percentage.
    pub confidence: Option<f64>,
}

impl NewTransaction {
    /// Set the predicted category for the transaction.
    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_owned());
        self
    }

    /// Set the classifier confidence for the transaction.
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }
}

/// A transaction row exactly as it is stored.
///
/// Every column is optional so that rows with missing or malformed fields can
/// still be shown instead of failing the whole page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionRow {
    pub id: TransactionId,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub predicted_category: Option<String>,
    pub date: Option<Date>,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Transaction {
            id: row.id,
            description: row.description.unwrap_or_default(),
            amount: row.amount.unwrap_or(0.0),
            category: row
                .predicted_category
                .filter(|category| !category.trim().is_empty())
                .unwrap_or_else(|| UNDEFINED_CATEGORY.to_owned()),
            date: row.date,
        }
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT,
                amount REAL,
                predicted_category TEXT,
                confidence REAL,
                date TEXT,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Add composite index used by the dashboard page.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a [TransactionRow].
///
/// Columns that are NULL or cannot be converted are left as `None`.
pub fn map_transaction_row(row: &Row) -> Result<TransactionRow, rusqlite::Error> {
    Ok(TransactionRow {
        id: row.get(0)?,
        description: row.get(1).ok().flatten(),
        amount: row.get(2).ok().flatten(),
        predicted_category: row.get(3).ok().flatten(),
        date: row.get(4).ok().flatten(),
    })
}
