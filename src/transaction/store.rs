//! Defines the transaction store trait and its SQLite implementation.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    auth::UserID,
    transaction::core::{NewTransaction, Transaction, map_transaction_row},
};

/// Handles the creation and retrieval of a user's transactions.
pub trait TransactionStore {
    /// Retrieve all of `user_id`'s transactions, most recent first.
    ///
    /// Rows with missing fields are returned with default values rather than
    /// causing an error.
    fn list_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error>;

    /// Store a new transaction for `user_id`.
    fn insert_transaction(
        &self,
        user_id: UserID,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error>;
}

/// Stores transactions in a SQLite database.
///
/// The user and transaction tables must already exist, see
/// [initialize](crate::db::initialize).
#[derive(Debug, Clone)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - or [Error::SqlError] if there is an SQL error.
    fn list_transactions(&self, user_id: UserID) -> Result<Vec<Transaction>, Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let mut statement = connection.prepare(
            "SELECT id, description, amount, predicted_category, date
             FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY date DESC, id DESC",
        )?;

        let rows = statement
            .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
            .collect::<Result<Vec<_>, rusqlite::Error>>()?;

        Ok(rows.into_iter().map(Transaction::from).collect())
    }

    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection lock is poisoned,
    /// - [Error::NotFound] if `user_id` does not refer to a registered user,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn insert_transaction(
        &self,
        user_id: UserID,
        transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let row = connection
            .prepare(
                "INSERT INTO \"transaction\"
                    (user_id, description, amount, predicted_category, confidence, date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id, description, amount, predicted_category, date",
            )?
            .query_row(
                (
                    user_id.as_i64(),
                    transaction.description,
                    transaction.amount,
                    transaction.category,
                    transaction.confidence,
                    transaction.date,
                ),
                map_transaction_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                    },
                    _,
                ) => Error::NotFound,
                error => error.into(),
            })?;

        Ok(row.into())
    }
}
