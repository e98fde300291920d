use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use spendwise::{
    Email, PasswordHash, SQLiteTransactionStore, Transaction, TransactionStore, ValidatedPassword,
    create_user, initialize_db, sample_transactions,
};

/// A utility for creating a database with a test user and their transactions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// The email the test user logs in with.
    #[arg(long, default_value = "test@example.com")]
    email: String,

    /// Create the user without any transactions, so the dashboard shows
    /// sample data.
    #[arg(long)]
    empty: bool,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    if output_path.extension().is_none_or(|extension| extension.is_empty()) {
        eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
        exit(1);
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating test user {}...", args.email);

    let password_hash = PasswordHash::new(
        ValidatedPassword::new_unchecked("test"),
        PasswordHash::DEFAULT_COST,
    )?;
    let user = create_user(Email::new(&args.email)?, password_hash, &conn)?;

    if !args.empty {
        let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));
        let transactions = sample_transactions();

        println!("Adding {} transactions...", transactions.len());

        for transaction in transactions {
            let Some(date) = transaction.date else {
                continue;
            };

            store.insert_transaction(
                user.id,
                Transaction::build(transaction.amount, date, &transaction.description)
                    .category(&transaction.category),
            )?;
        }
    }

    println!("Success! Log in with the password \"test\".");

    Ok(())
}
