//! The sample data shown when there is nothing of the user's own to show.
//!
//! The summary and breakdown are fixed values rather than being computed from
//! the sample transactions, so they describe a fuller month than the ten
//! transactions listed.

use time::{Date, macros::date};

use crate::{
    dashboard::aggregation::{CategorySummary, DashboardSummary},
    transaction::Transaction,
};

const SAMPLE_TOTAL_SPENT: f64 = 3273.05;
const SAMPLE_TOP_CATEGORY: &str = "housing";
const SAMPLE_TRANSACTION_COUNT: usize = 45;

const SAMPLE_CATEGORIES: [(&str, f64, &str); 7] = [
    ("housing", 1200.0, "#3b82f6"),
    ("food", 650.45, "#ef4444"),
    ("transportation", 420.78, "#10b981"),
    ("healthcare", 280.5, "#f59e0b"),
    ("shopping", 345.67, "#8b5cf6"),
    ("entertainment", 180.25, "#06b6d4"),
    ("miscellaneous", 195.4, "#6b7280"),
];

const SAMPLE_TRANSACTIONS: [(&str, f64, &str, Date); 10] = [
    ("Rent Payment", -1200.0, "housing", date!(2024 - 01 - 15)),
    ("Grocery Shopping", -89.45, "food", date!(2024 - 01 - 14)),
    ("Gas Station", -45.3, "transportation", date!(2024 - 01 - 14)),
    ("Doctor Visit", -150.0, "healthcare", date!(2024 - 01 - 13)),
    ("Movie Theater", -24.5, "entertainment", date!(2024 - 01 - 12)),
    ("Clothing Store", -75.2, "shopping", date!(2024 - 01 - 11)),
    ("Coffee Shop", -12.45, "food", date!(2024 - 01 - 11)),
    ("Uber Ride", -18.3, "transportation", date!(2024 - 01 - 10)),
    ("Pharmacy", -35.75, "healthcare", date!(2024 - 01 - 10)),
    ("Office Supplies", -42.15, "miscellaneous", date!(2024 - 01 - 09)),
];

/// The summary cards for the sample dashboard.
pub(super) fn sample_summary() -> DashboardSummary {
    DashboardSummary {
        total_spent: SAMPLE_TOTAL_SPENT,
        top_category: SAMPLE_TOP_CATEGORY.to_owned(),
        total_transaction_count: SAMPLE_TRANSACTION_COUNT,
    }
}

/// The spending breakdown for the sample dashboard, each with its own colour.
pub(super) fn sample_categories() -> Vec<CategorySummary> {
    SAMPLE_CATEGORIES
        .iter()
        .map(|&(name, value, color)| CategorySummary {
            name: name.to_owned(),
            value,
            color,
        })
        .collect()
}

/// Ten example transactions, most recent first.
///
/// Also used to seed development databases.
pub fn sample_transactions() -> Vec<Transaction> {
    SAMPLE_TRANSACTIONS
        .iter()
        .zip(1..)
        .map(|(&(description, amount, category, date), id)| Transaction {
            id,
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
            date: Some(date),
        })
        .collect()
}
