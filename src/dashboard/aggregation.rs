//! Derives the dashboard figures from a user's transactions.
//!
//! Totals use the signed amounts as stored, so income offsets spending. If
//! there is no signed-in user, or the user has no transactions, the dashboard
//! falls back to the sample data as a whole rather than mixing the two.

use std::collections::HashMap;

use crate::{
    auth::UserID,
    dashboard::sample::{sample_categories, sample_summary, sample_transactions},
    transaction::Transaction,
};

/// The colours given to categories in the breakdown, by position.
pub(super) const PALETTE: [&str; 7] = [
    "#3b82f6", "#ef4444", "#10b981", "#f59e0b", "#8b5cf6", "#06b6d4", "#6b7280",
];

/// Shown as the top category when there is nothing to rank.
pub(super) const NO_CATEGORY: &str = "N/A";

/// How many transactions the recent transactions table shows.
pub(super) const RECENT_TRANSACTION_COUNT: usize = 10;

/// The figures shown in the summary cards.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct DashboardSummary {
    pub total_spent: f64,
    pub top_category: String,
    pub total_transaction_count: usize,
}

/// The signed total for one category and the colour used to draw it.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategorySummary {
    pub name: String,
    pub value: f64,
    pub color: &'static str,
}

/// Why the sample data is shown instead of the user's own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum FallbackReason {
    /// Nobody is signed in.
    Guest,
    /// The user is signed in but has not recorded anything yet.
    NoTransactions,
}

/// Where the dashboard figures came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum DashboardMode {
    Live,
    Fallback(FallbackReason),
}

/// Everything needed to render the dashboard once.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Dashboard {
    pub mode: DashboardMode,
    pub summary: DashboardSummary,
    pub categories: Vec<CategorySummary>,
    pub recent: Vec<Transaction>,
}

/// The signed sum of every transaction amount.
pub(super) fn total_spent(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .map(|transaction| transaction.amount)
        .sum()
}

/// Sums the signed amounts per category.
///
/// Categories appear in the order they are first seen in `transactions`.
pub(super) fn group_by_category(transactions: &[Transaction]) -> Vec<(&str, f64)> {
    let mut groups: Vec<(&str, f64)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        let category = transaction.category.as_str();

        match positions.get(category) {
            Some(&position) => groups[position].1 += transaction.amount,
            None => {
                positions.insert(category, groups.len());
                groups.push((category, transaction.amount));
            }
        }
    }

    groups
}

/// The category whose signed total is largest in magnitude.
///
/// This is not the largest signed total. Expenses are negative, so ranking by
/// signed total would pick the category with the least spending: food at -80
/// ranks above transport at -20 here, where a signed ranking would pick
/// transport. Ties go to the category seen first. Returns [NO_CATEGORY] if there are no
/// transactions.
pub(super) fn top_category(transactions: &[Transaction]) -> String {
    let mut top: Option<(&str, f64)> = None;

    for (name, total) in group_by_category(transactions) {
        match top {
            Some((_, top_total)) if total.abs() <= top_total.abs() => {}
            _ => top = Some((name, total)),
        }
    }

    top.map(|(name, _)| name.to_owned())
        .unwrap_or_else(|| NO_CATEGORY.to_owned())
}

/// The per category totals coloured by cycling through [PALETTE].
pub(super) fn category_breakdown(transactions: &[Transaction]) -> Vec<CategorySummary> {
    group_by_category(transactions)
        .into_iter()
        .enumerate()
        .map(|(index, (name, value))| CategorySummary {
            name: name.to_owned(),
            value,
            color: PALETTE[index % PALETTE.len()],
        })
        .collect()
}

/// The first [RECENT_TRANSACTION_COUNT] transactions.
///
/// `transactions` are expected to already be sorted most recent first.
pub(super) fn recent_transactions(transactions: &[Transaction]) -> Vec<Transaction> {
    transactions
        .iter()
        .take(RECENT_TRANSACTION_COUNT)
        .cloned()
        .collect()
}

/// Computes the summary cards from `transactions`.
pub(super) fn summarize(transactions: &[Transaction]) -> DashboardSummary {
    DashboardSummary {
        total_spent: total_spent(transactions),
        top_category: top_category(transactions),
        total_transaction_count: transactions.len(),
    }
}

/// Builds the dashboard for `user`, who has the transactions `live`.
///
/// Guests and users without any transactions get the sample dashboard.
pub(super) fn build_dashboard(user: Option<UserID>, live: Vec<Transaction>) -> Dashboard {
    let reason = match user {
        None => Some(FallbackReason::Guest),
        Some(_) if live.is_empty() => Some(FallbackReason::NoTransactions),
        Some(_) => None,
    };

    match reason {
        Some(reason) => Dashboard {
            mode: DashboardMode::Fallback(reason),
            summary: sample_summary(),
            categories: sample_categories(),
            recent: recent_transactions(&sample_transactions()),
        },
        None => Dashboard {
            mode: DashboardMode::Live,
            summary: summarize(&live),
            categories: category_breakdown(&live),
            recent: recent_transactions(&live),
        },
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        auth::UserID,
        dashboard::sample::{sample_categories, sample_summary},
        transaction::{Transaction, UNDEFINED_CATEGORY},
    };

    use super::{
        CategorySummary, DashboardMode, FallbackReason, NO_CATEGORY, PALETTE,
        RECENT_TRANSACTION_COUNT, build_dashboard, category_breakdown, recent_transactions,
        summarize, top_category, total_spent,
    };

    fn transaction(id: i64, amount: f64, category: &str) -> Transaction {
        Transaction {
            id,
            description: format!("transaction #{id}"),
            amount,
            category: category.to_owned(),
            date: Some(date!(2025 - 06 - 01)),
        }
    }

    fn food_and_transport() -> Vec<Transaction> {
        vec![
            transaction(1, -50.0, "food"),
            transaction(2, -30.0, "food"),
            transaction(3, -20.0, "transport"),
        ]
    }

    #[test]
    fn summarizes_food_and_transport() {
        let transactions = food_and_transport();

        let summary = summarize(&transactions);

        assert_eq!(summary.total_spent, -100.0);
        assert_eq!(summary.top_category, "food");
        assert_eq!(summary.total_transaction_count, 3);
        assert_eq!(
            category_breakdown(&transactions),
            vec![
                CategorySummary {
                    name: "food".to_owned(),
                    value: -80.0,
                    color: PALETTE[0],
                },
                CategorySummary {
                    name: "transport".to_owned(),
                    value: -20.0,
                    color: PALETTE[1],
                },
            ]
        );
    }

    #[test]
    fn total_spent_does_not_depend_on_order() {
        let mut transactions = food_and_transport();
        transactions.push(transaction(4, 12.5, "refund"));
        let forwards = total_spent(&transactions);

        transactions.reverse();

        assert_eq!(total_spent(&transactions), forwards);
        assert_eq!(forwards, -87.5);
    }

    #[test]
    fn breakdown_sums_to_total_spent() {
        let transactions = vec![
            transaction(1, -12.25, "food"),
            transaction(2, 100.0, "salary"),
            transaction(3, -7.75, "transport"),
            transaction(4, -40.0, "food"),
            transaction(5, -0.5, UNDEFINED_CATEGORY),
        ];

        let breakdown_total: f64 = category_breakdown(&transactions)
            .iter()
            .map(|category| category.value)
            .sum();

        assert!((breakdown_total - total_spent(&transactions)).abs() < 1e-9);
    }

    #[test]
    fn top_category_is_present_in_input() {
        let transactions = vec![
            transaction(1, -5.0, "food"),
            transaction(2, 250.0, "salary"),
            transaction(3, -20.0, "transport"),
        ];

        let top = top_category(&transactions);

        assert_eq!(top, "salary");
        assert!(transactions.iter().any(|t| t.category == top));
    }

    #[test]
    fn top_category_tie_goes_to_first_seen() {
        let transactions = vec![
            transaction(1, -10.0, "transport"),
            transaction(2, -10.0, "food"),
        ];

        assert_eq!(top_category(&transactions), "transport");
    }

    #[test]
    fn top_category_ranks_by_magnitude_not_signed_total() {
        let transactions = food_and_transport();

        // Signed totals are food -80 and transport -20.
        assert_eq!(top_category(&transactions), "food");
    }

    #[test]
    fn top_category_is_not_applicable_without_transactions() {
        assert_eq!(top_category(&[]), NO_CATEGORY);
    }

    #[test]
    fn breakdown_colours_cycle_through_palette() {
        let transactions: Vec<_> = (0..9)
            .map(|i| transaction(i, -1.0, &format!("category {i}")))
            .collect();

        let breakdown = category_breakdown(&transactions);

        assert_eq!(breakdown.len(), 9);
        assert_eq!(breakdown[7].color, PALETTE[0]);
        assert_eq!(breakdown[8].color, PALETTE[1]);
    }

    #[test]
    fn recent_transactions_keeps_first_ten() {
        let transactions: Vec<_> = (0..15).map(|i| transaction(i, -1.0, "food")).collect();

        let recent = recent_transactions(&transactions);

        assert_eq!(recent.len(), RECENT_TRANSACTION_COUNT);
        assert_eq!(recent[0].id, 0);
        assert_eq!(recent[9].id, 9);
    }

    #[test]
    fn guest_gets_sample_dashboard() {
        let dashboard = build_dashboard(None, food_and_transport());

        assert_eq!(dashboard.mode, DashboardMode::Fallback(FallbackReason::Guest));
        assert_eq!(dashboard.summary, sample_summary());
        assert_eq!(dashboard.categories, sample_categories());
        assert_eq!(dashboard.recent.len(), RECENT_TRANSACTION_COUNT);
    }

    #[test]
    fn user_without_transactions_gets_sample_dashboard() {
        let dashboard = build_dashboard(Some(UserID::new(1)), Vec::new());

        assert_eq!(
            dashboard.mode,
            DashboardMode::Fallback(FallbackReason::NoTransactions)
        );
        assert_eq!(dashboard.summary, sample_summary());
        assert_eq!(dashboard.categories, sample_categories());
    }

    #[test]
    fn user_with_transactions_gets_only_their_own_data() {
        let dashboard = build_dashboard(Some(UserID::new(1)), food_and_transport());

        assert_eq!(dashboard.mode, DashboardMode::Live);
        assert_eq!(dashboard.summary.total_spent, -100.0);
        assert_eq!(dashboard.summary.total_transaction_count, 3);
        assert_eq!(dashboard.categories.len(), 2);
        assert_eq!(dashboard.recent, food_and_transport());
    }
}
