//! The summary cards at the top of the dashboard.

use maud::{Markup, html};

use crate::{dashboard::aggregation::DashboardSummary, html::format_currency};

const CARD_STYLE: &str = "p-6 bg-white dark:bg-gray-800 rounded-lg shadow";

/// Renders the total spent, top category and transaction count cards.
///
/// The total is shown with its sign, so a month with more income than
/// spending shows a positive total.
pub(super) fn summary_cards_view(summary: &DashboardSummary) -> Markup {
    html! {
        section
            id="summary-cards"
            class="w-full grid grid-cols-1 md:grid-cols-3 gap-4 mb-8"
        {
            (summary_card(
                "Total Spent",
                &format_currency(summary.total_spent),
                "This month",
            ))
            (summary_card(
                "Top Category",
                &summary.top_category,
                "Highest spending",
            ))
            (summary_card(
                "Total Transactions",
                &summary.total_transaction_count.to_string(),
                "This month",
            ))
        }
    }
}

fn summary_card(title: &str, value: &str, caption: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-sm font-medium text-gray-500 dark:text-gray-400" { (title) }
            p
                data-card-value
                class="mt-2 text-2xl font-bold capitalize"
            {
                (value)
            }
            p class="mt-1 text-xs text-gray-500 dark:text-gray-400" { (caption) }
        }
    }
}
