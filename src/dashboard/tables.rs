//! The recent transactions table.

use maud::{Markup, html};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    html::{
        CATEGORY_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    transaction::Transaction,
};

const AMOUNT_STYLE: &str = "text-red-600 dark:text-red-400 font-medium whitespace-nowrap";

const LONG_DATE_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:long] [day padding:none], [year]");

/// Shown in place of a date that could not be read.
pub(crate) const INVALID_DATE: &str = "Invalid Date";

/// Formats `date` like "January 15, 2024".
pub(crate) fn format_long_date(date: Option<Date>) -> String {
    date.and_then(|date| {
        date.format(LONG_DATE_FORMAT)
            .inspect_err(|error| tracing::warn!("could not format date {date}: {error}"))
            .ok()
    })
    .unwrap_or_else(|| INVALID_DATE.to_owned())
}

/// The colour classes for a category badge.
///
/// Known categories have their own colour, anything else is gray.
pub(crate) fn category_badge_colors(category: &str) -> &'static str {
    match category {
        "housing" => "bg-blue-100 text-blue-800",
        "food" => "bg-red-100 text-red-800",
        "transportation" => "bg-green-100 text-green-800",
        "healthcare" => "bg-yellow-100 text-yellow-800",
        "shopping" => "bg-purple-100 text-purple-800",
        "entertainment" => "bg-cyan-100 text-cyan-800",
        _ => "bg-gray-100 text-gray-800",
    }
}

/// A pill showing `category` in its colour.
pub(crate) fn category_badge(category: &str) -> Markup {
    html! {
        span class={ (CATEGORY_BADGE_STYLE) " " (category_badge_colors(category)) }
        {
            (category)
        }
    }
}

/// Renders the most recent transactions.
///
/// Amounts are shown without their sign since every row is drawn as spending.
pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        section
            id="recent-transactions"
            class="w-full p-6 bg-white dark:bg-gray-800 rounded-lg shadow"
        {
            h3 class="text-xl font-semibold mb-4" { "Recent Transactions" }

            div class="overflow-x-auto rounded-lg"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td class={ (TABLE_CELL_STYLE) " text-gray-900 dark:text-white" }
                                {
                                    (transaction.description)
                                }
                                td class={ (TABLE_CELL_STYLE) " " (AMOUNT_STYLE) }
                                {
                                    (format_currency(transaction.amount.abs()))
                                }
                                td class=(TABLE_CELL_STYLE)
                                {
                                    (category_badge(&transaction.category))
                                }
                                td class={ (TABLE_CELL_STYLE) " whitespace-nowrap" }
                                {
                                    (format_long_date(transaction.date))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
