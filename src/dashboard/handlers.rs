//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - The state used by the handler

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::Key;
use maud::{Markup, html};

use crate::{
    AppState,
    auth::Session,
    dashboard::{
        aggregation::{Dashboard, DashboardMode, FallbackReason, build_dashboard},
        cards::summary_cards_view,
        charts::{
            CATEGORY_CHART_ID, DashboardChart, category_chart, category_chart_view, charts_script,
        },
        tables::recent_transactions_table,
    },
    endpoints,
    html::{HeadElement, base, link},
    navigation::NavBar,
    transaction::{SQLiteTransactionStore, TransactionStore},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// Where the signed in user's transactions are kept.
    pub transaction_store: SQLiteTransactionStore,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            transaction_store: SQLiteTransactionStore::new(state.db_connection.clone()),
        }
    }
}

impl FromRef<DashboardState> for Key {
    fn from_ref(state: &DashboardState) -> Self {
        state.cookie_key.clone()
    }
}

/// Display the dashboard for the current session.
///
/// Guests, and users who have not recorded any transactions, are shown the
/// sample data. If the user's transactions cannot be loaded the error is
/// logged and the page is rendered as if they had none.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    session: Session,
) -> Response {
    let transactions = match session.current_user() {
        Some(user_id) => state
            .transaction_store
            .list_transactions(user_id)
            .inspect_err(|error| {
                tracing::error!("could not get transactions for user {user_id}: {error}")
            })
            .unwrap_or_default(),
        None => Vec::new(),
    };

    let dashboard = build_dashboard(session.current_user(), transactions);
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW, session);

    dashboard_view(nav_bar, &dashboard).into_response()
}

fn dashboard_description(mode: DashboardMode) -> Markup {
    match mode {
        DashboardMode::Live => html!("Your latest spending activity"),
        DashboardMode::Fallback(FallbackReason::Guest) => {
            let log_in_link = link(endpoints::LOG_IN_VIEW, "Log in");

            html!(
                "Sample data shown for guests. " (log_in_link) " to see your own spending."
            )
        }
        DashboardMode::Fallback(FallbackReason::NoTransactions) => {
            html!("Sample data shown until you add your first transaction")
        }
    }
}

fn no_transactions_prompt() -> Markup {
    let predict_link = link(endpoints::PREDICT_VIEW, "categorize a transaction");

    html!(
        div
            id="no-transactions"
            class="w-full p-4 mb-8 rounded-lg bg-blue-50 dark:bg-gray-800 border border-blue-200 dark:border-gray-700"
        {
            h3 class="text-lg font-semibold" { "No transactions yet" }
            p
            {
                "Your dashboard will show your own spending once you "
                (predict_link) "."
            }
        }
    )
}

/// Renders the dashboard page with the summary cards, category chart and
/// recent transactions.
fn dashboard_view(nav_bar: NavBar, dashboard: &Dashboard) -> Markup {
    let nav_bar = nav_bar.into_html();
    let chart = DashboardChart {
        id: CATEGORY_CHART_ID,
        options: category_chart(&dashboard.categories).to_string(),
    };

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="w-full mb-6"
            {
                h2 class="text-2xl font-bold" { "Personal Finance Dashboard" }
                p
                    id="dashboard-description"
                    class="text-gray-600 dark:text-gray-400"
                {
                    (dashboard_description(dashboard.mode))
                }
            }

            @if dashboard.mode == DashboardMode::Fallback(FallbackReason::NoTransactions) {
                (no_transactions_prompt())
            }

            (summary_cards_view(&dashboard.summary))
            (category_chart_view(&chart, &dashboard.categories))
            (recent_transactions_table(&dashboard.recent))
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&[chart]),
    ];

    base("Dashboard", &scripts, &content)
}
