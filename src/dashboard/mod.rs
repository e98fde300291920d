//! Dashboard module
//!
//! Provides an overview page summarizing the signed in user's spending by
//! category, or sample data when there is nothing of theirs to show.

mod aggregation;
mod cards;
mod charts;
mod handlers;
mod sample;
mod tables;

pub use handlers::get_dashboard_page;
pub use sample::sample_transactions;
pub(crate) use tables::{INVALID_DATE, category_badge, format_long_date};
