//! The predictor form fields and how they are read and displayed.
//!
//! Fields are kept as the text that was entered so the form can be redrawn
//! exactly as the user left it. They are only interpreted when a request is
//! sent or the transaction context is shown.

use serde::{Deserialize, Serialize};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    auth::UserID,
    dashboard::{INVALID_DATE, format_long_date},
    html::format_currency,
    predict::{classifier::PredictionRequest, forms::FormId, predictor::Submission},
};

const FORM_DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// The fields of the predictor form as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionForm {
    /// The form the fields were entered into.
    pub form_id: FormId,
    /// What the transaction was for.
    #[serde(default)]
    pub description: String,
    /// The amount as typed, which may be blank or not a number.
    #[serde(default)]
    pub amount: String,
    /// The date as typed, normally "YYYY-MM-DD".
    #[serde(default)]
    pub date: String,
}

impl PredictionForm {
    /// The request to send to the classifier for these fields.
    pub fn to_request(&self, user_id: Option<UserID>) -> PredictionRequest {
        PredictionRequest {
            description: self.description.clone(),
            amount: parse_amount(&self.amount),
            date: self.date.clone(),
            user_id: user_id.map(|user_id| user_id.to_string()),
        }
    }

    /// The fields a prediction is made from, without the form id.
    pub fn submission(&self) -> Submission {
        Submission {
            description: self.description.clone(),
            amount: self.amount.clone(),
            date: self.date.clone(),
        }
    }
}

/// Reads an amount as it was typed.
///
/// Blank input is zero and anything that is not a number is `NaN`.
pub fn parse_amount(amount: &str) -> f64 {
    let amount = amount.trim();

    if amount.is_empty() {
        return 0.0;
    }

    amount.parse().unwrap_or(f64::NAN)
}

/// Reads a date in the "YYYY-MM-DD" format used by date inputs.
pub fn parse_date(date: &str) -> Option<Date> {
    Date::parse(date.trim(), FORM_DATE_FORMAT).ok()
}

/// Formats a typed amount as dollars, showing "$0.00" for anything that is
/// not a number.
pub fn format_amount(amount: &str) -> String {
    let amount = parse_amount(amount);

    if amount.is_finite() {
        format_currency(amount)
    } else {
        format_currency(0.0)
    }
}

/// Formats a typed date like "January 15, 2024", or "Invalid Date".
pub fn format_date(date: &str) -> String {
    match parse_date(date) {
        Some(date) => format_long_date(Some(date)),
        None => INVALID_DATE.to_owned(),
    }
}

/// Formats a confidence percentage to one decimal place, e.g. "92.4%".
pub fn format_confidence(confidence: f64) -> String {
    format!("{confidence:.1}%")
}

/// The width of the confidence bar as a percentage in [0, 100].
pub fn confidence_bar_width(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 100.0)
    }
}
