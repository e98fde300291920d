//! HTML for the predictor page and its htmx partials.

use maud::{Markup, html};

use crate::{
    dashboard::category_badge,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE,
        loading_spinner,
    },
    navigation::NavBar,
    predict::{
        form::{
            PredictionForm, confidence_bar_width, format_amount, format_confidence, format_date,
        },
        predictor::{PredictionResult, PredictionState},
    },
};

const CARD_STYLE: &str = "w-full p-6 bg-white dark:bg-gray-800 rounded-lg shadow";
const CONTEXT_CELL_STYLE: &str = "p-4 rounded-lg bg-gray-50 dark:bg-gray-700";
const CONTEXT_LABEL_STYLE: &str = "text-sm font-medium text-gray-500 dark:text-gray-400";

// Every input reports edits so that a shown result is cleared.
const EDIT_TRIGGER: &str = "input changed";
// Inherited by the inputs, so edits and submissions are sent one at a time in
// the order they were made.
const FORM_SYNC: &str = "this:queue all";

pub(super) fn predictor_form(form: &PredictionForm) -> Markup {
    html! {
        form
            id="prediction-form"
            hx-post=(endpoints::PREDICT_API)
            hx-sync=(FORM_SYNC)
            hx-target="#prediction-result"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            class="space-y-4 md:space-y-6"
        {
            input type="hidden" name="form_id" value=(form.form_id);

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }
                input
                    type="text"
                    name="description"
                    id="description"
                    placeholder="e.g., Starbucks coffee, Gas station, Grocery store"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(form.description)
                    autofocus
                    hx-post=(endpoints::PREDICT_EDIT_API)
                    hx-trigger=(EDIT_TRIGGER);
                p class="mt-1 text-xs text-gray-500 dark:text-gray-400" {
                    "Describe what the transaction was for"
                }
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }
                div class="input-wrapper"
                {
                    input
                        type="number"
                        name="amount"
                        id="amount"
                        step="0.01"
                        placeholder="0.00"
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(form.amount)
                        hx-post=(endpoints::PREDICT_EDIT_API)
                        hx-trigger=(EDIT_TRIGGER);
                }
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }
                input
                    type="date"
                    name="date"
                    id="date"
                    class=(FORM_TEXT_INPUT_STYLE)
                    value=(form.date)
                    hx-post=(endpoints::PREDICT_EDIT_API)
                    hx-trigger=(EDIT_TRIGGER);
            }

            button
                type="submit"
                id="submit-button"
                tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (loading_spinner()) }
                " Predict Category"
            }

            (prediction_error(None))
        }
    }
}

/// The error shown under the form, if any.
pub(super) fn prediction_error(message: Option<&str>) -> Markup {
    html! {
        div id="prediction-error"
        {
            @if let Some(message) = message {
                p role="alert" class="text-red-500 text-base" { (message) }
            }
        }
    }
}

/// [prediction_error] as an out-of-band swap.
pub(super) fn prediction_error_oob(message: Option<&str>) -> Markup {
    html! {
        div id="prediction-error" hx-swap-oob="true"
        {
            @if let Some(message) = message {
                p role="alert" class="text-red-500 text-base" { (message) }
            }
        }
    }
}

/// The results card for `state`.
///
/// Errors are shown under the form, so an error state draws the empty card.
pub(super) fn prediction_result(state: &PredictionState, form: &PredictionForm) -> Markup {
    html! {
        section
            id="prediction-result"
            data-state=(state_name(state))
            class=(CARD_STYLE)
        {
            h2 class="text-xl font-semibold" { "Prediction Results" }

            @match state {
                PredictionState::Success(result) => {
                    p class="mb-4 text-sm text-gray-500 dark:text-gray-400" {
                        "AI-generated category prediction"
                    }
                    (prediction_details(result))
                    (transaction_context(form))
                }
                PredictionState::Pending => {
                    p class="py-12 text-center text-gray-500 dark:text-gray-400" {
                        (loading_spinner()) "Predicting..."
                    }
                }
                PredictionState::Idle | PredictionState::Error(_) => {
                    p class="mb-4 text-sm text-gray-500 dark:text-gray-400" {
                        "Results will appear here after prediction"
                    }
                    div class="flex flex-col items-center justify-center py-12 text-center"
                    {
                        p class="text-lg text-gray-500 dark:text-gray-400" { "No prediction yet" }
                        p class="mt-1 text-sm text-gray-400" {
                            "Fill out the form and click \"Predict Category\" to see results"
                        }
                    }
                }
            }
        }
    }
}

fn state_name(state: &PredictionState) -> &'static str {
    match state {
        PredictionState::Idle => "idle",
        PredictionState::Pending => "pending",
        PredictionState::Success(_) => "success",
        PredictionState::Error(_) => "error",
    }
}

fn prediction_details(result: &PredictionResult) -> Markup {
    let width = confidence_bar_width(result.confidence);

    html! {
        div class="p-6 mb-6 rounded-lg bg-blue-50 dark:bg-gray-700 border border-blue-100 dark:border-gray-600 space-y-4"
        {
            div
            {
                p class=(CONTEXT_LABEL_STYLE) { "Predicted Category" }
                p id="predicted-category" class="mt-1 text-2xl font-bold" {
                    (category_badge(&result.category))
                }
            }

            div
            {
                p class=(CONTEXT_LABEL_STYLE) { "Confidence" }
                div class="flex items-center gap-3 mt-2"
                {
                    div class="flex-1 h-3 rounded-full bg-gray-200 dark:bg-gray-600"
                    {
                        div
                            id="confidence-bar"
                            class="h-3 rounded-full bg-blue-500"
                            style={ "width: " (width) "%" }
                        {}
                    }
                    span id="confidence" class="text-lg font-semibold" {
                        (format_confidence(result.confidence))
                    }
                }
            }
        }
    }
}

fn transaction_context(form: &PredictionForm) -> Markup {
    html! {
        div id="transaction-context" class="space-y-4"
        {
            h3 class="font-semibold" { "Transaction Context" }

            div class=(CONTEXT_CELL_STYLE)
            {
                p class=(CONTEXT_LABEL_STYLE) { "Description" }
                p data-context="description" class="mt-1 font-medium" { (form.description) }
            }

            div class="grid grid-cols-2 gap-4"
            {
                div class=(CONTEXT_CELL_STYLE)
                {
                    p class=(CONTEXT_LABEL_STYLE) { "Amount" }
                    p data-context="amount" class="mt-1 text-lg font-bold" {
                        (format_amount(&form.amount))
                    }
                }
                div class=(CONTEXT_CELL_STYLE)
                {
                    p class=(CONTEXT_LABEL_STYLE) { "Date" }
                    p data-context="date" class="mt-1 font-medium" { (format_date(&form.date)) }
                }
            }
        }
    }
}

/// The full predictor page.
pub(super) fn predict_view(nav_bar: NavBar, form: &PredictionForm) -> Markup {
    let nav_bar = nav_bar.into_html();

    html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full max-w-screen-xl mb-6 text-center"
            {
                h1 class="text-3xl font-bold" { "Transaction Predictor" }
                p class="text-gray-600 dark:text-gray-400" {
                    "AI-powered category prediction for your financial transactions"
                }
            }

            div class="w-full max-w-screen-xl grid grid-cols-1 lg:grid-cols-2 gap-8"
            {
                section class=(CARD_STYLE)
                {
                    h2 class="text-xl font-semibold" { "Transaction Details" }
                    p class="mb-4 text-sm text-gray-500 dark:text-gray-400" {
                        "Enter your transaction information to predict its category"
                    }

                    (predictor_form(form))
                }

                (prediction_result(&PredictionState::Idle, form))
            }
        }
    }
}
