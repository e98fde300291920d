//! Route handlers for the predictor page and its htmx endpoints.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::Key;
use axum_htmx::HX_RESWAP;
use maud::html;
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    alert::Alert,
    auth::{Session, UserID},
    endpoints,
    html::{base, dollar_input_styles},
    navigation::NavBar,
    predict::{
        classifier::{Classifier, HttpClassifier, RequestError},
        form::{PredictionForm, parse_amount, parse_date},
        forms::PredictionForms,
        predictor::{PredictionResult, PredictionState},
        views::{predict_view, prediction_error_oob, prediction_result},
    },
    timezone::get_local_offset,
    transaction::{SQLiteTransactionStore, Transaction, TransactionStore},
};

/// The state needed to display the predictor page.
#[derive(Debug, Clone)]
pub struct PredictPageState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The forms that have been handed out.
    pub prediction_forms: PredictionForms,
}

impl FromRef<AppState> for PredictPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            local_timezone: state.local_timezone.clone(),
            prediction_forms: state.prediction_forms.clone(),
        }
    }
}

impl FromRef<PredictPageState> for Key {
    fn from_ref(state: &PredictPageState) -> Self {
        state.cookie_key.clone()
    }
}

/// The state needed to make predictions.
#[derive(Debug, Clone)]
pub struct PredictState<C> {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The category classifier.
    pub classifier: C,
    /// The forms that have been handed out.
    pub prediction_forms: PredictionForms,
    /// Where successful predictions are recorded for signed in users.
    pub transaction_store: SQLiteTransactionStore,
}

impl FromRef<AppState> for PredictState<HttpClassifier> {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            classifier: state.classifier.clone(),
            prediction_forms: state.prediction_forms.clone(),
            transaction_store: SQLiteTransactionStore::new(state.db_connection.clone()),
        }
    }
}

impl<C> FromRef<PredictState<C>> for Key {
    fn from_ref(state: &PredictState<C>) -> Self {
        state.cookie_key.clone()
    }
}

/// Display the predictor with a new, empty form dated today.
pub async fn get_predict_page(
    State(state): State<PredictPageState>,
    session: Session,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;
    let today = OffsetDateTime::now_utc().to_offset(local_offset).date();

    let form_id = state.prediction_forms.open(session.current_user())?;
    let form = PredictionForm {
        form_id,
        description: String::new(),
        amount: String::new(),
        date: today.to_string(),
    };

    let nav_bar = NavBar::new(endpoints::PREDICT_VIEW, session);
    let content = predict_view(nav_bar, &form);

    Ok(base("Predict", &[dollar_input_styles()], &content).into_response())
}

/// Submit the form to the classifier and respond with the settled result.
///
/// A blank description is rejected without contacting the classifier. If a
/// newer submission or an edit happened while waiting, the answer is dropped
/// and the page is left alone.
pub async fn post_predict<C>(
    State(state): State<PredictState<C>>,
    session: Session,
    Form(form): Form<PredictionForm>,
) -> Response
where
    C: Classifier,
{
    let user_id = session.current_user();

    let ticket = match state
        .prediction_forms
        .with_predictor(form.form_id, user_id, |predictor| {
            predictor
                .begin(form.submission())
                .map_err(|error| (error, predictor.state().clone()))
        }) {
        Ok(Ok(ticket)) => ticket,
        Ok(Err((error, current))) => {
            return prediction_response(&current, &form, Some(&error.to_string()));
        }
        Err(error) => return error.into_alert_response(),
    };

    let request = form.to_request(user_id);
    let classifier = state.classifier.clone();
    let outcome = tokio::spawn(async move { classifier.classify(&request).await })
        .await
        .unwrap_or_else(|error| {
            tracing::error!("prediction task failed: {error}");
            Err(RequestError::Unknown)
        });

    let settled = match state
        .prediction_forms
        .with_predictor(form.form_id, user_id, |predictor| {
            predictor
                .resolve(ticket, outcome)
                .then(|| predictor.state().clone())
        }) {
        Ok(Some(settled)) => settled,
        Ok(None) => return (StatusCode::NO_CONTENT, [(HX_RESWAP, "none")]).into_response(),
        Err(error) => return error.into_alert_response(),
    };

    let saved = match (&settled, user_id) {
        (PredictionState::Success(result), Some(user_id)) => {
            Some(save_prediction(&state.transaction_store, user_id, &form, result))
        }
        _ => None,
    };

    let response = html! {
        (prediction_result(&settled, &form))
        (prediction_error_oob(error_message(&settled)))
        @if let Some(alert) = saved {
            (alert.into_html())
        }
    };

    response.into_response()
}

/// Clear the result because a field on the form changed.
///
/// An edit that leaves the fields as they were submitted keeps the current
/// prediction, including one that is still pending.
pub async fn post_predict_edit<C>(
    State(state): State<PredictState<C>>,
    session: Session,
    Form(form): Form<PredictionForm>,
) -> Response
where
    C: Classifier,
{
    match state
        .prediction_forms
        .with_predictor(form.form_id, session.current_user(), |predictor| {
            predictor.edit(&form.submission());
            predictor.state().clone()
        }) {
        Ok(current) => prediction_response(&current, &form, error_message(&current)),
        Err(error) => error.into_alert_response(),
    }
}

fn error_message(state: &PredictionState) -> Option<&str> {
    match state {
        PredictionState::Error(message) => Some(message.as_str()),
        _ => None,
    }
}

fn prediction_response(
    state: &PredictionState,
    form: &PredictionForm,
    error_message: Option<&str>,
) -> Response {
    html! {
        (prediction_result(state, form))
        (prediction_error_oob(error_message))
    }
    .into_response()
}

/// Record a successful prediction as one of the user's transactions.
///
/// Returns the alert telling the user whether it was saved.
fn save_prediction(
    store: &SQLiteTransactionStore,
    user_id: UserID,
    form: &PredictionForm,
    result: &PredictionResult,
) -> Alert {
    let amount = parse_amount(&form.amount);
    if !amount.is_finite() {
        tracing::warn!(
            "not saving prediction for user {user_id}: invalid amount {:?}",
            form.amount
        );
        return Alert::error(
            "Transaction not saved",
            "The amount is not a number, fix it and predict again to save it.",
        );
    }

    let Some(date) = parse_date(&form.date) else {
        tracing::warn!(
            "not saving prediction for user {user_id}: invalid date {:?}",
            form.date
        );
        return Alert::error(
            "Transaction not saved",
            "The date is not valid, fix it and predict again to save it.",
        );
    };

    let transaction = Transaction::build(amount, date, &form.description)
        .category(&result.category)
        .confidence(result.confidence);

    match store.insert_transaction(user_id, transaction) {
        Ok(transaction) => {
            tracing::info!("saved transaction {} for user {user_id}", transaction.id);
            Alert::success("Transaction saved", "It will show up on your dashboard.")
        }
        Err(error) => {
            tracing::error!("could not save prediction for user {user_id}: {error}");
            Alert::error(
                "Transaction not saved",
                "An unexpected error occurred, check the server logs for more details.",
            )
        }
    }
}
