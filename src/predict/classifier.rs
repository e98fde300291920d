//! The client for the external category classifier.
//!
//! The classifier is a separate HTTP service with a single operation,
//! `POST {base}/predict`, that takes a transaction and answers with the
//! category it most likely belongs to.

use std::future::Future;

use serde::{Deserialize, Serialize};

/// The transaction sent to the classifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    /// What the transaction was for, e.g. "Starbucks coffee".
    pub description: String,
    /// The signed amount of the transaction.
    ///
    /// Amounts that could not be parsed are `NaN` and sent as `null`.
    pub amount: f64,
    /// The date of the transaction as entered, e.g. "2024-01-15".
    pub date: String,
    /// The signed in user, or `None` for guests.
    ///
    /// The classifier only records transactions for signed in users.
    pub user_id: Option<String>,
}

/// The classifier's answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// The predicted spending category, e.g. "food".
    pub predicted_category: String,
    /// How confident the classifier is in `predicted_category` as a percentage.
    ///
    /// Nominally in [0, 100] but passed through as given.
    pub confidence: f64,
}

/// Why a request to the classifier failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    /// The classifier answered with a non-success status code.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// The classifier could not be reached.
    #[error("{0}")]
    Network(String),

    /// The classifier's answer was not the expected JSON.
    #[error("{0}")]
    Decode(String),

    /// The request failed for some other reason.
    #[error("Failed to predict category. Please check if the API server is running.")]
    Unknown,
}

/// Something that can predict the category of a transaction.
pub trait Classifier: Clone + Send + Sync + 'static {
    /// Send one prediction request.
    ///
    /// Implementations must not retry.
    fn classify(
        &self,
        request: &PredictionRequest,
    ) -> impl Future<Output = Result<PredictionResponse, RequestError>> + Send;
}

/// A [Classifier] that calls the classifier service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpClassifier {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClassifier {
    /// Create a client for the classifier service at `base_url`, e.g.
    /// "http://127.0.0.1:5000".
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// The URL prediction requests are sent to.
    pub fn predict_url(&self) -> String {
        format!("{}/predict", self.base_url)
    }
}

impl Classifier for HttpClassifier {
    async fn classify(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, RequestError> {
        let url = self.predict_url();

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .inspect_err(|error| tracing::warn!("could not reach classifier at {url}: {error}"))
            .map_err(|error| RequestError::Network(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("classifier at {url} responded with status {status}");
            return Err(RequestError::Status(status.as_u16()));
        }

        response
            .json::<PredictionResponse>()
            .await
            .inspect_err(|error| tracing::warn!("could not decode classifier response: {error}"))
            .map_err(|error| RequestError::Decode(error.to_string()))
    }
}
