//! The lifecycle of a prediction request.
//!
//! A predictor starts out idle, becomes pending when a prediction is
//! submitted, and settles on a result or an error when the classifier answers.
//! Editing the form sends it back to idle, unless the edit leaves the fields
//! as they were submitted. Every submission is numbered and only the answer to
//! the latest submission is kept, so a slow answer can never overwrite a newer
//! one.

use crate::predict::classifier::{PredictionResponse, RequestError};

/// A predicted category and how confident the classifier is in it.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    /// The predicted spending category.
    pub category: String,
    /// The classifier's confidence as a percentage, not clamped.
    pub confidence: f64,
}

impl From<PredictionResponse> for PredictionResult {
    fn from(response: PredictionResponse) -> Self {
        Self {
            category: response.predicted_category,
            confidence: response.confidence,
        }
    }
}

/// Where a prediction is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PredictionState {
    /// Nothing has been submitted since the form was last edited.
    #[default]
    Idle,
    /// Waiting for the classifier.
    Pending,
    /// The classifier answered.
    Success(PredictionResult),
    /// The request failed, with the reason shown to the user.
    Error(String),
}

/// The field values a prediction was asked for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Submission {
    pub description: String,
    pub amount: String,
    pub date: String,
}

/// Identifies one submission to a [Predictor].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    sequence: u64,
}

/// Why a prediction could not be made.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    /// The description was blank, so nothing was sent.
    #[error("Please enter a transaction description")]
    EmptyDescription,

    /// The classifier could not give an answer.
    #[error(transparent)]
    Request(#[from] RequestError),
}

/// Tracks the prediction for one form.
#[derive(Debug, Default)]
pub struct Predictor {
    state: PredictionState,
    latest_sequence: u64,
    submitted: Option<Submission>,
}

impl Predictor {
    /// Create a new idle predictor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current state of the prediction.
    pub fn state(&self) -> &PredictionState {
        &self.state
    }

    /// Start a prediction for `submission`.
    ///
    /// The returned ticket must be handed back to [Predictor::resolve] along
    /// with the classifier's answer.
    ///
    /// # Errors
    /// Returns [PredictError::EmptyDescription] and leaves the state as it was
    /// if the description is blank. No request should be sent in that case.
    pub fn begin(&mut self, submission: Submission) -> Result<Ticket, PredictError> {
        if submission.description.trim().is_empty() {
            return Err(PredictError::EmptyDescription);
        }

        self.latest_sequence += 1;
        self.state = PredictionState::Pending;
        self.submitted = Some(submission);

        Ok(Ticket {
            sequence: self.latest_sequence,
        })
    }

    /// Settle the prediction started with `ticket`.
    ///
    /// Returns `false` and changes nothing if `ticket` is stale, i.e. another
    /// prediction has been started since or the form was edited.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<PredictionResponse, RequestError>,
    ) -> bool {
        if ticket.sequence != self.latest_sequence || self.state != PredictionState::Pending {
            tracing::debug!(
                "discarding stale prediction #{} (latest is #{})",
                ticket.sequence,
                self.latest_sequence
            );
            return false;
        }

        self.state = match outcome {
            Ok(response) => PredictionState::Success(response.into()),
            Err(error) => PredictionState::Error(PredictError::from(error).to_string()),
        };

        true
    }

    /// Clear the prediction because the form now holds `fields`.
    ///
    /// Returns `false` and changes nothing if `fields` are what was last
    /// submitted, since the prediction still describes them. An edit can reach
    /// the server after the submission it preceded.
    pub fn edit(&mut self, fields: &Submission) -> bool {
        if self.submitted.as_ref() == Some(fields) {
            tracing::debug!(
                "ignoring edit that matches prediction #{}",
                self.latest_sequence
            );
            return false;
        }

        self.state = PredictionState::Idle;
        self.submitted = None;

        true
    }
}
