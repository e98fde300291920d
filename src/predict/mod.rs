//! Predictor module
//!
//! Asks an external classifier which spending category a transaction belongs
//! to. Each predictor form tracks its own request so that only the answer to
//! the latest submission is shown, and successful predictions are recorded
//! as transactions for signed in users.

mod classifier;
mod form;
mod forms;
mod handlers;
mod predictor;
mod views;

pub use classifier::{Classifier, HttpClassifier, PredictionRequest, PredictionResponse};
pub use forms::PredictionForms;
pub use handlers::{get_predict_page, post_predict, post_predict_edit};
