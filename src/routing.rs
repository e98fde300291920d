//! Application router configuration.
//!
//! Every page is open to guests. The session middleware extends the cookie of
//! signed in users on each request.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        get_log_in_page, get_log_out, get_register_page, post_log_in, refresh_session,
        register_user,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    predict::{HttpClassifier, get_predict_page, post_predict, post_predict_edit},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::PREDICT_VIEW, get(get_predict_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::REGISTER_VIEW, get(get_register_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api = Router::new()
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::USERS, post(register_user))
        .route(endpoints::PREDICT_API, post(post_predict::<HttpClassifier>))
        .route(
            endpoints::PREDICT_EDIT_API,
            post(post_predict_edit::<HttpClassifier>),
        );

    pages
        .merge(api)
        .layer(middleware::from_fn_with_state(state.clone(), refresh_session))
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}
