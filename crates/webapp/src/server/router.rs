//! Axum router construction.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use super::{handlers, middleware, pages, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/login", get(pages::login_form).post(pages::login))
        .route("/logout", post(pages::logout))
        .route("/healthz", get(handlers::health))
        .route("/user/bookings", get(handlers::bookings))
        .route("/user/select-timeslot", get(pages::select_timeslot))
        .route("/user/select-decoration", get(handlers::select_decoration))
        .route("/user/create-booking", post(handlers::create_booking))
        .route("/user/payment/:booking_id", get(handlers::payment_page))
        .route(
            "/user/cancel-booking/:booking_id",
            get(handlers::cancel_booking),
        )
        .route("/user/confirm-payment", post(handlers::confirm_payment))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(middleware::REQUEST_TIMEOUT))
        .layer(CompressionLayer::new())
        .with_state(state)
}
