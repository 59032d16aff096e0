//! Handlers for the pages around the booking flow: home, login/logout, and
//! the room/slot picker.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::info;

use crate::flash::FlashMessage;
use crate::session::cookie;
use crate::users;

use super::extract::{CurrentUser, FlashQuery};
use super::handlers::redirect_with_flash;
use super::state::AppState;
use super::views::{HomeTemplate, LoginTemplate, SelectTimeslotTemplate};

const MSG_LOGIN_FAILED: &str = "Tên đăng nhập hoặc mật khẩu không đúng.";

/// `GET /` — home page. Renders any flash message addressed to it.
pub async fn home(
    State(state): State<AppState>,
    user: Option<CurrentUser>,
    Query(query): Query<FlashQuery>,
) -> HomeTemplate {
    HomeTemplate {
        flash: query.take(&state),
        logged_in: user.is_some(),
    }
}

/// `GET /login` — login form.
pub async fn login_form(
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> LoginTemplate {
    LoginTemplate {
        flash: query.take(&state),
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// `POST /login` — verify credentials, start a session, and continue to the
/// bookings list. Failures redirect back to the form with an error flash.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match users::authenticate(&state.catalog, &form.username, &form.password) {
        Some(user) => {
            let cookie_value = state.sessions.issue(user.id);
            info!(user_id = user.id, "login");
            (
                [(
                    header::SET_COOKIE,
                    cookie::set_cookie_value(&cookie_value, state.sessions.ttl_secs()),
                )],
                Redirect::to("/user/bookings"),
            )
                .into_response()
        }
        None => {
            redirect_with_flash(&state, "/login", FlashMessage::error(MSG_LOGIN_FAILED))
                .into_response()
        }
    }
}

/// `POST /logout` — revoke the session and clear the cookie.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(value) = cookie::from_headers(&headers) {
        state.sessions.revoke(value);
    }
    (
        [(header::SET_COOKIE, cookie::clear_cookie_value())],
        Redirect::to("/"),
    )
        .into_response()
}

/// `GET /user/select-timeslot` — room and time-slot picker; the first step of
/// the booking flow and the landing page for booking failures.
pub async fn select_timeslot(
    State(state): State<AppState>,
    Query(query): Query<FlashQuery>,
) -> SelectTimeslotTemplate {
    SelectTimeslotTemplate {
        flash: query.take(&state),
        rooms: state.catalog.rooms(),
        time_slots: state.catalog.time_slots(),
    }
}
