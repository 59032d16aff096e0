//! Axum request handlers for the booking flow under `/user`.
//!
//! Every failure path degrades to a redirect — optionally carrying a one-shot
//! flash message — rather than an error status; the only non-2xx responses
//! this module produces are the health probe's 503 and the 404 fallback.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use common::model::BookingStatus;

use crate::booking::{self, BookingError};
use crate::flash::FlashMessage;

use super::extract::{CurrentUser, FlashQuery};
use super::state::AppState;
use super::views::{BookingRow, BookingsTemplate, PaymentTemplate, SelectDecorationTemplate};

// User-facing flash strings.
pub(super) const MSG_BOOKING_FAILED: &str = "Đã xảy ra lỗi khi đặt phòng. Vui lòng thử lại.";
pub(super) const MSG_PAST_BOOKING_TIME: &str =
    "Không thể đặt phòng cho thời gian trong quá khứ. Vui lòng chọn thời gian khác.";
pub(super) const MSG_PAYMENT_RECORDED: &str =
    "Thanh toán thành công! Đơn đặt phòng của bạn đang chờ xác nhận.";
pub(super) const MSG_BOOKING_CANCELLED: &str = "Hủy đặt phòng thành công!";

/// Redirect to `target`, stashing `message` under a token the target page
/// redeems via its `flash` query parameter.
pub(super) fn redirect_with_flash(
    state: &AppState,
    target: &str,
    message: FlashMessage,
) -> Redirect {
    let token = state.flash.stash(message);
    Redirect::to(&format!("{target}?flash={token}"))
}

/// Parse a numeric id parameter. Empty and non-numeric values read as absent.
fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// `GET /user/bookings` — the authenticated user's bookings, newest first.
pub async fn bookings(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<FlashQuery>,
) -> Response {
    let bookings = state
        .bookings
        .for_user(user.0.id)
        .iter()
        .map(|b| BookingRow::from_booking(&state.catalog, b))
        .collect();
    BookingsTemplate {
        flash: query.take(&state),
        display_name: user.0.display_name,
        bookings,
    }
    .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectDecorationQuery {
    #[serde(default)]
    time_slot_id: Option<String>,
    #[serde(default)]
    room_id: Option<String>,
    #[serde(default)]
    booking_date: Option<String>,
}

/// `GET /user/select-decoration` — decoration picker for a chosen room, slot,
/// and date. Any missing or invalid input redirects to the home page.
pub async fn select_decoration(
    State(state): State<AppState>,
    Query(query): Query<SelectDecorationQuery>,
) -> Response {
    let ids = (
        query.time_slot_id.as_deref().and_then(parse_id),
        query.room_id.as_deref().and_then(parse_id),
    );
    let (Some(time_slot_id), Some(room_id)) = ids else {
        return Redirect::to("/").into_response();
    };
    let booking_date = match query.booking_date.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => d.to_owned(),
        _ => return Redirect::to("/").into_response(),
    };

    let entities = (
        state.catalog.time_slot(time_slot_id),
        state.catalog.room(room_id),
    );
    let (Some(time_slot), Some(room)) = entities else {
        return Redirect::to("/").into_response();
    };

    SelectDecorationTemplate {
        room,
        time_slot,
        booking_date,
        decoration_styles: state.catalog.decoration_styles(),
    }
    .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingForm {
    #[serde(default)]
    time_slot_id: String,
    #[serde(default)]
    room_id: String,
    #[serde(default)]
    decoration_style_id: String,
    #[serde(default)]
    booking_date: String,
}

/// `POST /user/create-booking` — validate the selection, create a `PENDING`
/// booking, and send the user to its payment page.
pub async fn create_booking(
    State(state): State<AppState>,
    user: CurrentUser,
    Form(form): Form<CreateBookingForm>,
) -> Response {
    let ids = (
        parse_id(&form.time_slot_id),
        parse_id(&form.room_id),
        parse_id(&form.decoration_style_id),
    );
    let (Some(time_slot_id), Some(room_id), Some(style_id)) = ids else {
        return redirect_with_flash(
            &state,
            "/user/select-timeslot",
            FlashMessage::error(MSG_BOOKING_FAILED),
        )
        .into_response();
    };

    let entities = (
        state.catalog.time_slot(time_slot_id),
        state.catalog.room(room_id),
        state.catalog.decoration_style(style_id),
    );
    let (Some(time_slot), Some(room), Some(style)) = entities else {
        return redirect_with_flash(
            &state,
            "/user/select-timeslot",
            FlashMessage::error(MSG_BOOKING_FAILED),
        )
        .into_response();
    };

    // Unparseable dates take the same branch as past ones.
    let booking_date = booking::parse_booking_date(&form.booking_date)
        .filter(|d| booking::is_valid_booking_time(&time_slot, *d));
    let Some(booking_date) = booking_date else {
        return redirect_with_flash(&state, "/", FlashMessage::error(MSG_PAST_BOOKING_TIME))
            .into_response();
    };

    match state
        .bookings
        .create(user.0.id, room.id, time_slot.id, style.id, booking_date)
    {
        Ok(created) => {
            info!(
                booking_id = created.id,
                user_id = user.0.id,
                room_id = room.id,
                "booking created"
            );
            Redirect::to(&format!("/user/payment/{}", created.id)).into_response()
        }
        Err(e @ BookingError::Conflict { .. }) => {
            warn!(error = %e, user_id = user.0.id, "booking rejected");
            redirect_with_flash(
                &state,
                "/user/select-timeslot",
                FlashMessage::error(MSG_BOOKING_FAILED),
            )
            .into_response()
        }
    }
}

/// `GET /user/payment/{bookingId}` — bank-transfer instructions for a
/// booking. Unknown ids redirect to the bookings list.
pub async fn payment_page(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Response {
    let booking = parse_id(&booking_id).and_then(|id| state.bookings.get(id));
    let Some(booking) = booking else {
        return Redirect::to("/user/bookings").into_response();
    };

    let amount = state
        .catalog
        .room(booking.room_id)
        .map(|r| r.price)
        .unwrap_or(0.0)
        + state
            .catalog
            .decoration_style(booking.decoration_style_id)
            .map(|d| d.price)
            .unwrap_or(0.0);

    PaymentTemplate {
        booking: BookingRow::from_booking(&state.catalog, &booking),
        amount,
        bank_account: state.bank.account.clone(),
        bank_name: state.bank.name.clone(),
    }
    .into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentForm {
    #[serde(default)]
    booking_id: String,
    #[serde(default)]
    payment_info: String,
}

/// `POST /user/confirm-payment` — record the transfer reference on a booking.
///
/// No ownership or existence check happens before the update; the success
/// flash and redirect fire regardless of whether the id resolved.
pub async fn confirm_payment(
    State(state): State<AppState>,
    Form(form): Form<ConfirmPaymentForm>,
) -> Response {
    if let Some(id) = parse_id(&form.booking_id) {
        if !state.bookings.record_payment(id, &form.payment_info) {
            warn!(booking_id = id, "confirm-payment for unknown booking id");
        }
    }
    redirect_with_flash(
        &state,
        "/user/bookings",
        FlashMessage::success(MSG_PAYMENT_RECORDED),
    )
    .into_response()
}

/// `GET /user/cancel-booking/{bookingId}` — mark a booking cancelled by its
/// user.
///
/// No ownership or existence check happens before the update; the success
/// flash and redirect fire regardless of prior state.
pub async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<String>,
) -> Response {
    if let Some(id) = parse_id(&booking_id) {
        if !state.bookings.set_status(id, BookingStatus::CancelledByUser) {
            warn!(booking_id = id, "cancel-booking for unknown booking id");
        }
    }
    redirect_with_flash(
        &state,
        "/user/bookings",
        FlashMessage::success(MSG_BOOKING_CANCELLED),
    )
    .into_response()
}

/// Response body for `GET /healthz`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status: `"ok"` or `"degraded"`.
    pub status: String,
    pub rooms_loaded: usize,
    pub time_slots_loaded: usize,
    pub bookings_held: usize,
    pub active_sessions: usize,
}

/// `GET /healthz` — readiness check.
///
/// Returns `200 OK` once the catalog holds at least one room and one time
/// slot. Returns `503 Service Unavailable` otherwise.
pub async fn health(State(state): State<AppState>) -> Response {
    let rooms_loaded = state.catalog.rooms_len();
    let time_slots_loaded = state.catalog.time_slots_len();

    let (status_code, status_str) = if rooms_loaded > 0 && time_slots_loaded > 0 {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let body = HealthResponse {
        status: status_str.into(),
        rooms_loaded,
        time_slots_loaded,
        bookings_held: state.bookings.len(),
        active_sessions: state.sessions.active(),
    };
    (status_code, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Html(
            "<!doctype html><html lang=\"vi\"><head><meta charset=\"utf-8\">\
             <title>Không tìm thấy trang</title></head>\
             <body><h1>404 — Không tìm thấy trang</h1>\
             <p><a href=\"/\">Về trang chủ</a></p></body></html>",
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request},
        routing::{get, post},
        Router,
    };
    use common::catalog::CatalogFile;
    use common::model::{DecorationStyle, Room, TimeSlot, User};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn seeded_state() -> AppState {
        let state = AppState::default();
        state.catalog.replace_all(CatalogFile {
            rooms: vec![Room {
                id: 1,
                name: "Phòng Sen".into(),
                capacity: 80,
                description: "Sảnh lớn".into(),
                price: 2_000_000.0,
            }],
            time_slots: vec![TimeSlot {
                id: 1,
                label: "18:00 - 22:00".into(),
                start_hour: 18,
                start_minute: 0,
                is_active: true,
                sort_order: 1,
            }],
            decoration_styles: vec![DecorationStyle {
                id: 1,
                name: "Cổ điển".into(),
                description: "Tông trắng".into(),
                price: 500_000.0,
            }],
            users: vec![User {
                id: 7,
                username: "lan".into(),
                display_name: "Lan".into(),
                password_sha256: crate::users::password_digest("mat-khau-123"),
            }],
        });
        state
    }

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/user/bookings", get(bookings))
            .route("/user/select-decoration", get(select_decoration))
            .route("/user/create-booking", post(create_booking))
            .route("/user/payment/:booking_id", get(payment_page))
            .route("/user/confirm-payment", post(confirm_payment))
            .route("/user/cancel-booking/:booking_id", get(cancel_booking))
            .route("/healthz", get(health))
            .with_state(state)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn get_request_as(uri: &str, session_cookie: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::COOKIE, format!("sid={session_cookie}"))
            .body(Body::empty())
            .unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn form_request_as(uri: &str, body: &str, session_cookie: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::COOKIE, format!("sid={session_cookie}"))
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    fn location(resp: &axum::response::Response) -> &str {
        resp.headers()
            .get(header::LOCATION)
            .expect("redirect location")
            .to_str()
            .unwrap()
    }

    /// Pops the flash message referenced by a redirect's `flash` token.
    fn flash_from_location(state: &AppState, loc: &str) -> FlashMessage {
        let token: Uuid = loc
            .split_once("flash=")
            .expect("flash token in location")
            .1
            .parse()
            .unwrap();
        state.flash.take(token).expect("stashed flash message")
    }

    #[tokio::test]
    async fn bookings_without_session_redirects_to_login() {
        let resp = app(seeded_state())
            .oneshot(get_request("/user/bookings"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
    }

    #[tokio::test]
    async fn bookings_with_session_renders() {
        let state = seeded_state();
        let cookie = state.sessions.issue(7);
        let resp = app(state)
            .oneshot(get_request_as("/user/bookings", &cookie))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn bookings_with_tampered_cookie_redirects_to_login() {
        let resp = app(seeded_state())
            .oneshot(get_request_as("/user/bookings", "abc.def"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
    }

    #[tokio::test]
    async fn select_decoration_missing_any_param_redirects_home() {
        let uris = [
            "/user/select-decoration",
            "/user/select-decoration?timeSlotId=1&roomId=1",
            "/user/select-decoration?timeSlotId=1&bookingDate=2090-01-01",
            "/user/select-decoration?roomId=1&bookingDate=2090-01-01",
            "/user/select-decoration?timeSlotId=1&roomId=1&bookingDate=",
            "/user/select-decoration?timeSlotId=x&roomId=1&bookingDate=2090-01-01",
        ];
        for uri in uris {
            let resp = app(seeded_state()).oneshot(get_request(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::SEE_OTHER, "uri: {uri}");
            assert_eq!(location(&resp), "/", "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn select_decoration_unknown_entities_redirect_home() {
        let resp = app(seeded_state())
            .oneshot(get_request(
                "/user/select-decoration?timeSlotId=99&roomId=1&bookingDate=2090-01-01",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");
    }

    #[tokio::test]
    async fn select_decoration_renders_for_valid_input() {
        let resp = app(seeded_state())
            .oneshot(get_request(
                "/user/select-decoration?timeSlotId=1&roomId=1&bookingDate=2090-01-01",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn create_booking_without_session_redirects_to_login() {
        let resp = app(seeded_state())
            .oneshot(form_request(
                "/user/create-booking",
                "timeSlotId=1&roomId=1&decorationStyleId=1&bookingDate=2090-01-01",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/login");
    }

    #[tokio::test]
    async fn create_booking_past_date_never_creates() {
        let state = seeded_state();
        let cookie = state.sessions.issue(7);
        let resp = app(state.clone())
            .oneshot(form_request_as(
                "/user/create-booking",
                "timeSlotId=1&roomId=1&decorationStyleId=1&bookingDate=2000-01-01",
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let loc = location(&resp).to_owned();
        assert!(loc.starts_with("/?flash="), "location: {loc}");
        assert!(state.bookings.is_empty());
        let flash = flash_from_location(&state, &loc);
        assert_eq!(flash.text, MSG_PAST_BOOKING_TIME);
        assert!(flash.is_error());
    }

    #[tokio::test]
    async fn create_booking_unparseable_date_never_creates() {
        let state = seeded_state();
        let cookie = state.sessions.issue(7);
        let resp = app(state.clone())
            .oneshot(form_request_as(
                "/user/create-booking",
                "timeSlotId=1&roomId=1&decorationStyleId=1&bookingDate=not-a-date",
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert!(location(&resp).starts_with("/?flash="));
        assert!(state.bookings.is_empty());
    }

    #[tokio::test]
    async fn create_booking_unknown_style_flashes_and_redirects() {
        let state = seeded_state();
        let cookie = state.sessions.issue(7);
        let resp = app(state.clone())
            .oneshot(form_request_as(
                "/user/create-booking",
                "timeSlotId=1&roomId=1&decorationStyleId=99&bookingDate=2090-01-01",
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let loc = location(&resp).to_owned();
        assert!(loc.starts_with("/user/select-timeslot?flash="), "location: {loc}");
        assert!(state.bookings.is_empty());
        let flash = flash_from_location(&state, &loc);
        assert_eq!(flash.text, MSG_BOOKING_FAILED);
    }

    #[tokio::test]
    async fn create_booking_success_is_pending_and_goes_to_payment() {
        let state = seeded_state();
        let cookie = state.sessions.issue(7);
        let resp = app(state.clone())
            .oneshot(form_request_as(
                "/user/create-booking",
                "timeSlotId=1&roomId=1&decorationStyleId=1&bookingDate=2090-01-01",
                &cookie,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/user/payment/1");
        let booking = state.bookings.get(1).expect("booking stored");
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.user_id, 7);
    }

    #[tokio::test]
    async fn create_booking_conflict_flashes_and_redirects() {
        let state = seeded_state();
        let cookie = state.sessions.issue(7);
        let body = "timeSlotId=1&roomId=1&decorationStyleId=1&bookingDate=2090-01-01";
        let first = app(state.clone())
            .oneshot(form_request_as("/user/create-booking", body, &cookie))
            .await
            .unwrap();
        assert_eq!(location(&first), "/user/payment/1");

        let second = app(state.clone())
            .oneshot(form_request_as("/user/create-booking", body, &cookie))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::SEE_OTHER);
        assert!(location(&second).starts_with("/user/select-timeslot?flash="));
        assert_eq!(state.bookings.len(), 1);
    }

    #[tokio::test]
    async fn payment_page_unknown_id_redirects_to_bookings() {
        for uri in ["/user/payment/99", "/user/payment/abc"] {
            let resp = app(seeded_state()).oneshot(get_request(uri)).await.unwrap();
            assert_eq!(resp.status(), StatusCode::SEE_OTHER, "uri: {uri}");
            assert_eq!(location(&resp), "/user/bookings", "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn payment_page_renders_for_existing_booking() {
        let state = seeded_state();
        state
            .bookings
            .create(7, 1, 1, 1, time::macros::date!(2090 - 01 - 01))
            .unwrap();
        let resp = app(state)
            .oneshot(get_request("/user/payment/1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn confirm_payment_records_info_and_flashes_success() {
        let state = seeded_state();
        state
            .bookings
            .create(7, 1, 1, 1, time::macros::date!(2090 - 01 - 01))
            .unwrap();
        let resp = app(state.clone())
            .oneshot(form_request(
                "/user/confirm-payment",
                "bookingId=1&paymentInfo=CK%20987654",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let loc = location(&resp).to_owned();
        assert!(loc.starts_with("/user/bookings?flash="));
        let flash = flash_from_location(&state, &loc);
        assert_eq!(flash.text, MSG_PAYMENT_RECORDED);
        assert!(!flash.is_error());
        let booking = state.bookings.get(1).unwrap();
        assert_eq!(booking.payment_info.as_deref(), Some("CK 987654"));
    }

    #[tokio::test]
    async fn confirm_payment_unknown_id_still_flashes_success() {
        let state = seeded_state();
        let resp = app(state.clone())
            .oneshot(form_request(
                "/user/confirm-payment",
                "bookingId=99&paymentInfo=CK",
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let loc = location(&resp).to_owned();
        let flash = flash_from_location(&state, &loc);
        assert_eq!(flash.text, MSG_PAYMENT_RECORDED);
    }

    #[tokio::test]
    async fn cancel_booking_sets_status_and_flashes_success() {
        let state = seeded_state();
        state
            .bookings
            .create(7, 1, 1, 1, time::macros::date!(2090 - 01 - 01))
            .unwrap();
        let resp = app(state.clone())
            .oneshot(get_request("/user/cancel-booking/1"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let loc = location(&resp).to_owned();
        assert!(loc.starts_with("/user/bookings?flash="));
        let flash = flash_from_location(&state, &loc);
        assert_eq!(flash.text, MSG_BOOKING_CANCELLED);
        assert_eq!(
            state.bookings.get(1).unwrap().status,
            BookingStatus::CancelledByUser
        );
    }

    #[tokio::test]
    async fn cancel_booking_unknown_id_still_flashes_success() {
        let state = seeded_state();
        let resp = app(state.clone())
            .oneshot(get_request("/user/cancel-booking/99"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let loc = location(&resp).to_owned();
        let flash = flash_from_location(&state, &loc);
        assert_eq!(flash.text, MSG_BOOKING_CANCELLED);
        assert!(!flash.is_error());
    }

    #[tokio::test]
    async fn flash_is_consumed_by_the_rendering_request() {
        let state = seeded_state();
        let cookie = state.sessions.issue(7);
        let resp = app(state.clone())
            .oneshot(get_request("/user/cancel-booking/99"))
            .await
            .unwrap();
        let loc = location(&resp).to_owned();

        // First view redeems the token...
        let first = app(state.clone())
            .oneshot(get_request_as(&loc, &cookie))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        // ...so the message is gone for any later request.
        assert!(state.flash.is_empty());
    }

    #[tokio::test]
    async fn health_degraded_with_empty_catalog() {
        let resp = app(AppState::default())
            .oneshot(get_request("/healthz"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn health_ok_with_seeded_catalog() {
        let resp = app(seeded_state())
            .oneshot(get_request("/healthz"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
