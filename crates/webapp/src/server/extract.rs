//! Request-context extractors.
//!
//! [`CurrentUser`] carries the logged-in account: handlers that require a
//! login take it as an argument, and its rejection *is* the login redirect,
//! so no handler body ever checks for an anonymous caller.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::Redirect,
};
use serde::Deserialize;
use uuid::Uuid;

use common::model::User;

use crate::flash::FlashMessage;
use crate::session::cookie;

use super::state::AppState;

/// The authenticated account behind the request's session cookie.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        cookie::from_headers(&parts.headers)
            .and_then(|value| state.sessions.resolve(value))
            .and_then(|user_id| state.catalog.user(user_id))
            .map(CurrentUser)
            .ok_or_else(|| Redirect::to("/login"))
    }
}

/// Optional `flash=<token>` query parameter carried by redirects.
#[derive(Debug, Default, Deserialize)]
pub struct FlashQuery {
    #[serde(default)]
    pub flash: Option<String>,
}

impl FlashQuery {
    /// Redeem the token against the store. Malformed tokens read as absent.
    pub fn take(&self, state: &AppState) -> Option<FlashMessage> {
        let token: Uuid = self.flash.as_deref()?.parse().ok()?;
        state.flash.take(token)
    }
}
