//! Signed session cookie codec.
//!
//! Cookie value format: `base64url(claims-json).base64url(hmac_sha256(claims-json))`.
//! The claims carry only the random session id and an issue timestamp; the
//! user id stays server-side.

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use time::OffsetDateTime;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sid";

#[derive(Serialize, Deserialize)]
struct Claims {
    sid: Uuid,
    iat: i64,
}

/// Encode and sign a session id into a cookie value.
pub fn encode(session_id: Uuid, key: &[u8; 32]) -> String {
    let claims = Claims {
        sid: session_id,
        iat: OffsetDateTime::now_utc().unix_timestamp(),
    };
    // Serialising two plain fields cannot fail.
    let payload = serde_json::to_vec(&claims).expect("claims serialise");
    let sig = hmac_sha256(key, &payload);
    format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(&payload),
        URL_SAFE_NO_PAD.encode(sig)
    )
}

/// Verify a cookie value's signature and extract the session id.
///
/// Returns `None` for any malformed, truncated, or tampered value.
pub fn decode(value: &str, key: &[u8; 32]) -> Option<Uuid> {
    let (payload_b64, sig_b64) = value.split_once('.')?;
    let payload = URL_SAFE_NO_PAD.decode(payload_b64).ok()?;
    let sig = URL_SAFE_NO_PAD.decode(sig_b64).ok()?;

    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts 32-byte keys");
    mac.update(&payload);
    mac.verify_slice(&sig).ok()?;

    let claims: Claims = serde_json::from_slice(&payload).ok()?;
    Some(claims.sid)
}

fn hmac_sha256(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts 32-byte keys");
    mac.update(data);
    mac.finalize().into_bytes().into()
}

/// Extract the raw `sid` cookie value from a request's `Cookie` header.
pub fn from_headers(headers: &HeaderMap) -> Option<&str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

/// `Set-Cookie` value that installs a session cookie.
pub fn set_cookie_value(cookie_value: &str, max_age_secs: u64) -> String {
    format!(
        "{SESSION_COOKIE}={cookie_value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    )
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_cookie_value() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const KEY: [u8; 32] = [7u8; 32];

    #[test]
    fn encode_decode_round_trip() {
        let sid = Uuid::new_v4();
        let value = encode(sid, &KEY);
        assert_eq!(decode(&value, &KEY), Some(sid));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let value = encode(Uuid::new_v4(), &KEY);
        let (payload, sig) = value.split_once('.').unwrap();
        let other = encode(Uuid::new_v4(), &KEY);
        let (other_payload, _) = other.split_once('.').unwrap();
        let forged = format!("{other_payload}.{sig}");
        assert_ne!(payload, other_payload);
        assert!(decode(&forged, &KEY).is_none());
    }

    #[test]
    fn wrong_key_is_rejected() {
        let value = encode(Uuid::new_v4(), &KEY);
        assert!(decode(&value, &[8u8; 32]).is_none());
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(decode("", &KEY).is_none());
        assert!(decode("no-dot", &KEY).is_none());
        assert!(decode("a.b", &KEY).is_none());
        assert!(decode("..", &KEY).is_none());
    }

    #[test]
    fn cookie_header_parsing() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; sid=abc.def; lang=vi"),
        );
        assert_eq!(from_headers(&headers), Some("abc.def"));

        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(from_headers(&headers), None);
    }

    #[test]
    fn set_and_clear_cookie_attributes() {
        let set = set_cookie_value("abc", 3600);
        assert!(set.starts_with("sid=abc;"));
        assert!(set.contains("HttpOnly"));
        assert!(set.contains("Max-Age=3600"));
        let clear = clear_cookie_value();
        assert!(clear.contains("Max-Age=0"));
    }
}
