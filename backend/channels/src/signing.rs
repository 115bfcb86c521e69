//! Request signing shared by the Slack receiver and the worker intake.
//!
//! Both use Slack's v0 scheme: `v0=` + hex HMAC-SHA256 of
//! `v0:{timestamp}:{body}`, with the timestamp in a companion header.

use axum::http::HeaderMap;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of a signed request before it is treated as a replay.
pub const SIGNATURE_MAX_AGE_SECS: i64 = 60 * 5;

const VERSION_PREFIX: &str = "v0=";

fn signing_mac(secret: &str, timestamp: &str, body: &[u8]) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("v0:{timestamp}:").as_bytes());
    mac.update(body);
    Some(mac)
}

/// Signature header value for `body` sent at `timestamp`.
pub fn compute_signature(secret: &str, timestamp: &str, body: &[u8]) -> Option<String> {
    let mac = signing_mac(secret, timestamp, body)?;
    Some(format!("{VERSION_PREFIX}{}", hex::encode(mac.finalize().into_bytes())))
}

/// Check `signature_header` against the body and reject stale timestamps.
pub fn verify_signature(
    headers: &HeaderMap,
    body: &[u8],
    secret: &str,
    now: i64,
    signature_header: &str,
    timestamp_header: &str,
) -> bool {
    let (Some(sig), Some(ts)) = (
        header_str(headers, signature_header),
        header_str(headers, timestamp_header),
    ) else {
        return false;
    };
    let Ok(ts_secs) = ts.parse::<i64>() else {
        return false;
    };
    if (now - ts_secs).abs() > SIGNATURE_MAX_AGE_SECS {
        return false;
    }
    let Some(Ok(expected)) = sig.strip_prefix(VERSION_PREFIX).map(hex::decode) else {
        return false;
    };

    signing_mac(secret, ts, body).is_some_and(|mac| mac.verify_slice(&expected).is_ok())
}

fn header_str<'h>(headers: &'h HeaderMap, name: &str) -> Option<&'h str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
