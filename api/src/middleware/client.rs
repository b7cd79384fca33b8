//! Rate limiting keys derived from the request

use actix_web::HttpRequest;
use sentinel_core::services::{normalize_client_key, UNKNOWN_CLIENT_KEY};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REAL_IP: &str = "x-real-ip";

/// Canonical client address of a request.
///
/// Forwarding headers are only read when `trust_forwarded` is set, since
/// any client can send them. Without a usable address the request falls
/// into the shared `unknown` bucket.
pub fn client_key(req: &HttpRequest, trust_forwarded: bool) -> String {
    if trust_forwarded {
        if let Some(forwarded) = forwarded_address(req) {
            return normalize_client_key(&forwarded);
        }
    }

    match req.peer_addr() {
        Some(addr) => normalize_client_key(&addr.ip().to_string()),
        None => UNKNOWN_CLIENT_KEY.to_string(),
    }
}

/// Registered route template of a request, or its raw path when no
/// resource matches
pub fn route_key(req: &HttpRequest) -> String {
    req.match_pattern()
        .unwrap_or_else(|| req.path().to_string())
}

fn forwarded_address(req: &HttpRequest) -> Option<String> {
    let headers = req.headers();

    let from_xff = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(addr) = from_xff {
        return Some(addr.to_string());
    }

    headers
        .get(X_REAL_IP)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
