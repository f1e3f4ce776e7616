//! Client address extraction from the peer socket and proxy headers.

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// Returns the client address for a request as a string.
///
/// With `behind_proxy` unset only the peer socket address is used. When set,
/// the first parseable `X-Forwarded-For` entry wins, then `X-Real-IP`, then
/// the peer. Enable it only behind a trusted reverse proxy; the headers are
/// otherwise client-controlled.
pub fn client_address(headers: &HeaderMap, peer: SocketAddr, behind_proxy: bool) -> String {
    if behind_proxy && let Some(ip) = forwarded_for(headers).or_else(|| real_ip(headers)) {
        return ip.to_string();
    }

    peer.ip().to_string()
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .find_map(|s| s.trim().parse::<IpAddr>().ok())
}

fn real_ip(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-real-ip")?
        .to_str()
        .ok()?
        .trim()
        .parse::<IpAddr>()
        .ok()
}
