//! Client identification utilities
//!
//! Common functions for identifying clients via HTTP headers.
//! Used by the auth layer to stamp audit entries with the request's
//! source address and user agent.

use axum::http::{HeaderMap, header};
use std::net::IpAddr;

/// Request client identity derived from connection info and headers
#[derive(Debug, Clone, Default)]
pub struct RequestClient {
    /// Client IP address (from X-Forwarded-For or direct connection)
    pub ip: Option<IpAddr>,
    /// Original User-Agent string (for audit logging)
    pub user_agent: Option<String>,
}

impl RequestClient {
    /// Create a new request client identity
    pub fn new(ip: Option<IpAddr>, user_agent: Option<String>) -> Self {
        Self { ip, user_agent }
    }

    /// Get IP as string (for storage); "unknown" when not determinable
    pub fn ip_string(&self) -> String {
        self.ip
            .map(|ip| ip.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Extract the client identity from request headers
///
/// ## Arguments
/// * `headers` - HTTP request headers
/// * `direct_ip` - Direct connection IP address (from connect info)
pub fn extract_client(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> RequestClient {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    RequestClient::new(extract_client_ip(headers, direct_ip), user_agent)
}

/// Extract client IP address from headers
///
/// Checks X-Forwarded-For header first (for reverse proxy setups),
/// then falls back to direct connection IP.
pub fn extract_client_ip(headers: &HeaderMap, direct_ip: Option<IpAddr>) -> Option<IpAddr> {
    // Check X-Forwarded-For header (first IP in the list)
    if let Some(xff) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first_ip) = xff.split(',').next() {
            if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                return Some(ip);
            }
        }
    }
    direct_ip
}
