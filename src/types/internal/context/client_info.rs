use poem::Request;

/// Where a request came from, as recorded in audit rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub ip: String,
    pub browser: String,
}

impl ClientInfo {
    pub fn unknown() -> Self {
        Self {
            ip: "unknown".to_string(),
            browser: "Other".to_string(),
        }
    }

    pub fn from_request(req: &Request) -> Self {
        Self {
            ip: client_ip(req),
            browser: browser_family(req.header("User-Agent").unwrap_or("")).to_string(),
        }
    }
}

/// First `X-Forwarded-For` entry, else the connection address, else `unknown`
pub fn client_ip(req: &Request) -> String {
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(first) = forwarded.split(',').next().map(str::trim) {
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }

    req.remote_addr()
        .as_socket_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Coarse browser family from a user agent, checked in a fixed order
///
/// Order matters: Chrome agents also mention Safari, Opera agents mention Chrome.
pub fn browser_family(user_agent: &str) -> &'static str {
    if user_agent.contains("Netscape") {
        "Netscape"
    } else if user_agent.contains("Firefox") {
        "Firefox"
    } else if user_agent.contains("Chrome") {
        "Chrome"
    } else if user_agent.contains("Opera") || user_agent.contains("OPR") {
        "Opera"
    } else if user_agent.contains("MSIE") || user_agent.contains("Trident") {
        "Internet Explorer"
    } else if user_agent.contains("Safari") {
        "Safari"
    } else {
        "Other"
    }
}
