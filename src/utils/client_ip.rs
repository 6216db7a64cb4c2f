use actix_web::HttpRequest;

/// Resolves the address a request really came from.
///
/// With `trust_proxy_headers`, `X-Real-Ip` wins, then the first hop of `X-Forwarded-For`.
/// Otherwise, or when neither header is usable, the socket peer address is used.
pub fn client_ip(req: &HttpRequest, trust_proxy_headers: bool) -> Option<String> {
    if trust_proxy_headers {
        if let Some(ip) = header(req, "X-Real-Ip") {
            return Some(ip.to_string());
        }

        if let Some(first) = header(req, "X-Forwarded-For")
            .and_then(|list| list.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
        {
            return Some(first.to_string());
        }
    }

    req.peer_addr().map(|addr| addr.ip().to_string())
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}
