use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;

const BOT_PATTERNS: &[&str] = &[
    "bot", "crawl", "spider", "scrape", "curl", "wget", "python-requests", "httpie", "go-http",
    "headless",
];

/// Returns `true` if the User-Agent looks like a script or crawler.
pub fn is_automated(user_agent: &str) -> bool {
    let ua_lower = user_agent.to_lowercase();
    BOT_PATTERNS.iter().any(|p| ua_lower.contains(p))
}

pub async fn bot_guard(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    match user_agent {
        None => {
            tracing::warn!("Blocked contact request without User-Agent");
            Err(StatusCode::FORBIDDEN)
        }
        Some(ua) if is_automated(&ua) => {
            tracing::warn!("Blocked automated contact request: {ua}");
            Err(StatusCode::FORBIDDEN)
        }
        Some(_) => Ok(next.run(req).await),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn browsers_pass() {
        assert!(!is_automated(
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_0) AppleWebKit/605.1.15 Safari/605.1.15"
        ));
    }

    #[test]
    fn scripts_and_crawlers_are_flagged() {
        assert!(is_automated("curl/8.4.0"));
        assert!(is_automated("python-requests/2.31"));
        assert!(is_automated("Googlebot/2.1"));
        assert!(is_automated("Mozilla/5.0 HeadlessChrome/120.0"));
    }
}
