//! User-agent checks for the age gate.
//!
//! Search crawlers and link-preview fetchers must see the page content, so
//! the 21+ prompt is skipped for them. Detection is a plain substring list.

const CRAWLER_MARKERS: &[&str] = &[
    "bot",
    "crawler",
    "spider",
    "slurp",
    "googlebot",
    "bingbot",
    "duckduckbot",
    "baiduspider",
    "yandex",
    "facebookexternalhit",
    "twitterbot",
    "linkedinbot",
    "embedly",
    "whatsapp",
    "lighthouse",
    "headless",
    "pagespeed",
];

/// Whether `user_agent` looks like a crawler or preview fetcher. An empty
/// user agent is treated as a visitor.
pub fn is_crawler_user_agent(user_agent: &str) -> bool {
    let ua = user_agent.trim().to_ascii_lowercase();
    if ua.is_empty() {
        return false;
    }
    CRAWLER_MARKERS.iter().any(|marker| ua.contains(marker))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AgeGate;

impl AgeGate {
    /// Show the prompt unless the visitor already confirmed or is a crawler.
    pub fn should_prompt(&self, user_agent: &str, already_verified: bool) -> bool {
        !already_verified && !is_crawler_user_agent(user_agent)
    }
}
