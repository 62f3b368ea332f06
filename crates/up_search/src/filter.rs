use url::Url;

/// Domains that never host the kind of competitor article we want: social
/// networks, marketplaces, video and Q&A platforms.
const BLOCKED_DOMAINS: &[&str] = &[
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "pinterest.",
    "linkedin.com",
    "youtube.com",
    "tiktok.com",
    "reddit.com",
    "quora.com",
    "amazon.",
    "ebay.",
    "etsy.com",
    "medium.com/m/signin",
];

/// Path fragments that mark docs portals, auth pages and shop plumbing.
const BLOCKED_PATHS: &[&str] = &[
    "/login",
    "/signin",
    "/sign-in",
    "/signup",
    "/sign-up",
    "/register",
    "/cart",
    "/checkout",
    "/docs/",
    "/documentation",
    "/privacy",
    "/terms",
    "/pricing",
    "/tag/",
    "/category/",
    "/search",
];

/// Path fragments that usually mean editorial content.
const ARTICLE_PATHS: &[&str] = &[
    "/blog",
    "/guide",
    "/how-to",
    "/howto",
    "/article",
    "/post",
    "/news",
    "/insights",
    "/resources",
    "/learn",
    "/tips",
    "/stories",
];

/// Title phrasings typical of listicles and how-to pieces.
const TITLE_HINTS: &[&str] = &[
    "how to", "guide", "best ", "top ", "ways to", "tips", "what is", "why ", "benefits",
];

/// Heuristic acceptance test for a discovered URL. Rejects known non-article
/// destinations, accepts article-shaped paths or how-to titles, and
/// default-accepts anything else that is not a bare site root.
pub fn is_article_like(url: &str, title: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    let host = parsed.host_str().unwrap_or("").to_lowercase();
    let path = parsed.path().to_lowercase();

    if BLOCKED_DOMAINS.iter().any(|d| host.contains(d)) {
        return false;
    }
    if BLOCKED_PATHS.iter().any(|p| path.contains(p)) {
        return false;
    }
    if ARTICLE_PATHS.iter().any(|p| path.contains(p)) {
        return true;
    }

    let lowered = title.to_lowercase();
    if TITLE_HINTS.iter().any(|h| lowered.contains(h)) {
        return true;
    }

    path != "/" && !path.is_empty()
}
