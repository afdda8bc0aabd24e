//! Rotating client identity for outbound requests.
//!
//! Courtesy, not stealth: varying the User-Agent across a small fixed pool
//! lowers the chance of a blanket block while scraping politely.

use rand::seq::IndexedRandom;

/// Strategy for picking the identity attached to the next request.
/// Injected into adapters so tests can pin a deterministic one.
pub trait ClientIdentity: Send + Sync {
    fn next(&self) -> &'static str;
}

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) Gecko/20100101 Firefox/121.0",
];

/// Picks a random agent from the built-in pool on every request.
pub struct RotatingIdentity;

impl ClientIdentity for RotatingIdentity {
    fn next(&self) -> &'static str {
        USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENTS[0])
    }
}

/// Always returns the same agent. For tests.
#[cfg(test)]
pub struct FixedIdentity(pub &'static str);

#[cfg(test)]
impl ClientIdentity for FixedIdentity {
    fn next(&self) -> &'static str {
        self.0
    }
}
