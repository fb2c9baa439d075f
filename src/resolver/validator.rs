//! Final candidate validation
//!
//! The extraction stages each apply their own filters, but later stages do
//! not re-check everything stage 1 does, so every candidate passes through
//! this gate before it is returned or cached.

use url::Url;

/// Inline-encoded images at or below this length are loading stand-ins
const MIN_DATA_URI_LEN: usize = 200;

/// Hosts that only ever appear in test or placeholder markup
const DENYLISTED_HOSTS: &[&str] = &[
    "example.com",
    "example.org",
    "example.net",
    "test.com",
    "localhost",
];

/// Validates a candidate URL, returning it unchanged if it survives
///
/// Rejects short inline-encoded images, absolute URLs that fail to parse,
/// and absolute URLs whose host matches the test/placeholder denylist.
/// Candidates that are neither data URIs nor absolute URLs pass through
/// untouched.
pub fn validate(candidate: String) -> Option<String> {
    if candidate.starts_with("data:image") {
        if candidate.len() < MIN_DATA_URI_LEN {
            tracing::debug!(
                "Rejecting inline image of {} chars as a placeholder",
                candidate.len()
            );
            return None;
        }
        return Some(candidate);
    }

    if candidate.starts_with("http") {
        let parsed = match Url::parse(&candidate) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Rejecting unparseable candidate URL: {}", e);
                return None;
            }
        };

        let host = parsed.host_str().unwrap_or("");
        if DENYLISTED_HOSTS.iter().any(|deny| host.contains(deny)) {
            tracing::debug!("Rejecting candidate with denylisted host: {}", host);
            return None;
        }
    }

    Some(candidate)
}
