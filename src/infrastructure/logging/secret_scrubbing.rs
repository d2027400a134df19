use regex::Regex;
use std::sync::LazyLock;

// Match OpenAI-style keys: sk-..., sk-proj-...
static API_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-[a-zA-Z0-9_-]{16,}").expect("api key pattern is valid"));

// Match Bearer tokens in Authorization headers
static BEARER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9._~+/=-]+").expect("bearer pattern is valid"));

// Match key/token/secret fields in JSON or query strings
static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(["']?(?:api_key|apikey|token|secret)["']?\s*[:=]\s*)["']?[a-zA-Z0-9._-]{8,}["']?"#)
        .expect("field pattern is valid")
});

/// Redacts credentials from text before it reaches logs or the user
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    pub const fn new() -> Self {
        Self
    }

    /// Scrub a message of sensitive data
    pub fn scrub(&self, message: &str) -> String {
        let scrubbed = FIELD_PATTERN.replace_all(message, "${1}[REDACTED]");
        let scrubbed = BEARER_PATTERN.replace_all(&scrubbed, "Bearer [TOKEN_REDACTED]");
        API_KEY_PATTERN
            .replace_all(&scrubbed, "[API_KEY_REDACTED]")
            .into_owned()
    }

    /// Short, non-reversible form of an API key for startup logs
    pub fn mask_key(&self, key: &str) -> String {
        match key.get(..6) {
            Some(prefix) if key.len() > 12 => format!("{prefix}...[REDACTED]"),
            _ => "[REDACTED]".to_string(),
        }
    }
}
