// prompt firewall - keeps bad prompts away from paid providers
// pattern scan first, then length, char ratio, and keyword heuristics

use std::collections::HashMap;
use std::time::{Duration, Instant};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use serde::Serialize;

pub const MAX_PROMPT_LEN: usize = 10_000;
pub const SPECIAL_CHAR_RATIO_LIMIT: f64 = 0.30;
pub const SUSPICIOUS_KEYWORD_LIMIT: usize = 2;

pub const DEFAULT_MAX_REQUESTS: u32 = 50;
pub const RATE_WINDOW: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub safe: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub risk: RiskLevel,
}

impl Verdict {
    fn safe() -> Self {
        Self {
            safe: true,
            reason: None,
            risk: RiskLevel::Low,
        }
    }

    fn blocked(reason: impl Into<String>, risk: RiskLevel) -> Self {
        Self {
            safe: false,
            reason: Some(reason.into()),
            risk,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockCategory {
    SystemOverride,
    CredentialRequest,
    CodeInjection,
    SqlInjection,
    XssAttempt,
    CommandInjection,
}

// ordered table, first match wins
static BLOCKED_PATTERNS: Lazy<Vec<(BlockCategory, Regex)>> = Lazy::new(|| {
    use BlockCategory::*;

    let table: &[(BlockCategory, &str)] = &[
        // system override attempts
        (SystemOverride, r"(?i)ignore\s+(previous|above|system)\s+(instructions|prompt|rules)"),
        (SystemOverride, r"(?i)disregard\s+(all|previous)\s+(instructions|prompts)"),
        (SystemOverride, r"(?i)you\s+are\s+now"),
        (SystemOverride, r"(?i)act\s+as\s+if"),
        (SystemOverride, r"(?i)pretend\s+(you|to)\s+are"),
        // credential fishing
        (CredentialRequest, r"(?i)api[_\s]?key"),
        (CredentialRequest, r"(?i)password"),
        (CredentialRequest, r"(?i)secret[_\s]?key"),
        (CredentialRequest, r"(?i)access[_\s]?token"),
        (CredentialRequest, r"(?i)private[_\s]?key"),
        (CredentialRequest, r"(?i)bearer\s+token"),
        // executable / markup injection
        (CodeInjection, r"(?i)eval\s*\("),
        (CodeInjection, r"(?i)exec\s*\("),
        (CodeInjection, r"(?i)<script[\s>]"),
        (CodeInjection, r"(?i)javascript:"),
        (CodeInjection, r"(?i)data:text/html"),
        (CodeInjection, r"(?i)onclick\s*="),
        (CodeInjection, r"(?i)onerror\s*="),
        // sql injection idioms
        (SqlInjection, r"(?i)union\s+select"),
        (SqlInjection, r"(?i)drop\s+table"),
        (SqlInjection, r"(?i)delete\s+from"),
        (SqlInjection, r"(?i)'\s*or\s*'1'\s*=\s*'1"),
        // xss helper calls
        (XssAttempt, r"(?i)alert\s*\("),
        (XssAttempt, r"(?i)confirm\s*\("),
        (XssAttempt, r"(?i)prompt\s*\("),
        // shell command injection
        (CommandInjection, r"\$\(.*\)"),
        (CommandInjection, r"`.*`"),
        (CommandInjection, r"(?i);\s*(rm|wget|curl|nc|bash)"),
    ];

    table
        .iter()
        .map(|(cat, pat)| (*cat, Regex::new(pat).expect("invalid blocked pattern")))
        .collect()
});

// flagged but not blocked on their own
const SUSPICIOUS_KEYWORDS: [&str; 7] = [
    "hack",
    "exploit",
    "vulnerability",
    "bypass",
    "crack",
    "malware",
    "phishing",
];

/// Classify an inbound prompt before it reaches any provider.
///
/// Checks run in fixed precedence order and stop at the first hit:
/// blocked patterns, length bound, special-character ratio, then
/// suspicious-keyword accumulation.
pub fn check_prompt_safety(prompt: &str) -> Verdict {
    if blocked_category(prompt).is_some() {
        return Verdict::blocked(
            "Blocked pattern detected: potential security risk",
            RiskLevel::High,
        );
    }

    if prompt.chars().count() > MAX_PROMPT_LEN {
        return Verdict::blocked(
            "Prompt too long (max 10,000 characters)",
            RiskLevel::Medium,
        );
    }

    if special_char_ratio(prompt) > SPECIAL_CHAR_RATIO_LIMIT {
        return Verdict::blocked("Excessive special characters detected", RiskLevel::Medium);
    }

    let found = suspicious_keywords(prompt);
    if found.len() > SUSPICIOUS_KEYWORD_LIMIT {
        return Verdict::blocked(
            format!("Multiple suspicious keywords: {}", found.join(", ")),
            RiskLevel::Medium,
        );
    }

    // 1-2 suspicious keywords stay low risk on purpose - allowed, not elevated
    Verdict::safe()
}

/// First blocked-pattern category the prompt trips, if any. The verdict only
/// reports that a block occurred; this exists so tuning and tests can see
/// which table entry fired.
pub fn blocked_category(prompt: &str) -> Option<BlockCategory> {
    BLOCKED_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(prompt))
        .map(|(category, _)| *category)
}

fn special_char_ratio(prompt: &str) -> f64 {
    let total = prompt.chars().count();
    if total == 0 {
        return 0.0;
    }

    let special = prompt
        .chars()
        .filter(|c| {
            !(c.is_ascii_alphanumeric()
                || c.is_whitespace()
                || matches!(c, '.' | ',' | '!' | '?' | '-'))
        })
        .count();

    special as f64 / total as f64
}

fn suspicious_keywords(prompt: &str) -> Vec<&'static str> {
    let lower = prompt.to_lowercase();
    SUSPICIOUS_KEYWORDS
        .iter()
        .filter(|kw| lower.contains(**kw))
        .copied()
        .collect()
}

static OUTPUT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)<script[\s>]",
        r"(?i)eval\s*\(",
        r"(?i)exec\s*\(",
        r"(?i)Function\s*\(",
        // dynamic imports could pull in anything
        r"(?i)import\s*\(",
    ]
    .iter()
    .map(|pat| Regex::new(pat).expect("invalid output pattern"))
    .collect()
});

/// Coarse static scan of generated markup. Returns false when the output
/// embeds script tags or dynamic execution, true otherwise. Not a sandbox.
pub fn validate_generated_code(code: &str) -> bool {
    !OUTPUT_PATTERNS.iter().any(|pattern| pattern.is_match(code))
}

struct RateWindow {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window request counter keyed by caller id.
///
/// Windows are created lazily and reset wholesale once expired. Idle callers
/// are never swept, so the table grows with the number of distinct callers.
pub struct RateLimiter {
    windows: Mutex<HashMap<String, RateWindow>>,
    window: Duration,
}

impl RateLimiter {
    pub fn new(window: Duration) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window,
        }
    }

    /// true = allowed. At the cap the count is left untouched so a denied
    /// request doesn't extend the caller's penalty.
    pub fn check(&self, caller_id: &str, max_requests: u32) -> bool {
        let now = Instant::now();
        let mut windows = self.windows.lock();

        match windows.get_mut(caller_id) {
            Some(window) if now <= window.reset_at => {
                if window.count >= max_requests {
                    return false;
                }
                window.count += 1;
                true
            }
            _ => {
                // first request, or the old window expired
                windows.insert(
                    caller_id.to_string(),
                    RateWindow {
                        count: 1,
                        reset_at: now + self.window,
                    },
                );
                true
            }
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(RATE_WINDOW)
    }
}
