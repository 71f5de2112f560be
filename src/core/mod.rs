// core logic - firewall, cache, key rotation, and provider orchestration

mod cache;
mod firewall;
mod keys;
mod manager;
mod providers;

pub use cache::{ResponseCache, CACHE_TTL};
pub use firewall::{
    blocked_category, check_prompt_safety, validate_generated_code, BlockCategory, RateLimiter,
    RiskLevel, Verdict, DEFAULT_MAX_REQUESTS, MAX_PROMPT_LEN, RATE_WINDOW,
};
pub use keys::KeyRotator;
pub use manager::{AiManager, AuditSink, GenerateRequest, GenerateResponse, LogAudit, Role};
pub use providers::{AnthropicProvider, Completion, GroqProvider, Provider};
