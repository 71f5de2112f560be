// promptgate library - prompt firewall and ai provider orchestration

pub mod cli;
mod core;
mod error;
mod server;

pub use core::{
    blocked_category, check_prompt_safety, validate_generated_code, AiManager, AnthropicProvider,
    AuditSink, BlockCategory, Completion, GenerateRequest, GenerateResponse, GroqProvider,
    KeyRotator, LogAudit, Provider, RateLimiter, ResponseCache, RiskLevel, Role, Verdict,
    CACHE_TTL, DEFAULT_MAX_REQUESTS, MAX_PROMPT_LEN, RATE_WINDOW,
};
pub use error::Error;
pub use server::{CreditLedger, Publisher, Server, UnmeteredLedger};
