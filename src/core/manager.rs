// the orchestrator - firewall gate, cache, role routing, and failover
// every request goes through the firewall before any paid provider is touched

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::cache::ResponseCache;
use crate::core::firewall::check_prompt_safety;
use crate::core::keys::KeyRotator;
use crate::core::providers::{AnthropicProvider, GroqProvider, Provider};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// First pass: turns the raw request into a structural/design plan.
    Architect,
    /// Second pass: turns a plan (or the raw request, on fallback) into
    /// renderable markup. Also the failover target for architect failures.
    Engineer,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Architect => write!(f, "architect"),
            Role::Engineer => write!(f, "engineer"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub role: Role,
    pub context: Option<String>,
    pub caller_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub content: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    pub cached: bool,
}

/// Where firewall rejections go. The production sink is whatever audit
/// pipeline the deployment runs; `LogAudit` just emits a tracing warning.
pub trait AuditSink: Send + Sync {
    fn security_event(&self, caller_id: &str, event_type: &str, reason: &str);
}

pub struct LogAudit;

impl AuditSink for LogAudit {
    fn security_event(&self, caller_id: &str, event_type: &str, reason: &str) {
        tracing::warn!(caller_id, event_type, reason, "firewall block");
    }
}

pub struct AiManager {
    architect: Box<dyn Provider>,
    architect_keys: KeyRotator,
    engineer: Box<dyn Provider>,
    engineer_keys: KeyRotator,
    cache: ResponseCache,
    audit: Box<dyn AuditSink>,
}

impl AiManager {
    pub fn new(
        architect: Box<dyn Provider>,
        architect_keys: KeyRotator,
        engineer: Box<dyn Provider>,
        engineer_keys: KeyRotator,
    ) -> Self {
        Self {
            architect,
            architect_keys,
            engineer,
            engineer_keys,
            cache: ResponseCache::default(),
            audit: Box::new(LogAudit),
        }
    }

    /// Build the real provider pair from `ANTHROPIC_KEYS` and `GROQ_KEYS`
    /// (comma-delimited credential pools).
    pub fn from_env() -> Result<Self, Error> {
        let architect_keys = rotator_from_env("ANTHROPIC_KEYS")?;
        let engineer_keys = rotator_from_env("GROQ_KEYS")?;

        if architect_keys.has_multiple() {
            tracing::debug!(keys = architect_keys.key_count(), "rotating anthropic keys");
        }
        if engineer_keys.has_multiple() {
            tracing::debug!(keys = engineer_keys.key_count(), "rotating groq keys");
        }

        Ok(Self::new(
            Box::new(AnthropicProvider::new()),
            architect_keys,
            Box::new(GroqProvider::new()),
            engineer_keys,
        ))
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache = ResponseCache::new(ttl);
        self
    }

    pub fn with_audit(mut self, audit: Box<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Firewall gate, cache lookup, role dispatch, single-hop failover.
    pub async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, Error> {
        let verdict = check_prompt_safety(&request.prompt);
        if !verdict.safe {
            let reason = verdict.reason.unwrap_or_default();
            self.audit
                .security_event(&request.caller_id, "prompt_blocked", &reason);
            return Err(Error::PromptBlocked {
                reason,
                risk: verdict.risk,
            });
        }

        let key = cache_key(request);
        if let Some(mut hit) = self.cache.get(&key) {
            hit.cached = true;
            return Ok(hit);
        }

        // failover is one bounded hop: an architect failure degrades to the
        // engineer path, the engineer path is the end of the line
        let response = match request.role {
            Role::Architect => match self.call_architect(request).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::warn!(error = %err, "architect failed, falling back to engineer");
                    self.engineer_or_give_up(request).await?
                }
            },
            Role::Engineer => self.engineer_or_give_up(request).await?,
        };

        self.cache.set(&key, response.clone());
        Ok(response)
    }

    async fn call_architect(&self, request: &GenerateRequest) -> Result<GenerateResponse, Error> {
        let key = self.architect_keys.next_key();
        let prompt = build_architect_prompt(request);
        let completion = self.architect.complete(&key, &prompt).await?;

        Ok(GenerateResponse {
            content: completion.text,
            provider: self.architect.id().to_string(),
            tokens_used: completion.tokens_used,
            cached: false,
        })
    }

    async fn call_engineer(&self, request: &GenerateRequest) -> Result<GenerateResponse, Error> {
        let key = self.engineer_keys.next_key();
        let prompt = build_engineer_prompt(request);
        let completion = self.engineer.complete(&key, &prompt).await?;

        Ok(GenerateResponse {
            content: completion.text,
            provider: self.engineer.id().to_string(),
            tokens_used: completion.tokens_used,
            cached: false,
        })
    }

    async fn engineer_or_give_up(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, Error> {
        self.call_engineer(request).await.map_err(|err| {
            tracing::error!(error = %err, "engineer provider failed");
            Error::ProvidersExhausted
        })
    }
}

fn rotator_from_env(var: &str) -> Result<KeyRotator, Error> {
    let raw = std::env::var(var).unwrap_or_default();
    KeyRotator::parse(&raw).map_err(|_| Error::Config(format!("No API keys provided (set {var})")))
}

// exact match key - casing and whitespace differences are cache-distinct
fn cache_key(request: &GenerateRequest) -> String {
    format!(
        "{}:{}:{}",
        request.role,
        request.prompt,
        request.context.as_deref().unwrap_or("")
    )
}

fn build_architect_prompt(request: &GenerateRequest) -> String {
    let context = request
        .context
        .as_deref()
        .map(|c| format!("Context: {c}\n\n"))
        .unwrap_or_default();

    format!(
        r#"You are a website architecture expert. Design a complete website structure.

User Request: {prompt}

{context}Provide:
1. Site structure (pages, navigation)
2. Design system (colors, typography, spacing)
3. Content sections for each page
4. Admin panel requirements

Output as JSON with this structure:
{{
  "structure": {{...}},
  "design": {{...}},
  "pages": [...],
  "adminSchema": {{...}}
}}"#,
        prompt = request.prompt,
        context = context,
    )
}

fn build_engineer_prompt(request: &GenerateRequest) -> String {
    format!(
        r#"You are an expert frontend engineer. Generate production-ready HTML/CSS code.

Architecture: {context}

User Request: {prompt}

Requirements:
- Modern, responsive design
- Tailwind CSS for styling
- Semantic HTML5
- Optimized for performance
- Mobile-first approach

Generate complete HTML with embedded CSS (using Tailwind CDN)."#,
        context = request.context.as_deref().unwrap_or("N/A"),
        prompt = request.prompt,
    )
}
