// http server mode - the api boundary around the firewall and orchestrator
// rate limit and credit checks happen here, before the manager is invoked

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::core::{validate_generated_code, AiManager, GenerateRequest, RateLimiter, Role};
use crate::Error;

/// The billing collaborator. Consuming a credit either succeeds or reports
/// the caller is out; the real ledger lives outside this crate.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    async fn consume_credit(&self, caller_id: &str) -> bool;
}

/// Ledger that never says no. Stand-in until a real one is injected.
pub struct UnmeteredLedger;

#[async_trait]
impl CreditLedger for UnmeteredLedger {
    async fn consume_credit(&self, _caller_id: &str) -> bool {
        true
    }
}

/// The deploy collaborator: pushes generated markup somewhere public and
/// returns the URL it will be served from.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        caller_id: &str,
        project_id: &str,
        file_name: &str,
        content: &str,
    ) -> Result<String, Error>;
}

struct AppState {
    manager: AiManager,
    limiter: RateLimiter,
    ledger: Box<dyn CreditLedger>,
    publisher: Option<Box<dyn Publisher>>,
    max_requests: u32,
}

#[derive(Deserialize)]
struct SiteRequest {
    user_id: String,
    project_id: String,
    prompt: String,
    #[serde(default)]
    site_type: Option<String>,
}

#[derive(Serialize)]
struct SiteResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    architecture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    public_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SiteResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            html: None,
            architecture: None,
            public_url: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

pub struct Server;

impl Server {
    pub async fn run(host: &str, port: u16, max_requests: u32) -> Result<(), Error> {
        let manager = AiManager::from_env()?;
        Self::run_with(
            manager,
            Box::new(UnmeteredLedger),
            None,
            host,
            port,
            max_requests,
        )
        .await
    }

    pub async fn run_with(
        manager: AiManager,
        ledger: Box<dyn CreditLedger>,
        publisher: Option<Box<dyn Publisher>>,
        host: &str,
        port: u16,
        max_requests: u32,
    ) -> Result<(), Error> {
        let app = Self::router(manager, ledger, publisher, max_requests);

        let addr = format!("{host}:{port}");
        tracing::info!("server running at http://{addr}");

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }

    /// The router alone, so the boundary can be driven without a listener.
    pub fn router(
        manager: AiManager,
        ledger: Box<dyn CreditLedger>,
        publisher: Option<Box<dyn Publisher>>,
        max_requests: u32,
    ) -> Router {
        let state = Arc::new(AppState {
            manager,
            limiter: RateLimiter::default(),
            ledger,
            publisher,
            max_requests,
        });

        Router::new()
            .route("/health", get(health))
            .route("/generate", post(generate))
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn generate(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SiteRequest>,
) -> (StatusCode, Json<SiteResponse>) {
    // gates first: rate limit, then credits
    if !state.limiter.check(&req.user_id, state.max_requests) {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(SiteResponse::failure(
                "Rate limit exceeded. Try again in 1 hour.",
            )),
        );
    }

    if !state.ledger.consume_credit(&req.user_id).await {
        return (
            StatusCode::FORBIDDEN,
            Json(SiteResponse::failure(
                "No credits remaining. Please upgrade your plan.",
            )),
        );
    }

    // architect pass: structural plan for the site
    let architect_prompt = match req.site_type.as_deref() {
        Some(site_type) => format!("Design a {site_type} website: {}", req.prompt),
        None => format!("Design a website: {}", req.prompt),
    };

    let architecture = match state
        .manager
        .generate(&GenerateRequest {
            prompt: architect_prompt,
            role: Role::Architect,
            context: None,
            caller_id: req.user_id.clone(),
        })
        .await
    {
        Ok(response) => response,
        Err(e) => return failure_response(e),
    };

    // engineer pass: markup, with the plan fed in as context
    let markup = match state
        .manager
        .generate(&GenerateRequest {
            prompt: format!("Build HTML/CSS for: {}", req.prompt),
            role: Role::Engineer,
            context: Some(architecture.content.clone()),
            caller_id: req.user_id.clone(),
        })
        .await
    {
        Ok(response) => response,
        Err(e) => return failure_response(e),
    };

    // outbound scan - the engineer prompt forbids scripts but we don't trust it
    if !validate_generated_code(&markup.content) {
        return (
            StatusCode::BAD_GATEWAY,
            Json(SiteResponse::failure(
                "Generated output failed the safety scan",
            )),
        );
    }

    let public_url = match &state.publisher {
        Some(publisher) => {
            match publisher
                .publish(&req.user_id, &req.project_id, "index.html", &markup.content)
                .await
            {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::error!(error = %e, "publish failed");
                    None
                }
            }
        }
        None => None,
    };

    (
        StatusCode::OK,
        Json(SiteResponse {
            success: true,
            html: Some(markup.content),
            architecture: Some(architecture.content),
            public_url,
            error: None,
        }),
    )
}

fn failure_response(error: Error) -> (StatusCode, Json<SiteResponse>) {
    let status = match &error {
        Error::PromptBlocked { .. } => StatusCode::BAD_REQUEST,
        Error::ProvidersExhausted => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(SiteResponse::failure(error.to_string())))
}
