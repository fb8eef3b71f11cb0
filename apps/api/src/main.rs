mod config;
mod errors;
mod llm_client;
mod pipeline;
mod profile;
mod publish;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, PublishMode};
use crate::llm_client::LlmClient;
use crate::profile::extract::LlmProfileExtractor;
use crate::publish::git::GitRunner;
use crate::publish::{BranchPublisher, CurrentBranchPublisher, Publisher};
use crate::routes::build_router;
use crate::state::AppState;
use crate::templates::Registry;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Portfolio API v{}", env!("CARGO_PKG_VERSION"));

    // Load the template registry. A broken catalog is fatal.
    let registry = Registry::load(&config.template_registry_path).with_context(|| {
        format!(
            "Failed to load template registry from {}",
            config.template_registry_path.display()
        )
    })?;
    info!(
        "Template registry loaded: {} templates (default: {})",
        registry.templates().len(),
        registry.default_template().id
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let publisher = build_publisher(&config);

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;
    config.check_publish_paths()?;

    // Build app state
    let state = AppState {
        registry: Arc::new(registry),
        extractor: Arc::new(LlmProfileExtractor(llm)),
        publisher,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the publisher for PUBLISH_MODE. `None` disables publishing.
fn build_publisher(config: &Config) -> Option<Arc<dyn Publisher>> {
    let git = GitRunner::new(config.git_repo_dir.clone());
    let publisher: Arc<dyn Publisher> = match config.publish_mode {
        PublishMode::Disabled => {
            info!("Publishing disabled");
            return None;
        }
        PublishMode::CurrentBranch => {
            info!("Publishing to current branch in {}", git.repo_dir().display());
            Arc::new(CurrentBranchPublisher::new(git))
        }
        PublishMode::Branch => {
            info!(
                "Publishing to {}-<name> branches in {} (gh pages: {})",
                config.git_branch_prefix,
                git.repo_dir().display(),
                config.enable_gh_pages
            );
            Arc::new(BranchPublisher::new(
                git,
                config.git_branch_prefix.clone(),
                config.enable_gh_pages,
            ))
        }
    };
    Some(publisher)
}
