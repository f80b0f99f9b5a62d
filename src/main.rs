use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use scheme_advisor::advisor::{
    advisor_router, recommendation_router, AdvisorService, EligibilityEngine, MatchBasis,
    MatchPolicy, MemoryConversationStore, UnconfiguredGenerator, UserProfile,
};
use scheme_advisor::catalog::SchemeCatalog;
use scheme_advisor::config::AppConfig;
use scheme_advisor::error::AppError;
use scheme_advisor::telemetry;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Scheme Advisor",
    about = "Match citizen profiles against government welfare and scholarship schemes",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Run the eligibility engine once for a profile and print the shortlist
    Recommend(RecommendArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
    /// Override the configured scheme catalog path
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RecommendArgs {
    #[arg(long)]
    age: Option<u32>,
    #[arg(long)]
    education: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    occupation: Option<String>,
    #[arg(long)]
    state: Option<String>,
    /// Override the configured scheme catalog path
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Print the per-rule breakdown for every catalog scheme
    #[arg(long)]
    explain: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Recommend(args) => run_recommend(args),
    }
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(catalog) = args.catalog.take() {
        config.catalog.path = catalog;
    }

    telemetry::init(&config.telemetry)?;

    let catalog = Arc::new(SchemeCatalog::load(&config.catalog.path)?);
    info!(
        schemes = catalog.len(),
        path = %config.catalog.path.display(),
        "scheme catalog loaded"
    );

    let store = Arc::new(MemoryConversationStore::default());
    let generator = Arc::new(UnconfiguredGenerator);
    let service = Arc::new(AdvisorService::new(catalog, store, generator));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(advisor_router(service))
        .merge(recommendation_router(config.catalog.path.clone()))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "scheme advisor ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let catalog_path = args.catalog.unwrap_or(config.catalog.path);
    let catalog = SchemeCatalog::load(&catalog_path)?;

    let profile = UserProfile {
        age: args.age,
        education: args.education,
        gender: args.gender,
        occupation: args.occupation,
        state: args.state,
    };

    let engine = EligibilityEngine::new(MatchPolicy::default());
    let outcome = engine.filter(&profile, &catalog);

    println!("Scheme recommendation");
    println!(
        "Catalog: {} ({} schemes)",
        catalog_path.display(),
        catalog.len()
    );

    if outcome.schemes.is_empty() {
        println!("\nNo schemes found for this profile.");
    } else {
        match outcome.basis {
            MatchBasis::Exact => println!("\nEligible schemes"),
            MatchBasis::Fallback => {
                println!("\nNo exact match; best-effort shortlist")
            }
        }
        for (index, scheme) in outcome.schemes.iter().enumerate() {
            let region = scheme.state.as_deref().unwrap_or("all states");
            println!(
                "{}. {} [{} | {}] ages {}-{}",
                index + 1,
                scheme.scheme_name,
                scheme.scheme_level.label(),
                region,
                scheme.min_age,
                scheme.max_age
            );
        }
    }

    if args.explain {
        println!("\nRule breakdown by scheme");
        for scheme in catalog.schemes() {
            println!("- {}", scheme.scheme_name);
            for check in engine.audit(&profile, scheme) {
                let status = if check.passed { "pass" } else { "fail" };
                println!("    {:<10} {} ({})", check.rule.label(), status, check.notes);
            }
        }
    }

    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
