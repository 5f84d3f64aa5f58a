use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use triage_ai::allocation::{
    webhook_router, AdapterRegistry, AllocationEngine, AllocationTarget, AssignmentGroup,
    EngineConfig, GeoPoint, GroupId, GroupMetrics, GroupStatus, RequesterLocation, StandardTicket,
    TicketAllocationService,
};
use triage_ai::allocation::servicenow::{ServiceNowHandler, ServiceNowSource};
use triage_ai::config::AppConfig;
use triage_ai::error::AppError;
use triage_ai::telemetry;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "Ticket Triage Orchestrator",
    about = "Route incoming support tickets to best-fit assignment groups",
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
    /// Run the allocation engine offline against JSON files
    Allocate(AllocateArgs),
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Args, Debug)]
struct AllocateArgs {
    /// Path to a normalized ticket JSON document
    #[arg(long)]
    ticket: PathBuf,
    /// Path to a JSON array of candidate assignment groups
    #[arg(long)]
    groups: PathBuf,
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
        Command::Allocate(args) => run_allocate(args),
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

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let engine = Arc::new(AllocationEngine::new(EngineConfig::default())?);
    let registry = AdapterRegistry::new()
        .with_source("servicenow", Arc::new(ServiceNowSource))
        .with_handler(
            "servicenow",
            Arc::new(ServiceNowHandler::new(demo_group_catalog())),
        );
    let service = Arc::new(TicketAllocationService::new(registry, engine));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(webhook_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "ticket triage orchestrator ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let ticket: StandardTicket = serde_json::from_str(&std::fs::read_to_string(&args.ticket)?)?;
    let groups: Vec<AssignmentGroup> =
        serde_json::from_str(&std::fs::read_to_string(&args.groups)?)?;

    let engine = AllocationEngine::new(EngineConfig::default())?;
    let decision = engine.allocate(&ticket, &groups);

    println!("Ticket {} ({})", ticket.id.0, ticket.title);
    match &decision.target {
        AllocationTarget::Group { id, name } => {
            println!("  -> {name} [{}]", id.0);
        }
        AllocationTarget::NoEligibleGroup => {
            println!("  -> no eligible group");
        }
    }
    println!("  rationale:  {}", decision.rationale);
    println!("  confidence: {:.2}", decision.confidence);
    for entry in &decision.ranking {
        println!(
            "  {:<24} composite {:.3} (availability {:.2}, timezone {:.2}, proximity {:.2})",
            entry.group_name,
            entry.scores.composite,
            entry.scores.availability,
            entry.scores.timezone,
            entry.scores.proximity,
        );
    }

    Ok(())
}

/// Seed catalog used when the service runs without a live group feed; the
/// shape matches what a ServiceNow group sync would deliver.
fn demo_group_catalog() -> Vec<AssignmentGroup> {
    let capabilities = |tags: &[&str]| -> BTreeSet<String> {
        tags.iter().map(|tag| tag.to_string()).collect()
    };

    vec![
        AssignmentGroup {
            id: GroupId("l1-network-east".to_string()),
            name: "L1 Network East".to_string(),
            location: RequesterLocation {
                region: Some("us-east".to_string()),
                timezone_offset_hours: Some(-5.0),
                coordinates: Some(GeoPoint {
                    latitude: 40.71,
                    longitude: -74.0,
                }),
            },
            capabilities: capabilities(&["network", "vpn", "troubleshooting"]),
            status: GroupStatus::Active,
            max_capacity: 12,
            current_load: 4,
            metrics: GroupMetrics {
                avg_resolution_hours: Some(6.5),
                success_rate: Some(0.93),
                weekly_throughput: Some(41.0),
            },
        },
        AssignmentGroup {
            id: GroupId("l2-platform-west".to_string()),
            name: "L2 Platform West".to_string(),
            location: RequesterLocation {
                region: Some("us-west".to_string()),
                timezone_offset_hours: Some(-8.0),
                coordinates: Some(GeoPoint {
                    latitude: 37.77,
                    longitude: -122.42,
                }),
            },
            capabilities: capabilities(&["platform", "database", "network"]),
            status: GroupStatus::Active,
            max_capacity: 8,
            current_load: 5,
            metrics: GroupMetrics {
                avg_resolution_hours: Some(11.0),
                success_rate: Some(0.88),
                weekly_throughput: Some(27.0),
            },
        },
        AssignmentGroup {
            id: GroupId("l3-engineering-apac".to_string()),
            name: "L3 Engineering APAC".to_string(),
            location: RequesterLocation {
                region: Some("ap-southeast".to_string()),
                timezone_offset_hours: Some(8.0),
                coordinates: Some(GeoPoint {
                    latitude: 1.35,
                    longitude: 103.82,
                }),
            },
            capabilities: capabilities(&["development", "platform", "escalation"]),
            status: GroupStatus::Active,
            max_capacity: 6,
            current_load: 2,
            metrics: GroupMetrics {
                avg_resolution_hours: Some(20.0),
                success_rate: Some(0.97),
                weekly_throughput: Some(15.0),
            },
        },
    ]
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
