use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::client::navigation;
use crate::client::{
    Allocation, AllocationStatus, ClientController, ClientNode, ClientQuery, DrainPhase,
    NodeDriver, NodeEvent, ViewState,
};
use crate::config::ListConfig;
use crate::error::ConsoleError;
use crate::registry::NodeRegistry;

type Controllers = HashMap<Uuid, ClientController<NodeRegistry>>;

#[derive(Clone)]
pub struct DashboardState {
    pub registry: Arc<NodeRegistry>,
    pub list_config: ListConfig,
    /// One open client page per node, kept for the server's lifetime so
    /// drain edges and in-flight eligibility changes are tracked across
    /// requests.
    pub controllers: Arc<RwLock<Controllers>>,
}

impl DashboardState {
    pub fn new(registry: Arc<NodeRegistry>, list_config: ListConfig) -> Self {
        Self {
            registry,
            list_config,
            controllers: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[derive(Serialize)]
struct NodeSummary {
    id: Uuid,
    short_id: String,
    name: String,
    datacenter: String,
    status: String,
    scheduling_eligibility: String,
    is_draining: bool,
    allocation_count: usize,
}

impl From<&ClientNode> for NodeSummary {
    fn from(node: &ClientNode) -> Self {
        Self {
            id: node.id,
            short_id: node.short_id(),
            name: node.name.clone(),
            datacenter: node.datacenter.clone(),
            status: node.status.clone(),
            scheduling_eligibility: node.scheduling_eligibility.to_string(),
            is_draining: node.is_draining,
            allocation_count: node.allocations.len(),
        }
    }
}

#[derive(Serialize)]
struct AllocationRow {
    id: Uuid,
    short_id: String,
    name: String,
    job_id: String,
    task_group: String,
    client_status: AllocationStatus,
    was_preempted: bool,
    modify_index: u64,
    create_time: DateTime<Utc>,
    modify_time: DateTime<Utc>,
}

impl From<&Allocation> for AllocationRow {
    fn from(alloc: &Allocation) -> Self {
        Self {
            id: alloc.id,
            short_id: alloc.short_id(),
            name: alloc.name.clone(),
            job_id: alloc.job_id.clone(),
            task_group: alloc.task_group.clone(),
            client_status: alloc.client_status,
            was_preempted: alloc.was_preempted,
            modify_index: alloc.modify_index,
            create_time: alloc.create_time,
            modify_time: alloc.modify_time,
        }
    }
}

#[derive(Serialize)]
struct ClientPageResponse {
    node: NodeSummary,
    allocations: Vec<AllocationRow>,
    total_allocations: usize,
    preemption_count: usize,
    current_page: u32,
    page_size: usize,
    total_pages: usize,
    query: BTreeMap<&'static str, String>,
    events: Vec<NodeEvent>,
    drivers: Vec<NodeDriver>,
    show_drain_notification: bool,
    drain_phase: DrainPhase,
    eligibility_error: Option<String>,
    eligibility_running: bool,
}

impl ClientPageResponse {
    fn from_controller(controller: &ClientController<NodeRegistry>) -> Self {
        let view = controller.view_state();
        Self {
            node: NodeSummary::from(controller.node()),
            allocations: controller
                .paged_allocations()
                .into_iter()
                .map(AllocationRow::from)
                .collect(),
            total_allocations: controller.sorted_allocations().len(),
            preemption_count: controller.preemptions().len(),
            current_page: view.current_page(),
            page_size: view.page_size(),
            total_pages: controller.total_pages(),
            query: view.query_pairs().into_iter().collect(),
            events: controller.sorted_events().into_iter().cloned().collect(),
            drivers: controller.sorted_drivers().into_iter().cloned().collect(),
            show_drain_notification: controller.show_drain_notification(),
            drain_phase: controller.drain_phase(),
            eligibility_error: controller.eligibility_error(),
            eligibility_running: controller.eligibility().is_running(),
        }
    }
}

#[derive(Deserialize)]
struct SetEligibilityRequest {
    eligible: bool,
}

#[derive(Serialize)]
struct SetEligibilityResponse {
    outcome: &'static str,
    eligibility_error: Option<String>,
}

#[derive(Serialize)]
struct TransitionResponse {
    route: &'static str,
    path: String,
    alloc_id: Uuid,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

struct ApiError(ConsoleError);

impl From<ConsoleError> for ApiError {
    fn from(err: ConsoleError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ConsoleError::NodeNotFound(_) => StatusCode::NOT_FOUND,
            ConsoleError::InvalidQuery { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn router(state: DashboardState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/clients", get(list_clients_handler))
        .route("/api/clients/:node_id", get(client_page_handler))
        .route(
            "/api/clients/:node_id/eligibility",
            post(set_eligibility_handler),
        )
        .route(
            "/api/clients/:node_id/drain-notification",
            delete(dismiss_drain_notification_handler),
        )
        .route(
            "/api/clients/:node_id/allocations/:alloc_id/goto",
            get(goto_allocation_handler),
        )
        .layer(cors)
        .with_state(state)
}

pub async fn run_dashboard(addr: SocketAddr, state: DashboardState, shutdown: CancellationToken) {
    let app = router(state);

    tracing::info!(addr = %addr, "Starting dashboard server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(addr = %addr, error = %e, "Failed to bind dashboard server");
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
    {
        tracing::error!(error = %e, "Dashboard server failed");
    }

    tracing::info!("Dashboard server stopped");
}

/// Fetch the latest snapshot of a node and feed it to its open page,
/// opening one on first visit.
async fn sync_controller(
    state: &DashboardState,
    controllers: &mut Controllers,
    node_id: Uuid,
) -> Result<(), ConsoleError> {
    let node = state
        .registry
        .get(&node_id)
        .await
        .ok_or(ConsoleError::NodeNotFound(node_id))?;

    match controllers.get_mut(&node_id) {
        Some(controller) => controller.set_node(node),
        None => {
            let controller =
                ClientController::new(state.registry.clone(), node, &state.list_config);
            controllers.insert(node_id, controller);
        }
    }
    Ok(())
}

async fn list_clients_handler(State(state): State<DashboardState>) -> impl IntoResponse {
    let nodes: Vec<NodeSummary> = state
        .registry
        .list()
        .await
        .iter()
        .map(NodeSummary::from)
        .collect();
    Json(nodes)
}

async fn client_page_handler(
    State(state): State<DashboardState>,
    Path(node_id): Path<Uuid>,
    Query(query): Query<ClientQuery>,
) -> Result<Json<ClientPageResponse>, ApiError> {
    let view = ViewState::from_query(&state.list_config, &query)?;

    let mut controllers = state.controllers.write().await;
    sync_controller(&state, &mut controllers, node_id).await?;
    let controller = controllers
        .get_mut(&node_id)
        .ok_or(ConsoleError::NodeNotFound(node_id))?;
    controller.set_view_state(view);

    Ok(Json(ClientPageResponse::from_controller(controller)))
}

async fn set_eligibility_handler(
    State(state): State<DashboardState>,
    Path(node_id): Path<Uuid>,
    Json(payload): Json<SetEligibilityRequest>,
) -> Result<Json<SetEligibilityResponse>, ApiError> {
    let toggle = {
        let mut controllers = state.controllers.write().await;
        sync_controller(&state, &mut controllers, node_id).await?;
        controllers
            .get(&node_id)
            .ok_or(ConsoleError::NodeNotFound(node_id))?
            .eligibility()
    };

    let outcome = toggle.set_eligibility(payload.eligible).await;
    Ok(Json(SetEligibilityResponse {
        outcome: outcome.as_str(),
        eligibility_error: toggle.eligibility_error(),
    }))
}

async fn dismiss_drain_notification_handler(
    State(state): State<DashboardState>,
    Path(node_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let mut controllers = state.controllers.write().await;
    sync_controller(&state, &mut controllers, node_id).await?;
    let controller = controllers
        .get_mut(&node_id)
        .ok_or(ConsoleError::NodeNotFound(node_id))?;
    controller.dismiss_drain_notification();
    Ok(StatusCode::NO_CONTENT)
}

async fn goto_allocation_handler(
    State(state): State<DashboardState>,
    Path((node_id, alloc_id)): Path<(Uuid, Uuid)>,
) -> Response {
    let node = match state.registry.get(&node_id).await {
        Some(node) => node,
        None => return ApiError(ConsoleError::NodeNotFound(node_id)).into_response(),
    };

    match node.allocations.iter().find(|a| a.id == alloc_id) {
        Some(allocation) => {
            let transition = navigation::goto_allocation(allocation);
            Json(TransitionResponse {
                route: transition.route_name(),
                path: transition.path(),
                alloc_id: allocation.id,
            })
            .into_response()
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Allocation not found: {}", alloc_id),
            }),
        )
            .into_response(),
    }
}
