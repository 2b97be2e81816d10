//! Router, wire types, and error mapping for the network API.
//!
//! The transport does no business logic: decode the request, call the
//! matching service, encode the result. Domain errors map to status codes
//! here so the services stay transport-agnostic.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use corral_common::CorralError;
use corral_network::{
    EndpointAttachment, MemoryContainerDirectory, MemoryNetworkDirectory, NetworkLifecycle,
    NetworkQuery, NetworkResource,
};

/// Services shared across request handlers.
#[derive(Clone)]
struct AppState {
    query: Arc<NetworkQuery>,
    lifecycle: Arc<NetworkLifecycle>,
    attach: Arc<EndpointAttachment>,
    containers: Arc<MemoryContainerDirectory>,
}

/// Build the daemon router over a fresh in-memory engine.
pub async fn app() -> Router {
    let networks = Arc::new(MemoryNetworkDirectory::new());
    let containers = Arc::new(MemoryContainerDirectory::new(&networks));
    let state = AppState {
        query: Arc::new(NetworkQuery::new(networks.clone())),
        lifecycle: Arc::new(NetworkLifecycle::new(networks.clone())),
        attach: Arc::new(EndpointAttachment::new(networks, containers.clone())),
        containers,
    };

    Router::new()
        .route("/", get(root))
        .route("/version", get(version))
        .route("/networks", get(list_networks))
        .route("/networks/create", post(create_network))
        .route("/networks/{id}", get(get_network).delete(delete_network))
        .route("/networks/{id}/connect", post(connect_network))
        .route("/networks/{id}/disconnect", post(disconnect_network))
        .route("/containers", get(list_containers))
        .route("/containers/create", post(create_container))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Domain error carried out of a handler.
struct ApiError(CorralError);

impl From<CorralError> for ApiError {
    fn from(err: CorralError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        (status, Json(json!({ "message": self.0.to_string() }))).into_response()
    }
}

/// Map a domain error to its HTTP status.
fn status_for(err: &CorralError) -> StatusCode {
    match err {
        CorralError::NetworkNotFound { .. } => StatusCode::NOT_FOUND,
        CorralError::NetworkNameConflict { .. } => StatusCode::CONFLICT,
        CorralError::InvalidFilter { .. }
        | CorralError::InvalidContainer { .. }
        | CorralError::InvalidId { .. } => StatusCode::BAD_REQUEST,
        CorralError::Directory { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

#[derive(Debug, Deserialize)]
struct NetworkCreateRequest {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Driver", default)]
    driver: String,
    #[serde(rename = "Options", default)]
    options: HashMap<String, String>,
    #[serde(rename = "CheckDuplicate", default)]
    check_duplicate: bool,
}

#[derive(Debug, Serialize)]
struct NetworkCreateResponse {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Warning")]
    warning: String,
}

/// Body of connect and disconnect requests.
#[derive(Debug, Deserialize)]
struct ContainerTarget {
    #[serde(rename = "Container")]
    container: String,
}

#[derive(Debug, Deserialize)]
struct ContainerCreateRequest {
    #[serde(rename = "Name")]
    name: String,
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "corrald running" }))
}

async fn version() -> Json<Value> {
    Json(json!({ "version": env!("CARGO_PKG_VERSION") }))
}

async fn list_networks(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<NetworkResource>>, ApiError> {
    let raw = params.get("filters").map_or("", String::as_str);
    Ok(Json(state.query.list(raw).await?))
}

async fn get_network(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NetworkResource>, ApiError> {
    Ok(Json(state.query.get(&id).await?))
}

async fn create_network(
    State(state): State<AppState>,
    Json(request): Json<NetworkCreateRequest>,
) -> Result<(StatusCode, Json<NetworkCreateResponse>), ApiError> {
    let created = state
        .lifecycle
        .create(
            &request.name,
            &request.driver,
            request.options,
            request.check_duplicate,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(NetworkCreateResponse {
            id: created.id,
            warning: created.warning,
        }),
    ))
}

async fn delete_network(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.lifecycle.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn connect_network(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(target): Json<ContainerTarget>,
) -> Result<StatusCode, ApiError> {
    state.attach.connect(&id, &target.container).await?;
    Ok(StatusCode::OK)
}

async fn disconnect_network(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(target): Json<ContainerTarget>,
) -> Result<StatusCode, ApiError> {
    state.attach.disconnect(&id, &target.container).await?;
    Ok(StatusCode::OK)
}

async fn list_containers(State(state): State<AppState>) -> Json<Value> {
    let containers: Vec<Value> = state
        .containers
        .containers()
        .into_iter()
        .map(|(id, name)| json!({ "Id": id, "Name": name }))
        .collect();
    Json(json!({ "containers": containers }))
}

async fn create_container(
    State(state): State<AppState>,
    Json(request): Json<ContainerCreateRequest>,
) -> Json<Value> {
    let container = state.containers.add_container(&request.name);
    Json(json!({ "Id": container.id() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        let not_found = CorralError::NetworkNotFound {
            id: "x".to_string(),
        };
        assert_eq!(status_for(&not_found), StatusCode::NOT_FOUND);

        let conflict = CorralError::NetworkNameConflict {
            name: "web".to_string(),
        };
        assert_eq!(status_for(&conflict), StatusCode::CONFLICT);

        let invalid = CorralError::InvalidContainer {
            id: "c1".to_string(),
            source: Box::new(CorralError::Directory {
                message: "No such container: c1".to_string(),
            }),
        };
        assert_eq!(status_for(&invalid), StatusCode::BAD_REQUEST);

        let engine = CorralError::Directory {
            message: "driver failure".to_string(),
        };
        assert_eq!(status_for(&engine), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn create_request_defaults() {
        let request: NetworkCreateRequest = serde_json::from_str(r#"{"Name": "web"}"#).unwrap();
        assert_eq!(request.name, "web");
        assert!(request.driver.is_empty());
        assert!(request.options.is_empty());
        assert!(!request.check_duplicate);
    }
}
