//! Admin HTTP API over the control plane.
//!
//! Mutating routes update the registry, then compile and reload in one step.

pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use crate::control::ControlPlane;
use self::auth::admin_auth_middleware;
use self::handlers::*;

/// State shared by admin handlers.
#[derive(Clone)]
pub struct AdminState {
    pub plane: Arc<ControlPlane>,
    pub api_key: Option<Arc<str>>,
}

impl AdminState {
    pub fn new(plane: Arc<ControlPlane>, api_key: Option<String>) -> Self {
        Self {
            plane,
            api_key: api_key.filter(|k| !k.is_empty()).map(Arc::from),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    let protected = Router::new()
        .route("/v1/services", get(list_services).put(put_service))
        .route("/v1/services/{name}", delete(delete_service))
        .route("/v1/certs", get(get_certs))
        .route("/v1/certs/{name}", put(put_cert))
        .route("/v1/config", get(get_config))
        .route("/v1/reconfigure", post(reconfigure))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware));

    Router::new()
        .route("/v1/status", get(get_status))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
