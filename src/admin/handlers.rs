use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Serialize;
use std::collections::BTreeMap;
use crate::admin::AdminState;
use crate::compiler::CompiledConfig;
use crate::control::ControlPlane;
use crate::error::{ControlError, ControlResult};
use crate::registry::Service;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub services: usize,
    pub certs: usize,
}

/// Outcome of a mutation that recompiled and reloaded the proxy.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    pub config_path: String,
    pub bytes: usize,
}

impl From<CompiledConfig> for ApplyResult {
    fn from(compiled: CompiledConfig) -> Self {
        Self {
            config_path: compiled.path.display().to_string(),
            bytes: compiled.text.len(),
        }
    }
}

/// Errors returned by admin handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Control(ControlError),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Control(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Run a blocking core operation off the async executor.
async fn blocking<T, F>(state: &AdminState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&ControlPlane) -> ControlResult<T> + Send + 'static,
    T: Send + 'static,
{
    let plane = state.plane.clone();
    tokio::task::spawn_blocking(move || f(&plane))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::Control)
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let registry = state.plane.registry();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        services: registry.len(),
        certs: registry.cert_names().len(),
    })
}

pub async fn list_services(State(state): State<AdminState>) -> Json<Vec<Service>> {
    Json(state.plane.registry().services())
}

pub async fn put_service(
    State(state): State<AdminState>,
    Json(service): Json<Service>,
) -> Result<Json<ApplyResult>, ApiError> {
    service
        .validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let compiled = blocking(&state, move |plane| {
        plane.registry().add_service(service);
        plane.reconfigure()
    })
    .await?;
    Ok(Json(compiled.into()))
}

pub async fn delete_service(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Json<ApplyResult>, ApiError> {
    let compiled = blocking(&state, move |plane| {
        plane.registry().remove_service(&name);
        plane.reconfigure()
    })
    .await?;
    Ok(Json(compiled.into()))
}

/// Certificate contents keyed by name, base64-encoded since certificates
/// may be binary (DER).
pub async fn get_certs(
    State(state): State<AdminState>,
) -> Result<Json<BTreeMap<String, String>>, ApiError> {
    let certs = blocking(&state, |plane| plane.registry().get_certs()).await?;
    let encoded = certs
        .into_iter()
        .map(|(name, content)| (name, STANDARD.encode(content)))
        .collect();
    Ok(Json(encoded))
}

pub async fn put_cert(
    State(state): State<AdminState>,
    Path(name): Path<String>,
) -> Result<Json<ApplyResult>, ApiError> {
    if name.contains('/') || name.starts_with('.') {
        return Err(ApiError::BadRequest(format!("invalid certificate name '{}'", name)));
    }

    let compiled = blocking(&state, move |plane| {
        plane.registry().add_cert(name);
        plane.reconfigure()
    })
    .await?;
    Ok(Json(compiled.into()))
}

pub async fn get_config(State(state): State<AdminState>) -> Result<Response, ApiError> {
    let text = blocking(&state, |plane| plane.reader().read_config()).await?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response())
}

pub async fn reconfigure(State(state): State<AdminState>) -> Result<Json<ApplyResult>, ApiError> {
    let compiled = blocking(&state, |plane| plane.reconfigure()).await?;
    Ok(Json(compiled.into()))
}
