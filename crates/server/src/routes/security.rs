//! Security audit endpoints.
//!
//! `/api/security/audit` runs every configured analyzer and always answers
//! with a full report. The per-tool endpoints expose a single adapter and
//! answer 200 with `success: false` when that tool is unavailable or fails,
//! so callers can distinguish "the tool broke" from "the request was bad".

use axum::{extract::State, http::StatusCode, Json};
use infraforge_common::types::{AuditReport, AuditRequest, ToolReport};

use crate::{error::ApiError, ApiState};

/// `POST /api/security/audit`
pub async fn audit(
    State(state): State<ApiState>,
    Json(request): Json<AuditRequest>,
) -> Json<AuditReport> {
    Json(state.auditor.audit(&request).await)
}

/// `POST /api/security/slither`
pub async fn slither(
    State(state): State<ApiState>,
    Json(request): Json<AuditRequest>,
) -> Result<Json<ToolReport>, ApiError> {
    run_tool(state, "slither", request).await
}

/// `POST /api/security/mythril`
pub async fn mythril(
    State(state): State<ApiState>,
    Json(request): Json<AuditRequest>,
) -> Result<Json<ToolReport>, ApiError> {
    run_tool(state, "mythril", request).await
}

async fn run_tool(
    state: ApiState,
    name: &str,
    request: AuditRequest,
) -> Result<Json<ToolReport>, ApiError> {
    match state.auditor.run_tool(name, &request).await {
        Some(report) => Ok(Json(report)),
        None => Err(ApiError::new(
            StatusCode::NOT_FOUND,
            format!("unknown analyzer: {name}"),
        )),
    }
}
