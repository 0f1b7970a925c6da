//! Request handlers.

use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use armoire_sync::{DetailReport, IntegrityReport, SyncReport};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Health probe. Intentionally unauthenticated for load balancer probes.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Run the full integrity check and return the report.
pub async fn check_integrity(State(state): State<AppState>) -> ApiResult<Json<IntegrityReport>> {
    let report = state.sync.check_integrity(&CancellationToken::new()).await?;
    Ok(Json(report))
}

/// Deep check of one item by id, classname, name, or filename.
pub async fn check_item(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> ApiResult<Json<DetailReport>> {
    let report = state.sync.check_item(&identifier).await?;
    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct SyncParams {
    #[serde(default)]
    pub confirm: bool,
    #[serde(rename = "skip-data", default)]
    pub skip_data: bool,
}

/// Preview shown when the sync endpoint is hit without confirmation.
#[derive(Debug, Serialize)]
pub struct SyncPreview {
    pub preview: bool,
    pub message: String,
    pub total_assets: usize,
    pub furnidata_missing: usize,
    pub storage_missing: usize,
    pub database_missing: usize,
    pub with_mismatches: usize,
    pub warning: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SyncResponse {
    Preview(Box<SyncPreview>),
    Report(Box<SyncReport>),
}

/// Trigger a furniture sync. Without `confirm=true` this only returns a
/// preview; with it, the destructive sync runs.
pub async fn sync_furniture(
    State(state): State<AppState>,
    Query(params): Query<SyncParams>,
) -> ApiResult<Json<SyncResponse>> {
    tracing::info!(confirm = params.confirm, skip_data = params.skip_data, "furniture sync request");

    let cancel = CancellationToken::new();

    if !params.confirm {
        let report = state.sync.check_integrity(&cancel).await?;
        return Ok(Json(SyncResponse::Preview(Box::new(SyncPreview {
            preview: true,
            message: "Add ?confirm=true to execute sync".to_string(),
            total_assets: report.total_assets,
            furnidata_missing: report.furnidata_missing,
            storage_missing: report.storage_missing,
            database_missing: report.database_missing,
            with_mismatches: report.with_mismatches,
            warning: "This operation will DELETE assets and UPDATE database values".to_string(),
        }))));
    }

    let report = state
        .sync
        .full_sync(&cancel, true, params.skip_data)
        .await?;

    tracing::info!(
        rows_updated = report.rows_updated,
        assets_deleted = report.assets_deleted,
        errors = report.errors.len(),
        "furniture sync finished"
    );
    Ok(Json(SyncResponse::Report(Box::new(report))))
}
