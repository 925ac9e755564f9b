use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{AssetKind, AssetListResponse, AssetRecord, AttachAssetRequest};
use crate::services::AssetService;
use crate::AppState;

/// List a chapter's assets
/// GET /api/v1/chapters/:id/assets
pub async fn list_assets(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<AssetListResponse>>> {
    let assets = AssetService::list(&state.db, &id).await?;
    Ok(Json(ApiResponse::success(AssetListResponse { assets })))
}

/// Attach an already-stored asset to a chapter
/// POST /api/v1/chapters/:id/assets
pub async fn attach_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AttachAssetRequest>,
) -> Result<Json<ApiResponse<AssetRecord>>> {
    if req.url.is_empty() {
        return Err(AppError::BadRequest("No url provided".to_string()));
    }
    if req.name.is_empty() {
        return Err(AppError::BadRequest("No name provided".to_string()));
    }

    let kind = match &req.kind {
        Some(tag) => AssetKind::from_str(tag)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown asset type: {}", tag)))?,
        None => AssetKind::infer_from_url(&req.url),
    };

    let record = AssetService::attach(
        &state.db,
        &id,
        &req.url,
        &req.name,
        kind,
        req.size.unwrap_or(0),
    )
    .await?;

    Ok(Json(ApiResponse::success(record)))
}

/// Remove an asset from a chapter
/// DELETE /api/v1/chapters/:id/assets/:asset_id
pub async fn remove_asset(
    State(state): State<AppState>,
    Path((id, asset_id)): Path<(String, String)>,
) -> Result<impl IntoResponse> {
    AssetService::remove(&state.db, &id, &asset_id).await?;
    Ok(Json(ApiResponse::<()>::success_message("Asset removed")))
}
