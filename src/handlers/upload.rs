use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::error::{ApiResponse, AppError, Result};
use crate::models::{AssetKind, UploadResponse};
use crate::services::AssetService;
use crate::AppState;

/// Upload a course asset
/// POST /api/v1/assets/upload
pub async fn upload_asset(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<UploadResponse>>> {
    let mut file_data: Option<Bytes> = None;
    let mut file_name: Option<String> = None;
    let mut kind_tag: Option<String> = None;
    let mut folder: Option<String> = None;
    let mut chapter_id: Option<String> = None;

    // Process multipart fields
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to process multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                file_data = Some(field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file: {}", e))
                })?);
            }
            "type" => {
                let text = field.text().await.unwrap_or_default();
                if !text.is_empty() {
                    kind_tag = Some(text);
                }
            }
            "folder" => {
                let text = field.text().await.unwrap_or_default();
                if !text.is_empty() {
                    folder = Some(text);
                }
            }
            "chapter_id" => {
                let text = field.text().await.unwrap_or_default();
                if !text.is_empty() {
                    chapter_id = Some(text);
                }
            }
            _ => {}
        }
    }

    // Validate file
    let data = file_data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::BadRequest("No file name provided".to_string()))?;
    let kind_tag =
        kind_tag.ok_or_else(|| AppError::BadRequest("No asset type provided".to_string()))?;
    let kind = AssetKind::from_str(&kind_tag)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown asset type: {}", kind_tag)))?;

    let result = AssetService::upload(
        &state.db,
        &state.media,
        kind,
        folder,
        chapter_id,
        file_name,
        data,
    )
    .await?;

    Ok(Json(ApiResponse::success(result)))
}
